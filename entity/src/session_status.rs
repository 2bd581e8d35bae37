use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug,
    Clone,
    Copy,
    Eq,
    PartialEq,
    EnumIter,
    Deserialize,
    Default,
    Serialize,
    DeriveActiveEnum,
    ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum SessionStatus {
    #[sea_orm(string_value = "upcoming")]
    #[default]
    Upcoming,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl SessionStatus {
    /// Completed and cancelled sessions are never changed again.
    pub fn is_final(self) -> bool {
        !matches!(self, SessionStatus::Upcoming)
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionStatus::Upcoming => write!(fmt, "upcoming"),
            SessionStatus::Completed => write!(fmt, "completed"),
            SessionStatus::Cancelled => write!(fmt, "cancelled"),
        }
    }
}
