use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;

/// The side(s) of a mentorship a user can take.
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
pub enum Role {
    #[sea_orm(string_value = "mentor")]
    Mentor,
    #[sea_orm(string_value = "mentee")]
    #[default]
    Mentee,
    /// Satisfies either side of any compatibility rule.
    #[sea_orm(string_value = "both")]
    Both,
}

impl Role {
    pub fn can_mentor(&self) -> bool {
        matches!(self, Role::Mentor | Role::Both)
    }

    pub fn can_be_mentored(&self) -> bool {
        matches!(self, Role::Mentee | Role::Both)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Mentor => write!(fmt, "mentor"),
            Role::Mentee => write!(fmt, "mentee"),
            Role::Both => write!(fmt, "both"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "mentor" => Ok(Role::Mentor),
            "mentee" => Ok(Role::Mentee),
            "both" => Ok(Role::Both),
            other => Err(format!("unknown role: {other}")),
        }
    }
}
