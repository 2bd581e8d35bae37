use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
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
pub enum ConnectionStatus {
    #[sea_orm(string_value = "pending")]
    #[default]
    Pending,
    #[sea_orm(string_value = "accepted")]
    Accepted,
    #[sea_orm(string_value = "rejected")]
    Rejected,
    #[sea_orm(string_value = "completed")]
    Completed,
}

impl ConnectionStatus {
    /// Rejected and completed connections are kept for history only.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ConnectionStatus::Rejected | ConnectionStatus::Completed)
    }

    /// Whether a connection in this state may move to `next`.
    pub fn can_transition_to(&self, next: ConnectionStatus) -> bool {
        matches!(
            (self, next),
            (ConnectionStatus::Pending, ConnectionStatus::Accepted)
                | (ConnectionStatus::Pending, ConnectionStatus::Rejected)
                | (ConnectionStatus::Accepted, ConnectionStatus::Completed)
        )
    }
}

impl std::fmt::Display for ConnectionStatus {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionStatus::Pending => write!(fmt, "pending"),
            ConnectionStatus::Accepted => write!(fmt, "accepted"),
            ConnectionStatus::Rejected => write!(fmt, "rejected"),
            ConnectionStatus::Completed => write!(fmt, "completed"),
        }
    }
}

impl FromStr for ConnectionStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(ConnectionStatus::Pending),
            "accepted" => Ok(ConnectionStatus::Accepted),
            "rejected" => Ok(ConnectionStatus::Rejected),
            "completed" => Ok(ConnectionStatus::Completed),
            other => Err(format!("invalid connection status: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::Iterable;

    #[test]
    fn only_three_transitions_are_legal() {
        let legal: Vec<(ConnectionStatus, ConnectionStatus)> = ConnectionStatus::iter()
            .flat_map(|from| ConnectionStatus::iter().map(move |to| (from, to)))
            .filter(|(from, to)| from.can_transition_to(*to))
            .collect();

        assert_eq!(
            legal,
            vec![
                (ConnectionStatus::Pending, ConnectionStatus::Accepted),
                (ConnectionStatus::Pending, ConnectionStatus::Rejected),
                (ConnectionStatus::Accepted, ConnectionStatus::Completed),
            ]
        );
    }

    #[test]
    fn terminal_states_allow_no_transition() {
        for status in ConnectionStatus::iter().filter(|s| s.is_terminal()) {
            assert!(ConnectionStatus::iter().all(|next| !status.can_transition_to(next)));
        }
    }
}
