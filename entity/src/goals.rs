use chrono::NaiveDate;
use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, Eq, PartialEq, Deserialize, Default, Serialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

/// A goal agreed between the participants of a connection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Goal {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>, format = Date)]
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub status: GoalStatus,
}

/// The goal list embedded in a connection. Always replaced as a whole.
#[derive(
    Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult, ToSchema,
)]
pub struct Goals(pub Vec<Goal>);

impl Goals {
    pub fn iter(&self) -> std::slice::Iter<'_, Goal> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn goal_defaults_optional_fields_when_absent() {
        let goal: Goal = serde_json::from_str(r#"{"title":"Ship the CLI"}"#).unwrap();
        assert_eq!(goal.status, GoalStatus::Pending);
        assert_eq!(goal.deadline, None);
    }

    #[test]
    fn goal_status_uses_snake_case() {
        let goal: Goal = serde_json::from_str(
            r#"{"title":"Learn SQL","status":"in_progress","deadline":"2026-12-01"}"#,
        )
        .unwrap();
        assert_eq!(goal.status, GoalStatus::InProgress);
        assert_eq!(goal.deadline, NaiveDate::from_ymd_opt(2026, 12, 1));
    }
}
