use crate::session_status::SessionStatus;
use crate::{Id, UserId};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A scheduled meeting between the two participants of a connection.
///
/// `mentor_id` and `mentee_id` are copied from the connection when the
/// session is booked.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "sessions")]
#[schema(as = entity::sessions::Model)]
pub struct Model {
    #[serde(skip_deserializing)]
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Id,
    #[schema(value_type = String, format = Uuid)]
    pub connection_id: Id,
    pub mentor_id: UserId,
    pub mentee_id: UserId,
    #[schema(value_type = String, format = DateTime)]
    pub scheduled_at: DateTimeWithTimeZone,
    pub duration_minutes: i32,
    pub topic: String,
    pub meeting_link: Option<String>,
    pub status: SessionStatus,
    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTimeWithTimeZone,
    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTimeWithTimeZone,
}

impl Model {
    pub fn is_participant(&self, user_id: &str) -> bool {
        self.mentor_id == user_id || self.mentee_id == user_id
    }

    /// The participant who is not `user_id`.
    pub fn counterpart_of(&self, user_id: &str) -> Option<&UserId> {
        if self.mentor_id == user_id {
            Some(&self.mentee_id)
        } else if self.mentee_id == user_id {
            Some(&self.mentor_id)
        } else {
            None
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::connections::Entity",
        from = "Column::ConnectionId",
        to = "super::connections::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Connections,
}

impl Related<super::connections::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Connections.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counterpart_is_the_other_participant() {
        let now = chrono::Utc::now().into();
        let session = Model {
            id: Id::new_v4(),
            connection_id: Id::new_v4(),
            mentor_id: "mentor".to_string(),
            mentee_id: "mentee".to_string(),
            scheduled_at: now,
            duration_minutes: 60,
            topic: "Code review habits".to_string(),
            meeting_link: None,
            status: SessionStatus::Upcoming,
            created_at: now,
            updated_at: now,
        };

        assert_eq!(session.counterpart_of("mentor").map(String::as_str), Some("mentee"));
        assert_eq!(session.counterpart_of("mentee").map(String::as_str), Some("mentor"));
        assert_eq!(session.counterpart_of("someone"), None);
        assert!(!session.is_participant("someone"));
        assert!(SessionStatus::Cancelled.is_final());
        assert!(!SessionStatus::Upcoming.is_final());
    }
}
