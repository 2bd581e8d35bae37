use crate::connection_status::ConnectionStatus;
use crate::goals::Goals;
use crate::{Id, UserId};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A mentorship between one mentor and one mentee.
///
/// `pair_low_id`/`pair_high_id` hold the two user ids in canonical order and
/// carry the unique index that allows at most one connection per unordered
/// pair of users.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "connections")]
#[schema(as = entity::connections::Model)]
pub struct Model {
    #[serde(skip_deserializing)]
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Id,
    pub mentor_id: UserId,
    pub mentee_id: UserId,
    #[serde(skip)]
    pub pair_low_id: UserId,
    #[serde(skip)]
    pub pair_high_id: UserId,
    pub status: ConnectionStatus,
    pub goals: Goals,
    pub progress_notes: Option<String>,
    #[schema(value_type = Option<String>, format = DateTime)]
    pub last_message_at: Option<DateTimeWithTimeZone>,
    pub last_message_preview: Option<String>,
    pub is_active: bool,
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

    /// The participant on the other side from `user_id`.
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
    #[sea_orm(has_many = "super::chat_messages::Entity")]
    ChatMessages,
}

impl Related<super::chat_messages::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ChatMessages.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
