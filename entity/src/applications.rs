use crate::application_status::ApplicationStatus;
use crate::{Id, UserId};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A mentee's request to be mentored by a specific mentor.
///
/// `open_key` is set while the application is pending or accepted and cleared
/// on rejection; its unique index keeps one open application per
/// (mentor, mentee) pair while still allowing a new one after a rejection.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "applications")]
#[schema(as = entity::applications::Model)]
pub struct Model {
    #[serde(skip_deserializing)]
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Id,
    pub mentor_id: UserId,
    pub mentee_id: UserId,
    pub status: ApplicationStatus,
    pub message: String,
    #[serde(skip)]
    pub open_key: Option<String>,
    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTimeWithTimeZone,
    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTimeWithTimeZone,
}

impl Model {
    pub fn open_key_for(mentor_id: &str, mentee_id: &str) -> String {
        format!("{mentor_id}:{mentee_id}")
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
