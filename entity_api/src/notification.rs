use super::error::Error;
use entity::notification_type::NotificationType;
use entity::notifications::{ActiveModel, Column, Entity, Model};
use entity::Id;
use sea_orm::{entity::prelude::*, ActiveValue::Set, ConnectionTrait, QueryOrder};

pub async fn create(
    db: &impl ConnectionTrait,
    user_id: &str,
    notification_type: NotificationType,
    content: String,
) -> Result<Model, Error> {
    let active_model = ActiveModel {
        id: Set(Id::now_v7()),
        user_id: Set(user_id.to_owned()),
        notification_type: Set(notification_type),
        content: Set(content),
        is_read: Set(false),
        created_at: Set(super::now()),
    };

    Ok(active_model.insert(db).await?)
}

/// A user's inbox, newest first.
pub async fn find_by_user(db: &impl ConnectionTrait, user_id: &str) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::UserId.eq(user_id))
        .order_by_desc(Column::CreatedAt)
        .order_by_desc(Column::Id)
        .all(db)
        .await?)
}

/// Marks one notification read, but only if it belongs to `user_id`.
pub async fn mark_read(db: &impl ConnectionTrait, id: Id, user_id: &str) -> Result<Model, Error> {
    let result = Entity::update_many()
        .set(ActiveModel {
            is_read: Set(true),
            ..Default::default()
        })
        .filter(Column::Id.eq(id))
        .filter(Column::UserId.eq(user_id))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(Error::not_found());
    }

    Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(Error::not_found)
}

pub async fn mark_all_read(db: &impl ConnectionTrait, user_id: &str) -> Result<u64, Error> {
    let result = Entity::update_many()
        .set(ActiveModel {
            is_read: Set(true),
            ..Default::default()
        })
        .filter(Column::UserId.eq(user_id))
        .filter(Column::IsRead.eq(false))
        .exec(db)
        .await?;

    Ok(result.rows_affected)
}

/// Deletes every notification created before `cutoff`.
pub async fn delete_created_before(
    db: &impl ConnectionTrait,
    cutoff: DateTimeWithTimeZone,
) -> Result<u64, Error> {
    let result = Entity::delete_many()
        .filter(Column::CreatedAt.lt(cutoff))
        .exec(db)
        .await?;

    Ok(result.rows_affected)
}
