use super::error::Error;
use entity::chat_messages::{ActiveModel, Column, Entity, Model};
use entity::Id;
use log::*;
use sea_orm::{entity::prelude::*, ActiveValue::Set, ConnectionTrait, QueryOrder};

/// Appends a message to a connection's log. Ids are time-ordered so that
/// messages sharing a timestamp still sort in submission order.
pub async fn create(
    db: &impl ConnectionTrait,
    connection_id: Id,
    sender_id: &str,
    body: String,
) -> Result<Model, Error> {
    let active_model = ActiveModel {
        id: Set(Id::now_v7()),
        connection_id: Set(connection_id),
        sender_id: Set(sender_id.to_owned()),
        body: Set(body),
        is_read: Set(false),
        created_at: Set(super::now()),
    };

    let message = active_model.insert(db).await?;
    debug!("Persisted message {} on connection {connection_id}", message.id);

    Ok(message)
}

/// The full conversation of a connection, oldest first.
pub async fn find_by_connection(
    db: &impl ConnectionTrait,
    connection_id: Id,
) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::ConnectionId.eq(connection_id))
        .order_by_asc(Column::CreatedAt)
        .order_by_asc(Column::Id)
        .all(db)
        .await?)
}

/// Marks every unread message in the connection not written by `reader_id`
/// as read. Returns how many rows changed.
pub async fn mark_read_for_reader(
    db: &impl ConnectionTrait,
    connection_id: Id,
    reader_id: &str,
) -> Result<u64, Error> {
    let result = Entity::update_many()
        .set(ActiveModel {
            is_read: Set(true),
            ..Default::default()
        })
        .filter(Column::ConnectionId.eq(connection_id))
        .filter(Column::SenderId.ne(reader_id))
        .filter(Column::IsRead.eq(false))
        .exec(db)
        .await?;

    Ok(result.rows_affected)
}
