use super::error::Error;
use entity::connection_status::ConnectionStatus;
use entity::connections::{ActiveModel, Column, Entity, Model};
use entity::goals::Goals;
use entity::{canonical_pair, Id};
use log::*;
use sea_orm::{
    entity::prelude::*, ActiveValue::Set, Condition, ConnectionTrait, QueryOrder,
};

/// Inserts a new `pending` connection between a mentor and a mentee.
///
/// Fails with `RecordConflict` when any connection between the two users
/// already exists, regardless of its status or direction.
pub async fn create(
    db: &impl ConnectionTrait,
    mentor_id: &str,
    mentee_id: &str,
) -> Result<Model, Error> {
    debug!("New connection to be inserted: mentor {mentor_id}, mentee {mentee_id}");

    let now = super::now();
    let (pair_low_id, pair_high_id) = canonical_pair(mentor_id, mentee_id);

    let active_model = ActiveModel {
        id: Set(Id::new_v4()),
        mentor_id: Set(mentor_id.to_owned()),
        mentee_id: Set(mentee_id.to_owned()),
        pair_low_id: Set(pair_low_id),
        pair_high_id: Set(pair_high_id),
        status: Set(ConnectionStatus::Pending),
        goals: Set(Goals::default()),
        progress_notes: Set(None),
        last_message_at: Set(None),
        last_message_preview: Set(None),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    };

    Ok(active_model.insert(db).await?)
}

pub async fn find_by_id(db: &impl ConnectionTrait, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(Error::not_found)
}

/// The connection between two users in either direction, if any.
pub async fn find_by_pair(
    db: &impl ConnectionTrait,
    user_a: &str,
    user_b: &str,
) -> Result<Option<Model>, Error> {
    let (low, high) = canonical_pair(user_a, user_b);

    Ok(Entity::find()
        .filter(Column::PairLowId.eq(low))
        .filter(Column::PairHighId.eq(high))
        .one(db)
        .await?)
}

/// Every connection the user takes part in, newest first.
pub async fn find_by_user(db: &impl ConnectionTrait, user_id: &str) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .filter(
            Condition::any()
                .add(Column::MentorId.eq(user_id))
                .add(Column::MenteeId.eq(user_id)),
        )
        .order_by_desc(Column::CreatedAt)
        .order_by_desc(Column::Id)
        .all(db)
        .await?)
}

/// Moves a connection from `from` to `to`, only if it is still in `from`.
///
/// Returns `RecordNotUpdated` when the row was changed concurrently.
/// Terminal target states also clear `is_active`.
pub async fn transition_status(
    db: &impl ConnectionTrait,
    id: Id,
    from: ConnectionStatus,
    to: ConnectionStatus,
) -> Result<Model, Error> {
    debug!("Transitioning connection {id}: {from} -> {to}");

    let result = Entity::update_many()
        .set(ActiveModel {
            status: Set(to),
            is_active: Set(!to.is_terminal()),
            updated_at: Set(super::now()),
            ..Default::default()
        })
        .filter(Column::Id.eq(id))
        .filter(Column::Status.eq(from))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        warn!("Connection {id} was not in status {from}; nothing updated");
        return Err(Error::not_updated());
    }

    find_by_id(db, id).await
}

/// Replaces the goal list and progress notes of an accepted connection.
pub async fn update_progress(
    db: &impl ConnectionTrait,
    id: Id,
    goals: Goals,
    progress_notes: Option<String>,
) -> Result<Model, Error> {
    let result = Entity::update_many()
        .set(ActiveModel {
            goals: Set(goals),
            progress_notes: Set(progress_notes),
            updated_at: Set(super::now()),
            ..Default::default()
        })
        .filter(Column::Id.eq(id))
        .filter(Column::Status.eq(ConnectionStatus::Accepted))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(Error::not_updated());
    }

    find_by_id(db, id).await
}

/// Stamps the time and a short preview of the newest message.
pub async fn record_last_message(
    db: &impl ConnectionTrait,
    id: Id,
    at: DateTimeWithTimeZone,
    preview: String,
) -> Result<(), Error> {
    Entity::update_many()
        .set(ActiveModel {
            last_message_at: Set(Some(at)),
            last_message_preview: Set(Some(preview)),
            updated_at: Set(at),
            ..Default::default()
        })
        .filter(Column::Id.eq(id))
        .exec(db)
        .await?;

    Ok(())
}
