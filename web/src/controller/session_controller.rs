use crate::controller::ApiResponse;
use crate::extractors::authenticated_user::AuthenticatedUser;
use crate::{AppState, Error};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::session::{self as SessionApi, NewSession, SessionUpdate};
use domain::Id;

use log::*;

/// POST book a session on one of the caller's connections
#[utoipa::path(
    post,
    path = "/sessions",
    request_body = domain::session::NewSession,
    responses(
        (status = 201, description = "Session booked", body = domain::sessions::Model),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is not a participant of the connection"),
        (status = 404, description = "Connection not found"),
        (status = 422, description = "Date, duration or topic is invalid"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create(
    AuthenticatedUser(identity): AuthenticatedUser,
    State(app_state): State<AppState>,
    Json(new_session): Json<NewSession>,
) -> Result<impl IntoResponse, Error> {
    debug!(
        "POST Book a session on connection {} by {}",
        new_session.connection_id, identity.user_id
    );

    let session = SessionApi::create(
        app_state.db_conn_ref(),
        app_state.event_publisher.as_ref(),
        &identity.user_id,
        new_session,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(StatusCode::CREATED.into(), session)),
    ))
}

/// GET the caller's sessions, latest date first
#[utoipa::path(
    get,
    path = "/sessions",
    responses(
        (status = 200, description = "Sessions the caller takes part in", body = [domain::sessions::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn index(
    AuthenticatedUser(identity): AuthenticatedUser,
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, Error> {
    let sessions = SessionApi::list_for_user(app_state.db_conn_ref(), &identity.user_id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), sessions)))
}

/// PUT cancel, complete or reschedule a session
#[utoipa::path(
    put,
    path = "/sessions/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Id of the session"),
    ),
    request_body = domain::session::SessionUpdate,
    responses(
        (status = 200, description = "Session updated", body = domain::sessions::Model),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is not a participant of the session"),
        (status = 404, description = "Session not found"),
        (status = 409, description = "Session was changed concurrently"),
        (status = 422, description = "Session is no longer upcoming or the new date is invalid"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_status(
    AuthenticatedUser(identity): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
    Json(update): Json<SessionUpdate>,
) -> Result<impl IntoResponse, Error> {
    debug!("PUT Session {id} status to {} by {}", update.status, identity.user_id);

    let session = SessionApi::update_status(
        app_state.db_conn_ref(),
        app_state.event_publisher.as_ref(),
        &identity.user_id,
        id,
        update,
    )
    .await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), session)))
}
