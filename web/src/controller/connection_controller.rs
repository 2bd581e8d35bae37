use crate::controller::ApiResponse;
use crate::extractors::authenticated_user::AuthenticatedUser;
use crate::params::connection::{CreateParams, UpdateStatusParams};
use crate::{AppState, Error};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::connection::{self as ConnectionApi, ProgressUpdate};
use domain::Id;

use log::*;

/// POST request a connection with another user
#[utoipa::path(
    post,
    path = "/connections",
    request_body = crate::params::connection::CreateParams,
    responses(
        (status = 201, description = "Connection requested", body = domain::connections::Model),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Target user not found"),
        (status = 409, description = "A connection between these users already exists"),
        (status = 422, description = "Roles are incompatible with the request type"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create(
    AuthenticatedUser(identity): AuthenticatedUser,
    State(app_state): State<AppState>,
    Json(params): Json<CreateParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Create a New Connection from {}: {params:?}", identity.user_id);

    let connection = ConnectionApi::create(
        app_state.db_conn_ref(),
        app_state.event_publisher.as_ref(),
        &identity.user_id,
        &params.to_user_id,
        params.request_type,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(StatusCode::CREATED.into(), connection)),
    ))
}

/// GET the caller's connections, newest first
#[utoipa::path(
    get,
    path = "/connections",
    responses(
        (status = 200, description = "Connections on either side", body = [domain::connections::Model]),
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
    let connections =
        ConnectionApi::list_for_user(app_state.db_conn_ref(), &identity.user_id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), connections)))
}

/// PUT move a connection to a new status
#[utoipa::path(
    put,
    path = "/connections/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Id of the connection to update"),
    ),
    request_body = crate::params::connection::UpdateStatusParams,
    responses(
        (status = 200, description = "Status changed", body = domain::connections::Model),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is not a participant"),
        (status = 404, description = "Connection not found"),
        (status = 409, description = "The connection changed concurrently"),
        (status = 422, description = "Transition not allowed from the current status"),
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
    Json(params): Json<UpdateStatusParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("PUT Connection {id} status to {} by {}", params.status, identity.user_id);

    let connection = ConnectionApi::update_status(
        app_state.db_conn_ref(),
        app_state.event_publisher.as_ref(),
        &identity.user_id,
        id,
        params.status,
    )
    .await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), connection)))
}

/// PUT replace the goals and progress notes of an accepted connection
#[utoipa::path(
    put,
    path = "/connections/{id}/progress",
    params(
        ("id" = Uuid, Path, description = "Id of the connection to update"),
    ),
    request_body = domain::connection::ProgressUpdate,
    responses(
        (status = 200, description = "Progress saved", body = domain::connections::Model),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is not a participant"),
        (status = 404, description = "Connection not found"),
        (status = 422, description = "Connection is not accepted, or a goal has no title"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_progress(
    AuthenticatedUser(identity): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
    Json(update): Json<ProgressUpdate>,
) -> Result<impl IntoResponse, Error> {
    debug!("PUT Connection {id} progress by {}", identity.user_id);

    let connection = ConnectionApi::update_progress(
        app_state.db_conn_ref(),
        app_state.event_publisher.as_ref(),
        &identity.user_id,
        id,
        update,
    )
    .await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), connection)))
}
