use crate::controller::ApiResponse;
use crate::extractors::authenticated_user::AuthenticatedUser;
use crate::params::chat::SubmitParams;
use crate::{AppState, Error};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::chat as ChatApi;
use domain::Id;

use log::*;

/// POST send a message on a connection
#[utoipa::path(
    post,
    path = "/connections/{id}/messages",
    params(
        ("id" = Uuid, Path, description = "Id of the connection"),
    ),
    request_body = crate::params::chat::SubmitParams,
    responses(
        (status = 201, description = "Message persisted and routed", body = domain::chat_messages::Model),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller may not send on this connection"),
        (status = 404, description = "Connection not found"),
        (status = 422, description = "Empty message body"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create(
    AuthenticatedUser(identity): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
    Json(params): Json<SubmitParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST message on connection {id} from {}", identity.user_id);

    let message = ChatApi::submit(
        app_state.db_conn_ref(),
        app_state.event_publisher.as_ref(),
        app_state.config.messaging_policy,
        &identity.user_id,
        id,
        &params.body,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(StatusCode::CREATED.into(), message)),
    ))
}

/// GET a connection's message history, oldest first
#[utoipa::path(
    get,
    path = "/connections/{id}/messages",
    params(
        ("id" = Uuid, Path, description = "Id of the connection"),
    ),
    responses(
        (status = 200, description = "Messages in persisted order", body = [domain::chat_messages::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is not a participant"),
        (status = 404, description = "Connection not found"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn index(
    AuthenticatedUser(identity): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    let messages = ChatApi::get_messages(app_state.db_conn_ref(), &identity.user_id, id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), messages)))
}

/// PUT mark the other participant's messages read
#[utoipa::path(
    put,
    path = "/connections/{id}/messages/read",
    params(
        ("id" = Uuid, Path, description = "Id of the connection"),
    ),
    responses(
        (status = 200, description = "Number of messages newly marked read", body = u64),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is not a participant"),
        (status = 404, description = "Connection not found"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn mark_read(
    AuthenticatedUser(identity): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    let changed = ChatApi::mark_read(app_state.db_conn_ref(), &identity.user_id, id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), changed)))
}
