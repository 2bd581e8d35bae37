use crate::controller::ApiResponse;
use crate::extractors::authenticated_user::AuthenticatedUser;
use crate::{AppState, Error};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::notification as NotificationApi;
use domain::Id;

/// GET the caller's notifications, newest first
#[utoipa::path(
    get,
    path = "/notifications",
    responses(
        (status = 200, description = "The caller's inbox", body = [domain::notifications::Model]),
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
    let notifications = NotificationApi::list(app_state.db_conn_ref(), &identity.user_id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), notifications)))
}

/// PUT mark one notification read
#[utoipa::path(
    put,
    path = "/notifications/{id}/read",
    params(
        ("id" = Uuid, Path, description = "Id of the notification"),
    ),
    responses(
        (status = 200, description = "Notification marked read", body = domain::notifications::Model),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No such notification in the caller's inbox"),
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
    let notification =
        NotificationApi::mark_read(app_state.db_conn_ref(), &identity.user_id, id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), notification)))
}

/// PUT mark every notification read
#[utoipa::path(
    put,
    path = "/notifications/read",
    responses(
        (status = 200, description = "Number of notifications newly marked read", body = u64),
        (status = 401, description = "Unauthorized"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn mark_all_read(
    AuthenticatedUser(identity): AuthenticatedUser,
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, Error> {
    let changed =
        NotificationApi::mark_all_read(app_state.db_conn_ref(), &identity.user_id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), changed)))
}
