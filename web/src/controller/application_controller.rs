use crate::controller::ApiResponse;
use crate::extractors::authenticated_user::AuthenticatedUser;
use crate::params::application::{CreateParams, UpdateStatusParams};
use crate::{AppState, Error};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::application as ApplicationApi;
use domain::Id;

use log::*;

/// POST apply to a mentor
#[utoipa::path(
    post,
    path = "/applications",
    request_body = crate::params::application::CreateParams,
    responses(
        (status = 201, description = "Application filed", body = domain::applications::Model),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Mentor not found"),
        (status = 409, description = "An open application to this mentor already exists"),
        (status = 422, description = "Message length or roles are invalid"),
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
    debug!(
        "POST Create a New Application from {} to {}",
        identity.user_id, params.mentor_id
    );

    let application = ApplicationApi::create(
        app_state.db_conn_ref(),
        app_state.event_publisher.as_ref(),
        &identity.user_id,
        &params.mentor_id,
        params.message,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(StatusCode::CREATED.into(), application)),
    ))
}

/// GET applications the caller sent or received, newest first
#[utoipa::path(
    get,
    path = "/applications",
    responses(
        (status = 200, description = "Applications on either side", body = [domain::applications::Model]),
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
    let applications =
        ApplicationApi::list_for_user(app_state.db_conn_ref(), &identity.user_id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), applications)))
}

/// PUT accept or reject an application addressed to the caller
#[utoipa::path(
    put,
    path = "/applications/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Id of the application"),
    ),
    request_body = crate::params::application::UpdateStatusParams,
    responses(
        (status = 200, description = "Application resolved", body = domain::applications::Model),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is not the addressed mentor"),
        (status = 404, description = "Application not found"),
        (status = 409, description = "The pair is already connected"),
        (status = 422, description = "Application is no longer pending"),
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
    debug!("PUT Application {id} status to {} by {}", params.status, identity.user_id);

    let application = ApplicationApi::update_status(
        app_state.db_conn_ref(),
        app_state.event_publisher.as_ref(),
        &identity.user_id,
        id,
        params.status,
    )
    .await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), application)))
}

/// DELETE withdraw a pending application
#[utoipa::path(
    delete,
    path = "/applications/{id}",
    params(
        ("id" = Uuid, Path, description = "Id of the application"),
    ),
    responses(
        (status = 200, description = "Application cancelled"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is not the applicant"),
        (status = 404, description = "Application not found"),
        (status = 422, description = "Application is no longer pending"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete(
    AuthenticatedUser(identity): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("DELETE Application {id} by {}", identity.user_id);

    ApplicationApi::cancel(
        app_state.db_conn_ref(),
        app_state.event_publisher.as_ref(),
        &identity.user_id,
        id,
    )
    .await?;

    Ok(Json(ApiResponse::<()>::no_content(StatusCode::OK.into())))
}
