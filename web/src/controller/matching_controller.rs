use crate::controller::ApiResponse;
use crate::extractors::authenticated_user::AuthenticatedUser;
use crate::{AppState, Error};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::matching::{self as MatchingApi, PreferencesUpdate};

use log::*;

/// GET ranked candidates for the caller
#[utoipa::path(
    get,
    path = "/matches",
    responses(
        (status = 200, description = "Ranked candidates, or one list per side for role both", body = domain::matching::Matches),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Caller has no user record or profile"),
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
    debug!("GET matches for {}", identity.user_id);

    let matches = MatchingApi::find_matches(
        app_state.db_conn_ref(),
        &identity.user_id,
        app_state.config.match_result_limit,
    )
    .await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), matches)))
}

/// GET the caller's matching preferences
#[utoipa::path(
    get,
    path = "/matching/preferences",
    responses(
        (status = 200, description = "Saved preferences, or the defaults", body = domain::matching_preferences::Model),
        (status = 401, description = "Unauthorized"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn read_preferences(
    AuthenticatedUser(identity): AuthenticatedUser,
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, Error> {
    let preferences =
        MatchingApi::get_preferences(app_state.db_conn_ref(), &identity.user_id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), preferences)))
}

/// PUT replace the caller's matching preferences
#[utoipa::path(
    put,
    path = "/matching/preferences",
    request_body = domain::matching::PreferencesUpdate,
    responses(
        (status = 200, description = "Preferences saved", body = domain::matching_preferences::Model),
        (status = 401, description = "Unauthorized"),
        (status = 422, description = "Experience bounds or meeting frequency out of range"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_preferences(
    AuthenticatedUser(identity): AuthenticatedUser,
    State(app_state): State<AppState>,
    Json(update): Json<PreferencesUpdate>,
) -> Result<impl IntoResponse, Error> {
    debug!("PUT matching preferences for {}: {update:?}", identity.user_id);

    let preferences =
        MatchingApi::update_preferences(app_state.db_conn_ref(), &identity.user_id, update)
            .await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), preferences)))
}
