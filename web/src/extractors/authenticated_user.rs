use crate::extractors::RejectionType;
use crate::AppState;
use axum::{
    extract::{FromRequestParts, Query},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
};
use domain::identity::Identity;
use log::*;
use serde::Deserialize;

pub(crate) struct AuthenticatedUser(pub Identity);

#[derive(Deserialize)]
struct TokenQuery {
    token: Option<String>,
}

/// The caller's credential: an `Authorization: Bearer` header, or a `token`
/// query parameter for clients that cannot set headers on a WebSocket upgrade.
fn credential(parts: &Parts) -> Option<String> {
    let from_header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string());

    from_header
        .or_else(|| {
            Query::<TokenQuery>::try_from_uri(&parts.uri)
                .ok()
                .and_then(|Query(query)| query.token)
        })
        .filter(|token| !token.is_empty())
}

impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = RejectionType;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(credential) = credential(parts) else {
            return Err((StatusCode::UNAUTHORIZED, "Unauthorized".to_string()));
        };

        match state.identity_provider.verify(&credential).await {
            Ok(identity) => {
                trace!("Authenticated request from {}", identity.user_id);
                Ok(AuthenticatedUser(identity))
            }
            Err(err) => {
                debug!("Credential rejected: {err}");
                Err((StatusCode::UNAUTHORIZED, "Unauthorized".to_string()))
            }
        }
    }
}
