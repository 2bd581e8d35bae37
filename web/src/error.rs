use std::error::Error as StdError;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use domain::error::{DomainErrorKind, Error as DomainError};

use log::*;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug)]
pub struct Error(DomainError);

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(&self.0)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> core::result::Result<(), std::fmt::Error> {
        write!(fmt, "{}", self.0)
    }
}

// List of possible StatusCode variants https://docs.rs/http/latest/http/status/struct.StatusCode.html#associatedconstant.UNPROCESSABLE_ENTITY
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self.0.error_kind {
            DomainErrorKind::Unauthenticated => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED".to_string()).into_response()
            }
            DomainErrorKind::Forbidden(reason) => (StatusCode::FORBIDDEN, reason).into_response(),
            DomainErrorKind::NotFound(what) => {
                (StatusCode::NOT_FOUND, format!("{what} not found")).into_response()
            }
            DomainErrorKind::InvalidArgument(reason) => {
                (StatusCode::UNPROCESSABLE_ENTITY, reason).into_response()
            }
            DomainErrorKind::Conflict(reason) => (StatusCode::CONFLICT, reason).into_response(),
            DomainErrorKind::Unavailable => {
                warn!("Storage unavailable: {:?}", self.0.source);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "SERVICE UNAVAILABLE".to_string(),
                )
                    .into_response()
            }
            DomainErrorKind::Internal(reason) => {
                error!("Internal error: {reason}: {:?}", self.0.source);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL SERVER ERROR".to_string(),
                )
                    .into_response()
            }
        }
    }
}

impl<E> From<E> for Error
where
    E: Into<DomainError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(error_kind: DomainErrorKind) -> StatusCode {
        Error(DomainError {
            source: None,
            error_kind,
        })
        .into_response()
        .status()
    }

    #[test]
    fn every_domain_error_kind_maps_to_a_status() {
        let cases = [
            (DomainErrorKind::Unauthenticated, StatusCode::UNAUTHORIZED),
            (
                DomainErrorKind::Forbidden("not yours".to_string()),
                StatusCode::FORBIDDEN,
            ),
            (
                DomainErrorKind::NotFound("connection".to_string()),
                StatusCode::NOT_FOUND,
            ),
            (
                DomainErrorKind::InvalidArgument("bad".to_string()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                DomainErrorKind::Conflict("exists".to_string()),
                StatusCode::CONFLICT,
            ),
            (DomainErrorKind::Unavailable, StatusCode::SERVICE_UNAVAILABLE),
            (
                DomainErrorKind::Internal("oops".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error_kind, expected) in cases {
            assert_eq!(status_of(error_kind), expected);
        }
    }
}
