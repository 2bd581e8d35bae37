//! Error types for the `domain` layer.
use entity_api::error::{EntityApiErrorKind, Error as EntityApiError};
use std::error::Error as StdError;
use std::fmt;

/// Top-level domain error type.
///
/// Each layer translates the errors of the layer below into its own kinds
/// while keeping the original error as `source`. `web` depends on `domain`
/// and maps `error_kind` to HTTP status codes without ever seeing
/// `entity_api` errors directly.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: DomainErrorKind,
}

/// The categories of failure surfaced to callers.
#[derive(Debug, PartialEq)]
pub enum DomainErrorKind {
    /// No identity, or one that failed verification.
    Unauthenticated,
    /// Authenticated but not a participant or owner.
    Forbidden(String),
    /// The named entity does not exist.
    NotFound(String),
    /// A malformed enum, out-of-range value or missing required field.
    InvalidArgument(String),
    /// A uniqueness rule or a concurrent change rejected the write.
    Conflict(String),
    /// Storage or transport failure; callers may retry.
    Unavailable,
    /// A bug-class failure such as a serialization error.
    Internal(String),
}

impl Error {
    pub(crate) fn forbidden(reason: impl Into<String>) -> Self {
        Self::from_kind(DomainErrorKind::Forbidden(reason.into()))
    }

    pub(crate) fn not_found(what: impl Into<String>) -> Self {
        Self::from_kind(DomainErrorKind::NotFound(what.into()))
    }

    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::from_kind(DomainErrorKind::InvalidArgument(reason.into()))
    }

    pub(crate) fn conflict(reason: impl Into<String>) -> Self {
        Self::from_kind(DomainErrorKind::Conflict(reason.into()))
    }

    pub(crate) fn unauthenticated() -> Self {
        Self::from_kind(DomainErrorKind::Unauthenticated)
    }

    fn from_kind(error_kind: DomainErrorKind) -> Self {
        Error {
            source: None,
            error_kind,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.error_kind {
            DomainErrorKind::Unauthenticated => write!(f, "unauthenticated"),
            DomainErrorKind::Forbidden(reason) => write!(f, "forbidden: {reason}"),
            DomainErrorKind::NotFound(what) => write!(f, "{what} not found"),
            DomainErrorKind::InvalidArgument(reason) => write!(f, "invalid argument: {reason}"),
            DomainErrorKind::Conflict(reason) => write!(f, "conflict: {reason}"),
            DomainErrorKind::Unavailable => write!(f, "storage unavailable"),
            DomainErrorKind::Internal(reason) => write!(f, "internal error: {reason}"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

// This is where we translate errors from the `entity_api` layer to the `domain` layer.
impl From<EntityApiError> for Error {
    fn from(err: EntityApiError) -> Self {
        let error_kind = match err.error_kind {
            EntityApiErrorKind::RecordNotFound => DomainErrorKind::NotFound("record".to_string()),
            EntityApiErrorKind::InvalidQueryTerm => {
                DomainErrorKind::InvalidArgument("invalid query term".to_string())
            }
            EntityApiErrorKind::RecordConflict => {
                DomainErrorKind::Conflict("record already exists".to_string())
            }
            EntityApiErrorKind::RecordNotUpdated => {
                DomainErrorKind::Conflict("record was changed concurrently".to_string())
            }
            EntityApiErrorKind::SystemError => DomainErrorKind::Unavailable,
            EntityApiErrorKind::Other => {
                DomainErrorKind::Internal("unexpected storage error".to_string())
            }
        };

        Error {
            source: Some(Box::new(err)),
            error_kind,
        }
    }
}

// Transaction begin/commit failures are storage failures.
impl From<sea_orm::DbErr> for Error {
    fn from(err: sea_orm::DbErr) -> Self {
        EntityApiError::from(err).into()
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error {
            source: Some(Box::new(err)),
            error_kind: DomainErrorKind::Internal("serialization failed".to_string()),
        }
    }
}

impl From<jsonwebtoken::errors::Error> for Error {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        Error {
            source: Some(Box::new(err)),
            error_kind: DomainErrorKind::Unauthenticated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_conflicts_become_domain_conflicts() {
        let err: Error = EntityApiError {
            source: None,
            error_kind: EntityApiErrorKind::RecordConflict,
        }
        .into();
        assert!(matches!(err.error_kind, DomainErrorKind::Conflict(_)));
    }

    #[test]
    fn lost_conditional_updates_become_domain_conflicts() {
        let err: Error = EntityApiError {
            source: None,
            error_kind: EntityApiErrorKind::RecordNotUpdated,
        }
        .into();
        assert!(matches!(err.error_kind, DomainErrorKind::Conflict(_)));
    }

    #[test]
    fn storage_failures_become_unavailable() {
        let err: Error = sea_orm::DbErr::Conn(sea_orm::RuntimeErr::Internal(
            "connection refused".to_string(),
        ))
        .into();
        assert_eq!(err.error_kind, DomainErrorKind::Unavailable);
        assert!(err.source().is_some());
    }
}
