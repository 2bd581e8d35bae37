//! Role compatibility between the two sides of a request.
//!
//! Every connection request and application is checked here before anything
//! is persisted.

use crate::error::Error;
use entity::roles::Role;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// The direction of a direct connection request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RequestType {
    /// The requester wants the target as their mentor.
    MentorRequest,
    /// The requester wants the target as their mentee.
    MenteeRequest,
}

impl FromStr for RequestType {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "mentor_request" => Ok(RequestType::MentorRequest),
            "mentee_request" => Ok(RequestType::MenteeRequest),
            _ => Err(Error::invalid("Invalid connection type")),
        }
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RequestType::MentorRequest => write!(f, "mentor_request"),
            RequestType::MenteeRequest => write!(f, "mentee_request"),
        }
    }
}

/// Why a pair of roles cannot form the requested relationship.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Incompatibility {
    TargetCannotMentor,
    RequesterCannotBeMentored,
    TargetCannotBeMentored,
    RequesterCannotMentor,
}

impl fmt::Display for Incompatibility {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let reason = match self {
            Incompatibility::TargetCannotMentor => "Target user is not available as a mentor",
            Incompatibility::RequesterCannotBeMentored => {
                "Only mentees can send mentor requests"
            }
            Incompatibility::TargetCannotBeMentored => "Target user is not available as a mentee",
            Incompatibility::RequesterCannotMentor => "Only mentors can send mentee requests",
        };
        write!(f, "{reason}")
    }
}

/// Checks that `from_role` may send a `request_type` request to `to_role`.
///
/// | request          | target must be   | requester must be |
/// |------------------|------------------|-------------------|
/// | `mentor_request` | mentor or both   | mentee or both    |
/// | `mentee_request` | mentee or both   | mentor or both    |
///
/// The target is checked first so its reason wins when both sides fail.
pub fn check_compatibility(
    from_role: Role,
    to_role: Role,
    request_type: RequestType,
) -> Result<(), Incompatibility> {
    match request_type {
        RequestType::MentorRequest => {
            if !to_role.can_mentor() {
                return Err(Incompatibility::TargetCannotMentor);
            }
            if !from_role.can_be_mentored() {
                return Err(Incompatibility::RequesterCannotBeMentored);
            }
        }
        RequestType::MenteeRequest => {
            if !to_role.can_be_mentored() {
                return Err(Incompatibility::TargetCannotBeMentored);
            }
            if !from_role.can_mentor() {
                return Err(Incompatibility::RequesterCannotMentor);
            }
        }
    }
    Ok(())
}

/// `check_compatibility` as a domain error.
pub fn ensure_compatible(
    from_role: Role,
    to_role: Role,
    request_type: RequestType,
) -> Result<(), Error> {
    check_compatibility(from_role, to_role, request_type)
        .map_err(|incompatibility| Error::invalid(incompatibility.to_string()))
}
