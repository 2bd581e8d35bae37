//! Claims carried by identity tokens.
//!
//! Tokens are issued by the external identity provider. `sub` is the user id
//! the rest of the platform keys everything on.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct IdentityClaims {
    pub(crate) sub: String,
    #[serde(default)]
    pub(crate) email: String,
    pub(crate) exp: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) iss: Option<String>,
}
