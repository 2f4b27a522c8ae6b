// ================
// crates/common/src/lib.rs
// ================
//! JSON types exchanged between the `authgate` server and its clients.
//! Every `/api/*` request and response body is one of these.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/register` and `POST /api/login`.
///
/// Both fields are optional on the wire so that a request with a missing
/// field reaches the server's own validation instead of being rejected by
/// the JSON extractor. `email` is accepted as an alias of `identity`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    #[serde(default, alias = "email", skip_serializing_if = "Option::is_none")]
    pub identity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl Credentials {
    pub fn new(identity: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            identity: Some(identity.into()),
            password: Some(password.into()),
        }
    }
}

/// The public view of an account. Never carries the password hash.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PublicUser {
    pub id: String,
    pub identity: String,
}

/// Body of a successful `POST /api/logout`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogoutResponse {
    pub ok: bool,
}

/// Body of every error response.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorBody {
    /// Stable machine-readable code, e.g. `AUTH_002`
    pub code: String,
    /// Human-readable message, safe to show to the user
    pub message: String,
}
