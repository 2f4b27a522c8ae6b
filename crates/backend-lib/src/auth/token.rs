// ============================
// crates/backend-lib/src/auth/token.rs
// ============================
//! Signed session tokens.
//!
//! Tokens are HS256 JWTs. Nothing is stored server-side: a token is valid
//! exactly when its signature checks out against the process secret and its
//! `exp` has not passed.
use std::time::Duration;

use authgate_common::PublicUser;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, get_current_timestamp, Algorithm, DecodingKey,
    EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Claims embedded in a session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Id of the user record the token was issued for
    pub id: String,
    /// Identity at issue time
    pub identity: String,
    /// Issued at (unix seconds)
    pub iat: u64,
    /// Expiry (unix seconds)
    pub exp: u64,
}

impl From<Claims> for PublicUser {
    fn from(claims: Claims) -> Self {
        PublicUser {
            id: claims.id,
            identity: claims.identity,
        }
    }
}

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("token signing failed: {0}")]
    Sign(#[source] jsonwebtoken::errors::Error),

    #[error("token expired")]
    Expired,

    #[error("token rejected: {0}")]
    Invalid(#[source] jsonwebtoken::errors::Error),
}

/// Issues and verifies session tokens with one shared secret
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenCodec {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iat"]);

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    /// Issue a token for `user`, valid from now
    pub fn issue(&self, user: &PublicUser) -> Result<String, TokenError> {
        self.issue_at(user, get_current_timestamp())
    }

    /// Issue a token for `user` as if it had been minted at `issued_at`
    pub fn issue_at(&self, user: &PublicUser, issued_at: u64) -> Result<String, TokenError> {
        let claims = Claims {
            id: user.id.clone(),
            identity: user.identity.clone(),
            iat: issued_at,
            exp: issued_at.saturating_add(self.ttl.as_secs()),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(TokenError::Sign)
    }

    /// Verify signature and expiry, returning the embedded claims
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e),
            })
    }
}
