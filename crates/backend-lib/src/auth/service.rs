// =============
// crates/backend-lib/src/auth/service.rs
// =============
//! This module defines the `AuthService` trait, the seam between the HTTP
//! handlers and the credential/token machinery.
use async_trait::async_trait;
use authgate_common::{Credentials, PublicUser};

use super::Claims;
use crate::error::AppError;

/// Result of a successful register or login
#[derive(Debug, Clone)]
pub struct IssuedSession {
    /// Account the session belongs to
    pub user: PublicUser,
    /// Signed token to place in the session cookie
    pub token: String,
}

#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create an account and open a session for it
    async fn register(&self, credentials: Credentials) -> Result<IssuedSession, AppError>;

    /// Check credentials and open a session
    async fn login(&self, credentials: Credentials) -> Result<IssuedSession, AppError>;

    /// Verify a session token and return its claims
    fn verify(&self, token: &str) -> Result<Claims, AppError>;
}
