// ============================
// crates/backend-lib/src/lib.rs
// ============================
//! Core functionality of the `authgate` session authentication server.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod metrics;
pub mod middleware;
pub mod router;
pub mod storage;

use std::sync::Arc;
use std::time::Duration;

use crate::auth::{AuthService, DefaultAuth, ScryptHasher, SessionCookie, TokenCodec};
use crate::config::Settings;
use crate::storage::CredentialStore;

/// Application state shared across all handlers.
///
/// Built once at startup; nothing in it changes afterwards.
#[derive(Clone)]
pub struct AppState {
    /// Authentication service
    pub auth: Arc<dyn AuthService>,
    /// Session cookie attributes
    pub cookie: SessionCookie,
}

impl AppState {
    /// Create a new application state over an opened credential store
    pub fn new(store: Arc<dyn CredentialStore>, settings: Settings) -> anyhow::Result<Self> {
        let secret = settings.resolve_secret()?;
        let tokens = TokenCodec::new(
            secret.as_bytes(),
            Duration::from_secs(settings.session_ttl_secs),
        );
        let hasher = ScryptHasher::new(settings.password_cost)?;
        let auth = Arc::new(DefaultAuth::new(store, hasher, tokens)?);

        Ok(Self {
            auth,
            cookie: SessionCookie::from_settings(&settings),
        })
    }

    /// Create a new application state, opening the store named by `database_url`
    pub async fn from_settings(settings: Settings) -> anyhow::Result<Self> {
        let store = storage::open_store(&settings.database_url).await?;
        Self::new(store, settings)
    }
}
