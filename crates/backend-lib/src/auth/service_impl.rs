use std::sync::Arc;

use async_trait::async_trait;
use authgate_common::Credentials;
use metrics::counter;
use zeroize::Zeroizing;

use super::{AuthService, Claims, IssuedSession, ScryptHasher, TokenCodec, TokenError};
use crate::error::AppError;
use crate::metrics::{AUTH_LOGIN, AUTH_REGISTER, AUTH_TOKEN_REJECTED};
use crate::storage::{CredentialStore, StoreError};

/// Longest accepted identity (RFC 5321 address limit)
pub const MAX_IDENTITY_LENGTH: usize = 254;
/// Longest accepted password
pub const MAX_PASSWORD_LENGTH: usize = 128;

const MISSING_FIELDS: &str = "Missing identity or password";

/// Used to spend a verify on unknown identities
const DUMMY_PASSWORD: &str = "authgate-timing-equaliser";

pub struct DefaultAuth {
    store: Arc<dyn CredentialStore>,
    hasher: ScryptHasher,
    tokens: TokenCodec,
    dummy_hash: String,
}

impl DefaultAuth {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        hasher: ScryptHasher,
        tokens: TokenCodec,
    ) -> anyhow::Result<Self> {
        let dummy_hash = hasher.hash(DUMMY_PASSWORD)?;
        Ok(Self {
            store,
            hasher,
            tokens,
            dummy_hash,
        })
    }

    fn issue(&self, user: authgate_common::PublicUser) -> Result<IssuedSession, AppError> {
        let token = self.tokens.issue(&user)?;
        Ok(IssuedSession { user, token })
    }
}

/// Split credentials into identity and password, rejecting absent or empty
/// fields. Both are returned verbatim.
fn require_fields(credentials: Credentials) -> Result<(String, Zeroizing<String>), AppError> {
    let Credentials { identity, password } = credentials;
    let password = Zeroizing::new(password.unwrap_or_default());

    let identity = match identity {
        Some(identity) if !identity.is_empty() => identity,
        _ => return Err(AppError::Validation(MISSING_FIELDS.to_string())),
    };
    if password.is_empty() {
        return Err(AppError::Validation(MISSING_FIELDS.to_string()));
    }

    if identity.chars().count() > MAX_IDENTITY_LENGTH {
        return Err(AppError::Validation(format!(
            "Identity must be at most {MAX_IDENTITY_LENGTH} characters"
        )));
    }
    if password.chars().count() > MAX_PASSWORD_LENGTH {
        return Err(AppError::Validation(format!(
            "Password must be at most {MAX_PASSWORD_LENGTH} characters"
        )));
    }

    Ok((identity, password))
}

/// `outcome` label for a rejected token
fn rejection_outcome(error: &TokenError) -> &'static str {
    match error {
        TokenError::Expired => "expired",
        TokenError::Invalid(_) => "invalid",
        TokenError::Sign(_) => "error",
    }
}

#[async_trait]
impl AuthService for DefaultAuth {
    #[tracing::instrument(skip_all)]
    async fn register(&self, credentials: Credentials) -> Result<IssuedSession, AppError> {
        let (identity, password) = require_fields(credentials)?;

        // Fast path; the store's create is the authoritative check
        if self.store.find_by_identity(&identity).await?.is_some() {
            counter!(AUTH_REGISTER, "outcome" => "conflict").increment(1);
            tracing::warn!("registration rejected: identity already taken");
            return Err(AppError::Conflict);
        }

        let password_hash = self.hasher.hash_async(password).await?;

        let record = match self.store.create(&identity, &password_hash).await {
            Ok(record) => record,
            Err(StoreError::Duplicate) => {
                counter!(AUTH_REGISTER, "outcome" => "conflict").increment(1);
                tracing::warn!("registration rejected: identity taken concurrently");
                return Err(AppError::Conflict);
            },
            Err(e) => return Err(e.into()),
        };

        counter!(AUTH_REGISTER, "outcome" => "success").increment(1);
        tracing::info!(user_id = %record.id, "user registered");

        self.issue(record.public())
    }

    #[tracing::instrument(skip_all)]
    async fn login(&self, credentials: Credentials) -> Result<IssuedSession, AppError> {
        let (identity, password) = require_fields(credentials)?;

        let record = self.store.find_by_identity(&identity).await?;

        // Unknown identities still pay for one verify so timing matches
        let hash = record
            .as_ref()
            .map_or_else(|| self.dummy_hash.clone(), |r| r.password_hash.clone());
        let verified = self.hasher.verify_async(password, hash).await?;

        let record = match record {
            Some(record) if verified => record,
            _ => {
                counter!(AUTH_LOGIN, "outcome" => "invalid_credentials").increment(1);
                tracing::warn!("login rejected: invalid credentials");
                return Err(AppError::InvalidCredentials);
            },
        };

        counter!(AUTH_LOGIN, "outcome" => "success").increment(1);
        tracing::info!(user_id = %record.id, "user logged in");

        self.issue(record.public())
    }

    fn verify(&self, token: &str) -> Result<Claims, AppError> {
        self.tokens.verify(token).map_err(|e| {
            counter!(AUTH_TOKEN_REJECTED, "outcome" => rejection_outcome(&e)).increment(1);
            tracing::debug!(reason = %e, "session token rejected");
            AppError::from(e)
        })
    }
}
