// ============================
// crates/backend-lib/src/config.rs
// ============================
//! Configuration management.
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! `AUTHGATE_`-prefixed environment variables. They are loaded once at
//! startup and never re-read.
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;

use anyhow::{bail, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};

#[cfg(test)]
mod config_tests;

/// Size of a generated development secret (256 bits)
const EPHEMERAL_SECRET_BYTES: usize = 32;

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "authgate.toml";

/// Prefix for environment overrides, e.g. `AUTHGATE_PORT=8080`
pub const ENV_PREFIX: &str = "AUTHGATE_";

/// Secrets that must never sign tokens in production
const PLACEHOLDER_SECRETS: &[&str] = &["dev_secret", "secret", "changeme"];

/// Minimum production secret length in bytes
pub const MIN_SECRET_LENGTH: usize = 32;

/// Accepted range for the scrypt work factor (`log_n`)
pub const PASSWORD_COST_RANGE: std::ops::RangeInclusive<u8> = 10..=20;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Listen address
    pub host: IpAddr,
    /// Listen port
    pub port: u16,
    /// Credential store connection string (`memory://` or `file://<dir>`)
    pub database_url: String,
    /// HS256 token-signing secret
    pub token_secret: Option<String>,
    /// Session token and cookie lifetime in seconds
    pub session_ttl_secs: u64,
    /// Name of the session cookie
    pub cookie_name: String,
    /// Whether the session cookie carries the `Secure` attribute
    pub cookie_secure: bool,
    /// scrypt work factor (`log_n`)
    pub password_cost: u8,
    /// Deployment environment
    pub environment: Environment,
    /// Log level
    pub log_level: String,
    /// Log output format
    pub log_format: LogFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 4000,
            database_url: "memory://".to_string(),
            token_secret: None,
            session_ttl_secs: 60 * 60 * 24 * 7, // 7 days
            cookie_name: "token".to_string(),
            cookie_secure: false,
            password_cost: 15,
            environment: Environment::Development,
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
        }
    }
}

impl Settings {
    /// Load settings from `authgate.toml` (if present) and the environment
    pub fn load() -> Result<Self> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Load settings from the given TOML file (if present) and the environment
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let settings: Settings = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()?;

        settings.validate()?;
        Ok(settings)
    }

    /// Address the server binds to
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Check the settings for values that must not reach a running server
    pub fn validate(&self) -> Result<()> {
        if !LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            bail!("invalid log level: {}", self.log_level);
        }

        if self.session_ttl_secs == 0 {
            bail!("session_ttl_secs must be greater than zero");
        }

        if !PASSWORD_COST_RANGE.contains(&self.password_cost) {
            bail!(
                "password_cost must be between {} and {}",
                PASSWORD_COST_RANGE.start(),
                PASSWORD_COST_RANGE.end()
            );
        }

        if self.database_url.trim().is_empty() {
            bail!("database_url must be set");
        }

        if self.cookie_name.trim().is_empty() {
            bail!("cookie_name must not be empty");
        }

        if self.is_production() {
            match self.token_secret.as_deref() {
                None => bail!("token_secret must be set in production"),
                Some(secret) if PLACEHOLDER_SECRETS.contains(&secret) => {
                    bail!("token_secret is a well-known placeholder")
                },
                Some(secret) if secret.len() < MIN_SECRET_LENGTH => {
                    bail!("token_secret must be at least {MIN_SECRET_LENGTH} bytes")
                },
                Some(_) => {},
            }

            if !self.cookie_secure {
                bail!("cookie_secure must be enabled in production");
            }
        }

        Ok(())
    }

    /// The signing secret to use for this process.
    ///
    /// Outside production a missing secret is replaced by a random one, so
    /// tokens do not survive a restart.
    pub fn resolve_secret(&self) -> Result<String> {
        match &self.token_secret {
            Some(secret) if !secret.is_empty() => Ok(secret.clone()),
            _ if self.is_production() => bail!("token_secret must be set in production"),
            _ => {
                tracing::warn!("no token_secret configured, generating an ephemeral one");
                let mut secret = [0u8; EPHEMERAL_SECRET_BYTES];
                OsRng.fill_bytes(&mut secret);
                Ok(URL_SAFE_NO_PAD.encode(secret))
            },
        }
    }
}
