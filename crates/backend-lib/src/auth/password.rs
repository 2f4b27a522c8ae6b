// ============================
// crates/backend-lib/src/auth/password.rs
// ============================
//! Password hashing and verification.
use anyhow::anyhow;
use scrypt::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Params, Scrypt,
};
use zeroize::Zeroizing;

use crate::error::AppError;

/// scrypt block size
const SCRYPT_R: u32 = 8;
/// scrypt parallelism
const SCRYPT_P: u32 = 1;
/// Derived key length in bytes
const SCRYPT_LEN: usize = 32;

/// Salted scrypt hasher with a fixed work factor.
///
/// Every hash gets a fresh random salt. The resulting PHC string embeds the
/// parameters, so digests produced under an older cost still verify.
#[derive(Debug, Clone)]
pub struct ScryptHasher {
    params: Params,
}

impl ScryptHasher {
    /// Create a hasher with work factor `2^log_n`
    pub fn new(log_n: u8) -> anyhow::Result<Self> {
        let params = Params::new(log_n, SCRYPT_R, SCRYPT_P, SCRYPT_LEN)
            .map_err(|e| anyhow!("invalid scrypt parameters: {e}"))?;
        Ok(Self { params })
    }

    /// Hash a password with a random salt
    pub fn hash(&self, plain: &str) -> anyhow::Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Scrypt
            .hash_password_customized(plain.as_bytes(), None, None, self.params.clone(), &salt)
            .map_err(|e| anyhow!("password hashing failed: {e}"))?
            .to_string();
        Ok(hash)
    }

    /// Verify a password against a hash. An unparsable hash never verifies.
    pub fn verify(&self, plain: &str, hash: &str) -> bool {
        let parsed_hash = match PasswordHash::new(hash) {
            Ok(h) => h,
            Err(_) => return false,
        };
        Scrypt.verify_password(plain.as_bytes(), &parsed_hash).is_ok()
    }

    /// Hash on the blocking pool; the plaintext is wiped afterwards
    pub async fn hash_async(&self, plain: Zeroizing<String>) -> Result<String, AppError> {
        let hasher = self.clone();
        Ok(tokio::task::spawn_blocking(move || hasher.hash(&plain)).await??)
    }

    /// Verify on the blocking pool; the plaintext is wiped afterwards
    pub async fn verify_async(&self, plain: Zeroizing<String>, hash: String) -> Result<bool, AppError> {
        let hasher = self.clone();
        Ok(tokio::task::spawn_blocking(move || hasher.verify(&plain, &hash)).await?)
    }
}
