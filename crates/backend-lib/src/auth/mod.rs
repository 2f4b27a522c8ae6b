// ============================
// crates/backend-lib/src/auth/mod.rs
// ============================
//! Authentication module.

pub mod cookie;
pub mod password;
mod service;
mod service_impl;
pub mod token;

pub use cookie::SessionCookie;
pub use password::ScryptHasher;
pub use service::{AuthService, IssuedSession};
pub use service_impl::{DefaultAuth, MAX_IDENTITY_LENGTH, MAX_PASSWORD_LENGTH};
pub use token::{Claims, TokenCodec, TokenError};
