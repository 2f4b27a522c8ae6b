// ==============
// crates/backend-lib/src/metrics.rs

//! Central place for metric keys. Counters go through the `metrics` facade
//! and are no-ops until the embedding process installs a recorder.
pub const AUTH_REGISTER: &str = "auth.register";
pub const AUTH_LOGIN: &str = "auth.login";
pub const AUTH_LOGOUT: &str = "auth.logout";
pub const AUTH_TOKEN_REJECTED: &str = "auth.token_rejected";
