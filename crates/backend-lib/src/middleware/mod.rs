// crates/backend-lib/src/middleware/mod.rs

//! Middleware for the `authgate` server.

pub mod session;

pub use session::{require_session, Authenticated};
