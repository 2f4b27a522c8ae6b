// ============================
// crates/backend-lib/src/handlers/auth.rs
// ============================
//! Register, login, logout and "who am I" endpoints.
use std::sync::Arc;

use authgate_common::{Credentials, LogoutResponse, PublicUser};
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use metrics::counter;

use crate::metrics::AUTH_LOGOUT;
use crate::middleware::Authenticated;
use crate::{error::AppError, AppState};

/// An absent or unparsable body is treated as one with no fields, so it
/// fails the service's own validation with 400.
fn credentials_or_default(body: Result<Json<Credentials>, JsonRejection>) -> Credentials {
    match body {
        Ok(Json(credentials)) => credentials,
        Err(rejection) => {
            tracing::debug!(%rejection, "unreadable credentials body");
            Credentials::default()
        },
    }
}

/// POST /api/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    body: Result<Json<Credentials>, JsonRejection>,
) -> Result<(CookieJar, Json<PublicUser>), AppError> {
    let session = state.auth.register(credentials_or_default(body)).await?;
    Ok((state.cookie.set(jar, session.token), Json(session.user)))
}

/// POST /api/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    body: Result<Json<Credentials>, JsonRejection>,
) -> Result<(CookieJar, Json<PublicUser>), AppError> {
    let session = state.auth.login(credentials_or_default(body)).await?;
    Ok((state.cookie.set(jar, session.token), Json(session.user)))
}

/// POST /api/logout
pub async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> (CookieJar, Json<LogoutResponse>) {
    counter!(AUTH_LOGOUT, "outcome" => "success").increment(1);
    (state.cookie.clear(jar), Json(LogoutResponse { ok: true }))
}

/// GET /api/me
pub async fn me(Authenticated(claims): Authenticated) -> Json<PublicUser> {
    Json(claims.into())
}
