//! Session middleware.
//!
//! A request enters unauthenticated. If its session cookie holds a token that
//! verifies, the decoded [`Claims`] are attached to the request extensions
//! and the request proceeds authenticated; otherwise it is answered with 401.
//! No store lookup happens here: the signed claims are trusted as-is until
//! they expire.
use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, State},
    http::{request::Parts, Request},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;

use crate::auth::Claims;
use crate::{error::AppError, AppState};

/// Gate a route on a valid session cookie
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    mut request: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, AppError> {
    let jar = CookieJar::from_headers(request.headers());
    let token = state.cookie.token(&jar).ok_or(AppError::MissingToken)?;

    let claims = state.auth.verify(token)?;
    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}

/// Claims of the authenticated caller, as attached by [`require_session`]
#[derive(Debug, Clone)]
pub struct Authenticated(pub Claims);

impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(Authenticated)
            .ok_or(AppError::MissingToken)
    }
}
