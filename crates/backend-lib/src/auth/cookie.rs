//! Session cookie construction.
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::config::Settings;

/// Attributes of the session cookie, fixed at startup
#[derive(Debug, Clone)]
pub struct SessionCookie {
    name: String,
    max_age_secs: i64,
    secure: bool,
}

impl SessionCookie {
    pub fn new(name: impl Into<String>, max_age_secs: u64, secure: bool) -> Self {
        Self {
            name: name.into(),
            max_age_secs: i64::try_from(max_age_secs).unwrap_or(i64::MAX),
            secure,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.cookie_name.clone(),
            settings.session_ttl_secs,
            settings.cookie_secure,
        )
    }

    /// The cookie carrying a freshly issued token
    pub fn build(&self, token: String) -> Cookie<'static> {
        Cookie::build((self.name.clone(), token))
            .http_only(true)
            .same_site(SameSite::Lax)
            .path("/")
            .max_age(time::Duration::seconds(self.max_age_secs))
            .secure(self.secure)
            .build()
    }

    /// Add the session cookie to the jar
    pub fn set(&self, jar: CookieJar, token: String) -> CookieJar {
        jar.add(self.build(token))
    }

    /// Expired, empty cookie with the session cookie's name and path
    pub fn removal(&self) -> Cookie<'static> {
        let mut cookie = self.build(String::new());
        cookie.make_removal();
        cookie
    }

    /// Emit the removal cookie, whether or not the request carried a session
    pub fn clear(&self, jar: CookieJar) -> CookieJar {
        jar.add(self.removal())
    }

    /// Token carried by the request, if any. An empty value counts as absent.
    pub fn token<'a>(&self, jar: &'a CookieJar) -> Option<&'a str> {
        jar.get(&self.name)
            .map(|cookie| cookie.value())
            .filter(|value| !value.is_empty())
    }
}
