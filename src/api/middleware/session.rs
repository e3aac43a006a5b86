use axum::http::{HeaderMap, HeaderValue, header::COOKIE};

use crate::api::config::CookieSettings;
use crate::api::error::ApiError;
use crate::sessions::SessionToken;

/// Pull the session token out of the `Cookie` header(s). Anything missing or
/// malformed is treated as no session at all.
pub fn session_from_headers(headers: &HeaderMap, cookie_name: &str) -> Option<SessionToken> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(|h| h.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == cookie_name)
        .and_then(|(_, value)| SessionToken::parse(value))
}

pub fn session_cookie(settings: &CookieSettings, token: &SessionToken) -> Result<HeaderValue, ApiError> {
    build_cookie(settings, token.as_str(), settings.max_age_secs)
}

pub fn clear_session_cookie(settings: &CookieSettings) -> Result<HeaderValue, ApiError> {
    build_cookie(settings, "", 0)
}

fn build_cookie(settings: &CookieSettings, value: &str, max_age: u64) -> Result<HeaderValue, ApiError> {
    let mut cookie = format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
        settings.name, value, max_age
    );
    if settings.secure {
        cookie.push_str("; Secure");
    }

    HeaderValue::from_str(&cookie)
        .map_err(|e| ApiError::internal_error(format!("Invalid session cookie: {}", e)))
}
