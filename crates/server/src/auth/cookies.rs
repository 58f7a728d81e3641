use axum::http::{header, HeaderMap, HeaderValue};
use cookie::Cookie;

use crate::config::SessionConfig;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "padel_session";

/// Build a Set-Cookie header value carrying the session token.
pub fn build_session_cookie(config: &SessionConfig, token: &str) -> Option<HeaderValue> {
    let mut cookie = Cookie::build((SESSION_COOKIE, token))
        .http_only(true)
        .same_site(cookie::SameSite::Lax)
        .path("/")
        .max_age(cookie::time::Duration::hours(config.ttl_hours))
        .secure(config.cookie_secure);

    if let Some(domain) = &config.cookie_domain {
        cookie = cookie.domain(domain.clone());
    }

    HeaderValue::from_str(&cookie.build().to_string()).ok()
}

/// Build a Set-Cookie header that expires the session cookie.
pub fn build_clear_cookie(config: &SessionConfig) -> Option<HeaderValue> {
    let mut cookie = Cookie::build((SESSION_COOKIE, ""))
        .http_only(true)
        .same_site(cookie::SameSite::Lax)
        .path("/")
        .max_age(cookie::time::Duration::ZERO)
        .secure(config.cookie_secure);

    if let Some(domain) = &config.cookie_domain {
        cookie = cookie.domain(domain.clone());
    }

    HeaderValue::from_str(&cookie.build().to_string()).ok()
}

/// Extract the session token from the cookie (preferred) or Bearer header (fallback).
pub fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = extract_cookie(headers, SESSION_COOKIE).filter(|t| !t.is_empty()) {
        return Some(token);
    }

    // Bearer for API clients that cannot hold cookies
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Parse a specific cookie value from the Cookie header.
pub fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    for header_value in headers.get_all(header::COOKIE) {
        if let Ok(cookie_str) = header_value.to_str() {
            for piece in cookie_str.split(';') {
                if let Ok(c) = Cookie::parse(piece.trim().to_string()) {
                    if c.name() == name {
                        return Some(c.value().to_string());
                    }
                }
            }
        }
    }
    None
}

/// Append the session cookie to a response.
pub fn set_session_cookie(headers: &mut HeaderMap, config: &SessionConfig, token: &str) {
    match build_session_cookie(config, token) {
        Some(value) => {
            headers.append(header::SET_COOKIE, value);
        }
        None => tracing::error!("Session token produced an invalid cookie header"),
    }
}

/// Append a cookie that clears the session.
pub fn clear_session_cookie(headers: &mut HeaderMap, config: &SessionConfig) {
    if let Some(value) = build_clear_cookie(config) {
        headers.append(header::SET_COOKIE, value);
    }
}
