//! Session token and cookie plumbing.
//!
//! Sessions are HS256 JWTs carried in an HttpOnly `session` cookie. The
//! search API is unauthenticated; only the account endpoints consume this.

use axum::http::HeaderMap;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;
use crate::Result;

pub const SESSION_COOKIE: &str = "session";
pub const OAUTH_STATE_COOKIE: &str = "oauth_state";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Authenticated user id.
    pub sub: i64,
    pub iat: i64,
    pub exp: i64,
}

pub fn sign_session(config: &AuthConfig, user_id: i64) -> Result<String> {
    let now = Utc::now();
    let claims = SessionClaims {
        sub: user_id,
        iat: now.timestamp(),
        exp: (now + Duration::hours(config.session_ttl_hours)).timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| crate::Error::Internal(format!("failed to sign session token: {e}")))
}

pub fn verify_session(config: &AuthConfig, token: &str) -> Result<SessionClaims> {
    let data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| crate::Error::Unauthorized("invalid session".to_string()))?;
    Ok(data.claims)
}

/// Build the `Set-Cookie` value for a fresh session.
pub fn session_cookie(config: &AuthConfig, token: &str) -> String {
    let max_age = config.session_ttl_hours * 3600;
    build_cookie(SESSION_COOKIE, token, "/", max_age, config.cookie_secure)
}

/// Build the `Set-Cookie` value that clears the session.
pub fn clear_session_cookie(config: &AuthConfig) -> String {
    build_cookie(SESSION_COOKIE, "", "/", -1, config.cookie_secure)
}

/// Short-lived state nonce cookie for the OAuth round-trip, scoped to the
/// OAuth callback path.
pub fn oauth_state_cookie(config: &AuthConfig, state: &str) -> String {
    build_cookie(
        OAUTH_STATE_COOKIE,
        state,
        "/api/auth/google",
        600,
        config.cookie_secure,
    )
}

pub fn clear_oauth_state_cookie(config: &AuthConfig) -> String {
    build_cookie(
        OAUTH_STATE_COOKIE,
        "",
        "/api/auth/google",
        -1,
        config.cookie_secure,
    )
}

fn build_cookie(name: &str, value: &str, path: &str, max_age: i64, secure: bool) -> String {
    let mut cookie = format!("{name}={value}; Path={path}; HttpOnly; SameSite=Lax; Max-Age={max_age}");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Extract a named cookie from the request headers.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let raw = headers.get(axum::http::header::COOKIE)?.to_str().ok()?;
    for pair in raw.split(';') {
        let mut parts = pair.trim().splitn(2, '=');
        if parts.next() == Some(name) {
            let value = parts.next().unwrap_or_default();
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }
    None
}

/// Resolve the authenticated user id from the session cookie.
pub fn authenticate(config: &AuthConfig, headers: &HeaderMap) -> Result<i64> {
    let token = cookie_value(headers, SESSION_COOKIE)
        .ok_or_else(|| crate::Error::Unauthorized("missing session".to_string()))?;
    let claims = verify_session(config, &token)?;
    Ok(claims.sub)
}
