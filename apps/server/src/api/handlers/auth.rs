//! Account handlers: password login, logout, session introspection and the
//! Google OAuth flow.

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap},
    response::{AppendHeaders, IntoResponse, Redirect, Response},
    Json,
};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::auth;
use crate::state::AppState;
use crate::Result;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub user_id: i64,
    pub email: String,
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Response> {
    let email = body.email.trim().to_lowercase();
    let password = body.password.trim();

    if email.is_empty() || password.is_empty() {
        return Err(crate::Error::Validation(
            "email and password are required".to_string(),
        ));
    }

    let user_id = state.auth.login(&email, password).await?;
    let token = auth::sign_session(&state.config.auth, user_id)?;

    Ok((
        [(
            header::SET_COOKIE,
            auth::session_cookie(&state.config.auth, &token),
        )],
        Json(json!({"ok": true})),
    )
        .into_response())
}

/// POST /api/auth/logout
pub async fn logout(State(state): State<AppState>) -> Response {
    (
        [(
            header::SET_COOKIE,
            auth::clear_session_cookie(&state.config.auth),
        )],
        Json(json!({"ok": true})),
    )
        .into_response()
}

/// GET /api/auth/me
pub async fn me(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<MeResponse>> {
    let user_id = auth::authenticate(&state.config.auth, &headers)?;

    let user = state
        .auth
        .user_by_id(user_id)
        .await
        .map_err(|_| crate::Error::Unauthorized("invalid session".to_string()))?;

    Ok(Json(MeResponse {
        user_id,
        email: user.email,
    }))
}

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";

fn require_oauth_config(state: &AppState) -> Result<()> {
    let auth_config = &state.config.auth;
    if auth_config.google_client_id.trim().is_empty()
        || auth_config.google_client_secret.trim().is_empty()
    {
        return Err(crate::Error::Config(
            "google oauth is not configured".to_string(),
        ));
    }
    Ok(())
}

/// GET /api/auth/google
pub async fn google_start(State(state): State<AppState>) -> Result<Response> {
    require_oauth_config(&state)?;
    let auth_config = &state.config.auth;

    let mut nonce = [0u8; 32];
    rand::rngs::OsRng.fill_bytes(&mut nonce);
    let state_value = URL_SAFE_NO_PAD.encode(nonce);

    let consent_url = url::Url::parse_with_params(
        GOOGLE_AUTH_URL,
        &[
            ("client_id", auth_config.google_client_id.as_str()),
            ("redirect_uri", auth_config.google_redirect_url.as_str()),
            ("response_type", "code"),
            ("scope", "email profile"),
            ("state", state_value.as_str()),
        ],
    )
    .map_err(|e| crate::Error::Internal(format!("failed to build consent url: {e}")))?;

    Ok((
        [(
            header::SET_COOKIE,
            auth::oauth_state_cookie(auth_config, &state_value),
        )],
        Redirect::to(consent_url.as_str()),
    )
        .into_response())
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub state: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct GoogleUserInfo {
    #[serde(default)]
    id: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    verified_email: bool,
}

/// GET /api/auth/google/callback
pub async fn google_callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<CallbackQuery>,
) -> Result<Response> {
    require_oauth_config(&state)?;
    let auth_config = &state.config.auth;

    if query.code.is_empty() || query.state.is_empty() {
        return Err(crate::Error::Validation("missing code/state".to_string()));
    }

    let stored_state = auth::cookie_value(&headers, auth::OAUTH_STATE_COOKIE);
    if stored_state.as_deref() != Some(query.state.as_str()) {
        return Err(crate::Error::Unauthorized("invalid oauth state".to_string()));
    }

    let userinfo = fetch_google_user(auth_config, &query.code).await?;

    if userinfo.email.is_empty() || userinfo.id.is_empty() {
        return Err(crate::Error::Unauthorized("invalid userinfo".to_string()));
    }
    if !userinfo.verified_email {
        return Err(crate::Error::Unauthorized("email not verified".to_string()));
    }

    let user_id = state.auth.oauth_login(&userinfo.email, &userinfo.id).await?;
    let token = auth::sign_session(auth_config, user_id)?;

    let redirect_url = format!("{}/?oauth=success", auth_config.frontend_url);
    Ok((
        AppendHeaders([
            (
                header::SET_COOKIE,
                auth::clear_oauth_state_cookie(auth_config),
            ),
            (header::SET_COOKIE, auth::session_cookie(auth_config, &token)),
        ]),
        Redirect::to(&redirect_url),
    )
        .into_response())
}

/// Exchange the authorization code and fetch the user's profile.
async fn fetch_google_user(
    auth_config: &crate::config::AuthConfig,
    code: &str,
) -> Result<GoogleUserInfo> {
    let client = reqwest::Client::new();

    let token: TokenResponse = client
        .post(GOOGLE_TOKEN_URL)
        .form(&[
            ("code", code),
            ("client_id", auth_config.google_client_id.as_str()),
            ("client_secret", auth_config.google_client_secret.as_str()),
            ("redirect_uri", auth_config.google_redirect_url.as_str()),
            ("grant_type", "authorization_code"),
        ])
        .send()
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "OAuth token exchange failed");
            crate::Error::Unauthorized("oauth exchange failed".to_string())
        })?
        .error_for_status()
        .map_err(|_| crate::Error::Unauthorized("oauth exchange failed".to_string()))?
        .json()
        .await
        .map_err(|_| crate::Error::Unauthorized("oauth exchange failed".to_string()))?;

    let userinfo: GoogleUserInfo = client
        .get(GOOGLE_USERINFO_URL)
        .bearer_auth(&token.access_token)
        .send()
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "OAuth userinfo request failed");
            crate::Error::Unauthorized("failed to fetch userinfo".to_string())
        })?
        .error_for_status()
        .map_err(|_| crate::Error::Unauthorized("userinfo request failed".to_string()))?
        .json()
        .await
        .map_err(|_| crate::Error::Internal("failed to parse userinfo".to_string()))?;

    Ok(userinfo)
}
