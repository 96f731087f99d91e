//! API route handlers.

use std::time::SystemTime;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::response::Html;
use axum::Json;
use tracing::{debug, info, warn};

use devgate_core::auth::{AuthError, SessionToken};
use devgate_core::config::{parse_pattern_lines, GateConfig};
use devgate_core::sanitize::{sanitize_multiline, sanitize_text};
use devgate_core::{classify, marker, Signals};

use crate::error::{ApiError, Result};
use crate::models::{
    AuthSetupRequest, AuthSetupResponse, AuthVerifyRequest, AuthVerifyResponse, CheckRequest,
    CheckResponse, SettingsResponse, UpdateSettingsRequest, UpdateSettingsResponse,
};
use crate::state::AppState;

/// The client enforcement agent, served verbatim.
const AGENT_JS: &str = include_str!("../assets/gate.js");

/// POST /api/check - Classify visitor signals and return a decision.
///
/// Never fails: a malformed body is treated as empty signals and a storage
/// error as an empty snapshot, both of which classify to allow. The
/// endpoint's availability contract is what lets the client agent fail
/// open instead of trapping visitors behind a hidden page.
pub async fn check_visitor(State(state): State<AppState>, body: Bytes) -> Json<CheckResponse> {
    let req: CheckRequest = serde_json::from_slice(&body).unwrap_or_default();

    let signals = Signals::new(
        sanitize_text(req.model.as_deref().unwrap_or("")),
        sanitize_multiline(req.ua.as_deref().unwrap_or("")),
    );

    debug!(
        model = %signals.model,
        ua_len = signals.user_agent.len(),
        "Checking visitor"
    );

    // Always a fresh read; an admin edit applies to the next check.
    let config = state
        .db
        .load_gate_config(&state.site_root)
        .unwrap_or_else(|e| {
            warn!("Failed to load gate config, allowing visitor: {}", e);
            GateConfig::empty(&state.site_root)
        });

    let decision = classify(&signals, &config);
    let marker = decision
        .blocked
        .then(|| marker::issue(&state.marker_secret, SystemTime::now()));

    info!(blocked = decision.blocked, "Visitor check complete");

    Json(CheckResponse {
        blocked: decision.blocked,
        redirect: decision.redirect,
        marker,
    })
}

/// GET /gate.js - The client enforcement agent script.
pub async fn serve_agent() -> ([(axum::http::HeaderName, &'static str); 2], &'static str) {
    (
        [
            (CONTENT_TYPE, "application/javascript; charset=utf-8"),
            (axum::http::header::CACHE_CONTROL, "no-store"),
        ],
        AGENT_JS,
    )
}

/// Fallback page handler: any path not intercepted by the enforcement
/// check gets a page that loads the agent in its head, so content stays
/// hidden until the check resolves.
pub async fn serve_page() -> Html<&'static str> {
    Html(
        "<!doctype html>\n\
         <html>\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <title>Devgate</title>\n\
         <script src=\"/gate.js\"></script>\n\
         </head>\n\
         <body>\n\
         <p>Gated content.</p>\n\
         </body>\n\
         </html>\n",
    )
}

/// GET /api/settings - Current gate settings.
pub async fn get_settings(State(state): State<AppState>) -> Result<Json<SettingsResponse>> {
    let config = state.db.load_gate_config(&state.site_root)?;

    Ok(Json(SettingsResponse {
        blocked_models: config.blocked_models,
        blocked_ua: config.blocked_ua,
        redirect_url: config.redirect_url,
    }))
}

/// PUT /api/settings - Replace gate settings (requires auth).
pub async fn update_settings(
    State(state): State<AppState>,
    Json(req): Json<UpdateSettingsRequest>,
) -> Result<Json<UpdateSettingsResponse>> {
    let token = SessionToken::from_string(req.session_token);
    if !state.auth.validate_session(&token) {
        return Err(ApiError::SessionExpired);
    }

    let blocked_models = parse_pattern_lines(&req.blocked_models);
    let blocked_ua = parse_pattern_lines(&req.blocked_ua);

    state
        .db
        .save_settings(&blocked_models, &blocked_ua, req.redirect_url.as_deref())?;

    info!(
        models = blocked_models.len(),
        ua = blocked_ua.len(),
        "Settings updated"
    );

    Ok(Json(UpdateSettingsResponse {
        success: true,
        model_count: blocked_models.len(),
        ua_count: blocked_ua.len(),
    }))
}

/// POST /api/auth/setup - First-run admin password setup.
pub async fn auth_setup(
    State(state): State<AppState>,
    Json(req): Json<AuthSetupRequest>,
) -> Result<Json<AuthSetupResponse>> {
    if state.db.is_auth_setup()? {
        return Err(ApiError::BadRequest("password already set".to_string()));
    }

    let hash = state.auth.hash_password(&req.password)?;
    state.db.set_password_hash(&hash)?;

    info!("Admin password set");

    Ok(Json(AuthSetupResponse { success: true }))
}

/// POST /api/auth/verify - Verify password and get a session token.
pub async fn auth_verify(
    State(state): State<AppState>,
    Json(req): Json<AuthVerifyRequest>,
) -> Result<Json<AuthVerifyResponse>> {
    if !state.db.is_auth_setup()? {
        return Err(AuthError::NotSetup.into());
    }

    let hash = state.db.get_password_hash()?;

    let is_valid = state
        .auth
        .verify_password(&req.password, &hash)
        .map_err(|_| ApiError::InvalidCredentials)?;

    if !is_valid {
        return Ok(Json(AuthVerifyResponse {
            success: false,
            session_token: None,
        }));
    }

    let token = state.auth.create_session();
    let _ = state.db.update_last_login();

    info!("Authentication successful, session created");

    Ok(Json(AuthVerifyResponse {
        success: true,
        session_token: Some(token.as_str().to_string()),
    }))
}
