//! Server-side enforcement check.
//!
//! Runs on every non-administrative request before any handler: a request
//! carrying a valid block-marker cookie is redirected to the configured
//! target immediately, which is how repeat visits are blocked without
//! another round trip through the client agent. Invalid or expired
//! markers are ignored (fail open).

use std::time::SystemTime;

use axum::extract::{Request, State};
use axum::http::header::{COOKIE, LOCATION};
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::{debug, warn};

use devgate_core::marker;

use crate::state::AppState;

/// Paths exempt from enforcement: the API (including the decision
/// endpoint and the admin surface) and the agent script itself.
fn is_exempt(path: &str) -> bool {
    path.starts_with("/api/") || path == "/gate.js"
}

/// Middleware applying the block-marker check.
pub async fn check_block_marker(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    if !is_exempt(req.uri().path()) {
        if let Some(value) = marker_cookie(req.headers()) {
            if marker::verify(&state.marker_secret, &value, SystemTime::now()) {
                let target = match state.db.load_gate_config(&state.site_root) {
                    Ok(config) => config.redirect_url,
                    Err(e) => {
                        // Settings unreadable: still honor the marker, but
                        // send the visitor to the site root.
                        warn!("Failed to load redirect target: {}", e);
                        state.site_root.clone()
                    }
                };

                debug!(path = req.uri().path(), %target, "Marked visitor redirected");
                return redirect_found(&target);
            }
        }
    }

    next.run(req).await
}

/// 302 Found, matching the reference redirect semantics.
fn redirect_found(target: &str) -> Response {
    match target.parse::<axum::http::HeaderValue>() {
        Ok(location) => (StatusCode::FOUND, [(LOCATION, location)]).into_response(),
        Err(_) => StatusCode::FOUND.into_response(),
    }
}

/// Extracts the block-marker cookie value, if present.
fn marker_cookie(headers: &HeaderMap) -> Option<String> {
    for header in headers.get_all(COOKIE) {
        let Ok(raw) = header.to_str() else { continue };
        for pair in raw.split(';') {
            if let Some((name, value)) = pair.trim().split_once('=') {
                if name.trim() == marker::MARKER_COOKIE {
                    return Some(value.trim().to_string());
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn exemptions() {
        assert!(is_exempt("/api/check"));
        assert!(is_exempt("/api/settings"));
        assert!(is_exempt("/gate.js"));
        assert!(!is_exempt("/"));
        assert!(!is_exempt("/some/page"));
        assert!(!is_exempt("/gate.js.map"));
    }

    #[test]
    fn cookie_extraction() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("other=1; dg_blocked=123.abc; more=2"),
        );

        assert_eq!(marker_cookie(&headers), Some("123.abc".to_string()));
    }

    #[test]
    fn cookie_absent() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("unrelated=1"));

        assert_eq!(marker_cookie(&headers), None);
        assert_eq!(marker_cookie(&HeaderMap::new()), None);
    }

    #[test]
    fn redirect_is_302_with_location() {
        let response = redirect_found("https://away.example/");
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers().get(LOCATION).unwrap(),
            "https://away.example/"
        );
    }
}
