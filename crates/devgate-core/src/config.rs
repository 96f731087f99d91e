//! Configuration snapshot consumed by the classifier.
//!
//! The snapshot is always passed by value into [`crate::classify`] rather
//! than looked up from ambient state; the admin API is the only writer.

use serde::{Deserialize, Serialize};

/// Default redirect target when no URL is configured.
pub const DEFAULT_SITE_ROOT: &str = "/";

/// A point-in-time view of the gate's settings.
///
/// An admin edit may not apply to an in-flight check; callers re-read the
/// snapshot from storage on every decision.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateConfig {
    /// Blocked device model substrings, in admin-entered order.
    pub blocked_models: Vec<String>,
    /// Blocked User-Agent substrings, in admin-entered order.
    pub blocked_ua: Vec<String>,
    /// Where blocked repeat visitors are redirected.
    pub redirect_url: String,
}

impl GateConfig {
    /// Builds a snapshot, resolving the redirect target against the site root.
    pub fn new(
        blocked_models: Vec<String>,
        blocked_ua: Vec<String>,
        redirect_url: Option<&str>,
        site_root: &str,
    ) -> Self {
        Self {
            blocked_models,
            blocked_ua,
            redirect_url: resolve_redirect(redirect_url, site_root),
        }
    }

    /// An empty snapshot that blocks nobody and redirects to the site root.
    pub fn empty(site_root: &str) -> Self {
        Self::new(Vec::new(), Vec::new(), None, site_root)
    }
}

/// Splits newline-delimited admin input into pattern entries.
///
/// Entries are trimmed; lines that are empty after trimming are dropped,
/// matching what the admin save path has always done.
pub fn parse_pattern_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// Resolves a raw redirect value to a usable target.
///
/// Anything that does not pass the basic shape check falls back to the
/// site root. Validity beyond shape is out of scope.
pub fn resolve_redirect(raw: Option<&str>, site_root: &str) -> String {
    match raw.map(str::trim) {
        Some(url) if is_absolute_url(url) => url.to_string(),
        _ => site_root.to_string(),
    }
}

/// Basic shape check: an http(s) URL with a non-empty host part and no
/// whitespace or control characters.
pub fn is_absolute_url(s: &str) -> bool {
    let rest = if let Some(r) = s.strip_prefix("https://") {
        r
    } else if let Some(r) = s.strip_prefix("http://") {
        r
    } else {
        return false;
    };

    !rest.is_empty() && !s.chars().any(|c| c.is_whitespace() || c.is_control())
}
