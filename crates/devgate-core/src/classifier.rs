//! Substring-based visitor classifier.
//!
//! Maps `(model, user_agent)` identity signals to a block decision using
//! the configured blocklists. Matching is containment, not exact or prefix:
//! a "Android 9" entry blocks any UA containing that substring. The false
//! positives that containment can produce are an accepted tradeoff so that
//! admins can block whole device families with one entry.

use serde::{Deserialize, Serialize};

use crate::config::GateConfig;

/// Identity signals submitted once per page load by the client agent.
///
/// Both fields are attacker-controlled plain text and may be empty; they
/// are never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signals {
    /// High-entropy device model hint (opt-in capability, often empty).
    pub model: String,
    /// Standard browser identification string.
    pub user_agent: String,
}

impl Signals {
    /// Creates signals from raw client-submitted fields.
    pub fn new(model: impl Into<String>, user_agent: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            user_agent: user_agent.into(),
        }
    }
}

/// The outcome of classifying one visitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    /// Whether the visitor is blocked.
    pub blocked: bool,
    /// The configured redirect target, carried regardless of `blocked`;
    /// its consumption is conditional downstream.
    pub redirect: String,
}

/// Classifies identity signals against a configuration snapshot.
///
/// The model check runs first and short-circuits the UA check. Within a
/// list the first matching entry wins, though only the boolean outcome is
/// surfaced. Matching is case-insensitive and Unicode-aware; entries that
/// are empty after trimming never match anything.
pub fn classify(signals: &Signals, config: &GateConfig) -> Decision {
    let mut blocked = false;

    if !signals.model.is_empty() {
        let model = signals.model.trim().to_lowercase();
        blocked = contains_any(&model, &config.blocked_models);
    }

    if !blocked && !signals.user_agent.is_empty() {
        // UA strings are lowercased but not structurally trimmed.
        let ua = signals.user_agent.to_lowercase();
        blocked = contains_any(&ua, &config.blocked_ua);
    }

    Decision {
        blocked,
        redirect: config.redirect_url.clone(),
    }
}

/// First-match-wins containment scan over a blocklist.
fn contains_any(haystack: &str, entries: &[String]) -> bool {
    entries.iter().any(|entry| {
        let entry = entry.trim().to_lowercase();
        !entry.is_empty() && haystack.contains(&entry)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(models: &[&str], ua: &[&str]) -> GateConfig {
        GateConfig {
            blocked_models: models.iter().map(|s| s.to_string()).collect(),
            blocked_ua: ua.iter().map(|s| s.to_string()).collect(),
            redirect_url: "/".to_string(),
        }
    }

    #[test]
    fn model_substring_matches_case_insensitively() {
        let config = config(&["Redmi Note 8"], &[]);
        let signals = Signals::new("redmi note 8 pro", "");

        assert!(classify(&signals, &config).blocked);
    }

    #[test]
    fn ua_substring_matches() {
        let config = config(&[], &["Android 9"]);
        let signals = Signals::new(
            "",
            "Mozilla/5.0 (Linux; Android 9; SM-G960F) AppleWebKit/537.36",
        );

        assert!(classify(&signals, &config).blocked);
    }

    #[test]
    fn no_match_allows() {
        let config = config(&["X"], &["Y"]);
        let signals = Signals::new("", "something else");

        assert!(!classify(&signals, &config).blocked);
    }

    #[test]
    fn empty_signals_never_block() {
        let config = config(&["anything"], &["everything"]);
        let signals = Signals::default();

        assert!(!classify(&signals, &config).blocked);
    }

    #[test]
    fn empty_lists_never_block() {
        let config = config(&[], &[]);
        let signals = Signals::new("Pixel 7", "Mozilla/5.0");

        assert!(!classify(&signals, &config).blocked);
    }

    #[test]
    fn whitespace_only_entry_never_matches() {
        let config = config(&["   "], &["\t"]);
        let signals = Signals::new("Pixel 7", "Mozilla/5.0");

        assert!(!classify(&signals, &config).blocked);

        // Not even the empty string.
        let signals = Signals::new("", "");
        assert!(!classify(&signals, &config).blocked);
    }

    #[test]
    fn model_check_takes_priority_over_ua() {
        // Model list does not match, UA list would; the UA match decides.
        let cfg = config(&["Galaxy"], &["Mozilla"]);
        let signals = Signals::new("Pixel 7", "Mozilla/5.0");
        assert!(classify(&signals, &cfg).blocked);

        // Model matches: UA list is never consulted, outcome identical
        // whether or not the UA list would have matched.
        let config_both = config(&["Pixel"], &["Mozilla"]);
        let config_model_only = config(&["Pixel"], &["zzz-no-match"]);
        let signals = Signals::new("Pixel 7", "Mozilla/5.0");
        assert_eq!(
            classify(&signals, &config_both),
            classify(&signals, &config_model_only)
        );
    }

    #[test]
    fn model_is_trimmed_before_matching() {
        let config = config(&["pixel 7"], &[]);
        let signals = Signals::new("  Pixel 7  ", "");

        assert!(classify(&signals, &config).blocked);
    }

    #[test]
    fn unicode_patterns_match() {
        let config = config(&["Téléphone"], &[]);
        let signals = Signals::new("mon téléphone spécial", "");

        assert!(classify(&signals, &config).blocked);
    }

    #[test]
    fn multibyte_haystack_does_not_panic() {
        let config = config(&["nope"], &["nada"]);
        let signals = Signals::new("日本語モデル", "ブラウザ🦀/1.0");

        assert!(!classify(&signals, &config).blocked);
    }

    #[test]
    fn redirect_carried_on_every_decision() {
        let mut config = config(&["Pixel"], &[]);
        config.redirect_url = "https://away.example/".to_string();

        let blocked = classify(&Signals::new("Pixel 7", ""), &config);
        assert!(blocked.blocked);
        assert_eq!(blocked.redirect, "https://away.example/");

        let allowed = classify(&Signals::new("iPhone", ""), &config);
        assert!(!allowed.blocked);
        assert_eq!(allowed.redirect, "https://away.example/");
    }

    #[test]
    fn first_matching_entry_short_circuits() {
        // Later entries are irrelevant once one matches; an empty entry
        // in front must be skipped, not treated as match-everything.
        let config = config(&["", "Pixel", "also-pixel"], &[]);
        let signals = Signals::new("Pixel 7", "");

        assert!(classify(&signals, &config).blocked);
    }

    #[test]
    fn decision_serializes_to_wire_shape() {
        let decision = Decision {
            blocked: true,
            redirect: "/".to_string(),
        };
        let json = serde_json::to_value(&decision).unwrap();
        assert_eq!(json["blocked"], true);
        assert_eq!(json["redirect"], "/");
    }
}
