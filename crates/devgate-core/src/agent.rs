//! Client enforcement agent protocol.
//!
//! The agent itself runs in the visitor's browser (served as `gate.js`),
//! but its sequencing logic lives here as an explicit state machine so the
//! transitions can be exercised directly:
//!
//! `Hidden` -> `Checking` -> one of `{Revealed, Departing}` per page load.
//!
//! Failure handling is deliberate fail-open: a broken check must never
//! trap a legitimate visitor behind a permanently hidden page, so the
//! failed branch is wired unconditionally to reveal.

use crate::classifier::Decision;

/// Last-resort departure destination when neither session history nor a
/// referrer is available.
pub const FALLBACK_URL: &str = "https://www.google.com/";

/// What the browser knows about where the visitor came from.
#[derive(Debug, Clone, Default)]
pub struct NavigationContext {
    /// `window.history.length` at check time.
    pub history_len: u32,
    /// `document.referrer`, if non-empty.
    pub referrer: Option<String>,
}

/// How a blocked visitor leaves the page.
///
/// Note the block path never navigates to the configured redirect target;
/// that target is only used by the server-side check on repeat visits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Departure {
    /// Back-navigate through session history.
    HistoryBack,
    /// Replace the location with the referrer.
    Referrer(String),
    /// Replace the location with [`FALLBACK_URL`].
    Fallback,
}

impl Departure {
    /// Picks the departure route for the given navigation context.
    pub fn resolve(nav: &NavigationContext) -> Self {
        if nav.history_len > 1 {
            return Departure::HistoryBack;
        }
        match nav.referrer.as_deref() {
            Some(r) if !r.is_empty() => Departure::Referrer(r.to_string()),
            _ => Departure::Fallback,
        }
    }
}

/// Result of the agent's single check round trip.
#[derive(Debug, Clone)]
pub enum CheckOutcome {
    /// The endpoint answered with a decision.
    Decision(Decision),
    /// Network error, timeout, or malformed response.
    Failed,
}

/// The agent's per-page-load state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentState {
    /// Content suppressed, no check started yet. Entered synchronously
    /// before any async work so blocked content never flashes.
    Hidden,
    /// Signals gathered and submitted; at most one check per page load.
    Checking,
    /// Terminal: suppression removed, page visible.
    Revealed,
    /// Terminal: marker set, navigating away.
    Departing(Departure),
}

impl AgentState {
    /// Initial state at page-script start.
    pub fn new() -> Self {
        AgentState::Hidden
    }

    /// Starts the check. Only meaningful from `Hidden`; terminal states
    /// stay put.
    pub fn begin_check(self) -> Self {
        match self {
            AgentState::Hidden => AgentState::Checking,
            other => other,
        }
    }

    /// Applies the check outcome.
    ///
    /// A blocked decision departs; an allow decision or any failure
    /// reveals. Outcomes arriving in a non-`Checking` state are ignored.
    pub fn resolve(self, outcome: CheckOutcome, nav: &NavigationContext) -> Self {
        match (self, outcome) {
            (AgentState::Checking, CheckOutcome::Decision(d)) if d.blocked => {
                AgentState::Departing(Departure::resolve(nav))
            }
            (AgentState::Checking, _) => AgentState::Revealed,
            (state, _) => state,
        }
    }

    /// Whether this is a terminal state for the page load.
    pub fn is_terminal(&self) -> bool {
        matches!(self, AgentState::Revealed | AgentState::Departing(_))
    }
}

impl Default for AgentState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decision(blocked: bool) -> CheckOutcome {
        CheckOutcome::Decision(Decision {
            blocked,
            redirect: "https://target.example/".to_string(),
        })
    }

    fn no_nav() -> NavigationContext {
        NavigationContext::default()
    }

    #[test]
    fn allow_decision_reveals() {
        let state = AgentState::new().begin_check().resolve(decision(false), &no_nav());
        assert_eq!(state, AgentState::Revealed);
    }

    #[test]
    fn blocked_decision_departs() {
        let state = AgentState::new().begin_check().resolve(decision(true), &no_nav());
        assert!(matches!(state, AgentState::Departing(_)));
    }

    #[test]
    fn failure_fails_open() {
        let state = AgentState::new()
            .begin_check()
            .resolve(CheckOutcome::Failed, &no_nav());
        assert_eq!(state, AgentState::Revealed);
    }

    #[test]
    fn departure_prefers_history() {
        let nav = NavigationContext {
            history_len: 3,
            referrer: Some("https://from.example/".to_string()),
        };
        assert_eq!(Departure::resolve(&nav), Departure::HistoryBack);
    }

    #[test]
    fn departure_uses_referrer_without_history() {
        let nav = NavigationContext {
            history_len: 1,
            referrer: Some("https://from.example/".to_string()),
        };
        assert_eq!(
            Departure::resolve(&nav),
            Departure::Referrer("https://from.example/".to_string())
        );
    }

    #[test]
    fn departure_falls_back_without_history_or_referrer() {
        let state = AgentState::new().begin_check().resolve(decision(true), &no_nav());
        assert_eq!(state, AgentState::Departing(Departure::Fallback));
    }

    #[test]
    fn blocked_departure_ignores_redirect_target() {
        // The client path never navigates to the configured redirect; only
        // the server path uses it on repeat visits.
        let nav = no_nav();
        match AgentState::new().begin_check().resolve(decision(true), &nav) {
            AgentState::Departing(Departure::Fallback) => {}
            other => panic!("unexpected state: {:?}", other),
        }
    }

    #[test]
    fn terminal_states_ignore_late_outcomes() {
        let revealed = AgentState::Revealed.resolve(decision(true), &no_nav());
        assert_eq!(revealed, AgentState::Revealed);

        let departing = AgentState::Departing(Departure::Fallback);
        let still = departing.clone().resolve(CheckOutcome::Failed, &no_nav());
        assert_eq!(still, departing);
    }

    #[test]
    fn begin_check_only_from_hidden() {
        assert_eq!(AgentState::Hidden.begin_check(), AgentState::Checking);
        assert_eq!(AgentState::Revealed.begin_check(), AgentState::Revealed);
    }

    #[test]
    fn terminal_detection() {
        assert!(!AgentState::Hidden.is_terminal());
        assert!(!AgentState::Checking.is_terminal());
        assert!(AgentState::Revealed.is_terminal());
        assert!(AgentState::Departing(Departure::Fallback).is_terminal());
    }
}
