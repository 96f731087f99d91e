//! Devgate Core - Classification, markers, and authentication logic.
//!
//! This crate provides the decision engine for the Devgate visitor gate:
//!
//! - [`classifier`] - maps device model / User-Agent signals to a block decision
//! - [`config`] - the configuration snapshot consumed by the classifier
//! - [`sanitize`] - plain-text sanitation for client-submitted signals
//! - [`marker`] - the signed, time-boxed block-marker cookie value
//! - [`agent`] - the client enforcement agent's protocol state machine
//! - [`auth`] - admin password hashing and session management

pub mod agent;
pub mod auth;
pub mod classifier;
pub mod config;
pub mod marker;
pub mod sanitize;

pub use classifier::{classify, Decision, Signals};
pub use config::GateConfig;
