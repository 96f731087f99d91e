//! Admin authentication.
//!
//! The blocklists and redirect target are edited through a privileged API;
//! this module provides the password hashing and session handling that
//! gates it. Passwords are hashed with Argon2; sessions are in-memory
//! tokens with an idle timeout.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use thiserror::Error;

/// Minimum admin password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Idle session timeout (15 minutes).
pub const SESSION_TIMEOUT: Duration = Duration::from_secs(15 * 60);

/// Authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Password is empty.
    #[error("password cannot be empty")]
    PasswordEmpty,

    /// Password is too short.
    #[error("password must be at least {MIN_PASSWORD_LENGTH} characters")]
    PasswordTooShort,

    /// Password hashing failed.
    #[error("failed to hash password: {0}")]
    HashingFailed(String),

    /// Stored hash could not be parsed.
    #[error("failed to verify password: {0}")]
    VerificationFailed(String),

    /// Password not set yet (first-run setup required).
    #[error("password not set - setup required")]
    NotSetup,
}

/// Result type for authentication operations.
pub type Result<T> = std::result::Result<T, AuthError>;

/// An opaque session token handed out after a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionToken(String);

impl SessionToken {
    fn generate() -> Self {
        Self(SaltString::generate(&mut OsRng).to_string())
    }

    /// Reconstructs a token carried in an API request.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// The token as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Password hashing and session validation for the admin surface.
#[derive(Debug, Default)]
pub struct AuthManager {
    sessions: RwLock<HashMap<SessionToken, Instant>>,
}

impl AuthManager {
    /// Creates a manager with no active sessions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hashes a new password, enforcing the length policy.
    pub fn hash_password(&self, password: &str) -> Result<String> {
        if password.is_empty() {
            return Err(AuthError::PasswordEmpty);
        }
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AuthError::PasswordTooShort);
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::HashingFailed(e.to_string()))?;

        Ok(hash.to_string())
    }

    /// Verifies a password against a stored hash.
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> Result<bool> {
        let parsed = PasswordHash::new(stored_hash)
            .map_err(|e| AuthError::VerificationFailed(e.to_string()))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }

    /// Creates a session after a successful login.
    pub fn create_session(&self) -> SessionToken {
        let token = SessionToken::generate();
        let mut sessions = self.sessions.write().unwrap();
        sessions.insert(token.clone(), Instant::now());

        // Drop expired sessions while the lock is held.
        sessions.retain(|_, last_used| last_used.elapsed() <= SESSION_TIMEOUT);

        token
    }

    /// Validates a token and refreshes its idle timer.
    pub fn validate_session(&self, token: &SessionToken) -> bool {
        let mut sessions = self.sessions.write().unwrap();

        match sessions.get_mut(token) {
            Some(last_used) if last_used.elapsed() <= SESSION_TIMEOUT => {
                *last_used = Instant::now();
                true
            }
            Some(_) => {
                sessions.remove(token);
                false
            }
            None => false,
        }
    }

    /// Invalidates (logs out) a session.
    pub fn invalidate_session(&self, token: &SessionToken) {
        self.sessions.write().unwrap().remove(token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let auth = AuthManager::new();
        let hash = auth.hash_password("correct horse").unwrap();

        assert!(auth.verify_password("correct horse", &hash).unwrap());
        assert!(!auth.verify_password("wrong horse", &hash).unwrap());
    }

    #[test]
    fn rejects_empty_password() {
        let auth = AuthManager::new();
        assert!(matches!(
            auth.hash_password(""),
            Err(AuthError::PasswordEmpty)
        ));
    }

    #[test]
    fn rejects_short_password() {
        let auth = AuthManager::new();
        assert!(matches!(
            auth.hash_password("short"),
            Err(AuthError::PasswordTooShort)
        ));
    }

    #[test]
    fn invalid_hash_is_an_error() {
        let auth = AuthManager::new();
        assert!(auth.verify_password("anything", "not-a-hash").is_err());
    }

    #[test]
    fn session_lifecycle() {
        let auth = AuthManager::new();
        let token = auth.create_session();

        assert!(auth.validate_session(&token));

        auth.invalidate_session(&token);
        assert!(!auth.validate_session(&token));
    }

    #[test]
    fn unknown_token_is_invalid() {
        let auth = AuthManager::new();
        assert!(!auth.validate_session(&SessionToken::from_string("bogus")));
    }

    #[test]
    fn tokens_are_unique() {
        let auth = AuthManager::new();
        assert_ne!(auth.create_session(), auth.create_session());
    }
}
