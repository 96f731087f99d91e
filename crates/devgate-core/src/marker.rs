//! Signed, time-boxed block-marker values.
//!
//! When a visitor is classified as blocked, the client agent persists a
//! marker cookie so later requests can be redirected server-side without a
//! round trip through the agent. The marker is an explicit token rather
//! than a trust-on-sight flag: `"<expiry_unix>.<hex sha256 tag>"`, minted
//! with a server-held secret. The signal only gates UX, not real security,
//! so a keyed hash over the expiry is all the tamper resistance it needs.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use sha2::{Digest, Sha256};

/// Cookie name the client agent writes and the enforcement check reads.
pub const MARKER_COOKIE: &str = "dg_blocked";

/// Marker retention window (30 days).
pub const MARKER_TTL: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// Mints a marker value expiring [`MARKER_TTL`] from `now`.
pub fn issue(secret: &str, now: SystemTime) -> String {
    let expiry = unix_seconds(now) + MARKER_TTL.as_secs();
    format!("{}.{}", expiry, tag(secret, expiry))
}

/// Checks that a marker value is well-formed, correctly signed, and not
/// yet expired. Anything malformed is simply not a marker.
pub fn verify(secret: &str, value: &str, now: SystemTime) -> bool {
    let Some((expiry_str, sig)) = value.split_once('.') else {
        return false;
    };
    let Ok(expiry) = expiry_str.parse::<u64>() else {
        return false;
    };

    expiry > unix_seconds(now) && sig == tag(secret, expiry)
}

fn tag(secret: &str, expiry: u64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hasher.update(b":");
    hasher.update(expiry.to_string().as_bytes());

    hasher
        .finalize()
        .iter()
        .fold(String::with_capacity(64), |mut s, b| {
            use std::fmt::Write;
            let _ = write!(s, "{:02x}", b);
            s
        })
}

fn unix_seconds(t: SystemTime) -> u64 {
    t.duration_since(UNIX_EPOCH).unwrap_or_default().as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn issued_marker_verifies() {
        let now = SystemTime::now();
        let marker = issue(SECRET, now);

        assert!(verify(SECRET, &marker, now));
    }

    #[test]
    fn marker_still_valid_just_before_expiry() {
        let now = SystemTime::now();
        let marker = issue(SECRET, now);
        let later = now + MARKER_TTL - Duration::from_secs(60);

        assert!(verify(SECRET, &marker, later));
    }

    #[test]
    fn marker_expires_after_retention_window() {
        let now = SystemTime::now();
        let marker = issue(SECRET, now);
        let later = now + MARKER_TTL + Duration::from_secs(1);

        assert!(!verify(SECRET, &marker, later));
    }

    #[test]
    fn wrong_secret_rejected() {
        let now = SystemTime::now();
        let marker = issue(SECRET, now);

        assert!(!verify("other-secret", &marker, now));
    }

    #[test]
    fn tampered_expiry_rejected() {
        let now = SystemTime::now();
        let marker = issue(SECRET, now);
        let (_, sig) = marker.split_once('.').unwrap();
        let forged = format!("9999999999.{}", sig);

        assert!(!verify(SECRET, &forged, now));
    }

    #[test]
    fn garbage_values_rejected() {
        let now = SystemTime::now();

        assert!(!verify(SECRET, "", now));
        assert!(!verify(SECRET, "1", now));
        assert!(!verify(SECRET, "not.a.marker", now));
        assert!(!verify(SECRET, "abc.def", now));
    }
}
