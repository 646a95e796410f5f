//! Application Configuration
//!
//! Configuration for the attendance application layer.

use std::time::Duration;

/// Attendance application configuration
#[derive(Debug, Clone)]
pub struct AttendanceConfig {
    /// Session lifetime when the professor does not pick one
    pub session_ttl: Duration,
    /// Upper bound on a requested session lifetime
    pub max_session_ttl: Duration,
    /// Shared HMAC key for verifying identity-provider bearer tokens (32 bytes)
    pub identity_secret: [u8; 32],
}

impl Default for AttendanceConfig {
    fn default() -> Self {
        Self {
            session_ttl: Duration::from_secs(10 * 60),
            max_session_ttl: Duration::from_secs(24 * 3600),
            identity_secret: [0u8; 32],
        }
    }
}

impl AttendanceConfig {
    /// Create config with a random identity secret (for development)
    pub fn with_random_secret() -> Self {
        let mut secret = [0u8; 32];
        secret.copy_from_slice(&platform::crypto::random_bytes(32));
        Self {
            identity_secret: secret,
            ..Default::default()
        }
    }

    /// Override the default session lifetime in whole minutes
    pub fn with_session_ttl_minutes(self, minutes: u64) -> Self {
        Self {
            session_ttl: Duration::from_secs(minutes * 60),
            ..self
        }
    }

    pub fn session_ttl_minutes(&self) -> u64 {
        self.session_ttl.as_secs() / 60
    }
}
