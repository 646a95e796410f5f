//! HMAC bearer-token identity verifier
//!
//! The identity provider and this service share a 32-byte secret. A token is
//! URL-safe base64 (no padding) of:
//!
//! | bytes  | field                         |
//! |--------|-------------------------------|
//! | 0..16  | user id (UUID)                |
//! | 16     | role id                       |
//! | 17..25 | expiry, Unix ms, big-endian   |
//! | 25..57 | HMAC-SHA256 over bytes 0..25  |

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use std::fmt;
use uuid::Uuid;

use crate::domain::repository::IdentityVerifier;
use crate::domain::value_objects::{Identity, Role};
use crate::error::{AttendanceError, AttendanceResult};

const PAYLOAD_LEN: usize = 16 + 1 + 8;
const TAG_LEN: usize = 32;
const TOKEN_LEN: usize = PAYLOAD_LEN + TAG_LEN;

#[derive(Clone)]
pub struct HmacIdentityVerifier {
    secret: [u8; 32],
}

impl fmt::Debug for HmacIdentityVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HmacIdentityVerifier")
            .field("secret", &"<redacted>")
            .finish()
    }
}

impl HmacIdentityVerifier {
    pub fn new(secret: [u8; 32]) -> Self {
        Self { secret }
    }

    /// Mint a token (identity-provider side)
    pub fn issue(&self, identity: &Identity, expires_at: DateTime<Utc>) -> String {
        let mut token = Vec::with_capacity(TOKEN_LEN);
        token.extend_from_slice(identity.user_id.as_uuid().as_bytes());
        token.push(identity.role.id());
        token.extend_from_slice(&expires_at.timestamp_millis().to_be_bytes());
        let tag = platform::crypto::hmac_sha256(&self.secret, &token);
        token.extend_from_slice(&tag);
        platform::crypto::to_base64_url(&token)
    }

    /// Verify a token as of `now`
    pub fn verify_at(&self, credential: &str, now: DateTime<Utc>) -> AttendanceResult<Identity> {
        let raw = platform::crypto::from_base64_url(credential)
            .map_err(|_| AttendanceError::InvalidCredential)?;
        if raw.len() != TOKEN_LEN {
            return Err(AttendanceError::InvalidCredential);
        }

        let (payload, tag) = raw.split_at(PAYLOAD_LEN);
        if !platform::crypto::verify_hmac_sha256(&self.secret, payload, tag) {
            return Err(AttendanceError::InvalidCredential);
        }

        let user_bytes: [u8; 16] = payload[0..16]
            .try_into()
            .map_err(|_| AttendanceError::InvalidCredential)?;
        let role = Role::from_id(payload[16]).ok_or(AttendanceError::InvalidCredential)?;
        let expiry_bytes: [u8; 8] = payload[17..25]
            .try_into()
            .map_err(|_| AttendanceError::InvalidCredential)?;
        let expires_at_ms = i64::from_be_bytes(expiry_bytes);

        if now.timestamp_millis() > expires_at_ms {
            tracing::debug!(expires_at_ms, "Bearer token expired");
            return Err(AttendanceError::InvalidCredential);
        }

        Ok(Identity::new(UserId::from_uuid(Uuid::from_bytes(user_bytes)), role))
    }
}

impl IdentityVerifier for HmacIdentityVerifier {
    async fn verify(&self, credential: &str) -> AttendanceResult<Identity> {
        self.verify_at(credential, Utc::now())
    }
}
