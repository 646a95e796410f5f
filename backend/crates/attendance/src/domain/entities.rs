//! Domain Entities
//!
//! Core business entities for the attendance domain. Both are immutable once
//! created; a session's end of life is implicit in its expiry.

use chrono::{DateTime, Duration, Utc};
use kernel::id::{CheckInId, SessionId, UserId};

use crate::domain::value_objects::{AttendanceStatus, BoundaryRadius, Coordinate};

/// Attendance session - a geofence opened by a professor for a limited time
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub id: SessionId,
    pub owner_id: UserId,
    pub anchor: Coordinate,
    pub boundary_radius: BoundaryRadius,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Open a session at `now` that stays live for `ttl`
    ///
    /// `ttl` must be positive so that `expires_at > created_at`; the
    /// application layer validates it before calling.
    pub fn new(
        owner_id: UserId,
        anchor: Coordinate,
        boundary_radius: BoundaryRadius,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Self {
        debug_assert!(ttl > Duration::zero());
        Self {
            id: SessionId::new(),
            owner_id,
            anchor,
            boundary_radius,
            created_at: now,
            expires_at: now + ttl,
        }
    }

    /// The expiry instant itself is still live; only `now > expires_at` is expired.
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        now <= self.expires_at
    }

    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        &self.owner_id == user_id
    }
}

/// Check-in - one student's attendance submission and its outcome
#[derive(Debug, Clone, PartialEq)]
pub struct CheckIn {
    pub id: CheckInId,
    pub session_id: SessionId,
    pub student_id: UserId,
    pub claimed_location: Coordinate,
    pub distance_m: f64,
    pub status: AttendanceStatus,
    pub recorded_at: DateTime<Utc>,
}

impl CheckIn {
    pub fn new(
        session_id: SessionId,
        student_id: UserId,
        claimed_location: Coordinate,
        distance_m: f64,
        status: AttendanceStatus,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: CheckInId::new(),
            session_id,
            student_id,
            claimed_location,
            distance_m,
            status,
            recorded_at,
        }
    }
}
