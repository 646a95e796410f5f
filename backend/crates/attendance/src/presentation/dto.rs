//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::SessionView;
use crate::domain::entities::{CheckIn, Session};
use crate::domain::value_objects::{AttendanceStatus, Identity, Role};

/// Request for POST /api/attendance/sessions
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSessionRequest {
    pub lat: f64,
    pub lon: f64,
    pub boundary_radius: f64,
    #[serde(default)]
    pub ttl_minutes: Option<u32>,
}

/// Response for POST /api/attendance/sessions
#[derive(Debug, Clone, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: Uuid,
    pub expiry: DateTime<Utc>,
}

impl From<&Session> for CreateSessionResponse {
    fn from(session: &Session) -> Self {
        Self {
            session_id: session.id.into_uuid(),
            expiry: session.expires_at,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LocationDto {
    pub lat: f64,
    pub lon: f64,
}

/// Request for POST /api/attendance/check-ins
///
/// `session_data` is accepted for clients that still send the old field name.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyAttendanceRequest {
    #[serde(alias = "session_data")]
    pub session_id: Uuid,
    pub student_location: LocationDto,
}

/// Response for POST /api/attendance/check-ins
#[derive(Debug, Clone, Serialize)]
pub struct VerifyAttendanceResponse {
    pub student_id: Uuid,
    pub session_id: Uuid,
    pub distance: f64,
    pub status: AttendanceStatus,
    pub timestamp: DateTime<Utc>,
}

impl From<&CheckIn> for VerifyAttendanceResponse {
    fn from(check_in: &CheckIn) -> Self {
        Self {
            student_id: check_in.student_id.into_uuid(),
            session_id: check_in.session_id.into_uuid(),
            distance: check_in.distance_m,
            status: check_in.status,
            timestamp: check_in.recorded_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    pub session_id: Uuid,
    pub owner_id: Uuid,
    pub location: LocationDto,
    pub boundary_radius: f64,
    pub created_at: DateTime<Utc>,
    pub expiry: DateTime<Utc>,
    /// Only set when the view was taken at a known instant
    #[serde(skip_serializing_if = "Option::is_none")]
    pub live: Option<bool>,
}

impl From<&Session> for SessionResponse {
    fn from(session: &Session) -> Self {
        Self {
            session_id: session.id.into_uuid(),
            owner_id: session.owner_id.into_uuid(),
            location: LocationDto {
                lat: session.anchor.lat(),
                lon: session.anchor.lon(),
            },
            boundary_radius: session.boundary_radius.meters(),
            created_at: session.created_at,
            expiry: session.expires_at,
            live: None,
        }
    }
}

impl From<&SessionView> for SessionResponse {
    fn from(view: &SessionView) -> Self {
        Self {
            live: Some(view.live),
            ..Self::from(&view.session)
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckInResponse {
    pub check_in_id: Uuid,
    pub session_id: Uuid,
    pub student_id: Uuid,
    pub student_location: LocationDto,
    pub distance: f64,
    pub status: AttendanceStatus,
    pub timestamp: DateTime<Utc>,
}

impl From<&CheckIn> for CheckInResponse {
    fn from(check_in: &CheckIn) -> Self {
        Self {
            check_in_id: check_in.id.into_uuid(),
            session_id: check_in.session_id.into_uuid(),
            student_id: check_in.student_id.into_uuid(),
            student_location: LocationDto {
                lat: check_in.claimed_location.lat(),
                lon: check_in.claimed_location.lon(),
            },
            distance: check_in.distance_m,
            status: check_in.status,
            timestamp: check_in.recorded_at,
        }
    }
}

/// Response for GET /api/attendance/me
#[derive(Debug, Clone, Serialize)]
pub struct MeResponse {
    pub user_id: Uuid,
    pub role: Role,
}

impl From<Identity> for MeResponse {
    fn from(identity: Identity) -> Self {
        Self {
            user_id: identity.user_id.into_uuid(),
            role: identity.role,
        }
    }
}
