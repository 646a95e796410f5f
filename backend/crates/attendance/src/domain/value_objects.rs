//! Domain Value Objects
//!
//! Immutable, validated-on-construction value types for the attendance domain.

use kernel::id::UserId;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{AttendanceError, AttendanceResult};

/// A point on the earth in decimal degrees (WGS-84)
///
/// Latitude is within [-90, 90] and longitude within [-180, 180]; a value
/// outside those ranges, or a non-finite value, cannot be constructed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    lat: f64,
    lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> AttendanceResult<Self> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(AttendanceError::validation(format!(
                "latitude {lat} is outside [-90, 90]"
            )));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(AttendanceError::validation(format!(
                "longitude {lon} is outside [-180, 180]"
            )));
        }
        Ok(Self { lat, lon })
    }

    #[inline]
    pub fn lat(&self) -> f64 {
        self.lat
    }

    #[inline]
    pub fn lon(&self) -> f64 {
        self.lon
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

/// Geofence radius in meters, strictly positive and finite
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct BoundaryRadius(f64);

impl BoundaryRadius {
    pub fn new(meters: f64) -> AttendanceResult<Self> {
        if meters.is_finite() && meters > 0.0 {
            Ok(Self(meters))
        } else {
            Err(AttendanceError::validation(format!(
                "boundary radius must be a positive number of meters, got {meters}"
            )))
        }
    }

    #[inline]
    pub fn meters(&self) -> f64 {
        self.0
    }
}

/// Outcome of a check-in, ordered from most to least lenient
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    Present,
    ManualReview,
    Absent,
}

impl AttendanceStatus {
    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::ManualReview => "manual_review",
            AttendanceStatus::Absent => "absent",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "present" => Some(AttendanceStatus::Present),
            "manual_review" => Some(AttendanceStatus::ManualReview),
            "absent" => Some(AttendanceStatus::Absent),
            _ => None,
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Role {
    #[default]
    Student = 0,
    Professor = 1,
}

impl Role {
    #[inline]
    pub const fn id(&self) -> u8 {
        *self as u8
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Professor => "professor",
        }
    }

    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(Role::Student),
            1 => Some(Role::Professor),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Caller identity, already vouched for by the identity provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: UserId,
    pub role: Role,
}

impl Identity {
    pub fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }

    pub fn require_role(&self, role: Role) -> AttendanceResult<()> {
        if self.role == role {
            Ok(())
        } else {
            Err(AttendanceError::Forbidden(format!("requires the {role} role")))
        }
    }
}
