//! Domain Services
//!
//! Pure geofence classification logic.

use crate::domain::entities::Session;
use crate::domain::geo::distance_meters;
use crate::domain::value_objects::{AttendanceStatus, BoundaryRadius, Coordinate};

/// Multiple of the boundary radius up to which a check-in goes to manual review
pub const MANUAL_REVIEW_FACTOR: f64 = 2.0;

/// Distance and status computed for one claimed location
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub distance_m: f64,
    pub status: AttendanceStatus,
}

/// Classify a distance against a boundary radius
///
/// Both thresholds are inclusive on the lenient side:
/// `d <= r` is present, `r < d <= 2r` is manual review, anything further is absent.
pub fn classify_distance(distance_m: f64, radius: BoundaryRadius) -> AttendanceStatus {
    let r = radius.meters();
    if distance_m <= r {
        AttendanceStatus::Present
    } else if distance_m <= r * MANUAL_REVIEW_FACTOR {
        AttendanceStatus::ManualReview
    } else {
        AttendanceStatus::Absent
    }
}

/// Classify a claimed location against a session's geofence
///
/// Does not look at the session's expiry; liveness is checked by the caller.
pub fn classify(session: &Session, claimed: &Coordinate) -> Classification {
    let distance_m = distance_meters(&session.anchor, claimed);
    Classification {
        distance_m,
        status: classify_distance(distance_m, session.boundary_radius),
    }
}
