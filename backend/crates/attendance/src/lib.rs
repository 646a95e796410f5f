//! Geofenced Attendance Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Geodesic distance, classification, entities, repository traits
//! - `application/` - Use cases (create session, verify attendance, queries)
//! - `infra/` - PostgreSQL and in-memory stores, HMAC identity verifier
//! - `presentation/` - HTTP handlers, DTOs, identity middleware
//!
//! ## Check-in flow
//! - The caller is identified by a bearer token before any use case runs
//! - The session must exist and be live (`now <= expires_at`)
//! - Distance to the session anchor is the WGS-84 geodesic distance
//! - `d <= r` is present, `d <= 2r` is manual review, otherwise absent
//! - Every accepted check-in is recorded, whatever its status

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::AttendanceConfig;
pub use error::{AttendanceError, AttendanceResult};
pub use infra::identity::HmacIdentityVerifier;
pub use infra::memory::InMemoryAttendanceRepository;
pub use infra::postgres::PgAttendanceRepository;
pub use presentation::router::{attendance_router, attendance_router_generic};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

#[cfg(test)]
mod tests;
