//! Repository Traits
//!
//! Interfaces for the external record store and identity provider.
//! Implementations are in the infrastructure layer.

use kernel::id::{SessionId, UserId};

use crate::domain::entities::{CheckIn, Session};
use crate::domain::value_objects::Identity;
use crate::error::AttendanceResult;

/// Session store
#[trait_variant::make(SessionRepository: Send)]
pub trait LocalSessionRepository {
    /// Persist a new session and return it as stored
    async fn insert(&self, session: &Session) -> AttendanceResult<Session>;

    /// Fetch a session by id, expired or not
    async fn find_by_id(&self, session_id: SessionId) -> AttendanceResult<Option<Session>>;

    /// All sessions opened by one owner, newest first
    async fn find_by_owner(&self, owner_id: &UserId) -> AttendanceResult<Vec<Session>>;
}

/// Attendance recorder
#[trait_variant::make(CheckInRepository: Send)]
pub trait LocalCheckInRepository {
    /// Persist a check-in and return it as stored
    async fn insert(&self, check_in: &CheckIn) -> AttendanceResult<CheckIn>;

    /// All check-ins for a session, oldest first
    async fn find_by_session(&self, session_id: SessionId) -> AttendanceResult<Vec<CheckIn>>;

    /// All check-ins by one student, newest first
    async fn find_by_student(&self, student_id: &UserId) -> AttendanceResult<Vec<CheckIn>>;
}

/// Identity provider
///
/// Runs before any use case; use cases trust the [`Identity`] they are given.
#[trait_variant::make(IdentityVerifier: Send)]
pub trait LocalIdentityVerifier {
    /// Resolve a bearer credential, failing with `InvalidCredential`
    async fn verify(&self, credential: &str) -> AttendanceResult<Identity>;
}
