//! Verify Attendance Use Case
//!
//! One call takes a check-in request through
//! session lookup -> liveness -> classification -> recording.
//! Every call that reaches the recorder writes a new check-in; there is no
//! per-student deduplication.

use chrono::{DateTime, Utc};
use kernel::id::{SessionId, UserId};
use std::sync::Arc;

use crate::domain::entities::CheckIn;
use crate::domain::repository::{CheckInRepository, SessionRepository};
use crate::domain::services::classify;
use crate::domain::value_objects::Coordinate;
use crate::error::{AttendanceError, AttendanceResult};

/// Input DTO for verify attendance
#[derive(Debug, Clone)]
pub struct VerifyAttendanceInput {
    pub session_id: SessionId,
    /// Authenticated caller, trusted as-is
    pub student_id: UserId,
    pub lat: f64,
    pub lon: f64,
}

/// Verify Attendance Use Case
pub struct VerifyAttendanceUseCase<S, C>
where
    S: SessionRepository,
    C: CheckInRepository,
{
    session_repo: Arc<S>,
    check_in_repo: Arc<C>,
}

impl<S, C> VerifyAttendanceUseCase<S, C>
where
    S: SessionRepository,
    C: CheckInRepository,
{
    pub fn new(session_repo: Arc<S>, check_in_repo: Arc<C>) -> Self {
        Self {
            session_repo,
            check_in_repo,
        }
    }

    pub async fn execute(&self, input: VerifyAttendanceInput) -> AttendanceResult<CheckIn> {
        self.execute_at(input, Utc::now()).await
    }

    /// Run the check-in with `now` as the single clock reading
    ///
    /// Store failures are surfaced, not retried.
    pub async fn execute_at(
        &self,
        input: VerifyAttendanceInput,
        now: DateTime<Utc>,
    ) -> AttendanceResult<CheckIn> {
        let claimed = Coordinate::new(input.lat, input.lon)?;

        let session = self
            .session_repo
            .find_by_id(input.session_id)
            .await?
            .ok_or(AttendanceError::SessionNotFound)?;

        if !session.is_live(now) {
            tracing::info!(
                session_id = %session.id,
                student_id = %input.student_id,
                expires_at = %session.expires_at,
                "Check-in rejected: session expired"
            );
            return Err(AttendanceError::SessionExpired);
        }

        let outcome = classify(&session, &claimed);

        let check_in = CheckIn::new(
            session.id,
            input.student_id,
            claimed,
            outcome.distance_m,
            outcome.status,
            now,
        );
        let recorded = self.check_in_repo.insert(&check_in).await?;

        tracing::info!(
            session_id = %recorded.session_id,
            student_id = %recorded.student_id,
            distance_m = recorded.distance_m,
            status = %recorded.status,
            "Attendance recorded"
        );

        Ok(recorded)
    }
}
