//! Record Query Use Cases
//!
//! Read-only views over sessions and check-ins.

use chrono::{DateTime, Utc};
use kernel::id::{SessionId, UserId};
use std::sync::Arc;

use crate::domain::entities::{CheckIn, Session};
use crate::domain::repository::{CheckInRepository, SessionRepository};
use crate::error::{AttendanceError, AttendanceResult};

/// A session together with its liveness at query time
#[derive(Debug, Clone)]
pub struct SessionView {
    pub session: Session,
    pub live: bool,
}

/// Query Records Use Case
pub struct QueryRecordsUseCase<S, C>
where
    S: SessionRepository,
    C: CheckInRepository,
{
    session_repo: Arc<S>,
    check_in_repo: Arc<C>,
}

impl<S, C> QueryRecordsUseCase<S, C>
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

    /// Fetch one session; expired sessions are still returned
    pub async fn session(
        &self,
        session_id: SessionId,
        now: DateTime<Utc>,
    ) -> AttendanceResult<SessionView> {
        let session = self
            .session_repo
            .find_by_id(session_id)
            .await?
            .ok_or(AttendanceError::SessionNotFound)?;
        let live = session.is_live(now);
        Ok(SessionView { session, live })
    }

    pub async fn sessions_owned_by(&self, owner_id: &UserId) -> AttendanceResult<Vec<Session>> {
        self.session_repo.find_by_owner(owner_id).await
    }

    /// Check-ins for a session; only the session's owner may list them
    pub async fn check_ins_for_session(
        &self,
        requester: &UserId,
        session_id: SessionId,
    ) -> AttendanceResult<Vec<CheckIn>> {
        let session = self
            .session_repo
            .find_by_id(session_id)
            .await?
            .ok_or(AttendanceError::SessionNotFound)?;

        if !session.is_owned_by(requester) {
            tracing::warn!(
                session_id = %session_id,
                requester = %requester,
                "Check-in listing denied to non-owner"
            );
            return Err(AttendanceError::Forbidden(
                "only the session owner can list its check-ins".to_string(),
            ));
        }

        self.check_in_repo.find_by_session(session_id).await
    }

    pub async fn check_ins_by_student(
        &self,
        student_id: &UserId,
    ) -> AttendanceResult<Vec<CheckIn>> {
        self.check_in_repo.find_by_student(student_id).await
    }
}
