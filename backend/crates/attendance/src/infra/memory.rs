//! In-memory Repository Implementation
//!
//! Backs tests and local runs without a database. Clones share storage.

use kernel::id::{SessionId, UserId};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::{CheckIn, Session};
use crate::domain::repository::{CheckInRepository, SessionRepository};
use crate::error::AttendanceResult;

#[derive(Clone, Default)]
pub struct InMemoryAttendanceRepository {
    sessions: Arc<RwLock<HashMap<SessionId, Session>>>,
    check_ins: Arc<RwLock<Vec<CheckIn>>>,
}

impl InMemoryAttendanceRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored check-ins
    pub async fn check_in_count(&self) -> usize {
        self.check_ins.read().await.len()
    }
}

impl SessionRepository for InMemoryAttendanceRepository {
    async fn insert(&self, session: &Session) -> AttendanceResult<Session> {
        self.sessions
            .write()
            .await
            .insert(session.id, session.clone());
        Ok(session.clone())
    }

    async fn find_by_id(&self, session_id: SessionId) -> AttendanceResult<Option<Session>> {
        Ok(self.sessions.read().await.get(&session_id).cloned())
    }

    async fn find_by_owner(&self, owner_id: &UserId) -> AttendanceResult<Vec<Session>> {
        let mut owned: Vec<Session> = self
            .sessions
            .read()
            .await
            .values()
            .filter(|s| s.is_owned_by(owner_id))
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }
}

impl CheckInRepository for InMemoryAttendanceRepository {
    async fn insert(&self, check_in: &CheckIn) -> AttendanceResult<CheckIn> {
        self.check_ins.write().await.push(check_in.clone());
        Ok(check_in.clone())
    }

    async fn find_by_session(&self, session_id: SessionId) -> AttendanceResult<Vec<CheckIn>> {
        let mut found: Vec<CheckIn> = self
            .check_ins
            .read()
            .await
            .iter()
            .filter(|c| c.session_id == session_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| a.recorded_at.cmp(&b.recorded_at));
        Ok(found)
    }

    async fn find_by_student(&self, student_id: &UserId) -> AttendanceResult<Vec<CheckIn>> {
        let mut found: Vec<CheckIn> = self
            .check_ins
            .read()
            .await
            .iter()
            .filter(|c| &c.student_id == student_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
        Ok(found)
    }
}
