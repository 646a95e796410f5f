//! Create Session Use Case

use chrono::{DateTime, Duration, Utc};
use kernel::id::UserId;
use std::sync::Arc;

use crate::application::config::AttendanceConfig;
use crate::domain::entities::Session;
use crate::domain::repository::SessionRepository;
use crate::domain::value_objects::{BoundaryRadius, Coordinate};
use crate::error::{AttendanceError, AttendanceResult};

/// Input DTO for create session
#[derive(Debug, Clone)]
pub struct CreateSessionInput {
    pub owner_id: UserId,
    pub lat: f64,
    pub lon: f64,
    pub boundary_radius: f64,
    /// Falls back to the configured default (10 minutes)
    pub ttl_minutes: Option<u32>,
}

/// Create Session Use Case
pub struct CreateSessionUseCase<S>
where
    S: SessionRepository,
{
    session_repo: Arc<S>,
    config: Arc<AttendanceConfig>,
}

impl<S> CreateSessionUseCase<S>
where
    S: SessionRepository,
{
    pub fn new(session_repo: Arc<S>, config: Arc<AttendanceConfig>) -> Self {
        Self {
            session_repo,
            config,
        }
    }

    pub async fn execute(&self, input: CreateSessionInput) -> AttendanceResult<Session> {
        self.execute_at(input, Utc::now()).await
    }

    /// Create a session as of `now`
    ///
    /// All validation happens before the store is touched.
    pub async fn execute_at(
        &self,
        input: CreateSessionInput,
        now: DateTime<Utc>,
    ) -> AttendanceResult<Session> {
        let anchor = Coordinate::new(input.lat, input.lon)?;
        let radius = BoundaryRadius::new(input.boundary_radius)?;
        let ttl = self.resolve_ttl(input.ttl_minutes)?;

        let session = Session::new(input.owner_id, anchor, radius, ttl, now);
        let stored = self.session_repo.insert(&session).await?;

        tracing::info!(
            session_id = %stored.id,
            owner_id = %stored.owner_id,
            anchor = %stored.anchor,
            boundary_radius_m = stored.boundary_radius.meters(),
            expires_at = %stored.expires_at,
            "Session created"
        );

        Ok(stored)
    }

    fn resolve_ttl(&self, ttl_minutes: Option<u32>) -> AttendanceResult<Duration> {
        let max = Duration::from_std(self.config.max_session_ttl)
            .map_err(|e| AttendanceError::Internal(format!("Invalid max session TTL: {e}")))?;

        let ttl = match ttl_minutes {
            Some(0) => {
                return Err(AttendanceError::validation("ttl_minutes must be at least 1"));
            }
            Some(minutes) => Duration::minutes(i64::from(minutes)),
            None => Duration::from_std(self.config.session_ttl)
                .map_err(|e| AttendanceError::Internal(format!("Invalid session TTL: {e}")))?,
        };

        if ttl <= Duration::zero() {
            return Err(AttendanceError::Internal(
                "Configured session TTL must be positive".to_string(),
            ));
        }
        if ttl > max {
            return Err(AttendanceError::validation(format!(
                "ttl_minutes must not exceed {}",
                max.num_minutes()
            )));
        }

        Ok(ttl)
    }
}
