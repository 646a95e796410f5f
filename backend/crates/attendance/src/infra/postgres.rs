//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::id::{CheckInId, SessionId, UserId};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entities::{CheckIn, Session};
use crate::domain::repository::{CheckInRepository, SessionRepository};
use crate::domain::value_objects::{AttendanceStatus, BoundaryRadius, Coordinate};
use crate::error::{AttendanceError, AttendanceResult};

const SESSION_COLUMNS: &str = "session_id, owner_id, anchor_lat, anchor_lon, \
     boundary_radius_m, created_at, expires_at";

const CHECK_IN_COLUMNS: &str = "check_in_id, session_id, student_id, claimed_lat, \
     claimed_lon, distance_m, status, recorded_at";

/// PostgreSQL-backed record store
///
/// Construct once at startup from a pool and share by `Arc`.
#[derive(Clone)]
pub struct PgAttendanceRepository {
    pool: PgPool,
}

impl PgAttendanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl SessionRepository for PgAttendanceRepository {
    async fn insert(&self, session: &Session) -> AttendanceResult<Session> {
        let row = sqlx::query_as::<_, SessionRow>(&format!(
            r#"
            INSERT INTO attendance_sessions (
                session_id,
                owner_id,
                anchor_lat,
                anchor_lon,
                boundary_radius_m,
                created_at,
                expires_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {SESSION_COLUMNS}
            "#
        ))
        .bind(session.id.into_uuid())
        .bind(session.owner_id.into_uuid())
        .bind(session.anchor.lat())
        .bind(session.anchor.lon())
        .bind(session.boundary_radius.meters())
        .bind(session.created_at)
        .bind(session.expires_at)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(session_id = %session.id, "Session row inserted");

        row.into_session()
    }

    async fn find_by_id(&self, session_id: SessionId) -> AttendanceResult<Option<Session>> {
        let row = sqlx::query_as::<_, SessionRow>(&format!(
            "SELECT {SESSION_COLUMNS} FROM attendance_sessions WHERE session_id = $1"
        ))
        .bind(session_id.into_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(SessionRow::into_session).transpose()
    }

    async fn find_by_owner(&self, owner_id: &UserId) -> AttendanceResult<Vec<Session>> {
        let rows = sqlx::query_as::<_, SessionRow>(&format!(
            "SELECT {SESSION_COLUMNS} FROM attendance_sessions \
             WHERE owner_id = $1 ORDER BY created_at DESC"
        ))
        .bind(owner_id.into_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(SessionRow::into_session).collect()
    }
}

impl CheckInRepository for PgAttendanceRepository {
    async fn insert(&self, check_in: &CheckIn) -> AttendanceResult<CheckIn> {
        let row = sqlx::query_as::<_, CheckInRow>(&format!(
            r#"
            INSERT INTO attendance_check_ins (
                check_in_id,
                session_id,
                student_id,
                claimed_lat,
                claimed_lon,
                distance_m,
                status,
                recorded_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {CHECK_IN_COLUMNS}
            "#
        ))
        .bind(check_in.id.into_uuid())
        .bind(check_in.session_id.into_uuid())
        .bind(check_in.student_id.into_uuid())
        .bind(check_in.claimed_location.lat())
        .bind(check_in.claimed_location.lon())
        .bind(check_in.distance_m)
        .bind(check_in.status.code())
        .bind(check_in.recorded_at)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(check_in_id = %check_in.id, "Check-in row inserted");

        row.into_check_in()
    }

    async fn find_by_session(&self, session_id: SessionId) -> AttendanceResult<Vec<CheckIn>> {
        let rows = sqlx::query_as::<_, CheckInRow>(&format!(
            "SELECT {CHECK_IN_COLUMNS} FROM attendance_check_ins \
             WHERE session_id = $1 ORDER BY recorded_at ASC"
        ))
        .bind(session_id.into_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(CheckInRow::into_check_in).collect()
    }

    async fn find_by_student(&self, student_id: &UserId) -> AttendanceResult<Vec<CheckIn>> {
        let rows = sqlx::query_as::<_, CheckInRow>(&format!(
            "SELECT {CHECK_IN_COLUMNS} FROM attendance_check_ins \
             WHERE student_id = $1 ORDER BY recorded_at DESC"
        ))
        .bind(student_id.into_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(CheckInRow::into_check_in).collect()
    }
}

// Internal row types for sqlx mapping
#[derive(sqlx::FromRow)]
struct SessionRow {
    session_id: Uuid,
    owner_id: Uuid,
    anchor_lat: f64,
    anchor_lon: f64,
    boundary_radius_m: f64,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl SessionRow {
    fn into_session(self) -> AttendanceResult<Session> {
        Ok(Session {
            id: SessionId::from_uuid(self.session_id),
            owner_id: UserId::from_uuid(self.owner_id),
            anchor: Coordinate::new(self.anchor_lat, self.anchor_lon).map_err(corrupt_row)?,
            boundary_radius: BoundaryRadius::new(self.boundary_radius_m).map_err(corrupt_row)?,
            created_at: self.created_at,
            expires_at: self.expires_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct CheckInRow {
    check_in_id: Uuid,
    session_id: Uuid,
    student_id: Uuid,
    claimed_lat: f64,
    claimed_lon: f64,
    distance_m: f64,
    status: String,
    recorded_at: DateTime<Utc>,
}

impl CheckInRow {
    fn into_check_in(self) -> AttendanceResult<CheckIn> {
        let status = AttendanceStatus::from_code(&self.status).ok_or_else(|| {
            AttendanceError::Internal(format!("Unknown attendance status: {}", self.status))
        })?;

        Ok(CheckIn {
            id: CheckInId::from_uuid(self.check_in_id),
            session_id: SessionId::from_uuid(self.session_id),
            student_id: UserId::from_uuid(self.student_id),
            claimed_location: Coordinate::new(self.claimed_lat, self.claimed_lon)
                .map_err(corrupt_row)?,
            distance_m: self.distance_m,
            status,
            recorded_at: self.recorded_at,
        })
    }
}

/// A stored row that fails domain validation is a server-side fault.
fn corrupt_row(err: AttendanceError) -> AttendanceError {
    AttendanceError::Internal(format!("Corrupt attendance row: {err}"))
}
