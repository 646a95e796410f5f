//! HTTP Handlers

use crate::application::config::AttendanceConfig;
use crate::application::{
    CreateSessionInput, CreateSessionUseCase, QueryRecordsUseCase, VerifyAttendanceInput,
    VerifyAttendanceUseCase,
};
use crate::domain::repository::{CheckInRepository, IdentityVerifier, SessionRepository};
use crate::domain::value_objects::{Identity, Role};
use crate::error::AttendanceResult;
use crate::presentation::dto::{
    CheckInResponse, CreateSessionRequest, CreateSessionResponse, MeResponse, SessionResponse,
    VerifyAttendanceRequest, VerifyAttendanceResponse,
};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use chrono::Utc;
use kernel::id::{SessionId, UserId};
use std::sync::Arc;

/// Shared state for attendance handlers
pub struct AttendanceAppState<R, V>
where
    R: SessionRepository + CheckInRepository + Send + Sync + 'static,
    V: IdentityVerifier + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub identity: Arc<V>,
    pub config: Arc<AttendanceConfig>,
}

// Manual impl: only the `Arc`s are cloned, so `R` and `V` need not be `Clone`.
impl<R, V> Clone for AttendanceAppState<R, V>
where
    R: SessionRepository + CheckInRepository + Send + Sync + 'static,
    V: IdentityVerifier + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            identity: self.identity.clone(),
            config: self.config.clone(),
        }
    }
}

/// POST /api/attendance/sessions
pub async fn create_session<R, V>(
    State(state): State<AttendanceAppState<R, V>>,
    Extension(identity): Extension<Identity>,
    Json(req): Json<CreateSessionRequest>,
) -> AttendanceResult<(StatusCode, Json<CreateSessionResponse>)>
where
    R: SessionRepository + CheckInRepository + Send + Sync + 'static,
    V: IdentityVerifier + Send + Sync + 'static,
{
    identity.require_role(Role::Professor)?;

    let use_case = CreateSessionUseCase::new(state.repo.clone(), state.config.clone());

    let input = CreateSessionInput {
        owner_id: identity.user_id,
        lat: req.lat,
        lon: req.lon,
        boundary_radius: req.boundary_radius,
        ttl_minutes: req.ttl_minutes,
    };

    let session = use_case.execute(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateSessionResponse::from(&session)),
    ))
}

/// POST /api/attendance/check-ins
pub async fn verify_attendance<R, V>(
    State(state): State<AttendanceAppState<R, V>>,
    Extension(identity): Extension<Identity>,
    Json(req): Json<VerifyAttendanceRequest>,
) -> AttendanceResult<(StatusCode, Json<VerifyAttendanceResponse>)>
where
    R: SessionRepository + CheckInRepository + Send + Sync + 'static,
    V: IdentityVerifier + Send + Sync + 'static,
{
    let use_case = VerifyAttendanceUseCase::new(state.repo.clone(), state.repo.clone());

    let input = VerifyAttendanceInput {
        session_id: SessionId::from_uuid(req.session_id),
        student_id: identity.user_id,
        lat: req.student_location.lat,
        lon: req.student_location.lon,
    };

    let check_in = use_case.execute(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(VerifyAttendanceResponse::from(&check_in)),
    ))
}

/// GET /api/attendance/sessions
pub async fn list_sessions<R, V>(
    State(state): State<AttendanceAppState<R, V>>,
    Extension(identity): Extension<Identity>,
) -> AttendanceResult<Json<Vec<SessionResponse>>>
where
    R: SessionRepository + CheckInRepository + Send + Sync + 'static,
    V: IdentityVerifier + Send + Sync + 'static,
{
    let use_case = QueryRecordsUseCase::new(state.repo.clone(), state.repo.clone());
    let sessions = use_case.sessions_owned_by(&identity.user_id).await?;

    Ok(Json(sessions.iter().map(SessionResponse::from).collect()))
}

/// GET /api/attendance/sessions/{session_id}
pub async fn get_session<R, V>(
    State(state): State<AttendanceAppState<R, V>>,
    Path(session_id): Path<String>,
) -> AttendanceResult<Json<SessionResponse>>
where
    R: SessionRepository + CheckInRepository + Send + Sync + 'static,
    V: IdentityVerifier + Send + Sync + 'static,
{
    let use_case = QueryRecordsUseCase::new(state.repo.clone(), state.repo.clone());
    let session_id: SessionId = session_id.parse()?;
    let view = use_case.session(session_id, Utc::now()).await?;

    Ok(Json(SessionResponse::from(&view)))
}

/// GET /api/attendance/sessions/{session_id}/check-ins
pub async fn list_session_check_ins<R, V>(
    State(state): State<AttendanceAppState<R, V>>,
    Extension(identity): Extension<Identity>,
    Path(session_id): Path<String>,
) -> AttendanceResult<Json<Vec<CheckInResponse>>>
where
    R: SessionRepository + CheckInRepository + Send + Sync + 'static,
    V: IdentityVerifier + Send + Sync + 'static,
{
    let use_case = QueryRecordsUseCase::new(state.repo.clone(), state.repo.clone());
    let session_id: SessionId = session_id.parse()?;
    let check_ins = use_case
        .check_ins_for_session(&identity.user_id, session_id)
        .await?;

    Ok(Json(check_ins.iter().map(CheckInResponse::from).collect()))
}

/// GET /api/attendance/check-ins
pub async fn list_my_check_ins<R, V>(
    State(state): State<AttendanceAppState<R, V>>,
    Extension(identity): Extension<Identity>,
) -> AttendanceResult<Json<Vec<CheckInResponse>>>
where
    R: SessionRepository + CheckInRepository + Send + Sync + 'static,
    V: IdentityVerifier + Send + Sync + 'static,
{
    let student_id: UserId = identity.user_id;
    let use_case = QueryRecordsUseCase::new(state.repo.clone(), state.repo.clone());
    let check_ins = use_case.check_ins_by_student(&student_id).await?;

    Ok(Json(check_ins.iter().map(CheckInResponse::from).collect()))
}

/// GET /api/attendance/me
pub async fn me(Extension(identity): Extension<Identity>) -> Json<MeResponse> {
    Json(MeResponse::from(identity))
}
