//! Attendance Router

use crate::application::config::AttendanceConfig;
use crate::domain::repository::{CheckInRepository, IdentityVerifier, SessionRepository};
use crate::infra::identity::HmacIdentityVerifier;
use crate::infra::postgres::PgAttendanceRepository;
use crate::presentation::handlers::{self, AttendanceAppState};
use crate::presentation::middleware::require_identity;
use axum::{Router, middleware, routing::get};
use std::sync::Arc;

/// Create the attendance router with PostgreSQL repository
pub fn attendance_router(repo: PgAttendanceRepository, config: AttendanceConfig) -> Router {
    let verifier = HmacIdentityVerifier::new(config.identity_secret);
    attendance_router_generic(repo, verifier, config)
}

/// Create a generic attendance router for any store and identity provider
///
/// Every route requires a verified bearer credential.
pub fn attendance_router_generic<R, V>(repo: R, verifier: V, config: AttendanceConfig) -> Router
where
    R: SessionRepository + CheckInRepository + Send + Sync + 'static,
    V: IdentityVerifier + Send + Sync + 'static,
{
    let state = AttendanceAppState {
        repo: Arc::new(repo),
        identity: Arc::new(verifier),
        config: Arc::new(config),
    };

    Router::new()
        .route(
            "/sessions",
            get(handlers::list_sessions::<R, V>).post(handlers::create_session::<R, V>),
        )
        .route("/sessions/{session_id}", get(handlers::get_session::<R, V>))
        .route(
            "/sessions/{session_id}/check-ins",
            get(handlers::list_session_check_ins::<R, V>),
        )
        .route(
            "/check-ins",
            get(handlers::list_my_check_ins::<R, V>).post(handlers::verify_attendance::<R, V>),
        )
        .route("/me", get(handlers::me))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_identity::<R, V>,
        ))
        .with_state(state)
}
