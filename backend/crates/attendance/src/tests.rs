//! Unit tests for attendance crate

#[cfg(test)]
mod config_tests {
    use crate::application::config::*;
    use std::time::Duration;

    #[test]
    fn test_default_config() {
        let config = AttendanceConfig::default();

        assert_eq!(config.session_ttl, Duration::from_secs(600));
        assert_eq!(config.max_session_ttl, Duration::from_secs(24 * 3600));
        assert_eq!(config.session_ttl_minutes(), 10);
    }

    #[test]
    fn test_with_random_secret() {
        let config1 = AttendanceConfig::with_random_secret();
        let config2 = AttendanceConfig::with_random_secret();

        assert_ne!(config1.identity_secret, config2.identity_secret);
        assert!(config1.identity_secret.iter().any(|&b| b != 0));
    }

    #[test]
    fn test_session_ttl_override() {
        let config = AttendanceConfig::default().with_session_ttl_minutes(45);
        assert_eq!(config.session_ttl, Duration::from_secs(45 * 60));
        assert_eq!(config.session_ttl_minutes(), 45);
    }
}

#[cfg(test)]
mod models_tests {
    use crate::domain::entities::Session;
    use crate::domain::value_objects::*;
    use crate::presentation::dto::*;
    use chrono::{Duration, TimeZone, Utc};
    use kernel::id::UserId;

    #[test]
    fn test_verify_request_accepts_session_id() {
        let json = r#"{
            "session_id": "6f1c2a4e-0d3b-4c5a-9e8f-1a2b3c4d5e6f",
            "student_location": {"lat": 40.7135, "lon": -74.0059}
        }"#;
        let req: VerifyAttendanceRequest = serde_json::from_str(json).unwrap();

        assert_eq!(
            req.session_id.to_string(),
            "6f1c2a4e-0d3b-4c5a-9e8f-1a2b3c4d5e6f"
        );
        assert_eq!(req.student_location.lat, 40.7135);
    }

    #[test]
    fn test_verify_request_accepts_legacy_session_data() {
        let json = r#"{
            "session_data": "6f1c2a4e-0d3b-4c5a-9e8f-1a2b3c4d5e6f",
            "student_location": {"lat": 1.0, "lon": 2.0}
        }"#;
        let req: VerifyAttendanceRequest = serde_json::from_str(json).unwrap();

        assert_eq!(
            req.session_id.to_string(),
            "6f1c2a4e-0d3b-4c5a-9e8f-1a2b3c4d5e6f"
        );
    }

    #[test]
    fn test_create_session_request_ttl_optional() {
        let req: CreateSessionRequest =
            serde_json::from_str(r#"{"lat": 40.7128, "lon": -74.006, "boundary_radius": 50}"#)
                .unwrap();
        assert_eq!(req.ttl_minutes, None);
        assert_eq!(req.boundary_radius, 50.0);

        let req: CreateSessionRequest = serde_json::from_str(
            r#"{"lat": 0, "lon": 0, "boundary_radius": 10, "ttl_minutes": 30}"#,
        )
        .unwrap();
        assert_eq!(req.ttl_minutes, Some(30));
    }

    #[test]
    fn test_status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&AttendanceStatus::ManualReview).unwrap(),
            r#""manual_review""#
        );
        assert_eq!(
            serde_json::to_string(&AttendanceStatus::Present).unwrap(),
            r#""present""#
        );
    }

    #[test]
    fn test_session_response_omits_live_without_view() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
        let session = Session::new(
            UserId::new(),
            Coordinate::new(40.7128, -74.006).unwrap(),
            BoundaryRadius::new(50.0).unwrap(),
            Duration::minutes(10),
            now,
        );

        let value = serde_json::to_value(SessionResponse::from(&session)).unwrap();
        assert!(value.get("live").is_none());
        assert_eq!(value["boundary_radius"], 50.0);
        assert_eq!(value["location"]["lat"], 40.7128);
    }
}

#[cfg(test)]
mod entity_tests {
    use crate::domain::entities::Session;
    use crate::domain::value_objects::*;
    use chrono::{Duration, TimeZone, Utc};
    use kernel::id::UserId;

    fn session_at(now: chrono::DateTime<Utc>) -> Session {
        Session::new(
            UserId::new(),
            Coordinate::new(40.7128, -74.006).unwrap(),
            BoundaryRadius::new(50.0).unwrap(),
            Duration::minutes(10),
            now,
        )
    }

    #[test]
    fn test_session_expiry_is_created_plus_ttl() {
        let t = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
        let session = session_at(t);

        assert_eq!(session.created_at, t);
        assert_eq!(session.expires_at, t + Duration::minutes(10));
        assert!(session.expires_at > session.created_at);
    }

    #[test]
    fn test_session_live_at_expiry_instant() {
        let t = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
        let session = session_at(t);

        assert!(session.is_live(t));
        assert!(session.is_live(t + Duration::minutes(9)));
        assert!(session.is_live(t + Duration::minutes(10)));
        assert!(!session.is_live(t + Duration::minutes(10) + Duration::seconds(1)));
    }

    #[test]
    fn test_session_ownership() {
        let t = Utc::now();
        let session = session_at(t);

        assert!(session.is_owned_by(&session.owner_id));
        assert!(!session.is_owned_by(&UserId::new()));
    }
}

#[cfg(test)]
mod error_tests {
    use crate::error::AttendanceError;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use kernel::error::{app_error::AppError, kind::ErrorKind};
    use std::borrow::Cow;

    /// Database error carrying a Postgres SQLSTATE
    #[derive(Debug, thiserror::Error)]
    #[error("database error {code}")]
    struct PgStateError {
        code: &'static str,
    }

    impl sqlx::error::DatabaseError for PgStateError {
        fn message(&self) -> &str {
            "database error"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            Some(Cow::Borrowed(self.code))
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> sqlx::error::ErrorKind {
            match self.code {
                "23505" => sqlx::error::ErrorKind::UniqueViolation,
                "23503" => sqlx::error::ErrorKind::ForeignKeyViolation,
                "23514" => sqlx::error::ErrorKind::CheckViolation,
                _ => sqlx::error::ErrorKind::Other,
            }
        }
    }

    fn pg_error(code: &'static str) -> AttendanceError {
        AttendanceError::Database(sqlx::Error::Database(Box::new(PgStateError { code })))
    }

    #[test]
    fn test_status_codes() {
        let cases = [
            (AttendanceError::validation("bad"), StatusCode::BAD_REQUEST),
            (AttendanceError::SessionNotFound, StatusCode::NOT_FOUND),
            (AttendanceError::SessionExpired, StatusCode::GONE),
            (AttendanceError::MissingCredential, StatusCode::UNAUTHORIZED),
            (AttendanceError::InvalidCredential, StatusCode::UNAUTHORIZED),
            (
                AttendanceError::Forbidden("no".into()),
                StatusCode::FORBIDDEN,
            ),
            (
                AttendanceError::Store("down".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AttendanceError::Internal("bug".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AttendanceError::Database(sqlx::Error::PoolTimedOut),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                AttendanceError::Database(sqlx::Error::RowNotFound),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (pg_error("23505"), StatusCode::INTERNAL_SERVER_ERROR),
            (pg_error("23503"), StatusCode::INTERNAL_SERVER_ERROR),
            (pg_error("23514"), StatusCode::INTERNAL_SERVER_ERROR),
            (pg_error("53300"), StatusCode::SERVICE_UNAVAILABLE),
        ];

        for (err, expected) in cases {
            let declared = err.status_code();
            let name = err.to_string();
            assert_eq!(declared, expected, "{name}");
            assert_eq!(err.into_response().status(), declared, "{name}");
        }
    }

    #[test]
    fn test_store_errors_are_server_errors() {
        for err in [
            pg_error("23505"),
            pg_error("23514"),
            AttendanceError::Database(sqlx::Error::RowNotFound),
            AttendanceError::Store("down".into()),
        ] {
            assert!(err.is_store_error());
            assert!(err.kind().is_server_error(), "{err}");
        }
    }

    #[test]
    fn test_store_error_classification() {
        assert!(AttendanceError::Store("down".into()).is_store_error());
        assert!(AttendanceError::Database(sqlx::Error::PoolTimedOut).is_store_error());
        assert!(!AttendanceError::SessionExpired.is_store_error());
    }

    #[test]
    fn test_into_app_error() {
        let app: AppError = AttendanceError::SessionExpired.into();
        assert_eq!(app.kind(), ErrorKind::Gone);
        assert!(app.action().is_some());

        let app: AppError = AttendanceError::Database(sqlx::Error::PoolTimedOut).into();
        assert_eq!(app.kind(), ErrorKind::ServiceUnavailable);

        let app: AppError = AttendanceError::validation("radius").into();
        assert_eq!(app.kind(), ErrorKind::BadRequest);
    }

    #[test]
    fn test_credential_error_conversion() {
        use platform::client::CredentialError;

        assert!(matches!(
            AttendanceError::from(CredentialError::MissingHeader),
            AttendanceError::MissingCredential
        ));
        assert!(matches!(
            AttendanceError::from(CredentialError::NotBearer),
            AttendanceError::InvalidCredential
        ));
    }
}

#[cfg(test)]
mod use_case_tests {
    use crate::application::config::AttendanceConfig;
    use crate::application::*;
    use crate::domain::entities::{CheckIn, Session};
    use crate::domain::repository::{CheckInRepository, SessionRepository};
    use crate::domain::value_objects::AttendanceStatus;
    use crate::error::{AttendanceError, AttendanceResult};
    use crate::infra::memory::InMemoryAttendanceRepository;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use kernel::id::{SessionId, UserId};
    use std::sync::Arc;

    /// Recorder whose store is always down
    struct FailingRecorder;

    impl CheckInRepository for FailingRecorder {
        async fn insert(&self, _check_in: &CheckIn) -> AttendanceResult<CheckIn> {
            Err(AttendanceError::Store("connection refused".to_string()))
        }

        async fn find_by_session(&self, _session_id: SessionId) -> AttendanceResult<Vec<CheckIn>> {
            Err(AttendanceError::Store("connection refused".to_string()))
        }

        async fn find_by_student(&self, _student_id: &UserId) -> AttendanceResult<Vec<CheckIn>> {
            Err(AttendanceError::Store("connection refused".to_string()))
        }
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap()
    }

    async fn open_session(repo: &Arc<InMemoryAttendanceRepository>, owner: UserId) -> Session {
        let use_case =
            CreateSessionUseCase::new(repo.clone(), Arc::new(AttendanceConfig::default()));
        use_case
            .execute_at(
                CreateSessionInput {
                    owner_id: owner,
                    lat: 40.7128,
                    lon: -74.0060,
                    boundary_radius: 50.0,
                    ttl_minutes: None,
                },
                t0(),
            )
            .await
            .unwrap()
    }

    fn check_in_input(
        session: &Session,
        student: UserId,
        lat: f64,
        lon: f64,
    ) -> VerifyAttendanceInput {
        VerifyAttendanceInput {
            session_id: session.id,
            student_id: student,
            lat,
            lon,
        }
    }

    #[tokio::test]
    async fn test_create_session_uses_default_ttl() {
        let repo = Arc::new(InMemoryAttendanceRepository::new());
        let session = open_session(&repo, UserId::new()).await;

        assert_eq!(session.created_at, t0());
        assert_eq!(session.expires_at, t0() + Duration::minutes(10));
    }

    #[tokio::test]
    async fn test_create_session_rejects_bad_input() {
        let repo = Arc::new(InMemoryAttendanceRepository::new());
        let use_case =
            CreateSessionUseCase::new(repo.clone(), Arc::new(AttendanceConfig::default()));

        let base = CreateSessionInput {
            owner_id: UserId::new(),
            lat: 40.7128,
            lon: -74.0060,
            boundary_radius: 50.0,
            ttl_minutes: None,
        };

        let cases = [
            CreateSessionInput { lat: 91.0, ..base.clone() },
            CreateSessionInput { lon: -180.5, ..base.clone() },
            CreateSessionInput { boundary_radius: 0.0, ..base.clone() },
            CreateSessionInput { boundary_radius: -5.0, ..base.clone() },
            CreateSessionInput { boundary_radius: f64::NAN, ..base.clone() },
            CreateSessionInput { ttl_minutes: Some(0), ..base.clone() },
            CreateSessionInput { ttl_minutes: Some(24 * 60 + 1), ..base.clone() },
        ];

        for input in cases {
            let result = use_case.execute_at(input, t0()).await;
            assert!(matches!(result, Err(AttendanceError::Validation(_))));
        }

        let owned = repo.find_by_owner(&base.owner_id).await.unwrap();
        assert!(owned.is_empty());
    }

    #[tokio::test]
    async fn test_create_session_custom_ttl() {
        let repo = Arc::new(InMemoryAttendanceRepository::new());
        let use_case =
            CreateSessionUseCase::new(repo.clone(), Arc::new(AttendanceConfig::default()));

        let session = use_case
            .execute_at(
                CreateSessionInput {
                    owner_id: UserId::new(),
                    lat: 0.0,
                    lon: 0.0,
                    boundary_radius: 25.0,
                    ttl_minutes: Some(90),
                },
                t0(),
            )
            .await
            .unwrap();

        assert_eq!(session.expires_at, t0() + Duration::minutes(90));
    }

    #[tokio::test]
    async fn test_check_in_unknown_session() {
        let repo = Arc::new(InMemoryAttendanceRepository::new());
        let use_case = VerifyAttendanceUseCase::new(repo.clone(), repo.clone());

        let result = use_case
            .execute_at(
                VerifyAttendanceInput {
                    session_id: SessionId::new(),
                    student_id: UserId::new(),
                    lat: 40.7128,
                    lon: -74.0060,
                },
                t0(),
            )
            .await;

        assert!(matches!(result, Err(AttendanceError::SessionNotFound)));
        assert_eq!(repo.check_in_count().await, 0);
    }

    #[tokio::test]
    async fn test_invalid_location_checked_before_session_lookup() {
        let repo = Arc::new(InMemoryAttendanceRepository::new());
        let use_case = VerifyAttendanceUseCase::new(repo.clone(), repo.clone());

        let result = use_case
            .execute_at(
                VerifyAttendanceInput {
                    session_id: SessionId::new(),
                    student_id: UserId::new(),
                    lat: 120.0,
                    lon: 0.0,
                },
                t0(),
            )
            .await;

        assert!(matches!(result, Err(AttendanceError::Validation(_))));
    }

    #[tokio::test]
    async fn test_check_in_at_anchor_is_present() {
        let repo = Arc::new(InMemoryAttendanceRepository::new());
        let session = open_session(&repo, UserId::new()).await;
        let use_case = VerifyAttendanceUseCase::new(repo.clone(), repo.clone());
        let student = UserId::new();

        let now = t0() + Duration::minutes(1);
        let check_in = use_case
            .execute_at(check_in_input(&session, student, 40.7128, -74.0060), now)
            .await
            .unwrap();

        assert_eq!(check_in.status, AttendanceStatus::Present);
        assert_eq!(check_in.distance_m, 0.0);
        assert_eq!(check_in.student_id, student);
        assert_eq!(check_in.session_id, session.id);
        assert_eq!(check_in.recorded_at, now);
        assert_eq!(repo.check_in_count().await, 1);
    }

    #[tokio::test]
    async fn test_check_in_borderline_goes_to_manual_review() {
        let repo = Arc::new(InMemoryAttendanceRepository::new());
        let session = open_session(&repo, UserId::new()).await;
        let use_case = VerifyAttendanceUseCase::new(repo.clone(), repo.clone());

        let check_in = use_case
            .execute_at(
                check_in_input(&session, UserId::new(), 40.7135, -74.0059),
                t0() + Duration::minutes(5),
            )
            .await
            .unwrap();

        assert_eq!(check_in.status, AttendanceStatus::ManualReview);
        assert!(check_in.distance_m > 50.0 && check_in.distance_m <= 100.0);
    }

    #[tokio::test]
    async fn test_check_in_far_away_is_recorded_absent() {
        let repo = Arc::new(InMemoryAttendanceRepository::new());
        let session = open_session(&repo, UserId::new()).await;
        let use_case = VerifyAttendanceUseCase::new(repo.clone(), repo.clone());

        let check_in = use_case
            .execute_at(
                check_in_input(&session, UserId::new(), 40.7200, -74.0060),
                t0() + Duration::minutes(5),
            )
            .await
            .unwrap();

        assert_eq!(check_in.status, AttendanceStatus::Absent);
        assert_eq!(repo.check_in_count().await, 1);
    }

    #[tokio::test]
    async fn test_check_in_at_expiry_instant_is_accepted() {
        let repo = Arc::new(InMemoryAttendanceRepository::new());
        let session = open_session(&repo, UserId::new()).await;
        let use_case = VerifyAttendanceUseCase::new(repo.clone(), repo.clone());

        let result = use_case
            .execute_at(
                check_in_input(&session, UserId::new(), 40.7128, -74.0060),
                session.expires_at,
            )
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_check_in_after_expiry_records_nothing() {
        let repo = Arc::new(InMemoryAttendanceRepository::new());
        let session = open_session(&repo, UserId::new()).await;
        let use_case = VerifyAttendanceUseCase::new(repo.clone(), repo.clone());

        let result = use_case
            .execute_at(
                check_in_input(&session, UserId::new(), 40.7128, -74.0060),
                session.expires_at + Duration::seconds(1),
            )
            .await;

        assert!(matches!(result, Err(AttendanceError::SessionExpired)));
        assert_eq!(repo.check_in_count().await, 0);
    }

    #[tokio::test]
    async fn test_recorder_failure_is_surfaced() {
        let repo = Arc::new(InMemoryAttendanceRepository::new());
        let session = open_session(&repo, UserId::new()).await;
        let use_case = VerifyAttendanceUseCase::new(repo.clone(), Arc::new(FailingRecorder));

        let result = use_case
            .execute_at(
                check_in_input(&session, UserId::new(), 40.7128, -74.0060),
                t0() + Duration::minutes(1),
            )
            .await;

        match result {
            Err(e) => assert!(e.is_store_error()),
            Ok(_) => panic!("expected a store error"),
        }
    }

    #[tokio::test]
    async fn test_repeated_check_ins_are_all_recorded() {
        let repo = Arc::new(InMemoryAttendanceRepository::new());
        let session = open_session(&repo, UserId::new()).await;
        let use_case = VerifyAttendanceUseCase::new(repo.clone(), repo.clone());
        let student = UserId::new();

        for minute in 1..=2 {
            use_case
                .execute_at(
                    check_in_input(&session, student, 40.7128, -74.0060),
                    t0() + Duration::minutes(minute),
                )
                .await
                .unwrap();
        }

        assert_eq!(repo.check_in_count().await, 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_parallel_check_ins_each_record_one_row() {
        const STUDENTS: usize = 64;

        let repo = Arc::new(InMemoryAttendanceRepository::new());
        let session = open_session(&repo, UserId::new()).await;
        let use_case = Arc::new(VerifyAttendanceUseCase::new(repo.clone(), repo.clone()));
        let now = t0() + Duration::minutes(3);

        let handles: Vec<_> = (0..STUDENTS)
            .map(|_| {
                let use_case = use_case.clone();
                let input = check_in_input(&session, UserId::new(), 40.7128, -74.0060);
                tokio::spawn(async move { use_case.execute_at(input, now).await })
            })
            .collect();

        for handle in handles {
            let check_in = handle.await.unwrap().unwrap();
            assert_eq!(check_in.session_id, session.id);
        }

        assert_eq!(repo.check_in_count().await, STUDENTS);
        let listed = repo.find_by_session(session.id).await.unwrap();
        assert_eq!(listed.len(), STUDENTS);
    }

    #[tokio::test]
    async fn test_check_in_listing_is_owner_only() {
        let repo = Arc::new(InMemoryAttendanceRepository::new());
        let owner = UserId::new();
        let session = open_session(&repo, owner).await;
        let verify = VerifyAttendanceUseCase::new(repo.clone(), repo.clone());
        let query = QueryRecordsUseCase::new(repo.clone(), repo.clone());

        let first = UserId::new();
        let second = UserId::new();
        verify
            .execute_at(
                check_in_input(&session, first, 40.7128, -74.0060),
                t0() + Duration::minutes(1),
            )
            .await
            .unwrap();
        verify
            .execute_at(
                check_in_input(&session, second, 40.7135, -74.0059),
                t0() + Duration::minutes(2),
            )
            .await
            .unwrap();

        let listed = query.check_ins_for_session(&owner, session.id).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].student_id, first);
        assert_eq!(listed[1].student_id, second);

        let denied = query.check_ins_for_session(&first, session.id).await;
        assert!(matches!(denied, Err(AttendanceError::Forbidden(_))));

        let missing = query.check_ins_for_session(&owner, SessionId::new()).await;
        assert!(matches!(missing, Err(AttendanceError::SessionNotFound)));

        let mine = query.check_ins_by_student(&second).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].status, AttendanceStatus::ManualReview);
    }

    #[tokio::test]
    async fn test_session_view_reports_liveness() {
        let repo = Arc::new(InMemoryAttendanceRepository::new());
        let owner = UserId::new();
        let session = open_session(&repo, owner).await;
        let query = QueryRecordsUseCase::new(repo.clone(), repo.clone());

        let live = query.session(session.id, session.expires_at).await.unwrap();
        assert!(live.live);

        let expired = query
            .session(session.id, session.expires_at + Duration::seconds(1))
            .await
            .unwrap();
        assert!(!expired.live);
        assert_eq!(expired.session, session);

        let owned = query.sessions_owned_by(&owner).await.unwrap();
        assert_eq!(owned, vec![session]);
    }
}

#[cfg(test)]
mod router_tests {
    use crate::application::config::AttendanceConfig;
    use crate::domain::value_objects::{Identity, Role};
    use crate::infra::identity::HmacIdentityVerifier;
    use crate::infra::memory::InMemoryAttendanceRepository;
    use crate::presentation::router::attendance_router_generic;
    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use chrono::{Duration, Utc};
    use kernel::id::UserId;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    const SECRET: [u8; 32] = [7u8; 32];

    fn app() -> Router {
        let config = AttendanceConfig {
            identity_secret: SECRET,
            ..Default::default()
        };
        attendance_router_generic(
            InMemoryAttendanceRepository::new(),
            HmacIdentityVerifier::new(SECRET),
            config,
        )
    }

    fn token_for(identity: &Identity) -> String {
        HmacIdentityVerifier::new(SECRET).issue(identity, Utc::now() + Duration::hours(1))
    }

    fn json_request(method: &str, uri: &str, token: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str, token: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_missing_token_is_unauthorized() {
        let response = app()
            .oneshot(Request::builder().uri("/me").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_forged_token_is_unauthorized() {
        let identity = Identity::new(UserId::new(), Role::Professor);
        let forged = HmacIdentityVerifier::new([8u8; 32])
            .issue(&identity, Utc::now() + Duration::hours(1));

        let response = app().oneshot(get_request("/me", &forged)).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_me_echoes_identity() {
        let identity = Identity::new(UserId::new(), Role::Student);
        let response = app()
            .oneshot(get_request("/me", &token_for(&identity)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["user_id"], identity.user_id.to_string());
        assert_eq!(body["role"], "student");
    }

    #[tokio::test]
    async fn test_student_cannot_create_session() {
        let student = Identity::new(UserId::new(), Role::Student);
        let response = app()
            .oneshot(json_request(
                "POST",
                "/sessions",
                &token_for(&student),
                json!({"lat": 40.7128, "lon": -74.006, "boundary_radius": 50}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_invalid_radius_is_bad_request() {
        let professor = Identity::new(UserId::new(), Role::Professor);
        let response = app()
            .oneshot(json_request(
                "POST",
                "/sessions",
                &token_for(&professor),
                json!({"lat": 40.7128, "lon": -74.006, "boundary_radius": 0}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_check_in_unknown_session_is_not_found() {
        let student = Identity::new(UserId::new(), Role::Student);
        let response = app()
            .oneshot(json_request(
                "POST",
                "/check-ins",
                &token_for(&student),
                json!({
                    "session_id": "6f1c2a4e-0d3b-4c5a-9e8f-1a2b3c4d5e6f",
                    "student_location": {"lat": 40.7128, "lon": -74.006}
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_malformed_session_id_is_bad_request() {
        let professor = Identity::new(UserId::new(), Role::Professor);
        let token = token_for(&professor);

        for uri in ["/sessions/not-a-uuid", "/sessions/not-a-uuid/check-ins"] {
            let response = app().oneshot(get_request(uri, &token)).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
            let body = body_json(response).await;
            assert_eq!(body["status"], 400);
        }
    }

    #[tokio::test]
    async fn test_full_session_and_check_in_flow() {
        let app = app();
        let professor = Identity::new(UserId::new(), Role::Professor);
        let student = Identity::new(UserId::new(), Role::Student);
        let professor_token = token_for(&professor);
        let student_token = token_for(&student);

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/sessions",
                &professor_token,
                json!({"lat": 40.7128, "lon": -74.006, "boundary_radius": 50}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = body_json(response).await;
        let session_id = created["session_id"].as_str().unwrap().to_string();
        assert!(created["expiry"].is_string());

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/check-ins",
                &student_token,
                json!({
                    "session_data": session_id,
                    "student_location": {"lat": 40.7135, "lon": -74.0059}
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let recorded = body_json(response).await;
        assert_eq!(recorded["status"], "manual_review");
        assert_eq!(recorded["student_id"], student.user_id.to_string());
        assert_eq!(recorded["session_id"], session_id.as_str());
        assert!(recorded["distance"].as_f64().unwrap() > 50.0);

        let response = app
            .clone()
            .oneshot(get_request(&format!("/sessions/{session_id}"), &student_token))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["live"], true);

        let response = app
            .clone()
            .oneshot(get_request(
                &format!("/sessions/{session_id}/check-ins"),
                &student_token,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app
            .clone()
            .oneshot(get_request(
                &format!("/sessions/{session_id}/check-ins"),
                &professor_token,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let listed = body_json(response).await;
        assert_eq!(listed.as_array().unwrap().len(), 1);

        let response = app
            .clone()
            .oneshot(get_request("/sessions", &professor_token))
            .await
            .unwrap();
        assert_eq!(body_json(response).await.as_array().unwrap().len(), 1);

        let response = app
            .oneshot(get_request("/check-ins", &student_token))
            .await
            .unwrap();
        let mine = body_json(response).await;
        assert_eq!(mine[0]["status"], "manual_review");
    }
}
