//! Identity Middleware

use crate::domain::repository::{CheckInRepository, IdentityVerifier, SessionRepository};
use crate::error::AttendanceError;
use crate::presentation::handlers::AttendanceAppState;
use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use platform::client::extract_bearer_token;

/// Middleware that resolves the bearer credential into an [`Identity`]
///
/// On success the identity is placed in request extensions for handlers.
///
/// [`Identity`]: crate::domain::value_objects::Identity
pub async fn require_identity<R, V>(
    State(state): State<AttendanceAppState<R, V>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AttendanceError>
where
    R: SessionRepository + CheckInRepository + Send + Sync + 'static,
    V: IdentityVerifier + Send + Sync + 'static,
{
    let token = extract_bearer_token(req.headers())?.to_owned();

    let identity = state.identity.verify(&token).await?;

    tracing::debug!(
        user_id = %identity.user_id,
        role = %identity.role,
        "Caller identified"
    );

    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}
