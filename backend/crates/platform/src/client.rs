//! Client credential extraction
//!
//! Pulls the caller's bearer credential out of request headers. Verifying
//! the credential is the job of the domain crate's identity adapter.

use axum::http::{HeaderMap, header};

/// Error when extracting a client credential
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialError {
    #[error("Missing Authorization header")]
    MissingHeader,

    #[error("Authorization header is not a Bearer credential")]
    NotBearer,
}

/// Extract the token from an `Authorization: Bearer <token>` header
///
/// The scheme is matched case-insensitively (RFC 9110 §11.1). An empty
/// token is treated as a malformed header.
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, CredentialError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(CredentialError::MissingHeader)?;

    let (scheme, token) = value
        .trim()
        .split_once(' ')
        .ok_or(CredentialError::NotBearer)?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(CredentialError::NotBearer);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(CredentialError::NotBearer);
    }

    Ok(token)
}
