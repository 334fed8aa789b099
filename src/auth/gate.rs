//! Request-level authorization decisions.
//!
//! A request starts unauthenticated. `authenticate` moves it to authenticated
//! (or fails with 401), and `require_role` optionally checks the role on top
//! (or fails with 403). Nothing here is retried or remembered across requests.

use crate::auth::{Identity, TokenService};
use crate::error::AppError;
use crate::models::Role;

const BEARER_PREFIX: &str = "Bearer ";

/// Resolves an `Authorization` header value to an identity.
pub fn authenticate(header: Option<&str>, tokens: &TokenService) -> Result<Identity, AppError> {
    let header = header.ok_or_else(|| AppError::Unauthorized("Missing token".into()))?;
    let token = header
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::Unauthorized("Invalid authorization header".into()))?;

    current_identity(token, tokens)
}

/// Resolves a bare token to the identity it binds.
pub fn current_identity(token: &str, tokens: &TokenService) -> Result<Identity, AppError> {
    tokens.verify(token)
}

/// Passes only when the identity's role is one of `allowed`.
pub fn require_role(identity: &Identity, allowed: &[Role]) -> Result<(), AppError> {
    if allowed.contains(&identity.role) {
        Ok(())
    } else {
        log::debug!(
            "user {} with role {} refused, requires one of {:?}",
            identity.user_id,
            identity.role,
            allowed
        );
        Err(AppError::Forbidden(
            "Access forbidden. Insufficient permissions.".into(),
        ))
    }
}
