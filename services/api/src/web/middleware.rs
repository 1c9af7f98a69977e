//! services/api/src/web/middleware.rs
//!
//! Authentication middleware for protecting routes.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use showtimex_core::domain::{Identity, Role};
use std::sync::Arc;

use crate::web::error::HttpError;
use crate::web::identity::{bearer_token, resolve_token, CredentialError};
use crate::web::state::AppState;

/// Resolves the bearer credential on `req` into a caller identity.
fn resolve_identity(state: &AppState, req: &Request) -> Result<Identity, HttpError> {
    // 1. Extract the Authorization header
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(CredentialError::Missing)?;

    // 2. Verify the token and build the identity for this request
    let identity = resolve_token(bearer_token(auth_header), &state.config.jwt_secret)?;
    Ok(identity)
}

/// Middleware that validates the bearer token and resolves the caller.
///
/// If valid, inserts the `Identity` into request extensions for handlers to use.
/// If invalid or missing, returns 401 Unauthorized.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, HttpError> {
    let identity = resolve_identity(&state, &req)?;
    req.extensions_mut().insert(identity);
    Ok(next.run(req).await)
}

/// Middleware for catalog management routes: `require_auth` plus an admin
/// role check. Non-admins get 403 rather than 401.
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, HttpError> {
    let identity = resolve_identity(&state, &req)?;
    identity
        .require_role(Role::Admin)
        .map_err(|_| HttpError::Forbidden("Admin privileges required".to_string()))?;
    req.extensions_mut().insert(identity);
    Ok(next.run(req).await)
}
