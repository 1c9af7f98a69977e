//! services/api/src/web/auth.rs
//!
//! Authentication endpoints for account signup and login. Both return a
//! bearer token; there is no server-side session to log out of.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{extract::State, response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use showtimex_core::domain::{NewUser, Role, User};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::web::error::HttpError;
use crate::web::identity::issue_token;
use crate::web::state::AppState;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct SignupRequest {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    /// "user" (default) or "admin".
    pub role: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, ToSchema)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            role: user.role.to_string(),
            created_at: user.created_at,
        }
    }
}

/// The envelope returned by both signup and login.
#[derive(Serialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub user: UserResponse,
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /auth/signup - Create a new account and return a bearer token
#[utoipa::path(
    post,
    path = "/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 200, description = "Account created", body = TokenResponse),
        (status = 400, description = "Email or username already taken"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn signup_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignupRequest>,
) -> Result<impl IntoResponse, HttpError> {
    // 1. Reject duplicate email or username up front
    let existing = state
        .users
        .find_by_email(&req.email)
        .await
        .map_err(|e| HttpError::internal("Failed to look up email", e))?;
    if existing.is_some() {
        return Err(HttpError::BadRequest("Email already registered".to_string()));
    }

    let existing = state
        .users
        .find_by_username(&req.username)
        .await
        .map_err(|e| HttpError::internal("Failed to look up username", e))?;
    if existing.is_some() {
        return Err(HttpError::BadRequest("Username already taken".to_string()));
    }

    // 2. Resolve the requested role, defaulting to a regular user
    let role: Role = req
        .role
        .as_deref()
        .unwrap_or("user")
        .to_lowercase()
        .parse()
        .map_err(|_| HttpError::BadRequest("Role must be 'user' or 'admin'".to_string()))?;

    // 3. Hash the password
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(req.password.as_bytes(), &salt)
        .map_err(|e| HttpError::internal("Failed to hash password", e))?
        .to_string();

    // 4. Create the user
    let user = state
        .users
        .create_user(NewUser {
            email: req.email,
            username: req.username,
            first_name: req.first_name,
            last_name: req.last_name,
            password_hash,
            role,
        })
        .await
        .map_err(|e| HttpError::internal("Failed to create user", e))?;

    // 5. Issue the bearer token
    let token = issue_token(&user, &state.config.jwt_secret, state.config.token_ttl_minutes)
        .map_err(|e| HttpError::internal("Failed to issue token", e))?;

    Ok(Json(TokenResponse {
        access_token: token,
        token_type: "bearer".to_string(),
        user: user.into(),
    }))
}

/// POST /auth/login - Exchange credentials for a bearer token
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, HttpError> {
    // 1. Look up the account by email; an unknown email reads the same as a
    //    wrong password
    let creds = state
        .users
        .find_by_email(&req.email)
        .await
        .map_err(|e| HttpError::internal("Failed to look up email", e))?
        .ok_or_else(|| HttpError::Unauthorized("Invalid email or password".to_string()))?;

    // 2. Verify the password against the stored hash
    let parsed_hash = PasswordHash::new(&creds.password_hash)
        .map_err(|e| HttpError::internal("Failed to parse password hash", e))?;
    let valid = Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed_hash)
        .is_ok();
    if !valid {
        return Err(HttpError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    // 3. Issue the bearer token
    let token = issue_token(
        &creds.user,
        &state.config.jwt_secret,
        state.config.token_ttl_minutes,
    )
    .map_err(|e| HttpError::internal("Failed to issue token", e))?;

    Ok(Json(TokenResponse {
        access_token: token,
        token_type: "bearer".to_string(),
        user: creds.user.into(),
    }))
}
