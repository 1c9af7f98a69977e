//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the unauthenticated service endpoints and
//! the master definition for the OpenAPI specification.

use axum::response::Json;
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        root_handler,
        health_handler,
        crate::web::auth::signup_handler,
        crate::web::auth::login_handler,
        crate::web::bookings::create_booking_handler,
        crate::web::bookings::list_bookings_handler,
        crate::web::bookings::get_booking_handler,
        crate::web::bookings::update_booking_handler,
        crate::web::bookings::delete_booking_handler,
        crate::web::movies::create_movie_handler,
        crate::web::movies::list_movies_handler,
        crate::web::movies::get_movie_handler,
        crate::web::movies::update_movie_handler,
        crate::web::movies::delete_movie_handler,
        crate::web::movies::browse_movies_handler,
        crate::web::movies::movie_details_handler,
    ),
    components(
        schemas(
            MessageResponse,
            HealthResponse,
            crate::web::auth::SignupRequest,
            crate::web::auth::LoginRequest,
            crate::web::auth::UserResponse,
            crate::web::auth::TokenResponse,
            crate::web::bookings::CreateBookingRequest,
            crate::web::bookings::UpdateBookingRequest,
            crate::web::bookings::BookingResponse,
            crate::web::movies::MovieRequest,
            crate::web::movies::MovieResponse,
        )
    ),
    tags(
        (name = "ShowTimeX API", description = "Movie ticket booking endpoints.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response Structs
//=========================================================================================

#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    message: String,
}

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    status: String,
    message: String,
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// GET / - Service banner
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Service banner", body = MessageResponse))
)]
pub async fn root_handler() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Welcome to ShowTimeX Backend".to_string(),
    })
}

/// GET /api/health - Liveness probe
#[utoipa::path(
    get,
    path = "/api/health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        message: "ShowTimeX Backend is running".to_string(),
    })
}

/// GET /api-docs/openapi.json - The generated OpenAPI specification
pub async fn openapi_handler() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
