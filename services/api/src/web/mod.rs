pub mod auth;
pub mod bookings;
pub mod error;
pub mod identity;
pub mod middleware;
pub mod movies;
pub mod rest;
pub mod state;

pub use middleware::{require_admin, require_auth};

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use state::AppState;
use std::sync::Arc;

/// Builds the full application router: public endpoints, the bearer-guarded
/// booking routes and the admin-guarded catalog routes.
pub fn router(state: Arc<AppState>) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/", get(rest::root_handler))
        .route("/api/health", get(rest::health_handler))
        .route("/api-docs/openapi.json", get(rest::openapi_handler))
        .route("/auth/signup", post(auth::signup_handler))
        .route("/auth/login", post(auth::login_handler))
        .route("/movies", get(movies::browse_movies_handler))
        .route("/movies/{movie_id}", get(movies::movie_details_handler));

    // Booking routes (bearer token required)
    let booking_routes = Router::new()
        .route(
            "/user/bookings",
            post(bookings::create_booking_handler).get(bookings::list_bookings_handler),
        )
        .route(
            "/user/bookings/{booking_id}",
            get(bookings::get_booking_handler)
                .put(bookings::update_booking_handler)
                .delete(bookings::delete_booking_handler),
        )
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    // Catalog management routes (admin role required)
    let admin_routes = Router::new()
        .route(
            "/admin/movies",
            post(movies::create_movie_handler).get(movies::list_movies_handler),
        )
        .route(
            "/admin/movies/{movie_id}",
            get(movies::get_movie_handler)
                .put(movies::update_movie_handler)
                .delete(movies::delete_movie_handler),
        )
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_admin,
        ));

    Router::new()
        .merge(public_routes)
        .merge(booking_routes)
        .merge(admin_routes)
        .with_state(state)
}
