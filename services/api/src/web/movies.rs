//! services/api/src/web/movies.rs
//!
//! Catalog management (admin-only) and the public browsing endpoints.
//! Deleting a movie is a hard delete and does not touch existing bookings;
//! their reads fall back to an "Unknown" title.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use showtimex_core::domain::{Identity, Movie, MovieUpdate, NewMovie};
use showtimex_core::ports::PortError;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use crate::web::error::HttpError;
use crate::web::state::AppState;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct MovieRequest {
    pub title: String,
    pub genre: String,
    /// Runtime in minutes.
    pub duration: i32,
    pub rating: Option<f64>,
    pub image_url: Option<String>,
}

#[derive(Deserialize, IntoParams)]
pub struct MoviePageQuery {
    /// Rows to skip from the start of the catalog.
    pub skip: Option<i64>,
    /// Maximum rows to return.
    pub limit: Option<i64>,
}

impl MoviePageQuery {
    /// The `(skip, limit)` window, with negatives clamped to zero before they
    /// reach SQL.
    fn window(&self, default_limit: i64) -> (i64, i64) {
        (
            self.skip.unwrap_or(0).max(0),
            self.limit.unwrap_or(default_limit).max(0),
        )
    }
}

#[derive(Serialize, ToSchema)]
pub struct MovieResponse {
    pub id: i64,
    pub title: String,
    pub genre: String,
    pub duration: i32,
    pub rating: Option<f64>,
    pub image_url: Option<String>,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
}

impl From<Movie> for MovieResponse {
    fn from(movie: Movie) -> Self {
        Self {
            id: movie.id,
            title: movie.title,
            genre: movie.genre,
            duration: movie.duration,
            rating: movie.rating,
            image_url: movie.image_url,
            created_by: movie.created_by,
            created_at: movie.created_at,
        }
    }
}

/// Fetches a movie or produces the caller-facing 404.
async fn movie_or_404(state: &AppState, movie_id: i64) -> Result<Movie, HttpError> {
    state
        .catalog
        .movie_by_id(movie_id)
        .await
        .map_err(|e| HttpError::internal("Failed to load movie", e))?
        .ok_or_else(|| HttpError::NotFound("Movie not found".to_string()))
}

//=========================================================================================
// Admin Handlers
//=========================================================================================

/// POST /admin/movies - Publish a movie
#[utoipa::path(
    post,
    path = "/admin/movies",
    request_body = MovieRequest,
    responses(
        (status = 201, description = "Movie published", body = MovieResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin privileges required")
    )
)]
pub async fn create_movie_handler(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Json(req): Json<MovieRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let movie = state
        .movies
        .create_movie(NewMovie {
            title: req.title,
            genre: req.genre,
            duration: req.duration,
            rating: req.rating,
            image_url: req.image_url,
            created_by: identity.user_id,
        })
        .await
        .map_err(|e| HttpError::internal("Failed to create movie", e))?;
    Ok((StatusCode::CREATED, Json(MovieResponse::from(movie))))
}

/// GET /admin/movies - List movies for management
#[utoipa::path(
    get,
    path = "/admin/movies",
    params(MoviePageQuery),
    responses(
        (status = 200, description = "Movies", body = [MovieResponse]),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin privileges required")
    )
)]
pub async fn list_movies_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MoviePageQuery>,
) -> Result<impl IntoResponse, HttpError> {
    let (skip, limit) = query.window(10);
    let movies = state
        .movies
        .list_movies(skip, limit)
        .await
        .map_err(|e| HttpError::internal("Failed to list movies", e))?;
    let movies: Vec<MovieResponse> = movies.into_iter().map(MovieResponse::from).collect();
    Ok(Json(movies))
}

/// GET /admin/movies/{movie_id} - Fetch one movie for management
#[utoipa::path(
    get,
    path = "/admin/movies/{movie_id}",
    params(("movie_id" = i64, Path, description = "The movie id")),
    responses(
        (status = 200, description = "The movie", body = MovieResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin privileges required"),
        (status = 404, description = "Movie not found")
    )
)]
pub async fn get_movie_handler(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<i64>,
) -> Result<impl IntoResponse, HttpError> {
    let movie = movie_or_404(&state, movie_id).await?;
    Ok(Json(MovieResponse::from(movie)))
}

/// PUT /admin/movies/{movie_id} - Replace a movie's details
#[utoipa::path(
    put,
    path = "/admin/movies/{movie_id}",
    params(("movie_id" = i64, Path, description = "The movie id")),
    request_body = MovieRequest,
    responses(
        (status = 200, description = "The updated movie", body = MovieResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Published by another admin"),
        (status = 404, description = "Movie not found")
    )
)]
pub async fn update_movie_handler(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(movie_id): Path<i64>,
    Json(req): Json<MovieRequest>,
) -> Result<impl IntoResponse, HttpError> {
    // Admins can only manage movies they published themselves.
    let movie = movie_or_404(&state, movie_id).await?;
    if movie.created_by != identity.user_id {
        return Err(HttpError::Forbidden(
            "Can only update your own movies".to_string(),
        ));
    }

    let updated = state
        .movies
        .update_movie(
            movie_id,
            MovieUpdate {
                title: req.title,
                genre: req.genre,
                duration: req.duration,
                rating: req.rating,
                image_url: req.image_url,
            },
        )
        .await
        .map_err(|e| match e {
            PortError::NotFound(_) => HttpError::NotFound("Movie not found".to_string()),
            other => HttpError::internal("Failed to update movie", other),
        })?;
    Ok(Json(MovieResponse::from(updated)))
}

/// DELETE /admin/movies/{movie_id} - Remove a movie from the catalog
#[utoipa::path(
    delete,
    path = "/admin/movies/{movie_id}",
    params(("movie_id" = i64, Path, description = "The movie id")),
    responses(
        (status = 204, description = "Movie deleted"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Published by another admin"),
        (status = 404, description = "Movie not found")
    )
)]
pub async fn delete_movie_handler(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(movie_id): Path<i64>,
) -> Result<impl IntoResponse, HttpError> {
    let movie = movie_or_404(&state, movie_id).await?;
    if movie.created_by != identity.user_id {
        return Err(HttpError::Forbidden(
            "Can only delete your own movies".to_string(),
        ));
    }

    state
        .movies
        .delete_movie(movie_id)
        .await
        .map_err(|e| match e {
            PortError::NotFound(_) => HttpError::NotFound("Movie not found".to_string()),
            other => HttpError::internal("Failed to delete movie", other),
        })?;
    Ok(StatusCode::NO_CONTENT)
}

//=========================================================================================
// Public Handlers
//=========================================================================================

/// GET /movies - Browse the catalog
#[utoipa::path(
    get,
    path = "/movies",
    params(MoviePageQuery),
    responses((status = 200, description = "Movies", body = [MovieResponse]))
)]
pub async fn browse_movies_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MoviePageQuery>,
) -> Result<impl IntoResponse, HttpError> {
    let (skip, limit) = query.window(100);
    let movies = state
        .movies
        .list_movies(skip, limit)
        .await
        .map_err(|e| HttpError::internal("Failed to list movies", e))?;
    let movies: Vec<MovieResponse> = movies.into_iter().map(MovieResponse::from).collect();
    Ok(Json(movies))
}

/// GET /movies/{movie_id} - Movie details
#[utoipa::path(
    get,
    path = "/movies/{movie_id}",
    params(("movie_id" = i64, Path, description = "The movie id")),
    responses(
        (status = 200, description = "The movie", body = MovieResponse),
        (status = 404, description = "Movie not found")
    )
)]
pub async fn movie_details_handler(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<i64>,
) -> Result<impl IntoResponse, HttpError> {
    let movie = movie_or_404(&state, movie_id).await?;
    Ok(Json(MovieResponse::from(movie)))
}
