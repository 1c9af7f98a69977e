//! services/api/src/web/bookings.rs
//!
//! Axum handlers for the booking endpoints. Every route here sits behind the
//! `require_auth` middleware, so handlers can take the resolved `Identity`
//! from request extensions.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use showtimex_core::booking::{BookingError, CreateBooking, Page, UpdateBooking};
use showtimex_core::domain::{BookingView, Identity};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::web::error::HttpError;
use crate::web::state::AppState;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct CreateBookingRequest {
    pub movie_id: i64,
    pub ticket_count: i32,
    /// One of the five fixed exhibition windows, e.g. "09:00-12:00".
    pub slot: String,
    /// "Regular", "Premium", "IMAX" or "4DX".
    pub ticket_type: String,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateBookingRequest {
    pub movie_id: i64,
    pub ticket_count: i32,
}

#[derive(Deserialize, IntoParams)]
pub struct PageQuery {
    /// Rows to skip from the start of the caller's bookings.
    pub offset: Option<i64>,
    /// Maximum rows to return.
    pub limit: Option<i64>,
}

impl PageQuery {
    /// The requested page, with negatives clamped to zero before they reach
    /// SQL `OFFSET`/`LIMIT`.
    fn page(&self) -> Page {
        let defaults = Page::default();
        Page {
            offset: self.offset.unwrap_or(defaults.offset).max(0),
            limit: self.limit.unwrap_or(defaults.limit).max(0),
        }
    }
}

/// A booking as returned to the caller, with the movie title resolved.
#[derive(Serialize, ToSchema)]
pub struct BookingResponse {
    pub id: i64,
    pub uuid: Uuid,
    pub movie_id: i64,
    pub user_id: i64,
    pub customer_name: String,
    pub ticket_count: i32,
    pub slot: String,
    pub ticket_type: String,
    pub price: i64,
    pub active: bool,
    pub seat_label: String,
    /// QR image as a `data:image/png;base64,...` URI.
    pub ticket_code: String,
    /// `"Unknown"` when the referenced movie has since been deleted.
    pub movie_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<BookingView> for BookingResponse {
    fn from(view: BookingView) -> Self {
        let b = view.booking;
        Self {
            id: b.id,
            uuid: b.uuid,
            movie_id: b.movie_id,
            user_id: b.user_id,
            customer_name: b.customer_name,
            ticket_count: b.ticket_count,
            slot: b.slot.to_string(),
            ticket_type: b.ticket_type.to_string(),
            price: b.price,
            active: b.active,
            seat_label: b.seat_label,
            ticket_code: b.ticket_code,
            movie_name: view.movie_name,
            created_at: b.created_at,
        }
    }
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /user/bookings - Book seats for a movie
#[utoipa::path(
    post,
    path = "/user/bookings",
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Booking created", body = BookingResponse),
        (status = 400, description = "Invalid slot, ticket type or count"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Movie not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn create_booking_handler(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let view = state
        .bookings
        .create(
            &identity,
            CreateBooking {
                movie_id: req.movie_id,
                ticket_count: req.ticket_count,
                slot: req.slot,
                ticket_type: req.ticket_type,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(BookingResponse::from(view))))
}

/// GET /user/bookings - List the caller's bookings
#[utoipa::path(
    get,
    path = "/user/bookings",
    params(PageQuery),
    responses(
        (status = 200, description = "The caller's bookings", body = [BookingResponse]),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_bookings_handler(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, HttpError> {
    let views = state.bookings.list(&identity, query.page()).await?;
    let bookings: Vec<BookingResponse> = views.into_iter().map(BookingResponse::from).collect();
    Ok(Json(bookings))
}

/// GET /user/bookings/{booking_id} - Fetch one of the caller's bookings
#[utoipa::path(
    get,
    path = "/user/bookings/{booking_id}",
    params(("booking_id" = i64, Path, description = "The booking's row id")),
    responses(
        (status = 200, description = "The booking", body = BookingResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Owned by another user"),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn get_booking_handler(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(booking_id): Path<i64>,
) -> Result<impl IntoResponse, HttpError> {
    let view = state.bookings.get(&identity, booking_id).await?;
    Ok(Json(BookingResponse::from(view)))
}

/// PUT /user/bookings/{booking_id} - Move a booking to another movie or count
#[utoipa::path(
    put,
    path = "/user/bookings/{booking_id}",
    params(("booking_id" = i64, Path, description = "The booking's row id")),
    request_body = UpdateBookingRequest,
    responses(
        (status = 200, description = "The updated booking", body = BookingResponse),
        (status = 400, description = "Invalid ticket count"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Owned by another user"),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn update_booking_handler(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(booking_id): Path<i64>,
    Json(req): Json<UpdateBookingRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let view = state
        .bookings
        .update(
            &identity,
            booking_id,
            UpdateBooking {
                movie_id: req.movie_id,
                ticket_count: req.ticket_count,
            },
        )
        .await
        .map_err(|e| match e {
            BookingError::NotOwner => {
                HttpError::Forbidden("Can only update your own bookings".to_string())
            }
            other => other.into(),
        })?;
    Ok(Json(BookingResponse::from(view)))
}

/// DELETE /user/bookings/{booking_id} - Cancel a booking
#[utoipa::path(
    delete,
    path = "/user/bookings/{booking_id}",
    params(("booking_id" = i64, Path, description = "The booking's row id")),
    responses(
        (status = 204, description = "Booking cancelled"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Owned by another user"),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn delete_booking_handler(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(booking_id): Path<i64>,
) -> Result<impl IntoResponse, HttpError> {
    state
        .bookings
        .cancel(&identity, booking_id)
        .await
        .map_err(|e| match e {
            BookingError::NotOwner => {
                HttpError::Forbidden("Can only delete your own bookings".to_string())
            }
            other => other.into(),
        })?;
    Ok(StatusCode::NO_CONTENT)
}
