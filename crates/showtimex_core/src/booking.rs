//! crates/showtimex_core/src/booking.rs
//!
//! The booking state machine: create, read, list, update and cancel, with
//! ownership and catalog checks. All effects go through the ports, so the
//! service itself carries no I/O.
//!
//! A booking has exactly two states: `Active` (set at creation) and
//! `Cancelled` (terminal, reached through [`BookingService::cancel`]). Nothing
//! expires a booking when its showtime passes.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::catalog::{InvalidTimeSlot, TicketType, TimeSlot, UnknownTicketType};
use crate::domain::{Booking, BookingView, Identity, NewBooking};
use crate::ports::{BookingStore, MovieCatalog, PortError, TicketCodeError, TicketIssuer};

/// Title substituted when a booking references a movie that has since been
/// deleted from the catalog.
pub const UNKNOWN_MOVIE_TITLE: &str = "Unknown";

//=========================================================================================
// Requests and Errors
//=========================================================================================

/// Input for [`BookingService::create`]. Slot and ticket type arrive as raw
/// tokens and are validated against the catalog here, not at the HTTP edge.
#[derive(Debug, Clone)]
pub struct CreateBooking {
    pub movie_id: i64,
    pub ticket_count: i32,
    pub slot: String,
    pub ticket_type: String,
}

/// Input for [`BookingService::update`]. Only these two fields of a booking
/// can ever be rewritten.
#[derive(Debug, Clone)]
pub struct UpdateBooking {
    pub movie_id: i64,
    pub ticket_count: i32,
}

/// Pagination window for [`BookingService::list`].
#[derive(Debug, Clone, Copy)]
pub struct Page {
    pub offset: i64,
    pub limit: i64,
}

impl Default for Page {
    fn default() -> Self {
        Page {
            offset: 0,
            limit: 10,
        }
    }
}

/// Everything that can go wrong inside the booking core. Each variant maps
/// 1:1 to an HTTP status at the web boundary; none are retried.
#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("Movie {0} not found")]
    MovieNotFound(i64),
    #[error("Booking {0} not found")]
    BookingNotFound(i64),
    #[error("Bookings can only be accessed by their owner")]
    NotOwner,
    #[error("Ticket count must be positive, got {0}")]
    InvalidTicketCount(i32),
    #[error(transparent)]
    InvalidSlot(#[from] InvalidTimeSlot),
    #[error(transparent)]
    InvalidTicketType(#[from] UnknownTicketType),
    #[error(transparent)]
    Encoding(#[from] TicketCodeError),
    #[error(transparent)]
    Store(#[from] PortError),
}

//=========================================================================================
// The Booking Service
//=========================================================================================

/// The booking core. Holds its collaborators behind ports and is cheap to
/// clone via the shared `Arc`s.
#[derive(Clone)]
pub struct BookingService {
    movies: Arc<dyn MovieCatalog>,
    bookings: Arc<dyn BookingStore>,
    issuer: Arc<dyn TicketIssuer>,
}

impl BookingService {
    pub fn new(
        movies: Arc<dyn MovieCatalog>,
        bookings: Arc<dyn BookingStore>,
        issuer: Arc<dyn TicketIssuer>,
    ) -> Self {
        Self {
            movies,
            bookings,
            issuer,
        }
    }

    /// Creates an `Active` booking owned by the caller.
    ///
    /// Validates the movie against the catalog, the slot and ticket type
    /// against the fixed sets, and the ticket count; prices the booking at
    /// `unit price x count`; draws a seat and encodes the ticket code. One
    /// row is inserted; nothing else is touched.
    pub async fn create(
        &self,
        caller: &Identity,
        request: CreateBooking,
    ) -> Result<BookingView, BookingError> {
        let movie = self
            .movies
            .movie_by_id(request.movie_id)
            .await?
            .ok_or(BookingError::MovieNotFound(request.movie_id))?;
        let slot: TimeSlot = request.slot.parse()?;
        let ticket_type: TicketType = request.ticket_type.parse()?;
        if request.ticket_count <= 0 {
            return Err(BookingError::InvalidTicketCount(request.ticket_count));
        }

        let price = ticket_type.unit_price() * i64::from(request.ticket_count);
        let seat = self.issuer.assign_seat();
        let payload = ticket_payload(&movie.title, slot, &seat.to_string(), &caller.username);
        let ticket_code = self.issuer.encode_ticket(&payload)?;

        let booking = self
            .bookings
            .insert(NewBooking {
                uuid: Uuid::new_v4(),
                movie_id: movie.id,
                user_id: caller.user_id,
                customer_name: caller.username.clone(),
                ticket_count: request.ticket_count,
                slot,
                ticket_type,
                price,
                seat_label: seat.to_string(),
                ticket_code,
                created_at: Utc::now(),
            })
            .await?;

        Ok(BookingView {
            booking,
            movie_name: Some(movie.title),
        })
    }

    /// Returns one booking. Missing id is a 404-class error and a foreign
    /// owner a 403-class error, in that order.
    pub async fn get(
        &self,
        caller: &Identity,
        booking_id: i64,
    ) -> Result<BookingView, BookingError> {
        let booking = self.fetch_owned(caller, booking_id).await?;
        self.with_movie_name(booking).await
    }

    /// The caller's bookings, in storage order. Cancelled bookings are
    /// included; the `active` flag tells them apart.
    pub async fn list(
        &self,
        caller: &Identity,
        page: Page,
    ) -> Result<Vec<BookingView>, BookingError> {
        let bookings = self
            .bookings
            .list_for_user(caller.user_id, page.offset, page.limit)
            .await?;
        let mut records = Vec::with_capacity(bookings.len());
        for booking in bookings {
            records.push(self.with_movie_name(booking).await?);
        }
        Ok(records)
    }

    /// Rewrites the movie reference and ticket count of an owned booking.
    ///
    /// Price, seat label and ticket code are intentionally left as they were
    /// captured at creation, and the new movie reference is not checked
    /// against the catalog; reads resolve a dangling reference to
    /// [`UNKNOWN_MOVIE_TITLE`].
    pub async fn update(
        &self,
        caller: &Identity,
        booking_id: i64,
        request: UpdateBooking,
    ) -> Result<BookingView, BookingError> {
        if request.ticket_count <= 0 {
            return Err(BookingError::InvalidTicketCount(request.ticket_count));
        }
        self.fetch_owned(caller, booking_id).await?;
        let booking = self
            .bookings
            .update_details(booking_id, request.movie_id, request.ticket_count)
            .await?;
        self.with_movie_name(booking).await
    }

    /// Flags an owned booking as cancelled. The row is kept, and cancelling
    /// an already-cancelled booking succeeds and re-sets the same flag.
    pub async fn cancel(&self, caller: &Identity, booking_id: i64) -> Result<(), BookingError> {
        self.fetch_owned(caller, booking_id).await?;
        self.bookings.mark_cancelled(booking_id).await?;
        Ok(())
    }

    /// Shared lookup + ownership gate for the single-booking operations.
    async fn fetch_owned(
        &self,
        caller: &Identity,
        booking_id: i64,
    ) -> Result<Booking, BookingError> {
        let booking = self
            .bookings
            .find_by_id(booking_id)
            .await?
            .ok_or(BookingError::BookingNotFound(booking_id))?;
        if booking.user_id != caller.user_id {
            return Err(BookingError::NotOwner);
        }
        Ok(booking)
    }

    /// Attaches the movie title, tolerating a movie deleted after booking.
    async fn with_movie_name(&self, booking: Booking) -> Result<BookingView, BookingError> {
        let movie_name = match self.movies.movie_by_id(booking.movie_id).await? {
            Some(movie) => movie.title,
            None => UNKNOWN_MOVIE_TITLE.to_string(),
        };
        Ok(BookingView {
            booking,
            movie_name: Some(movie_name),
        })
    }
}

/// The text a ticket code is built from. Scanners get the movie, the window,
/// the seat and the name the booking was made under.
fn ticket_payload(movie_title: &str, slot: TimeSlot, seat_label: &str, username: &str) -> String {
    format!("{movie_title} | {slot} | Seat {seat_label} | {username}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_carries_every_verification_field() {
        let payload = ticket_payload("Dune", TimeSlot::Morning, "B7", "alice");
        assert_eq!(payload, "Dune | 09:00-12:00 | Seat B7 | alice");
    }

    #[test]
    fn default_page_matches_query_defaults() {
        let page = Page::default();
        assert_eq!(page.offset, 0);
        assert_eq!(page.limit, 10);
    }
}
