//! crates/showtimex_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the booking core.
//! These traits form the boundary of the hexagonal architecture, allowing the
//! core to be independent of specific external implementations like databases
//! or code renderers.

use async_trait::async_trait;

use crate::domain::{
    Booking, Movie, MovieUpdate, NewBooking, NewMovie, NewUser, SeatLabel, User, UserCredentials,
};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., the
/// database driver). Lookups signal an absent row with `Option`, so a
/// `NotFound` from a port means a row vanished mid-operation.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Storage Ports (Traits)
//=========================================================================================

/// Read access to the movie catalog, the only view the booking core needs.
#[async_trait]
pub trait MovieCatalog: Send + Sync {
    async fn movie_by_id(&self, movie_id: i64) -> PortResult<Option<Movie>>;
}

/// Catalog management, used by the admin endpoints only.
#[async_trait]
pub trait MovieStore: Send + Sync {
    async fn create_movie(&self, new: NewMovie) -> PortResult<Movie>;

    async fn list_movies(&self, offset: i64, limit: i64) -> PortResult<Vec<Movie>>;

    async fn update_movie(&self, movie_id: i64, update: MovieUpdate) -> PortResult<Movie>;

    /// Hard delete. Bookings referencing the movie are left in place and
    /// resolve their title to "Unknown" from then on.
    async fn delete_movie(&self, movie_id: i64) -> PortResult<()>;
}

/// The user directory backing signup, login and duplicate checks.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn create_user(&self, new: NewUser) -> PortResult<User>;

    async fn find_by_email(&self, email: &str) -> PortResult<Option<UserCredentials>>;

    async fn find_by_username(&self, username: &str) -> PortResult<Option<User>>;
}

/// Persistence for bookings.
#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn insert(&self, new: NewBooking) -> PortResult<Booking>;

    async fn find_by_id(&self, booking_id: i64) -> PortResult<Option<Booking>>;

    /// Bookings owned by `user_id` in storage order, paginated.
    async fn list_for_user(
        &self,
        user_id: i64,
        offset: i64,
        limit: i64,
    ) -> PortResult<Vec<Booking>>;

    /// Overwrites the movie reference and ticket count; every other column,
    /// including price, seat label and ticket code, stays untouched.
    async fn update_details(
        &self,
        booking_id: i64,
        movie_id: i64,
        ticket_count: i32,
    ) -> PortResult<Booking>;

    /// Sets `active = false`. Re-running it on a cancelled booking re-sets
    /// the same value and succeeds.
    async fn mark_cancelled(&self, booking_id: i64) -> PortResult<()>;
}

//=========================================================================================
// Ticket Artifact Port
//=========================================================================================

#[derive(Debug, thiserror::Error)]
#[error("ticket code encoding failed: {0}")]
pub struct TicketCodeError(pub String);

/// Produces the physical-ticket artifacts for a confirmed booking: a seat
/// label and a scannable code. Pure computation, so the trait stays sync.
pub trait TicketIssuer: Send + Sync {
    /// Draws a seat uniformly from the fixed grid. There is deliberately no
    /// collision checking against seats already handed out for the same
    /// movie and slot; concurrent bookings may receive the same label.
    fn assign_seat(&self) -> SeatLabel;

    /// Encodes an arbitrary text payload into a self-contained
    /// `data:image/png;base64,...` URI. Fails when the payload exceeds what
    /// the symbology can hold.
    fn encode_ticket(&self, payload: &str) -> Result<String, TicketCodeError>;
}
