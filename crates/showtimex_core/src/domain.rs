//! crates/showtimex_core/src/domain.rs
//!
//! Defines the pure, core data structures for the booking domain.
//! These structs are independent of any database or serialization format.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::catalog::{TicketType, TimeSlot};

//=========================================================================================
// Bookings
//=========================================================================================

/// A confirmed reservation: one row in the bookings table.
///
/// `seat_label` and `ticket_code` are written exactly once, at creation, and
/// never reassigned. Cancellation only flips `active`; the row is retained.
#[derive(Debug, Clone)]
pub struct Booking {
    /// Database-assigned sequence number.
    pub id: i64,
    /// Independent, globally-unique external identifier.
    pub uuid: Uuid,
    pub movie_id: i64,
    /// The owning user. Never changes after creation.
    pub user_id: i64,
    /// Display name copied from the caller at booking time, not re-derived.
    pub customer_name: String,
    pub ticket_count: i32,
    pub slot: TimeSlot,
    pub ticket_type: TicketType,
    /// Total price captured at creation (`unit price x ticket count`).
    pub price: i64,
    pub active: bool,
    pub seat_label: String,
    /// Scannable verification payload as a `data:image/png;base64,...` URI.
    pub ticket_code: String,
    pub created_at: DateTime<Utc>,
}

/// Everything a store needs to persist a fresh booking. The store assigns `id`.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub uuid: Uuid,
    pub movie_id: i64,
    pub user_id: i64,
    pub customer_name: String,
    pub ticket_count: i32,
    pub slot: TimeSlot,
    pub ticket_type: TicketType,
    pub price: i64,
    pub seat_label: String,
    pub ticket_code: String,
    pub created_at: DateTime<Utc>,
}

/// A booking enriched with the denormalized movie title for responses.
#[derive(Debug, Clone)]
pub struct BookingView {
    pub booking: Booking,
    pub movie_name: Option<String>,
}

//=========================================================================================
// Movies
//=========================================================================================

/// A published movie. The booking core only reads these; management belongs
/// to the catalog endpoints.
#[derive(Debug, Clone)]
pub struct Movie {
    pub id: i64,
    pub title: String,
    pub genre: String,
    /// Runtime in minutes.
    pub duration: i32,
    pub rating: Option<f64>,
    pub image_url: Option<String>,
    /// The admin who published the movie.
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewMovie {
    pub title: String,
    pub genre: String,
    pub duration: i32,
    pub rating: Option<f64>,
    pub image_url: Option<String>,
    pub created_by: i64,
}

/// Replacement values for an existing movie. The creator never changes.
#[derive(Debug, Clone)]
pub struct MovieUpdate {
    pub title: String,
    pub genre: String,
    pub duration: i32,
    pub rating: Option<f64>,
    pub image_url: Option<String>,
}

//=========================================================================================
// Users
//=========================================================================================

/// A registered account as exposed to the rest of the system.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// A user together with their password hash. Only used by login/signup flows.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub role: Role,
}

//=========================================================================================
// Roles and the Identity Context
//=========================================================================================

/// The closed set of account roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct ParseRoleError(pub String);

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(ParseRoleError(other.to_string())),
        }
    }
}

/// The error returned when a caller lacks a required role.
#[derive(Debug, thiserror::Error)]
#[error("{0} role required")]
pub struct RoleRequired(pub Role);

/// The authenticated caller for one request, resolved from a bearer
/// credential. Has no lifecycle beyond the request it was resolved for.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: i64,
    pub role: Role,
    pub username: String,
}

impl Identity {
    /// Guards an operation behind a role. Ownership checks are separate and
    /// live with the data they protect.
    pub fn require_role(&self, role: Role) -> Result<(), RoleRequired> {
        if self.role == role {
            Ok(())
        } else {
            Err(RoleRequired(role))
        }
    }
}

//=========================================================================================
// Seats
//=========================================================================================

/// A physical seat: row letter plus seat number, e.g. `C17`.
///
/// Labels are drawn at random when a booking is created and are not
/// guaranteed unique across bookings for the same movie and slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeatLabel {
    pub row: char,
    pub number: u8,
}

impl SeatLabel {
    /// The rows of the fixed seating grid.
    pub const ROWS: [char; 8] = ['A', 'B', 'C', 'D', 'E', 'F', 'G', 'H'];
    /// Seats per row, numbered from 1.
    pub const SEATS_PER_ROW: u8 = 30;
}

impl fmt::Display for SeatLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.row, self.number)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("malformed seat label: {0}")]
pub struct ParseSeatLabelError(pub String);

impl FromStr for SeatLabel {
    type Err = ParseSeatLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let row = chars
            .next()
            .ok_or_else(|| ParseSeatLabelError(s.to_string()))?;
        let number: u8 = chars
            .as_str()
            .parse()
            .map_err(|_| ParseSeatLabelError(s.to_string()))?;
        if !Self::ROWS.contains(&row) || number == 0 || number > Self::SEATS_PER_ROW {
            return Err(ParseSeatLabelError(s.to_string()));
        }
        Ok(SeatLabel { row, number })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_tokens_round_trip() {
        assert_eq!("user".parse::<Role>().unwrap(), Role::User);
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!(Role::Admin.as_str(), "admin");
        assert!("superuser".parse::<Role>().is_err());
        // Tokens are exact; callers lowercase before parsing.
        assert!("Admin".parse::<Role>().is_err());
    }

    #[test]
    fn require_role_checks_exact_role() {
        let admin = Identity {
            user_id: 1,
            role: Role::Admin,
            username: "root".to_string(),
        };
        let user = Identity {
            user_id: 2,
            role: Role::User,
            username: "alice".to_string(),
        };
        assert!(admin.require_role(Role::Admin).is_ok());
        assert!(user.require_role(Role::Admin).is_err());
        assert!(user.require_role(Role::User).is_ok());
    }

    #[test]
    fn seat_labels_parse_within_grid() {
        let seat: SeatLabel = "C17".parse().unwrap();
        assert_eq!(seat.row, 'C');
        assert_eq!(seat.number, 17);
        assert_eq!(seat.to_string(), "C17");

        assert!("A1".parse::<SeatLabel>().is_ok());
        assert!("H30".parse::<SeatLabel>().is_ok());
        // Outside the fixed grid.
        assert!("I5".parse::<SeatLabel>().is_err());
        assert!("A0".parse::<SeatLabel>().is_err());
        assert!("A31".parse::<SeatLabel>().is_err());
        assert!("17C".parse::<SeatLabel>().is_err());
        assert!("".parse::<SeatLabel>().is_err());
    }
}
