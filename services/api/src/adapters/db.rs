//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the persistence ports from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use showtimex_core::catalog::{TicketType, TimeSlot};
use showtimex_core::domain::{
    Booking, Movie, MovieUpdate, NewBooking, NewMovie, NewUser, User, UserCredentials,
};
use showtimex_core::ports::{
    BookingStore, MovieCatalog, MovieStore, PortError, PortResult, UserDirectory,
};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `MovieCatalog`, `MovieStore`,
/// `UserDirectory` and `BookingStore` ports against one shared pool.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct UserRecord {
    id: i64,
    email: String,
    username: String,
    first_name: String,
    last_name: String,
    hashed_password: String,
    role: String,
    created_at: DateTime<Utc>,
}

impl UserRecord {
    fn to_credentials(self) -> PortResult<UserCredentials> {
        let password_hash = self.hashed_password.clone();
        Ok(UserCredentials {
            user: self.to_domain()?,
            password_hash,
        })
    }

    fn to_domain(self) -> PortResult<User> {
        let role = self.role.parse().map_err(|_| {
            PortError::Unexpected(format!(
                "user {} has unrecognized role '{}'",
                self.id, self.role
            ))
        })?;
        Ok(User {
            id: self.id,
            email: self.email,
            username: self.username,
            first_name: self.first_name,
            last_name: self.last_name,
            role,
            created_at: self.created_at,
        })
    }
}

#[derive(FromRow)]
struct MovieRecord {
    id: i64,
    title: String,
    genre: String,
    duration: i32,
    rating: Option<f64>,
    image_url: Option<String>,
    created_by: i64,
    created_at: DateTime<Utc>,
}

impl MovieRecord {
    fn to_domain(self) -> Movie {
        Movie {
            id: self.id,
            title: self.title,
            genre: self.genre,
            duration: self.duration,
            rating: self.rating,
            image_url: self.image_url,
            created_by: self.created_by,
            created_at: self.created_at,
        }
    }
}

#[derive(FromRow)]
struct BookingRecord {
    id: i64,
    uuid: Uuid,
    movie_id: i64,
    user_id: i64,
    customer_name: String,
    ticket_count: i32,
    slot: String,
    ticket_type: String,
    price: i64,
    active: bool,
    seat_label: String,
    ticket_code: String,
    created_at: DateTime<Utc>,
}

impl BookingRecord {
    fn to_domain(self) -> PortResult<Booking> {
        let slot: TimeSlot = self.slot.parse().map_err(|_| {
            PortError::Unexpected(format!(
                "booking {} has unrecognized slot '{}'",
                self.id, self.slot
            ))
        })?;
        let ticket_type: TicketType = self.ticket_type.parse().map_err(|_| {
            PortError::Unexpected(format!(
                "booking {} has unrecognized ticket type '{}'",
                self.id, self.ticket_type
            ))
        })?;
        Ok(Booking {
            id: self.id,
            uuid: self.uuid,
            movie_id: self.movie_id,
            user_id: self.user_id,
            customer_name: self.customer_name,
            ticket_count: self.ticket_count,
            slot,
            ticket_type,
            price: self.price,
            active: self.active,
            seat_label: self.seat_label,
            ticket_code: self.ticket_code,
            created_at: self.created_at,
        })
    }
}

const MOVIE_COLUMNS: &str = "id, title, genre, duration, rating, image_url, created_by, created_at";
const USER_COLUMNS: &str =
    "id, email, username, first_name, last_name, hashed_password, role, created_at";
const BOOKING_COLUMNS: &str = "id, uuid, movie_id, user_id, customer_name, ticket_count, slot, \
                               ticket_type, price, active, seat_label, ticket_code, created_at";

//=========================================================================================
// `MovieCatalog` Trait Implementation
//=========================================================================================

#[async_trait]
impl MovieCatalog for DbAdapter {
    async fn movie_by_id(&self, movie_id: i64) -> PortResult<Option<Movie>> {
        let record = sqlx::query_as::<_, MovieRecord>(&format!(
            "SELECT {MOVIE_COLUMNS} FROM movies WHERE id = $1"
        ))
        .bind(movie_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(record.map(MovieRecord::to_domain))
    }
}

//=========================================================================================
// `MovieStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl MovieStore for DbAdapter {
    async fn create_movie(&self, new: NewMovie) -> PortResult<Movie> {
        let record = sqlx::query_as::<_, MovieRecord>(&format!(
            "INSERT INTO movies (title, genre, duration, rating, image_url, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {MOVIE_COLUMNS}"
        ))
        .bind(new.title)
        .bind(new.genre)
        .bind(new.duration)
        .bind(new.rating)
        .bind(new.image_url)
        .bind(new.created_by)
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(record.to_domain())
    }

    async fn list_movies(&self, offset: i64, limit: i64) -> PortResult<Vec<Movie>> {
        let records = sqlx::query_as::<_, MovieRecord>(&format!(
            "SELECT {MOVIE_COLUMNS} FROM movies ORDER BY id OFFSET $1 LIMIT $2"
        ))
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(records.into_iter().map(MovieRecord::to_domain).collect())
    }

    async fn update_movie(&self, movie_id: i64, update: MovieUpdate) -> PortResult<Movie> {
        let record = sqlx::query_as::<_, MovieRecord>(&format!(
            "UPDATE movies SET title = $1, genre = $2, duration = $3, rating = $4, \
             image_url = $5 WHERE id = $6 RETURNING {MOVIE_COLUMNS}"
        ))
        .bind(update.title)
        .bind(update.genre)
        .bind(update.duration)
        .bind(update.rating)
        .bind(update.image_url)
        .bind(movie_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .ok_or_else(|| PortError::NotFound(format!("Movie {} not found", movie_id)))?;
        Ok(record.to_domain())
    }

    async fn delete_movie(&self, movie_id: i64) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM movies WHERE id = $1")
            .bind(movie_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("Movie {} not found", movie_id)));
        }
        Ok(())
    }
}

//=========================================================================================
// `UserDirectory` Trait Implementation
//=========================================================================================

#[async_trait]
impl UserDirectory for DbAdapter {
    async fn create_user(&self, new: NewUser) -> PortResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            "INSERT INTO users (email, username, first_name, last_name, hashed_password, role) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {USER_COLUMNS}"
        ))
        .bind(new.email)
        .bind(new.username)
        .bind(new.first_name)
        .bind(new.last_name)
        .bind(new.password_hash)
        .bind(new.role.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;
        record.to_domain()
    }

    async fn find_by_email(&self, email: &str) -> PortResult<Option<UserCredentials>> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?;
        record.map(UserRecord::to_credentials).transpose()
    }

    async fn find_by_username(&self, username: &str) -> PortResult<Option<User>> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?;
        record.map(UserRecord::to_domain).transpose()
    }
}

//=========================================================================================
// `BookingStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl BookingStore for DbAdapter {
    async fn insert(&self, new: NewBooking) -> PortResult<Booking> {
        let record = sqlx::query_as::<_, BookingRecord>(&format!(
            "INSERT INTO bookings (uuid, movie_id, user_id, customer_name, ticket_count, \
             slot, ticket_type, price, active, seat_label, ticket_code, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, TRUE, $9, $10, $11) \
             RETURNING {BOOKING_COLUMNS}"
        ))
        .bind(new.uuid)
        .bind(new.movie_id)
        .bind(new.user_id)
        .bind(new.customer_name)
        .bind(new.ticket_count)
        .bind(new.slot.as_str())
        .bind(new.ticket_type.as_str())
        .bind(new.price)
        .bind(new.seat_label)
        .bind(new.ticket_code)
        .bind(new.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;
        record.to_domain()
    }

    async fn find_by_id(&self, booking_id: i64) -> PortResult<Option<Booking>> {
        let record = sqlx::query_as::<_, BookingRecord>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1"
        ))
        .bind(booking_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?;
        record.map(BookingRecord::to_domain).transpose()
    }

    async fn list_for_user(
        &self,
        user_id: i64,
        offset: i64,
        limit: i64,
    ) -> PortResult<Vec<Booking>> {
        let records = sqlx::query_as::<_, BookingRecord>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE user_id = $1 \
             ORDER BY id OFFSET $2 LIMIT $3"
        ))
        .bind(user_id)
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        records.into_iter().map(BookingRecord::to_domain).collect()
    }

    async fn update_details(
        &self,
        booking_id: i64,
        movie_id: i64,
        ticket_count: i32,
    ) -> PortResult<Booking> {
        let record = sqlx::query_as::<_, BookingRecord>(&format!(
            "UPDATE bookings SET movie_id = $1, ticket_count = $2 WHERE id = $3 \
             RETURNING {BOOKING_COLUMNS}"
        ))
        .bind(movie_id)
        .bind(ticket_count)
        .bind(booking_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .ok_or_else(|| PortError::NotFound(format!("Booking {} not found", booking_id)))?;
        record.to_domain()
    }

    async fn mark_cancelled(&self, booking_id: i64) -> PortResult<()> {
        let result = sqlx::query("UPDATE bookings SET active = FALSE WHERE id = $1")
            .bind(booking_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!(
                "Booking {} not found",
                booking_id
            )));
        }
        Ok(())
    }
}
