//! Shared fixtures for the HTTP tests: in-memory implementations of the
//! persistence ports, an app builder and request helpers.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use api_lib::adapters::QrTicketIssuer;
use api_lib::config::Config;
use api_lib::web::identity::issue_token;
use api_lib::web::state::AppState;
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::Utc;
use http_body_util::BodyExt;
use showtimex_core::booking::BookingService;
use showtimex_core::domain::{
    Booking, Movie, MovieUpdate, NewBooking, NewMovie, NewUser, Role, User, UserCredentials,
};
use showtimex_core::ports::{
    BookingStore, MovieCatalog, MovieStore, PortError, PortResult, UserDirectory,
};
use tower::ServiceExt;

//=========================================================================================
// In-memory ports
//=========================================================================================

/// One in-memory store implementing every persistence port the app needs.
#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<Vec<UserCredentials>>,
    movies: Mutex<Vec<Movie>>,
    bookings: Mutex<Vec<Booking>>,
    next_user_id: AtomicI64,
    next_movie_id: AtomicI64,
    next_booking_id: AtomicI64,
}

impl MemoryStore {
    /// Inserts a movie directly, bypassing the admin endpoints.
    pub fn seed_movie(&self, title: &str) -> Movie {
        let movie = Movie {
            id: self.next_movie_id.fetch_add(1, Ordering::SeqCst) + 1,
            title: title.to_string(),
            genre: "Sci-Fi".to_string(),
            duration: 120,
            rating: Some(7.5),
            image_url: None,
            created_by: 1,
            created_at: Utc::now(),
        };
        self.movies.lock().unwrap().push(movie.clone());
        movie
    }

    /// Removes a movie directly, simulating a hard delete under live bookings.
    pub fn drop_movie(&self, movie_id: i64) {
        self.movies.lock().unwrap().retain(|m| m.id != movie_id);
    }
}

#[async_trait]
impl MovieCatalog for MemoryStore {
    async fn movie_by_id(&self, movie_id: i64) -> PortResult<Option<Movie>> {
        Ok(self
            .movies
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.id == movie_id)
            .cloned())
    }
}

#[async_trait]
impl MovieStore for MemoryStore {
    async fn create_movie(&self, new: NewMovie) -> PortResult<Movie> {
        let movie = Movie {
            id: self.next_movie_id.fetch_add(1, Ordering::SeqCst) + 1,
            title: new.title,
            genre: new.genre,
            duration: new.duration,
            rating: new.rating,
            image_url: new.image_url,
            created_by: new.created_by,
            created_at: Utc::now(),
        };
        self.movies.lock().unwrap().push(movie.clone());
        Ok(movie)
    }

    async fn list_movies(&self, offset: i64, limit: i64) -> PortResult<Vec<Movie>> {
        Ok(self
            .movies
            .lock()
            .unwrap()
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn update_movie(&self, movie_id: i64, update: MovieUpdate) -> PortResult<Movie> {
        let mut movies = self.movies.lock().unwrap();
        let movie = movies
            .iter_mut()
            .find(|m| m.id == movie_id)
            .ok_or_else(|| PortError::NotFound(format!("Movie {} not found", movie_id)))?;
        movie.title = update.title;
        movie.genre = update.genre;
        movie.duration = update.duration;
        movie.rating = update.rating;
        movie.image_url = update.image_url;
        Ok(movie.clone())
    }

    async fn delete_movie(&self, movie_id: i64) -> PortResult<()> {
        let mut movies = self.movies.lock().unwrap();
        let before = movies.len();
        movies.retain(|m| m.id != movie_id);
        if movies.len() == before {
            return Err(PortError::NotFound(format!("Movie {} not found", movie_id)));
        }
        Ok(())
    }
}

#[async_trait]
impl UserDirectory for MemoryStore {
    async fn create_user(&self, new: NewUser) -> PortResult<User> {
        let user = User {
            id: self.next_user_id.fetch_add(1, Ordering::SeqCst) + 1,
            email: new.email,
            username: new.username,
            first_name: new.first_name,
            last_name: new.last_name,
            role: new.role,
            created_at: Utc::now(),
        };
        self.users.lock().unwrap().push(UserCredentials {
            user: user.clone(),
            password_hash: new.password_hash,
        });
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> PortResult<Option<UserCredentials>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.user.email == email)
            .cloned())
    }

    async fn find_by_username(&self, username: &str) -> PortResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.user.username == username)
            .map(|c| c.user.clone()))
    }
}

#[async_trait]
impl BookingStore for MemoryStore {
    async fn insert(&self, new: NewBooking) -> PortResult<Booking> {
        let booking = Booking {
            id: self.next_booking_id.fetch_add(1, Ordering::SeqCst) + 1,
            uuid: new.uuid,
            movie_id: new.movie_id,
            user_id: new.user_id,
            customer_name: new.customer_name,
            ticket_count: new.ticket_count,
            slot: new.slot,
            ticket_type: new.ticket_type,
            price: new.price,
            active: true,
            seat_label: new.seat_label,
            ticket_code: new.ticket_code,
            created_at: new.created_at,
        };
        self.bookings.lock().unwrap().push(booking.clone());
        Ok(booking)
    }

    async fn find_by_id(&self, booking_id: i64) -> PortResult<Option<Booking>> {
        Ok(self
            .bookings
            .lock()
            .unwrap()
            .iter()
            .find(|b| b.id == booking_id)
            .cloned())
    }

    async fn list_for_user(
        &self,
        user_id: i64,
        offset: i64,
        limit: i64,
    ) -> PortResult<Vec<Booking>> {
        Ok(self
            .bookings
            .lock()
            .unwrap()
            .iter()
            .filter(|b| b.user_id == user_id)
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn update_details(
        &self,
        booking_id: i64,
        movie_id: i64,
        ticket_count: i32,
    ) -> PortResult<Booking> {
        let mut bookings = self.bookings.lock().unwrap();
        let booking = bookings
            .iter_mut()
            .find(|b| b.id == booking_id)
            .ok_or_else(|| PortError::NotFound(format!("Booking {} not found", booking_id)))?;
        booking.movie_id = movie_id;
        booking.ticket_count = ticket_count;
        Ok(booking.clone())
    }

    async fn mark_cancelled(&self, booking_id: i64) -> PortResult<()> {
        let mut bookings = self.bookings.lock().unwrap();
        let booking = bookings
            .iter_mut()
            .find(|b| b.id == booking_id)
            .ok_or_else(|| PortError::NotFound(format!("Booking {} not found", booking_id)))?;
        booking.active = false;
        Ok(())
    }
}

//=========================================================================================
// App builder and request helpers
//=========================================================================================

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub config: Arc<Config>,
}

fn test_config() -> Config {
    Config {
        bind_address: "127.0.0.1:0".parse().unwrap(),
        database_url: "postgres://unused-in-tests".to_string(),
        log_level: tracing::Level::INFO,
        jwt_secret: "test-secret".to_string(),
        token_ttl_minutes: 30,
        cors_origins: Vec::new(),
    }
}

/// Builds the full router against fresh in-memory ports.
pub fn build_app() -> TestApp {
    let store = Arc::new(MemoryStore::default());
    let config = Arc::new(test_config());
    let bookings = BookingService::new(
        store.clone(),
        store.clone(),
        Arc::new(QrTicketIssuer::new()),
    );
    let state = Arc::new(AppState {
        bookings,
        catalog: store.clone(),
        movies: store.clone(),
        users: store.clone(),
        config: config.clone(),
    });
    TestApp {
        router: api_lib::web::router(state),
        store,
        config,
    }
}

/// Issues a valid bearer token for an arbitrary caller. The account does not
/// need to exist in the store; handlers trust the resolved claims.
pub fn token_for(app: &TestApp, user_id: i64, username: &str, role: Role) -> String {
    let user = User {
        id: user_id,
        email: format!("{username}@example.com"),
        username: username.to_string(),
        first_name: username.to_string(),
        last_name: "Tester".to_string(),
        role,
        created_at: Utc::now(),
    };
    issue_token(&user, &app.config.jwt_secret, app.config.token_ttl_minutes).unwrap()
}

/// Sends one request through the router and returns the status plus the JSON
/// body (`Null` for empty bodies such as 204s).
pub async fn request(
    app: &TestApp,
    method: Method,
    path: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// Shorthand for the detail string of an error body.
pub fn detail(body: &serde_json::Value) -> &str {
    body["detail"].as_str().unwrap_or_default()
}
