//! services/api/src/web/state.rs
//!
//! Defines the application state shared across all handlers.

use crate::config::Config;
use showtimex_core::booking::BookingService;
use showtimex_core::ports::{MovieCatalog, MovieStore, UserDirectory};
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
///
/// The booking workflow goes through the `BookingService`; catalog management
/// and the auth flows talk to their ports directly.
#[derive(Clone)]
pub struct AppState {
    pub bookings: BookingService,
    pub catalog: Arc<dyn MovieCatalog>,
    pub movies: Arc<dyn MovieStore>,
    pub users: Arc<dyn UserDirectory>,
    pub config: Arc<Config>,
}
