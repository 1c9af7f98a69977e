pub mod booking;
pub mod catalog;
pub mod domain;
pub mod ports;

pub use booking::{BookingError, BookingService, CreateBooking, Page, UpdateBooking};
pub use catalog::{TicketType, TimeSlot};
pub use domain::{Booking, BookingView, Identity, Movie, Role, SeatLabel, User, UserCredentials};
pub use ports::{
    BookingStore, MovieCatalog, MovieStore, PortError, PortResult, TicketIssuer, UserDirectory,
};
