pub mod db;
pub mod ticket;

pub use db::DbAdapter;
pub use ticket::QrTicketIssuer;
