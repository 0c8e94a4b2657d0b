//! Records as they are stored and as they are sent back to clients.
mod booking;
mod listing;
mod room;
mod user;

pub use booking::{Booking, BookingDetails};
pub use listing::Listing;
pub use room::Room;
pub use user::{User, DEFAULT_ROLE};
