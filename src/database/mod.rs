//! Record storage.
//!
//! Handlers only see the [`Database`] trait object. [`PgStore`] is the
//! production implementation and [`MemoryStore`] keeps everything in
//! process memory for tests and local experiments.
use async_trait::async_trait;

use crate::schema::{Booking, Listing, Room, User};
use crate::types::id::{
    marker::{BookingMarker, ListingMarker, RoomMarker, UserMarker},
    Id,
};

mod error;
mod memory;
mod postgres;

pub use error::*;
pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Account storage. `insert_user` must fail with
/// [`Error::UniqueViolation`] when the email is already taken.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user(&self, id: Id<UserMarker>) -> Result<Option<User>>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn list_users(&self) -> Result<Vec<User>>;
    async fn insert_user(&self, user: &User) -> Result<()>;
    /// Returns `false` if there is no account with that id.
    async fn update_user(&self, user: &User) -> Result<bool>;
    async fn delete_user(&self, id: Id<UserMarker>) -> Result<bool>;
}

#[async_trait]
pub trait RoomStore: Send + Sync {
    async fn find_room(&self, id: Id<RoomMarker>) -> Result<Option<Room>>;
    async fn list_rooms(&self) -> Result<Vec<Room>>;
    async fn insert_room(&self, room: &Room) -> Result<()>;
    async fn update_room(&self, room: &Room) -> Result<bool>;
    async fn delete_room(&self, id: Id<RoomMarker>) -> Result<bool>;
}

#[async_trait]
pub trait ListingStore: Send + Sync {
    async fn find_listing(&self, id: Id<ListingMarker>) -> Result<Option<Listing>>;
    async fn list_listings(&self) -> Result<Vec<Listing>>;
    async fn insert_listing(&self, listing: &Listing) -> Result<()>;
    async fn update_listing(&self, listing: &Listing) -> Result<bool>;
    async fn delete_listing(&self, id: Id<ListingMarker>) -> Result<bool>;
}

#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn find_booking(&self, id: Id<BookingMarker>) -> Result<Option<Booking>>;
    async fn list_bookings(&self) -> Result<Vec<Booking>>;
    async fn insert_booking(&self, booking: &Booking) -> Result<()>;
    async fn update_booking(&self, booking: &Booking) -> Result<bool>;
    async fn delete_booking(&self, id: Id<BookingMarker>) -> Result<bool>;
}

/// Everything the HTTP layer needs from storage.
pub trait Database:
    UserStore + RoomStore + ListingStore + BookingStore + std::fmt::Debug
{
}

impl<T> Database for T where
    T: UserStore + RoomStore + ListingStore + BookingStore + std::fmt::Debug
{
}
