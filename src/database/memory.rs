use async_trait::async_trait;
use error_stack::Report;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::{BookingStore, Error, ListingStore, Result, RoomStore, UserStore};
use crate::schema::{Booking, Listing, Room, User};
use crate::types::id::{
    marker::{BookingMarker, ListingMarker, RoomMarker, UserMarker},
    Id,
};

/// Keeps every record in process memory. Lists come back in the same
/// order as [`PgStore`](super::PgStore) returns them.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Id<UserMarker>, User>>,
    rooms: RwLock<HashMap<Id<RoomMarker>, Room>>,
    listings: RwLock<HashMap<Id<ListingMarker>, Listing>>,
    bookings: RwLock<HashMap<Id<BookingMarker>, Booking>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_user(&self, id: Id<UserMarker>) -> Result<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|v| v.email == email).cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let mut users = self.users.read().await.values().cloned().collect::<Vec<_>>();
        users.sort_by_key(|v| v.created_at);
        Ok(users)
    }

    async fn insert_user(&self, user: &User) -> Result<()> {
        // the write lock makes the check and the insert one step
        let mut users = self.users.write().await;
        if users.values().any(|v| v.email == user.email) || users.contains_key(&user.id) {
            return Err(Report::new(Error::UniqueViolation)
                .attach_printable(format!("email {:?} is already taken", user.email)));
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn update_user(&self, user: &User) -> Result<bool> {
        let mut users = self.users.write().await;
        if users
            .values()
            .any(|v| v.email == user.email && v.id != user.id)
        {
            return Err(Report::new(Error::UniqueViolation));
        }
        Ok(replace(&mut *users, user.id, user))
    }

    async fn delete_user(&self, id: Id<UserMarker>) -> Result<bool> {
        Ok(self.users.write().await.remove(&id).is_some())
    }
}

#[async_trait]
impl RoomStore for MemoryStore {
    async fn find_room(&self, id: Id<RoomMarker>) -> Result<Option<Room>> {
        Ok(self.rooms.read().await.get(&id).cloned())
    }

    async fn list_rooms(&self) -> Result<Vec<Room>> {
        let mut rooms = self.rooms.read().await.values().cloned().collect::<Vec<_>>();
        rooms.sort_by(|a, b| {
            (&a.room_block, a.room_number).cmp(&(&b.room_block, b.room_number))
        });
        Ok(rooms)
    }

    async fn insert_room(&self, room: &Room) -> Result<()> {
        self.rooms.write().await.insert(room.id, room.clone());
        Ok(())
    }

    async fn update_room(&self, room: &Room) -> Result<bool> {
        Ok(replace(&mut *self.rooms.write().await, room.id, room))
    }

    async fn delete_room(&self, id: Id<RoomMarker>) -> Result<bool> {
        Ok(self.rooms.write().await.remove(&id).is_some())
    }
}

#[async_trait]
impl ListingStore for MemoryStore {
    async fn find_listing(&self, id: Id<ListingMarker>) -> Result<Option<Listing>> {
        Ok(self.listings.read().await.get(&id).cloned())
    }

    async fn list_listings(&self) -> Result<Vec<Listing>> {
        let mut listings = self.listings.read().await.values().cloned().collect::<Vec<_>>();
        listings.sort_by(|a, b| a.room_name.cmp(&b.room_name));
        Ok(listings)
    }

    async fn insert_listing(&self, listing: &Listing) -> Result<()> {
        self.listings.write().await.insert(listing.id, listing.clone());
        Ok(())
    }

    async fn update_listing(&self, listing: &Listing) -> Result<bool> {
        Ok(replace(&mut *self.listings.write().await, listing.id, listing))
    }

    async fn delete_listing(&self, id: Id<ListingMarker>) -> Result<bool> {
        Ok(self.listings.write().await.remove(&id).is_some())
    }
}

#[async_trait]
impl BookingStore for MemoryStore {
    async fn find_booking(&self, id: Id<BookingMarker>) -> Result<Option<Booking>> {
        Ok(self.bookings.read().await.get(&id).cloned())
    }

    async fn list_bookings(&self) -> Result<Vec<Booking>> {
        let mut bookings = self.bookings.read().await.values().cloned().collect::<Vec<_>>();
        bookings.sort_by_key(|v| v.booking_date);
        Ok(bookings)
    }

    async fn insert_booking(&self, booking: &Booking) -> Result<()> {
        self.bookings.write().await.insert(booking.id, booking.clone());
        Ok(())
    }

    async fn update_booking(&self, booking: &Booking) -> Result<bool> {
        let mut bookings = self.bookings.write().await;
        let Some(entry) = bookings.get_mut(&booking.id) else {
            return Ok(false);
        };
        // `booking_date` is never rewritten, same as the SQL update
        let booking_date = entry.booking_date;
        *entry = booking.clone();
        entry.booking_date = booking_date;
        Ok(true)
    }

    async fn delete_booking(&self, id: Id<BookingMarker>) -> Result<bool> {
        Ok(self.bookings.write().await.remove(&id).is_some())
    }
}

fn replace<K, V>(map: &mut HashMap<K, V>, key: K, value: &V) -> bool
where
    K: std::hash::Hash + Eq,
    V: Clone,
{
    match map.get_mut(&key) {
        Some(entry) => {
            *entry = value.clone();
            true
        }
        None => false,
    }
}
