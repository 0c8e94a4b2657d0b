use async_trait::async_trait;
use error_stack::ResultExt;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use std::str::FromStr;

use super::{
    BookingStore, Error, ErrorExt, ErrorExt2, ListingStore, Result, RoomStore, UserStore,
};
use crate::config;
use crate::schema::{Booking, Listing, Room, User};
use crate::types::id::{
    marker::{BookingMarker, ListingMarker, RoomMarker, UserMarker},
    Id,
};

pub type PoolConnection = sqlx::pool::PoolConnection<sqlx::Postgres>;

/// Postgres backed store.
#[derive(Clone)]
pub struct PgStore {
    pool: sqlx::PgPool,
}

impl PgStore {
    /// Creates the connection pool and waits until the database
    /// accepts a connection. An unreachable database is not fatal
    /// here, connections are retried lazily on every request.
    pub async fn connect(cfg: &config::Database) -> Result<Self> {
        let mut pool_opts = PgPoolOptions::new()
            .acquire_timeout(cfg.timeout())
            .max_connections(cfg.pool_size.get());

        if let Some(min_idle) = cfg.min_idle {
            pool_opts = pool_opts.min_connections(min_idle.get());
        }

        let mut connect_opts =
            PgConnectOptions::from_str(cfg.url.as_str()).change_context(Error::InvalidUrl)?;

        if cfg.enforce_tls {
            connect_opts = connect_opts.ssl_mode(PgSslMode::Require);
        }

        let store = Self {
            pool: pool_opts.connect_lazy_with(connect_opts),
        };

        match store.wait_until_healthy().await {
            Ok(..) => {}
            Err(err) if err.is_unhealthy() => {
                tracing::warn!("database is not reachable yet, continuing anyway");
            }
            Err(err) => return Err(err),
        }

        Ok(store)
    }

    #[tracing::instrument(skip_all, name = "db.migrate")]
    pub async fn migrate(&self) -> Result<()> {
        let now = std::time::Instant::now();
        tracing::info!("Performing database migrations...");

        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .change_context(Error::Migration)?;

        let elapsed = now.elapsed();
        tracing::info!("Successfully performed database migrations! took {elapsed:.2?}");
        Ok(())
    }

    /// Hands out an idle connection, or opens a new one when the pool
    /// has none left (the reaper may have closed all of them).
    #[tracing::instrument(name = "db.connect", skip(self))]
    pub async fn get(&self) -> Result<PoolConnection> {
        match self.pool.try_acquire() {
            Some(conn) => Ok(conn),
            None => self.pool.acquire().await.into_db_error(),
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn wait_until_healthy(&self) -> Result<()> {
        self.pool.acquire().await.map(drop).into_db_error()
    }
}

impl std::fmt::Debug for PgStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.pool.fmt(f)
    }
}

#[async_trait]
impl UserStore for PgStore {
    #[tracing::instrument(skip_all, name = "query.users.find")]
    async fn find_user(&self, id: Id<UserMarker>) -> Result<Option<User>> {
        let mut conn = self.get().await?;
        sqlx::query_as::<_, User>(r#"SELECT * FROM "users" WHERE id = $1"#)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .into_db_error()
    }

    #[tracing::instrument(skip_all, name = "query.users.find_by_email")]
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let mut conn = self.get().await?;
        sqlx::query_as::<_, User>(r#"SELECT * FROM "users" WHERE email = $1"#)
            .bind(email)
            .fetch_optional(&mut *conn)
            .await
            .into_db_error()
    }

    #[tracing::instrument(skip_all, name = "query.users.list")]
    async fn list_users(&self) -> Result<Vec<User>> {
        let mut conn = self.get().await?;
        sqlx::query_as::<_, User>(r#"SELECT * FROM "users" ORDER BY created_at"#)
            .fetch_all(&mut *conn)
            .await
            .into_db_error()
    }

    #[tracing::instrument(skip_all, name = "query.users.insert")]
    async fn insert_user(&self, user: &User) -> Result<()> {
        let mut conn = self.get().await?;
        sqlx::query(
            r#"INSERT INTO "users" (
                id, email, password_hash, role, first_name, last_name,
                phone_number, location, date_of_birth, is_verified,
                is_admin, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)"#,
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.role)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.phone_number)
        .bind(&user.location)
        .bind(&user.date_of_birth)
        .bind(user.is_verified)
        .bind(user.is_admin)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&mut *conn)
        .await
        .into_db_error()?;

        Ok(())
    }

    #[tracing::instrument(skip_all, name = "query.users.update")]
    async fn update_user(&self, user: &User) -> Result<bool> {
        let mut conn = self.get().await?;
        let result = sqlx::query(
            r#"UPDATE "users" SET
                email = $2, password_hash = $3, role = $4, first_name = $5,
                last_name = $6, phone_number = $7, location = $8,
                date_of_birth = $9, is_verified = $10, is_admin = $11,
                updated_at = $12
            WHERE id = $1"#,
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.role)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.phone_number)
        .bind(&user.location)
        .bind(&user.date_of_birth)
        .bind(user.is_verified)
        .bind(user.is_admin)
        .bind(user.updated_at)
        .execute(&mut *conn)
        .await
        .into_db_error()?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip_all, name = "query.users.delete")]
    async fn delete_user(&self, id: Id<UserMarker>) -> Result<bool> {
        let mut conn = self.get().await?;
        let result = sqlx::query(r#"DELETE FROM "users" WHERE id = $1"#)
            .bind(id)
            .execute(&mut *conn)
            .await
            .into_db_error()?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl RoomStore for PgStore {
    #[tracing::instrument(skip_all, name = "query.rooms.find")]
    async fn find_room(&self, id: Id<RoomMarker>) -> Result<Option<Room>> {
        let mut conn = self.get().await?;
        sqlx::query_as::<_, Room>(r#"SELECT * FROM "rooms" WHERE id = $1"#)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .into_db_error()
    }

    #[tracing::instrument(skip_all, name = "query.rooms.list")]
    async fn list_rooms(&self) -> Result<Vec<Room>> {
        let mut conn = self.get().await?;
        sqlx::query_as::<_, Room>(r#"SELECT * FROM "rooms" ORDER BY room_block, room_number"#)
            .fetch_all(&mut *conn)
            .await
            .into_db_error()
    }

    #[tracing::instrument(skip_all, name = "query.rooms.insert")]
    async fn insert_room(&self, room: &Room) -> Result<()> {
        let mut conn = self.get().await?;
        sqlx::query(
            r#"INSERT INTO "rooms" (
                id, room_image, room_name, room_facilities, room_booking_status,
                room_floor, room_block, room_number, room_category
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)"#,
        )
        .bind(room.id)
        .bind(&room.room_image)
        .bind(&room.room_name)
        .bind(&room.room_facilities)
        .bind(&room.room_booking_status)
        .bind(room.room_floor)
        .bind(&room.room_block)
        .bind(room.room_number)
        .bind(&room.room_category)
        .execute(&mut *conn)
        .await
        .into_db_error()?;

        Ok(())
    }

    #[tracing::instrument(skip_all, name = "query.rooms.update")]
    async fn update_room(&self, room: &Room) -> Result<bool> {
        let mut conn = self.get().await?;
        let result = sqlx::query(
            r#"UPDATE "rooms" SET
                room_image = $2, room_name = $3, room_facilities = $4,
                room_booking_status = $5, room_floor = $6, room_block = $7,
                room_number = $8, room_category = $9
            WHERE id = $1"#,
        )
        .bind(room.id)
        .bind(&room.room_image)
        .bind(&room.room_name)
        .bind(&room.room_facilities)
        .bind(&room.room_booking_status)
        .bind(room.room_floor)
        .bind(&room.room_block)
        .bind(room.room_number)
        .bind(&room.room_category)
        .execute(&mut *conn)
        .await
        .into_db_error()?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip_all, name = "query.rooms.delete")]
    async fn delete_room(&self, id: Id<RoomMarker>) -> Result<bool> {
        let mut conn = self.get().await?;
        let result = sqlx::query(r#"DELETE FROM "rooms" WHERE id = $1"#)
            .bind(id)
            .execute(&mut *conn)
            .await
            .into_db_error()?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl ListingStore for PgStore {
    #[tracing::instrument(skip_all, name = "query.listings.find")]
    async fn find_listing(&self, id: Id<ListingMarker>) -> Result<Option<Listing>> {
        let mut conn = self.get().await?;
        sqlx::query_as::<_, Listing>(r#"SELECT * FROM "listings" WHERE id = $1"#)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .into_db_error()
    }

    #[tracing::instrument(skip_all, name = "query.listings.list")]
    async fn list_listings(&self) -> Result<Vec<Listing>> {
        let mut conn = self.get().await?;
        sqlx::query_as::<_, Listing>(r#"SELECT * FROM "listings" ORDER BY room_name"#)
            .fetch_all(&mut *conn)
            .await
            .into_db_error()
    }

    #[tracing::instrument(skip_all, name = "query.listings.insert")]
    async fn insert_listing(&self, listing: &Listing) -> Result<()> {
        let mut conn = self.get().await?;
        sqlx::query(
            r#"INSERT INTO "listings" (
                id, location, room_name, room_price, room_image, room_bed_type
            ) VALUES ($1, $2, $3, $4, $5, $6)"#,
        )
        .bind(listing.id)
        .bind(&listing.location)
        .bind(&listing.room_name)
        .bind(listing.room_price)
        .bind(&listing.room_image)
        .bind(&listing.room_bed_type)
        .execute(&mut *conn)
        .await
        .into_db_error()?;

        Ok(())
    }

    #[tracing::instrument(skip_all, name = "query.listings.update")]
    async fn update_listing(&self, listing: &Listing) -> Result<bool> {
        let mut conn = self.get().await?;
        let result = sqlx::query(
            r#"UPDATE "listings" SET
                location = $2, room_name = $3, room_price = $4,
                room_image = $5, room_bed_type = $6
            WHERE id = $1"#,
        )
        .bind(listing.id)
        .bind(&listing.location)
        .bind(&listing.room_name)
        .bind(listing.room_price)
        .bind(&listing.room_image)
        .bind(&listing.room_bed_type)
        .execute(&mut *conn)
        .await
        .into_db_error()?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip_all, name = "query.listings.delete")]
    async fn delete_listing(&self, id: Id<ListingMarker>) -> Result<bool> {
        let mut conn = self.get().await?;
        let result = sqlx::query(r#"DELETE FROM "listings" WHERE id = $1"#)
            .bind(id)
            .execute(&mut *conn)
            .await
            .into_db_error()?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl BookingStore for PgStore {
    #[tracing::instrument(skip_all, name = "query.bookings.find")]
    async fn find_booking(&self, id: Id<BookingMarker>) -> Result<Option<Booking>> {
        let mut conn = self.get().await?;
        sqlx::query_as::<_, Booking>(r#"SELECT * FROM "bookings" WHERE id = $1"#)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .into_db_error()
    }

    #[tracing::instrument(skip_all, name = "query.bookings.list")]
    async fn list_bookings(&self) -> Result<Vec<Booking>> {
        let mut conn = self.get().await?;
        sqlx::query_as::<_, Booking>(r#"SELECT * FROM "bookings" ORDER BY booking_date"#)
            .fetch_all(&mut *conn)
            .await
            .into_db_error()
    }

    #[tracing::instrument(skip_all, name = "query.bookings.insert")]
    async fn insert_booking(&self, booking: &Booking) -> Result<()> {
        let mut conn = self.get().await?;
        sqlx::query(
            r#"INSERT INTO "bookings" (
                id, room_id, guest_id, check_in, check_out,
                booking_date, booking_updated_date
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)"#,
        )
        .bind(booking.id)
        .bind(booking.room_id)
        .bind(booking.guest_id)
        .bind(booking.check_in)
        .bind(booking.check_out)
        .bind(booking.booking_date)
        .bind(booking.booking_updated_date)
        .execute(&mut *conn)
        .await
        .into_db_error()?;

        Ok(())
    }

    #[tracing::instrument(skip_all, name = "query.bookings.update")]
    async fn update_booking(&self, booking: &Booking) -> Result<bool> {
        let mut conn = self.get().await?;
        let result = sqlx::query(
            r#"UPDATE "bookings" SET
                room_id = $2, guest_id = $3, check_in = $4, check_out = $5,
                booking_updated_date = $6
            WHERE id = $1"#,
        )
        .bind(booking.id)
        .bind(booking.room_id)
        .bind(booking.guest_id)
        .bind(booking.check_in)
        .bind(booking.check_out)
        .bind(booking.booking_updated_date)
        .execute(&mut *conn)
        .await
        .into_db_error()?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip_all, name = "query.bookings.delete")]
    async fn delete_booking(&self, id: Id<BookingMarker>) -> Result<bool> {
        let mut conn = self.get().await?;
        let result = sqlx::query(r#"DELETE FROM "bookings" WHERE id = $1"#)
            .bind(id)
            .execute(&mut *conn)
            .await
            .into_db_error()?;

        Ok(result.rows_affected() > 0)
    }
}
