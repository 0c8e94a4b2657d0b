use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde_json::json;
use thiserror::Error as ThisError;
use validator::Validate;

use crate::{
    http::{response, util::parse_id, Admin, Error, Identity, Result},
    schema::{Booking, BookingDetails},
    types::{
        self,
        form::bookings::{CreateBooking, UpdateBooking},
        id::{
            marker::{BookingMarker, RoomMarker},
            Id,
        },
    },
    App,
};

/// Both dates are guaranteed by the form validators.
fn stay(
    check_in: Option<DateTime<Utc>>,
    check_out: Option<DateTime<Utc>>,
) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    check_in
        .zip(check_out)
        .ok_or_else(|| Error::new(types::Error::InvalidRequest("checkIn is required".into())))
}

#[derive(Debug, ThisError)]
#[error("Attempt to change another guest's booking")]
struct NotOwner;

/// Bookings can only be changed by the guest who made them or an admin.
fn ensure_owner(identity: &Identity, booking: &Booking) -> Result<()> {
    if identity.0.is_admin || identity.user_id()? == booking.guest_id {
        Ok(())
    } else {
        Err(Error::from_context(
            types::Error::Unauthorized("Not allowed to change this booking"),
            NotOwner,
        ))
    }
}

/// Rooms have to exist at the time they are booked.
async fn existing_room(app: &App, room_id: &str) -> Result<Id<RoomMarker>> {
    let room_id = parse_id::<RoomMarker>(room_id)?;
    match app.db.find_room(room_id).await? {
        Some(..) => Ok(room_id),
        None => Err(Error::new(types::Error::NotFound("Room"))),
    }
}

#[tracing::instrument(skip_all, name = "http.bookings.create")]
pub async fn create(
    app: web::Data<App>,
    identity: Identity,
    form: web::Json<CreateBooking>,
) -> Result<HttpResponse> {
    form.validate()?;
    let form = form.into_inner();

    let (check_in, check_out) = stay(form.check_in, form.check_out)?;
    let now = Utc::now();
    let booking = Booking {
        id: Id::generate(),
        room_id: existing_room(&app, &form.room_id).await?,
        guest_id: identity.user_id()?,
        check_in,
        check_out,
        booking_date: now,
        booking_updated_date: now,
    };
    app.db.insert_booking(&booking).await?;

    Ok(response::created(
        "Bookings created successfully",
        json!({ "booking": booking }),
    ))
}

#[tracing::instrument(skip_all, name = "http.bookings.list")]
pub async fn list(app: web::Data<App>, _identity: Identity) -> Result<HttpResponse> {
    let bookings = app.db.list_bookings().await?;

    let mut populated = Vec::with_capacity(bookings.len());
    for booking in bookings {
        let room = app.db.find_room(booking.room_id).await?;
        let guest = app.db.find_user(booking.guest_id).await?;
        populated.push(BookingDetails {
            booking,
            room,
            guest,
        });
    }

    Ok(response::ok(
        "bookings fetched successfully",
        json!({ "bookings": populated }),
    ))
}

#[tracing::instrument(skip_all, name = "http.bookings.update")]
pub async fn update(
    app: web::Data<App>,
    path: web::Path<String>,
    identity: Identity,
    form: web::Json<UpdateBooking>,
) -> Result<HttpResponse> {
    let id = parse_id::<BookingMarker>(&path)?;
    form.validate()?;
    let form = form.into_inner();

    let mut booking = app
        .db
        .find_booking(id)
        .await?
        .ok_or_else(|| Error::new(types::Error::NotFound("Booking")))?;
    ensure_owner(&identity, &booking)?;

    let (check_in, check_out) = stay(form.check_in, form.check_out)?;
    booking.room_id = existing_room(&app, &form.room_id).await?;
    booking.check_in = check_in;
    booking.check_out = check_out;
    booking.booking_updated_date = Utc::now();

    if !app.db.update_booking(&booking).await? {
        return Err(Error::new(types::Error::NotFound("Booking")));
    }

    Ok(response::ok(
        "Booking update was successful",
        json!({ "booking": booking }),
    ))
}

#[tracing::instrument(skip_all, name = "http.bookings.delete")]
pub async fn delete(
    app: web::Data<App>,
    path: web::Path<String>,
    _admin: Admin,
) -> Result<HttpResponse> {
    let id = parse_id::<BookingMarker>(&path)?;
    if !app.db.delete_booking(id).await? {
        return Err(Error::new(types::Error::NotFound("Booking")));
    }

    Ok(response::ok(
        "Booking deleted successfully",
        json!({ "id": id }),
    ))
}
