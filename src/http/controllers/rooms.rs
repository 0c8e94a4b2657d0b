use actix_web::{web, HttpResponse};
use serde_json::json;
use validator::Validate;

use super::upload_image;
use crate::{
    http::{response, util::parse_id, Admin, Error, Result},
    schema::Room,
    types::{
        self,
        form::rooms::{CreateRoom, UpdateRoom},
        id::{marker::RoomMarker, Id},
    },
    App,
};

async fn find(app: &App, id: Id<RoomMarker>) -> Result<Room> {
    app.db
        .find_room(id)
        .await?
        .ok_or_else(|| Error::new(types::Error::NotFound("Room")))
}

#[tracing::instrument(skip_all, name = "http.rooms.create")]
pub async fn create(
    app: web::Data<App>,
    _admin: Admin,
    form: web::Json<CreateRoom>,
) -> Result<HttpResponse> {
    form.validate()?;
    let form = form.into_inner();

    let room = Room {
        id: Id::generate(),
        room_image: upload_image(&app, form.room_image).await?,
        room_name: form.room_name,
        room_facilities: form.room_facilities,
        room_booking_status: form.room_booking_status,
        room_floor: form.room_floor,
        room_block: form.room_block,
        room_number: form.room_number,
        room_category: form.room_category,
    };
    app.db.insert_room(&room).await?;

    Ok(response::created(
        "Room created successfully",
        json!({ "room": room }),
    ))
}

#[tracing::instrument(skip_all, name = "http.rooms.list")]
pub async fn list(app: web::Data<App>) -> Result<HttpResponse> {
    let rooms = app.db.list_rooms().await?;
    Ok(response::ok(
        "Rooms fetched successfully",
        json!({ "rooms": rooms }),
    ))
}

#[tracing::instrument(skip_all, name = "http.rooms.get")]
pub async fn get(app: web::Data<App>, path: web::Path<String>) -> Result<HttpResponse> {
    let room = find(&app, parse_id(&path)?).await?;
    Ok(response::ok("Room found", json!({ "room": room })))
}

#[tracing::instrument(skip_all, name = "http.rooms.update")]
pub async fn update(
    app: web::Data<App>,
    path: web::Path<String>,
    _admin: Admin,
    form: web::Json<UpdateRoom>,
) -> Result<HttpResponse> {
    let mut room = find(&app, parse_id(&path)?).await?;
    let mut form = form.into_inner();

    if let Some(url) = upload_image(&app, form.take_image()).await? {
        room.room_image = Some(url);
    }
    form.apply(&mut room);

    if !app.db.update_room(&room).await? {
        return Err(Error::new(types::Error::NotFound("Room")));
    }

    Ok(response::ok(
        "Room update was successful",
        json!({ "room": room }),
    ))
}

#[tracing::instrument(skip_all, name = "http.rooms.delete")]
pub async fn delete(
    app: web::Data<App>,
    path: web::Path<String>,
    _admin: Admin,
) -> Result<HttpResponse> {
    let id = parse_id::<RoomMarker>(&path)?;
    if !app.db.delete_room(id).await? {
        return Err(Error::new(types::Error::NotFound("Room")));
    }

    Ok(response::ok(
        "Room deleted successfully",
        json!({ "id": id }),
    ))
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test};
    use serde_json::{json, Value};

    use crate::test_utils;

    fn room_body() -> Value {
        json!({
            "roomImage": "https://example.com/deluxe.png",
            "roomName": "Deluxe",
            "roomFacilities": ["Wifi", "AC"],
            "roomBookingStatus": "Available",
            "roomFloor": 2,
            "roomBlock": "B",
            "roomNumber": 204,
            "roomCategory": "Double",
        })
    }

    #[actix_web::test]
    async fn test_non_admin_cannot_create() {
        let ctx = test_utils::context();
        let (_, guest) = ctx.guest("ada@example.com").await;
        let srv = test_utils::init_service!(ctx.app.clone());

        let req = test::TestRequest::post()
            .uri("/rooms")
            .insert_header(("Authorization", guest.as_str()))
            .set_json(room_body())
            .to_request();
        let res = test::call_service(&srv, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["status"], 401);
        assert_eq!(body["message"], "Unauthorized");
        assert_eq!(body["data"]["error"], "Unauthorized");

        let req = test::TestRequest::post()
            .uri("/rooms")
            .set_json(room_body())
            .to_request();
        let res = test::call_service(&srv, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::post()
            .uri("/rooms")
            .insert_header(("Authorization", "Bearer not.a.token"))
            .set_json(room_body())
            .to_request();
        let res = test::call_service(&srv, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ctx.media.uploads(), 0);
    }

    #[actix_web::test]
    async fn test_admin_room_lifecycle() {
        let ctx = test_utils::context();
        let (_, admin) = ctx.admin().await;
        let srv = test_utils::init_service!(ctx.app.clone());

        let req = test::TestRequest::post()
            .uri("/rooms/")
            .insert_header(("Authorization", admin.as_str()))
            .set_json(room_body())
            .to_request();
        let res = test::call_service(&srv, req).await;
        assert_eq!(res.status(), StatusCode::CREATED);

        let body: Value = test::read_body_json(res).await;
        let room = &body["data"]["room"];
        assert_eq!(room["roomImage"], "https://media.test/innkeep/image-1.png");
        assert_eq!(room["roomFacilities"], json!(["Wifi", "AC"]));
        let id = room["id"].as_str().unwrap().to_string();

        let req = test::TestRequest::put()
            .uri(&format!("/rooms/{id}"))
            .insert_header(("Authorization", admin.as_str()))
            .set_json(json!({ "roomBookingStatus": "Booked", "roomName": "" }))
            .to_request();
        let res = test::call_service(&srv, req).await;
        assert_eq!(res.status(), StatusCode::OK);

        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["data"]["room"]["roomBookingStatus"], "Booked");
        assert_eq!(body["data"]["room"]["roomName"], "Deluxe");
        assert_eq!(ctx.media.uploads(), 1);

        let req = test::TestRequest::get().uri(&format!("/rooms/{id}")).to_request();
        let res = test::call_service(&srv, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["message"], "Room found");

        let req = test::TestRequest::delete()
            .uri(&format!("/rooms/{id}"))
            .insert_header(("Authorization", admin.as_str()))
            .to_request();
        let res = test::call_service(&srv, req).await;
        assert_eq!(res.status(), StatusCode::OK);

        let req = test::TestRequest::get().uri(&format!("/rooms/{id}")).to_request();
        let res = test::call_service(&srv, req).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["message"], "Room not found");
    }

    #[actix_web::test]
    async fn test_accepts_inline_images_larger_than_default_limit() {
        let ctx = test_utils::context();
        let (_, admin) = ctx.admin().await;
        let srv = test_utils::init_service!(ctx.app.clone());

        let mut body = room_body();
        body["roomImage"] = json!(format!(
            "data:image/png;base64,{}",
            "A".repeat(512 * 1024)
        ));
        let req = test::TestRequest::post()
            .uri("/rooms")
            .insert_header(("Authorization", admin.as_str()))
            .set_json(body)
            .to_request();
        let res = test::call_service(&srv, req).await;
        assert_eq!(res.status(), StatusCode::CREATED);
        assert_eq!(ctx.media.uploads(), 1);
    }

    #[actix_web::test]
    async fn test_create_validation() {
        let ctx = test_utils::context();
        let (_, admin) = ctx.admin().await;
        let srv = test_utils::init_service!(ctx.app.clone());

        let mut body = room_body();
        body["roomFloor"] = json!(0);
        let req = test::TestRequest::post()
            .uri("/rooms")
            .insert_header(("Authorization", admin.as_str()))
            .set_json(body)
            .to_request();
        let res = test::call_service(&srv, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["data"]["error"], "roomFloor is required");

        let mut body = room_body();
        body["roomImage"] = json!("/etc/passwd");
        let req = test::TestRequest::post()
            .uri("/rooms")
            .insert_header(("Authorization", admin.as_str()))
            .set_json(body)
            .to_request();
        let res = test::call_service(&srv, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ctx.media.uploads(), 0);
    }
}
