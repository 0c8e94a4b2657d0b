use actix_web::{web, HttpResponse};
use serde_json::json;
use validator::Validate;

use super::upload_image;
use crate::{
    http::{response, util::parse_id, Admin, Error, Result},
    schema::Listing,
    types::{
        self,
        form::listings::{CreateListing, UpdateListing},
        id::{marker::ListingMarker, Id},
    },
    App,
};

async fn find(app: &App, id: Id<ListingMarker>) -> Result<Listing> {
    app.db
        .find_listing(id)
        .await?
        .ok_or_else(|| Error::new(types::Error::NotFound("Listing")))
}

#[tracing::instrument(skip_all, name = "http.listings.create")]
pub async fn create(
    app: web::Data<App>,
    _admin: Admin,
    form: web::Json<CreateListing>,
) -> Result<HttpResponse> {
    form.validate()?;
    let form = form.into_inner();

    let listing = Listing {
        id: Id::generate(),
        location: form.location,
        room_name: form.room_name,
        room_price: form.room_price,
        room_image: upload_image(&app, form.room_image).await?,
        room_bed_type: form.room_bed_type,
    };
    app.db.insert_listing(&listing).await?;

    Ok(response::created(
        "Listing created successfully",
        json!({ "listing": listing }),
    ))
}

#[tracing::instrument(skip_all, name = "http.listings.list")]
pub async fn list(app: web::Data<App>) -> Result<HttpResponse> {
    let listings = app.db.list_listings().await?;
    Ok(response::ok(
        "Listings fetched successfully",
        json!({ "listings": listings }),
    ))
}

#[tracing::instrument(skip_all, name = "http.listings.get")]
pub async fn get(app: web::Data<App>, path: web::Path<String>) -> Result<HttpResponse> {
    let listing = find(&app, parse_id(&path)?).await?;
    Ok(response::ok(
        "Listing fetched successfully",
        json!({ "listing": listing }),
    ))
}

#[tracing::instrument(skip_all, name = "http.listings.update")]
pub async fn update(
    app: web::Data<App>,
    path: web::Path<String>,
    _admin: Admin,
    form: web::Json<UpdateListing>,
) -> Result<HttpResponse> {
    let mut listing = find(&app, parse_id(&path)?).await?;
    let mut form = form.into_inner();

    if let Some(url) = upload_image(&app, form.take_image()).await? {
        listing.room_image = Some(url);
    }
    form.apply(&mut listing);

    if !app.db.update_listing(&listing).await? {
        return Err(Error::new(types::Error::NotFound("Listing")));
    }

    Ok(response::ok(
        "Listing update was successful",
        json!({ "listing": listing }),
    ))
}

#[tracing::instrument(skip_all, name = "http.listings.delete")]
pub async fn delete(
    app: web::Data<App>,
    path: web::Path<String>,
    _admin: Admin,
) -> Result<HttpResponse> {
    let id = parse_id::<ListingMarker>(&path)?;
    if !app.db.delete_listing(id).await? {
        return Err(Error::new(types::Error::NotFound("Listing")));
    }

    Ok(response::ok(
        "Listing deleted successfully",
        json!({ "id": id }),
    ))
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test};
    use serde_json::{json, Value};

    use crate::test_utils;

    #[actix_web::test]
    async fn test_listing_lifecycle() {
        let ctx = test_utils::context();
        let (_, admin) = ctx.admin().await;
        let srv = test_utils::init_service!(ctx.app.clone());

        let req = test::TestRequest::post()
            .uri("/listings")
            .insert_header(("Authorization", admin.as_str()))
            .set_json(json!({
                "roomPrice": 45000,
                "location": "Lekki, Lagos",
                "roomName": "Executive Suite",
                "roomBedType": "King",
            }))
            .to_request();
        let res = test::call_service(&srv, req).await;
        assert_eq!(res.status(), StatusCode::CREATED);

        let body: Value = test::read_body_json(res).await;
        let listing = &body["data"]["listing"];
        assert_eq!(listing["roomPrice"], 45000);
        assert!(listing["roomImage"].is_null());
        let id = listing["id"].as_str().unwrap().to_string();

        let req = test::TestRequest::put()
            .uri(&format!("/listings/{id}"))
            .insert_header(("Authorization", admin.as_str()))
            .set_json(json!({
                "roomPrice": 50000,
                "roomImage": "data:image/png;base64,iVBORw0KGgo=",
            }))
            .to_request();
        let res = test::call_service(&srv, req).await;
        assert_eq!(res.status(), StatusCode::OK);

        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["data"]["listing"]["roomPrice"], 50000);
        assert_eq!(body["data"]["listing"]["location"], "Lekki, Lagos");
        assert_eq!(
            body["data"]["listing"]["roomImage"],
            "https://media.test/innkeep/image-1.png"
        );

        let req = test::TestRequest::get().uri("/listings").to_request();
        let res = test::call_service(&srv, req).await;
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["data"]["listings"].as_array().unwrap().len(), 1);

        let req = test::TestRequest::get()
            .uri(&format!("/listings/{id}"))
            .to_request();
        let res = test::call_service(&srv, req).await;
        assert_eq!(res.status(), StatusCode::OK);

        let req = test::TestRequest::delete()
            .uri(&format!("/listings/{id}"))
            .insert_header(("Authorization", admin.as_str()))
            .to_request();
        let res = test::call_service(&srv, req).await;
        assert_eq!(res.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri(&format!("/listings/{id}"))
            .to_request();
        let res = test::call_service(&srv, req).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_guest_cannot_delete() {
        let ctx = test_utils::context();
        let (_, guest) = ctx.guest("ada@example.com").await;
        let srv = test_utils::init_service!(ctx.app.clone());

        let req = test::TestRequest::delete()
            .uri("/listings/67e55044-10b1-426f-9247-bb680e5fe0c8")
            .insert_header(("Authorization", guest.as_str()))
            .to_request();
        let res = test::call_service(&srv, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
