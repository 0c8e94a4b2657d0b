use actix_web::web;

use crate::{
    http::{util, Error, Result},
    media,
    types::{self, form::non_empty},
    App,
};

pub mod auth;
pub mod bookings;
pub mod listings;
pub mod rooms;
pub mod users;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(util::json_config())
        .service(
            web::scope("/auth")
                .route("/register", web::post().to(auth::register))
                .route("/login", web::post().to(auth::login))
                .route("/forget-password", web::post().to(auth::forget_password))
                .route("/reset-password", web::post().to(auth::reset_password))
                .route("/verify-account", web::post().to(auth::verify_account)),
        )
        .service(
            web::scope("/users")
                .route("", web::get().to(users::list))
                .service(
                    web::resource("/{id}")
                        .route(web::get().to(users::get))
                        .route(web::put().to(users::update))
                        .route(web::delete().to(users::delete)),
                ),
        )
        .service(
            web::scope("/rooms")
                .service(
                    web::resource("")
                        .route(web::get().to(rooms::list))
                        .route(web::post().to(rooms::create)),
                )
                .service(
                    web::resource("/{id}")
                        .route(web::get().to(rooms::get))
                        .route(web::put().to(rooms::update))
                        .route(web::delete().to(rooms::delete)),
                ),
        )
        .service(
            web::scope("/listings")
                .service(
                    web::resource("")
                        .route(web::get().to(listings::list))
                        .route(web::post().to(listings::create)),
                )
                .service(
                    web::resource("/{id}")
                        .route(web::get().to(listings::get))
                        .route(web::put().to(listings::update))
                        .route(web::delete().to(listings::delete)),
                ),
        )
        .service(
            web::scope("/bookings")
                .service(
                    web::resource("")
                        .route(web::get().to(bookings::list))
                        .route(web::post().to(bookings::create)),
                )
                .service(
                    web::resource("/{id}")
                        .route(web::put().to(bookings::update))
                        .route(web::delete().to(bookings::delete)),
                ),
        );
}

/// Uploads an optional image given as a URL or `data:` URI and
/// returns where it is hosted now.
async fn upload_image(app: &App, source: Option<String>) -> Result<Option<String>> {
    let Some(source) = non_empty(source) else {
        return Ok(None);
    };

    if !media::is_supported_source(&source) {
        return Err(Error::new(types::Error::InvalidRequest(
            "roomImage must be an http(s) URL or a base64 data URI".into(),
        )));
    }

    let url = app.media.upload(&source).await?;
    Ok(Some(url))
}
