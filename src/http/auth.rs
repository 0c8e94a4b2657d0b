//! Request extractors for bearer tokens.
use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use futures::future::{ready, Ready};
use thiserror::Error as ThisError;

use super::Error;
use crate::{
    auth::{self, Claims},
    types::{
        self,
        id::{marker::UserMarker, Id},
    },
    App,
};

/// Any caller with a valid token.
#[derive(Debug)]
pub struct Identity(pub Claims);

impl Identity {
    /// Account id the token was issued for.
    pub fn user_id(&self) -> Result<Id<UserMarker>, Error> {
        self.0
            .sub
            .parse()
            .map_err(|e| Error::from_context(types::Error::Unauthorized("Invalid token"), e))
    }
}

/// A caller whose token carries the admin flag.
#[derive(Debug)]
pub struct Admin;

#[derive(Debug, ThisError)]
#[error("The web app has no available configuration")]
struct NoConfig;

#[derive(Debug, ThisError)]
#[error("Missing or malformed authorization header")]
struct MissingToken;

#[derive(Debug, ThisError)]
#[error("Attempt to access admin-only route")]
struct NotAdmin;

fn bearer_token(req: &HttpRequest) -> Result<&str, Error> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| {
            Error::from_context(
                types::Error::Unauthorized("Authorization token is required"),
                MissingToken,
            )
        })
}

fn app_data(req: &HttpRequest) -> Result<&web::Data<App>, Error> {
    req.app_data::<web::Data<App>>()
        .ok_or_else(|| Error::from_context(types::Error::Internal, NoConfig))
}

impl FromRequest for Identity {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(app_data(req).and_then(|app| {
            let token = bearer_token(req)?;
            let claims = auth::validate_token(token, &app.tokens)?;
            Ok(Identity(claims))
        }))
    }
}

impl FromRequest for Admin {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(app_data(req).and_then(|app| {
            let token = bearer_token(req)?;
            if auth::authorize_admin(token, &app.tokens)? {
                Ok(Admin)
            } else {
                Err(Error::from_context(
                    types::Error::Unauthorized("Unauthorized"),
                    NotAdmin,
                ))
            }
        }))
    }
}
