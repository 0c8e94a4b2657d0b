use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde_json::json;
use thiserror::Error as ThisError;

use crate::{
    http::{response, util::parse_id, Admin, Error, Identity, Result},
    types::{
        self,
        form::users::UpdateUser,
        id::{marker::UserMarker, Id},
    },
    App,
};

#[derive(Debug, ThisError)]
#[error("Attempt to access another account")]
struct NotOwner;

/// Accounts can only be read or changed by their owner or an admin.
fn ensure_owner(identity: &Identity, id: Id<UserMarker>) -> Result<()> {
    if identity.0.is_admin || identity.user_id()? == id {
        Ok(())
    } else {
        Err(Error::from_context(
            types::Error::Unauthorized("Not allowed to access this account"),
            NotOwner,
        ))
    }
}

#[tracing::instrument(skip_all, name = "http.users.list")]
pub async fn list(app: web::Data<App>, _admin: Admin) -> Result<HttpResponse> {
    let users = app.db.list_users().await?;
    Ok(response::ok(
        "Users fetched successfully",
        json!({ "users": users }),
    ))
}

#[tracing::instrument(skip_all, name = "http.users.get")]
pub async fn get(
    app: web::Data<App>,
    path: web::Path<String>,
    identity: Identity,
) -> Result<HttpResponse> {
    let id = parse_id::<UserMarker>(&path)?;
    ensure_owner(&identity, id)?;

    let user = app
        .db
        .find_user(id)
        .await?
        .ok_or_else(|| Error::new(types::Error::NotFound("User")))?;

    Ok(response::ok(
        "User fetched successfully",
        json!({ "user": user }),
    ))
}

#[tracing::instrument(skip_all, name = "http.users.update")]
pub async fn update(
    app: web::Data<App>,
    path: web::Path<String>,
    identity: Identity,
    form: web::Json<UpdateUser>,
) -> Result<HttpResponse> {
    let id = parse_id::<UserMarker>(&path)?;
    ensure_owner(&identity, id)?;

    let mut user = app
        .db
        .find_user(id)
        .await?
        .ok_or_else(|| Error::new(types::Error::NotFound("User")))?;

    form.into_inner().apply(&mut user);
    user.updated_at = Utc::now();

    if !app.db.update_user(&user).await? {
        return Err(Error::new(types::Error::NotFound("User")));
    }

    Ok(response::ok(
        "User update was successful",
        json!({ "user": user }),
    ))
}

#[tracing::instrument(skip_all, name = "http.users.delete")]
pub async fn delete(
    app: web::Data<App>,
    path: web::Path<String>,
    _admin: Admin,
) -> Result<HttpResponse> {
    let id = parse_id::<UserMarker>(&path)?;
    if !app.db.delete_user(id).await? {
        return Err(Error::new(types::Error::NotFound("User")));
    }

    Ok(response::ok(
        "User deleted successfully",
        json!({ "id": id }),
    ))
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test};
    use serde_json::{json, Value};

    use crate::test_utils;

    #[actix_web::test]
    async fn test_owner_can_read_and_update() {
        let ctx = test_utils::context();
        let (guest, token) = ctx.guest("ada@example.com").await;
        let srv = test_utils::init_service!(ctx.app.clone());

        let req = test::TestRequest::get()
            .uri(&format!("/users/{}", guest.id))
            .insert_header(("Authorization", token.as_str()))
            .to_request();
        let res = test::call_service(&srv, req).await;
        assert_eq!(res.status(), StatusCode::OK);

        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["data"]["user"]["email"], "ada@example.com");
        assert!(body["data"]["user"].get("passwordHash").is_none());

        let req = test::TestRequest::put()
            .uri(&format!("/users/{}", guest.id))
            .insert_header(("Authorization", token.as_str()))
            .set_json(json!({
                "firstName": "Adaeze",
                "lastName": "",
                "email": "hijack@example.com",
                "isAdmin": true,
            }))
            .to_request();
        let res = test::call_service(&srv, req).await;
        assert_eq!(res.status(), StatusCode::OK);

        let body: Value = test::read_body_json(res).await;
        let user = &body["data"]["user"];
        assert_eq!(user["firstName"], "Adaeze");
        assert_eq!(user["lastName"], "Obi");
        assert_eq!(user["email"], "ada@example.com");
        assert_eq!(user["isAdmin"], false);
    }

    #[actix_web::test]
    async fn test_other_accounts_are_off_limits() {
        let ctx = test_utils::context();
        let (_, token) = ctx.guest("ada@example.com").await;
        let (other, _) = ctx.guest("bob@example.com").await;
        let srv = test_utils::init_service!(ctx.app.clone());

        let req = test::TestRequest::get()
            .uri(&format!("/users/{}", other.id))
            .insert_header(("Authorization", token.as_str()))
            .to_request();
        let res = test::call_service(&srv, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::get()
            .uri("/users")
            .insert_header(("Authorization", token.as_str()))
            .to_request();
        let res = test::call_service(&srv, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_admin_lists_and_deletes() {
        let ctx = test_utils::context();
        let (_, admin) = ctx.admin().await;
        let (guest, _) = ctx.guest("ada@example.com").await;
        let srv = test_utils::init_service!(ctx.app.clone());

        let req = test::TestRequest::get()
            .uri("/users/")
            .insert_header(("Authorization", admin.as_str()))
            .to_request();
        let res = test::call_service(&srv, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["data"]["users"].as_array().unwrap().len(), 2);

        for expected in [StatusCode::OK, StatusCode::NOT_FOUND] {
            let req = test::TestRequest::delete()
                .uri(&format!("/users/{}", guest.id))
                .insert_header(("Authorization", admin.as_str()))
                .to_request();
            let res = test::call_service(&srv, req).await;
            assert_eq!(res.status(), expected);
        }
    }

    #[actix_web::test]
    async fn test_invalid_id() {
        let ctx = test_utils::context();
        let (_, admin) = ctx.admin().await;
        let srv = test_utils::init_service!(ctx.app.clone());

        let req = test::TestRequest::get()
            .uri("/users/not-a-uuid")
            .insert_header(("Authorization", admin.as_str()))
            .to_request();
        let res = test::call_service(&srv, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["message"], "Something went wrong");
        assert_eq!(body["data"]["error"], "Invalid Id");
    }
}
