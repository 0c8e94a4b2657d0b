use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde_json::json;
use validator::Validate;

use crate::{
    auth::{self, password, PasswordError},
    database::ErrorExt2,
    http::{response, Error, Result},
    mail::Template,
    schema::{User, DEFAULT_ROLE},
    types::{
        self,
        form::auth::{EmailOnly, Login, Register, ResetPassword},
        id::Id,
    },
    App,
};

#[tracing::instrument(skip_all, name = "http.auth.register")]
pub async fn register(app: web::Data<App>, form: web::Json<Register>) -> Result<HttpResponse> {
    form.validate()?;
    let form = form.into_inner();

    let password_hash = password::hash_blocking(form.password.into()).await?;
    let now = Utc::now();
    let user = User {
        id: Id::generate(),
        email: form.email.trim().to_string(),
        password_hash,
        role: DEFAULT_ROLE.to_string(),
        first_name: form.first_name,
        last_name: form.last_name,
        phone_number: form.phone_number,
        location: form.location,
        date_of_birth: form.date_of_birth,
        is_verified: true,
        is_admin: false,
        created_at: now,
        updated_at: now,
    };

    // the unique index on `email` decides who wins concurrent sign ups
    match app.db.insert_user(&user).await {
        Ok(()) => {}
        Err(error) if error.is_unique_violation() => {
            return Err(Error::from_report(types::Error::EmailExists, error));
        }
        Err(error) => return Err(error.into()),
    }

    let token = auth::issue_token(&user.id.to_string(), user.is_admin, &app.tokens)?;
    tracing::info!(user.id = %user.id, "registered new account");

    Ok(response::created(
        "User created successfully",
        json!({ "user": user, "token": token }),
    ))
}

#[tracing::instrument(skip_all, name = "http.auth.login")]
pub async fn login(app: web::Data<App>, form: web::Json<Login>) -> Result<HttpResponse> {
    form.validate()?;
    let form = form.into_inner();

    let user = find_by_email(&app, &form.email).await?;
    match password::verify_blocking(user.password_hash.clone(), form.password.into()).await {
        Ok(()) => {}
        Err(error) if error.current_context() == &PasswordError::Mismatch => {
            return Err(Error::from_report(types::Error::InvalidCredentials, error));
        }
        Err(error) => return Err(error.into()),
    }

    if !user.is_verified {
        return Err(Error::new(types::Error::NotVerified));
    }

    let token = auth::issue_token(&user.id.to_string(), user.is_admin, &app.tokens)?;
    Ok(response::ok("Login successful", json!({ "token": token })))
}

#[tracing::instrument(skip_all, name = "http.auth.forget_password")]
pub async fn forget_password(
    app: web::Data<App>,
    form: web::Json<EmailOnly>,
) -> Result<HttpResponse> {
    form.validate()?;

    let user = find_by_email(&app, &form.email).await?;
    app.mailer.send(Template::ForgetPassword, &user).await?;

    Ok(response::ok_message(
        "Please check your mail for further instructions",
    ))
}

/// Replaces the password and marks the account as unverified until
/// it is verified again.
#[tracing::instrument(skip_all, name = "http.auth.reset_password")]
pub async fn reset_password(
    app: web::Data<App>,
    form: web::Json<ResetPassword>,
) -> Result<HttpResponse> {
    form.validate()?;
    let form = form.into_inner();

    let mut user = find_by_email(&app, &form.email).await?;
    user.password_hash = password::hash_blocking(form.password.into()).await?;
    user.is_verified = false;
    user.updated_at = Utc::now();
    save(&app, &user).await?;

    app.mailer.send(Template::PasswordChanged, &user).await?;

    Ok(response::ok(
        "Password reset was successful",
        json!({ "user": user }),
    ))
}

#[tracing::instrument(skip_all, name = "http.auth.verify_account")]
pub async fn verify_account(
    app: web::Data<App>,
    form: web::Json<EmailOnly>,
) -> Result<HttpResponse> {
    form.validate()?;

    let mut user = find_by_email(&app, &form.email).await?;
    user.is_verified = true;
    user.updated_at = Utc::now();
    save(&app, &user).await?;

    Ok(response::ok(
        "Your account has been verified",
        json!({ "user": user }),
    ))
}

async fn find_by_email(app: &App, email: &str) -> Result<User> {
    app.db
        .find_user_by_email(email.trim())
        .await?
        .ok_or_else(|| Error::new(types::Error::UserNotFound))
}

async fn save(app: &App, user: &User) -> Result<()> {
    if app.db.update_user(user).await? {
        Ok(())
    } else {
        // deleted in the meantime
        Err(Error::new(types::Error::UserNotFound))
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test};
    use serde_json::{json, Value};

    use crate::{auth, database::UserStore, mail::Template, test_utils};

    #[actix_web::test]
    async fn test_register_then_login() {
        let ctx = test_utils::context();
        let srv = test_utils::init_service!(ctx.app.clone());

        let req = test::TestRequest::post()
            .uri("/auth/register")
            .set_json(json!({
                "email": "ada@example.com",
                "password": "hunter2hunter2",
                "firstName": "Ada",
            }))
            .to_request();
        let res = test::call_service(&srv, req).await;
        assert_eq!(res.status(), StatusCode::CREATED);

        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["status"], 201);
        assert_eq!(body["message"], "User created successfully");
        assert_eq!(body["data"]["user"]["email"], "ada@example.com");
        assert_eq!(body["data"]["user"]["role"], "GUEST");
        assert!(body["data"]["user"].get("passwordHash").is_none());

        let token = body["data"]["token"].as_str().unwrap();
        let claims = auth::validate_token(token, &ctx.app.tokens).unwrap();
        assert_eq!(claims.sub, body["data"]["user"]["id"].as_str().unwrap());
        assert!(!claims.is_admin);

        let req = test::TestRequest::post()
            .uri("/auth/login")
            .set_json(json!({ "email": "ada@example.com", "password": "hunter2hunter2" }))
            .to_request();
        let res = test::call_service(&srv, req).await;
        assert_eq!(res.status(), StatusCode::OK);

        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["message"], "Login successful");
        assert!(body["data"]["token"].is_string());
    }

    #[actix_web::test]
    async fn test_register_duplicate_email() {
        let ctx = test_utils::context();
        let srv = test_utils::init_service!(ctx.app.clone());

        for expected in [StatusCode::CREATED, StatusCode::CONFLICT] {
            let req = test::TestRequest::post()
                .uri("/auth/register")
                .set_json(json!({ "email": "dup@example.com", "password": "hunter2hunter2" }))
                .to_request();
            let res = test::call_service(&srv, req).await;
            assert_eq!(res.status(), expected);

            if expected == StatusCode::CONFLICT {
                let body: Value = test::read_body_json(res).await;
                assert_eq!(body["message"], "Already Exist");
                assert_eq!(body["data"]["error"], "User with this Email already exist");
            }
        }
    }

    #[actix_web::test]
    async fn test_register_requires_fields() {
        let ctx = test_utils::context();
        let srv = test_utils::init_service!(ctx.app.clone());

        let req = test::TestRequest::post()
            .uri("/auth/register")
            .set_json(json!({ "email": "ada@example.com" }))
            .to_request();
        let res = test::call_service(&srv, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["message"], "Invalid request");
        assert_eq!(body["data"]["error"], "password is required");

        let req = test::TestRequest::post()
            .uri("/auth/register")
            .insert_header(("content-type", "application/json"))
            .to_request();
        let res = test::call_service(&srv, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["data"]["error"], "Please provide request body");
    }

    #[actix_web::test]
    async fn test_login_failures() {
        let ctx = test_utils::context();
        ctx.insert_user("ada@example.com", "hunter2hunter2", false)
            .await;
        let mut unverified = ctx
            .insert_user("bob@example.com", "hunter2hunter2", false)
            .await;
        unverified.is_verified = false;
        ctx.store.update_user(&unverified).await.unwrap();

        let srv = test_utils::init_service!(ctx.app.clone());
        let cases = [
            ("nobody@example.com", "hunter2hunter2", "User not found"),
            ("ada@example.com", "wrong password", "Invalid credentials"),
            ("bob@example.com", "hunter2hunter2", "Not Verified"),
        ];

        for (email, password, message) in cases {
            let req = test::TestRequest::post()
                .uri("/auth/login")
                .set_json(json!({ "email": email, "password": password }))
                .to_request();
            let res = test::call_service(&srv, req).await;
            assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{message}");

            let body: Value = test::read_body_json(res).await;
            assert_eq!(body["status"], 400);
            assert_eq!(body["message"], message);
        }
    }

    #[actix_web::test]
    async fn test_forget_password_sends_mail() {
        let ctx = test_utils::context();
        ctx.insert_user("ada@example.com", "hunter2hunter2", false)
            .await;
        let srv = test_utils::init_service!(ctx.app.clone());

        let req = test::TestRequest::post()
            .uri("/auth/forget-password")
            .set_json(json!({ "email": "ada@example.com" }))
            .to_request();
        let res = test::call_service(&srv, req).await;
        assert_eq!(res.status(), StatusCode::OK);

        let body: Value = test::read_body_json(res).await;
        assert_eq!(
            body["message"],
            "Please check your mail for further instructions"
        );
        assert_eq!(
            ctx.mailer.sent(),
            vec![(Template::ForgetPassword, "ada@example.com".to_string())]
        );

        let req = test::TestRequest::post()
            .uri("/auth/forget-password")
            .set_json(json!({ "email": "nobody@example.com" }))
            .to_request();
        let res = test::call_service(&srv, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_mail_failure() {
        let ctx = test_utils::context();
        ctx.insert_user("ada@example.com", "hunter2hunter2", false)
            .await;
        ctx.mailer.fail_next();
        let srv = test_utils::init_service!(ctx.app.clone());

        let req = test::TestRequest::post()
            .uri("/auth/forget-password")
            .set_json(json!({ "email": "ada@example.com" }))
            .to_request();
        let res = test::call_service(&srv, req).await;
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["message"], "Error sending mail");
    }

    #[actix_web::test]
    async fn test_reset_password_then_verify() {
        let ctx = test_utils::context();
        ctx.insert_user("ada@example.com", "old password", false)
            .await;
        let srv = test_utils::init_service!(ctx.app.clone());

        let req = test::TestRequest::post()
            .uri("/auth/reset-password")
            .set_json(json!({ "email": "ada@example.com", "password": "new password" }))
            .to_request();
        let res = test::call_service(&srv, req).await;
        assert_eq!(res.status(), StatusCode::OK);

        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["message"], "Password reset was successful");
        assert_eq!(body["data"]["user"]["isVerified"], false);
        assert_eq!(
            ctx.mailer.sent(),
            vec![(Template::PasswordChanged, "ada@example.com".to_string())]
        );

        let stored = ctx
            .store
            .find_user_by_email("ada@example.com")
            .await
            .unwrap()
            .unwrap();
        assert!(auth::password::verify(&stored.password_hash, "new password").is_ok());

        let login = |password: &'static str| {
            test::TestRequest::post()
                .uri("/auth/login")
                .set_json(json!({ "email": "ada@example.com", "password": password }))
                .to_request()
        };

        let res = test::call_service(&srv, login("new password")).await;
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["message"], "Not Verified");

        let req = test::TestRequest::post()
            .uri("/auth/verify-account")
            .set_json(json!({ "email": "ada@example.com" }))
            .to_request();
        let res = test::call_service(&srv, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["message"], "Your account has been verified");

        let res = test::call_service(&srv, login("old password")).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let res = test::call_service(&srv, login("new password")).await;
        assert_eq!(res.status(), StatusCode::OK);
    }
}
