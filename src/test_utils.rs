//! Fakes and fixtures shared by the unit tests.
use async_trait::async_trait;
use chrono::Utc;
use error_stack::{Report, Result};
use std::num::{NonZeroU32, NonZeroU64};
use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc, Mutex,
};

use crate::{
    auth::{self, password},
    config,
    database::{MemoryStore, UserStore},
    mail::{MailError, Mailer, Template},
    media::{MediaUploader, UploadError},
    schema::{User, DEFAULT_ROLE},
    types::id::Id,
    App,
};

/// Builds an actix test service around `$app` with the same routes
/// and middleware as the real server.
macro_rules! init_service {
    ($app:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($app))
                .wrap(actix_web::middleware::NormalizePath::trim())
                .configure(crate::http::controllers::configure),
        )
        .await
    };
}
pub(crate) use init_service;

#[derive(Debug, Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<(Template, String)>>,
    fail: AtomicBool,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<(Template, String)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn fail_next(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, template: Template, recipient: &User) -> Result<(), MailError> {
        if self.fail.swap(false, Ordering::SeqCst) {
            return Err(Report::new(MailError).attach_printable("provider is down"));
        }
        self.sent
            .lock()
            .unwrap()
            .push((template, recipient.email.clone()));
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct StaticUploader {
    uploads: AtomicUsize,
}

impl StaticUploader {
    pub fn uploads(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediaUploader for StaticUploader {
    async fn upload(&self, _source: &str) -> Result<String, UploadError> {
        let n = self.uploads.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("https://media.test/innkeep/image-{n}.png"))
    }
}

pub fn config() -> config::Server {
    config::Server {
        http: config::Http::default(),
        db: config::Database {
            url: "postgres://localhost/innkeep_test".into(),
            pool_size: NonZeroU32::MIN,
            min_idle: None,
            timeout_secs: NonZeroU64::MIN,
            enforce_tls: false,
        },
        auth: config::Auth {
            jwt_secret: "innkeep test secret key".into(),
        },
        log: config::Logging::default(),
        mail: None,
        media: None,
    }
}

pub fn user(email: &str) -> User {
    let now = Utc::now();
    User {
        id: Id::generate(),
        email: email.into(),
        password_hash: String::new(),
        role: DEFAULT_ROLE.into(),
        first_name: "Ada".into(),
        last_name: "Obi".into(),
        phone_number: 8_012_345_678,
        location: "Lagos".into(),
        date_of_birth: "1990-01-01".into(),
        is_verified: true,
        is_admin: false,
        created_at: now,
        updated_at: now,
    }
}

pub struct Context {
    pub app: App,
    pub store: Arc<MemoryStore>,
    pub mailer: Arc<RecordingMailer>,
    pub media: Arc<StaticUploader>,
}

pub fn context() -> Context {
    let store = Arc::new(MemoryStore::new());
    let mailer = Arc::new(RecordingMailer::default());
    let media = Arc::new(StaticUploader::default());
    let app = App::from_parts(config(), store.clone(), mailer.clone(), media.clone());

    Context {
        app,
        store,
        mailer,
        media,
    }
}

impl Context {
    pub async fn insert_user(&self, email: &str, password: &str, is_admin: bool) -> User {
        let mut user = user(email);
        user.password_hash = password::hash(password).unwrap();
        user.is_admin = is_admin;
        self.store.insert_user(&user).await.unwrap();
        user
    }

    pub fn token_for(&self, user: &User) -> String {
        auth::issue_token(&user.id.to_string(), user.is_admin, &self.app.tokens).unwrap()
    }

    /// Bearer header value of a freshly created admin account.
    pub async fn admin(&self) -> (User, String) {
        let admin = self.insert_user("admin@innkeep.dev", "admin password", true).await;
        let header = format!("Bearer {}", self.token_for(&admin));
        (admin, header)
    }

    /// Bearer header value of a freshly created guest account.
    pub async fn guest(&self, email: &str) -> (User, String) {
        let guest = self.insert_user(email, "guest password", false).await;
        let header = format!("Bearer {}", self.token_for(&guest));
        (guest, header)
    }
}
