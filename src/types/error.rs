use serde::Serialize;
use std::borrow::Cow;
use std::fmt::Display;

/// Every kind of failure the HTTP API can report to its clients.
///
/// Each kind carries its own HTTP status, a short headline and
/// a human readable detail. All of them are serialized into the
/// same envelope as successful responses:
///
/// ```json
/// { "status": 400, "message": "Invalid credentials", "data": { "error": "Invalid Email or Password" } }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The request body is missing, malformed or a field failed validation.
    InvalidRequest(Cow<'static, str>),
    /// A path parameter is not a valid record ID.
    InvalidId,
    /// There is no account with the given email address.
    UserNotFound,
    /// The password does not match the stored credential.
    InvalidCredentials,
    /// The account exists and the credentials match but it is not verified yet.
    NotVerified,
    /// Missing, invalid or expired token, or an insufficient role.
    Unauthorized(&'static str),
    /// The requested record does not exist.
    NotFound(&'static str),
    /// An account with the same email address already exists.
    EmailExists,
    /// The mail provider rejected or failed to deliver an email.
    MailFailed,
    /// The media provider rejected or failed to store an image.
    UploadFailed,
    /// The database is in read-only mode.
    ReadonlyMode,
    Internal,
}

impl Error {
    #[must_use]
    pub const fn status(&self) -> u16 {
        match self {
            Self::InvalidRequest(..)
            | Self::InvalidId
            | Self::UserNotFound
            | Self::InvalidCredentials
            | Self::NotVerified => 400,
            Self::Unauthorized(..) => 401,
            Self::NotFound(..) => 404,
            Self::EmailExists => 409,
            Self::MailFailed | Self::UploadFailed | Self::Internal => 500,
            Self::ReadonlyMode => 503,
        }
    }

    #[must_use]
    pub fn message(&self) -> Cow<'static, str> {
        match self {
            Self::InvalidRequest(..) => "Invalid request".into(),
            Self::InvalidId | Self::UploadFailed | Self::Internal => {
                "Something went wrong".into()
            }
            Self::UserNotFound => "User not found".into(),
            Self::InvalidCredentials => "Invalid credentials".into(),
            Self::NotVerified => "Not Verified".into(),
            Self::Unauthorized(..) => "Unauthorized".into(),
            Self::NotFound(entity) => format!("{entity} not found").into(),
            Self::EmailExists => "Already Exist".into(),
            Self::MailFailed => "Error sending mail".into(),
            Self::ReadonlyMode => "Service unavailable".into(),
        }
    }

    #[must_use]
    pub fn detail(&self) -> Cow<'static, str> {
        match self {
            Self::InvalidRequest(detail) => detail.clone(),
            Self::InvalidId => "Invalid Id".into(),
            Self::UserNotFound => "User with this email not found".into(),
            Self::InvalidCredentials => "Invalid Email or Password".into(),
            Self::NotVerified => "User is not Verified".into(),
            Self::Unauthorized(reason) => Cow::Borrowed(*reason),
            Self::NotFound(entity) => format!("{entity} does not exist").into(),
            Self::EmailExists => "User with this Email already exist".into(),
            Self::MailFailed => "Something went wrong, error sending mail".into(),
            Self::UploadFailed => "Could not upload image".into(),
            Self::ReadonlyMode => "Attempt to write read-only database".into(),
            Self::Internal => "Failed to perform request".into(),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message(), self.detail())
    }
}

impl Serialize for Error {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;

        #[derive(Serialize)]
        struct Data {
            error: Cow<'static, str>,
        }

        let mut envelope = serializer.serialize_struct("Error", 3)?;
        envelope.serialize_field("status", &self.status())?;
        envelope.serialize_field("message", &self.message())?;
        envelope.serialize_field(
            "data",
            &Data {
                error: self.detail(),
            },
        )?;
        envelope.end()
    }
}
