pub mod auth;
pub mod controllers;
pub mod error;
pub mod response;
pub mod util;

pub use auth::{Admin, Identity};
pub use error::{Error, Result};
