pub mod auth;
pub mod catalog;
pub mod client;
pub mod error;
pub mod types;

pub use auth::{Credentials, acquire_token};
pub use client::{ClientSettings, CpdClient};
pub use error::CpdError;
