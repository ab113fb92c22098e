pub mod artifacts;
pub mod contacts;
pub mod error;
pub mod health;
pub mod openapi;
pub mod suggestions;

pub use error::ApiError;
