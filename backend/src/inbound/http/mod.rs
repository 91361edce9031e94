//! HTTP inbound adapter exposing the user REST endpoints.

pub mod envelope;
pub mod error;
pub mod health;
pub mod root;
pub mod schemas;
pub mod state;
pub mod users;
mod validation;

pub use error::ApiResult;
