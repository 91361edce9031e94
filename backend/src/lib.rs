//! User records over HTTP.
//!
//! The crate follows a ports-and-adapters layout: [`domain`] holds the user
//! model and the driving/driven ports, [`inbound::http`] exposes them over
//! actix-web, and [`outbound`] provides PostgreSQL and in-memory stores.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
