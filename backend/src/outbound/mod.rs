//! Outbound adapters implementing the domain's driven ports.
//!
//! - **persistence**: PostgreSQL-backed repository using Diesel ORM.
//! - **memory**: mutex-guarded in-process repository.
//!
//! Adapters translate between domain types and storage representations and
//! contain no business rules beyond enforcing uniqueness atomically.

pub mod memory;
pub mod persistence;
