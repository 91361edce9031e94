//! Domain primitives, ports and services.
//!
//! Public surface:
//! - [`User`] and its field newtypes ([`UserId`], [`Username`], [`Email`],
//!   [`UserData`]) plus [`NewUser`] for creation input.
//! - [`UserChanges`] / [`DataChange`] describing full and partial updates,
//!   with [`shallow_merge`] implementing the partial-update law.
//! - [`Error`] / [`ErrorCode`], the transport-agnostic failure taxonomy.
//! - [`UsersService`], which implements the driving ports in [`ports`].

pub mod error;
pub mod ports;
pub mod trace_id;
pub mod user;
pub mod user_changes;
pub mod users_service;

pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{Email, NewUser, User, UserData, UserId, UserValidationError, Username};
pub use self::user_changes::{DataChange, UserChanges, shallow_merge};
pub use self::users_service::UsersService;
