//! A client for the Smart Campus help-desk API.
//!
//! Every call goes through a [`Gateway`], which attaches the bearer token
//! kept by a [`SessionStore`] and sorts responses into parsed JSON or a raw
//! [`reqwest::Response`]. The [`endpoints`] module wraps the individual
//! routes in typed functions.

#![forbid(unsafe_code)]

#[cfg(test)]
#[macro_use]
extern crate pretty_assertions;

mod badge;
mod config;
pub mod endpoints;
mod gateway;
mod guard;
mod request;
mod session;
mod storage;
mod types;

pub use badge::render_status_badge;
pub use config::Config;
pub use gateway::{ApiError, Gateway, Outcome};
pub use guard::{require_login, Navigator, LOGIN_PAGE};
pub use request::{Request, RequestBody};
pub use session::{SessionError, SessionStore};
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};
pub use types::{
    Attachment, Comment, LoginResponse, Registration, Role, Ticket,
    TicketDetail, TicketStatus, UnknownVariant, User,
};

/// The default user agent to use when communicating with the help-desk
/// server.
pub const DEFAULT_USER_AGENT: &str =
    concat!(env!("CARGO_PKG_NAME"), "-", env!("CARGO_PKG_VERSION"));

/// Where the help-desk API lives unless told otherwise.
pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:5000";
