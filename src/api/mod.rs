//! # Backend Gateway
//!
//! Everything that talks to the mood backend over HTTP.
//!
//! - [`types`]: request and response bodies
//! - [`routes`]: endpoint paths for the flat and `/api`-prefixed layouts
//! - [`backend`]: the `MoodBackend` trait and `ApiError`
//! - [`client`]: `HttpBackend`, the reqwest implementation
//! - [`dispatch`]: runs a core `Request` and reports back with an `Action`

pub mod backend;
pub mod client;
pub mod dispatch;
pub mod routes;
pub mod types;

pub use backend::{ApiError, CONNECTIVITY_MESSAGE, GENERIC_DETAIL, MoodBackend};
pub use client::{DEFAULT_BASE_URL, HttpBackend};
pub use dispatch::dispatch;
pub use routes::{Endpoint, RouteStyle};
pub use types::{
    AccountResponse, ChatMessage, ChatReply, ChatSessionSummary, ChatStart, MoodHistoryEntry,
    MoodVerdict, OpaqueId, Role, UserCheck,
};
