//! Keyshare - ephemeral in-memory key sharing
//!
//! A device publishes a named bundle of key material (public and private
//! key bytes, their format tags and an optional password) and a second
//! device fetches it by name until it expires. Nothing is persisted;
//! restarting the process drops every share.
//!
//! ## Endpoints
//!
//! - `GET /keys?name={name}` - protobuf-encoded [`keyshare::KeyShare`]
//! - `POST /keys` - publish a share from a form-urlencoded body
//! - `GET /health`, `GET /version` - liveness and build info

pub mod config;
pub mod keyshare;
pub mod routes;
pub mod server;
pub mod types;

pub use config::Args;
pub use server::{run, AppState};
pub use types::{KeyShareError, Result};
