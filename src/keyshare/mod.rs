//! Ephemeral key sharing
//!
//! A client publishes a named bundle of key material and any party that
//! knows the name can fetch it until the share expires.
//!
//! Protocol:
//! - GET  /keys?name={name} - Fetch a share (protobuf body)
//! - POST /keys             - Publish a share (form-urlencoded body)

pub mod expiry;
pub mod form;
pub mod store;
mod types;

pub use expiry::{schedule_expiry, ExpiryPolicy};
pub use form::KeyShareForm;
pub use store::KeyShareStore;
pub use types::*;

/// Content type of protobuf-encoded `KeyShare` responses
pub const KEY_SHARE_CONTENT_TYPE: &str = "application/x-protobuf; messageType=KeyShare";

/// The only content type accepted for writes
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Default cap on write request bodies (64 KiB)
pub const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024;
