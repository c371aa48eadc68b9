//! HTTP routes for keyshare

pub mod health;
pub mod keys;

pub use health::{health_check, version_info};
pub use keys::KeyShareHandler;
