//! HTTP server for keyshare

mod http;

pub use http::{route, run, AppState};
