//! Key share endpoint (/keys)
//!
//! GET fetches a share by name, POST publishes one. Every failure is
//! reported as a bare status code; the reason only goes to the log.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::Body;
use hyper::header::CONTENT_TYPE;
use hyper::{Method, Request, Response, StatusCode};
use prost::Message;
use tracing::{debug, warn};

use crate::keyshare::{
    schedule_expiry, ExpiryPolicy, KeyShareForm, KeyShareStore, DEFAULT_MAX_BODY_BYTES,
    FORM_CONTENT_TYPE, KEY_SHARE_CONTENT_TYPE,
};
use crate::types::{KeyShareError, Result};

/// Request handler bound to a store and a TTL
///
/// A zero TTL disables expiry.
#[derive(Clone)]
pub struct KeyShareHandler {
    store: Arc<KeyShareStore>,
    ttl: Duration,
    policy: ExpiryPolicy,
    max_body_bytes: usize,
}

impl KeyShareHandler {
    pub fn new(store: Arc<KeyShareStore>, ttl: Duration) -> Self {
        Self {
            store,
            ttl,
            policy: ExpiryPolicy::default(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    pub fn with_policy(mut self, policy: ExpiryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }

    pub fn store(&self) -> &Arc<KeyShareStore> {
        &self.store
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn policy(&self) -> ExpiryPolicy {
        self.policy
    }

    /// Handle a request to /keys
    pub async fn handle<B>(&self, req: Request<B>) -> Response<Full<Bytes>>
    where
        B: Body,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let method = req.method().clone();
        let result = match method {
            Method::GET => self.read(&req),
            Method::POST => self.write(req).await,
            ref other => Err(KeyShareError::MethodNotAllowed(other.to_string())),
        };

        match result {
            Ok(response) => response,
            Err(e) => {
                warn!("Key share {} rejected: {}", method, e);
                empty_response(e.status())
            }
        }
    }

    fn read<B>(&self, req: &Request<B>) -> Result<Response<Full<Bytes>>> {
        let name = query_param(req.uri().query(), "name")
            .filter(|name| !name.is_empty())
            .ok_or(KeyShareError::MissingParameter("name"))?;

        let share = self
            .store
            .get(&name)
            .ok_or_else(|| KeyShareError::NotFound(name.clone()))?;

        let mut buf = Vec::with_capacity(share.encoded_len());
        share.encode(&mut buf)?;
        debug!("Key share GET {:?} ({} bytes)", name, buf.len());

        Ok(Response::builder()
            .status(StatusCode::OK)
            .header(CONTENT_TYPE, KEY_SHARE_CONTENT_TYPE)
            .header("Cache-Control", "no-store")
            .body(Full::new(Bytes::from(buf)))
            .unwrap())
    }

    async fn write<B>(&self, req: Request<B>) -> Result<Response<Full<Bytes>>>
    where
        B: Body,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        if !is_form_content_type(content_type) {
            return Err(KeyShareError::UnsupportedContentType(content_type.to_string()));
        }

        let body = Limited::new(req.into_body(), self.max_body_bytes)
            .collect()
            .await
            .map_err(|e| {
                if e.downcast_ref::<LengthLimitError>().is_some() {
                    KeyShareError::BodyTooLarge(self.max_body_bytes)
                } else {
                    KeyShareError::BodyRead(e.to_string())
                }
            })?
            .to_bytes();

        let share = KeyShareForm::from_body(&body)?.into_key_share()?;
        let name = share.name.clone();
        let generation = self.store.put(&name, share);
        debug!("Key share POST {:?} stored (generation {})", name, generation);

        if !self.ttl.is_zero() {
            // Detached: the expiry always runs to completion
            let _ = schedule_expiry(
                Arc::clone(&self.store),
                name,
                generation,
                self.ttl,
                self.policy,
            );
        }

        Ok(empty_response(StatusCode::OK))
    }
}

/// First value of `key` in a query string
fn query_param(query: Option<&str>, key: &str) -> Option<String> {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query?).ok()?;
    pairs.into_iter().find(|(k, _)| k == key).map(|(_, v)| v)
}

/// Accepts parameters such as `; charset=utf-8`
fn is_form_content_type(value: &str) -> bool {
    value
        .split(';')
        .next()
        .map(|mime| mime.trim().eq_ignore_ascii_case(FORM_CONTENT_TYPE))
        .unwrap_or(false)
}

fn empty_response(status: StatusCode) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .body(Full::new(Bytes::new()))
        .unwrap()
}
