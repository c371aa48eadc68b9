//! HTTP server implementation
//!
//! Uses hyper http1 with TokioIo for async handling, one task per
//! connection.

use bytes::Bytes;
use http_body_util::Full;
use hyper::body::{Body, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::config::Args;
use crate::keyshare::KeyShareStore;
use crate::routes::{self, KeyShareHandler};
use crate::types::Result;

/// Shared application state
pub struct AppState {
    pub args: Args,
    /// Key shares, shared with the handler and its expiry tasks
    pub store: Arc<KeyShareStore>,
    /// Handler for /keys
    pub keys: KeyShareHandler,
    pub started_at: Instant,
}

impl AppState {
    /// Create AppState with an empty store
    pub fn new(args: Args) -> Self {
        Self::with_store(args, Arc::new(KeyShareStore::new()))
    }

    /// Create AppState around an existing store
    pub fn with_store(args: Args, store: Arc<KeyShareStore>) -> Self {
        let keys = KeyShareHandler::new(Arc::clone(&store), args.key_ttl())
            .with_policy(args.expiry_policy)
            .with_max_body_bytes(args.max_body_bytes);

        Self {
            args,
            store,
            keys,
            started_at: Instant::now(),
        }
    }
}

/// Run the HTTP server until the listener fails
pub async fn run(state: Arc<AppState>) -> Result<()> {
    let listener = TcpListener::bind(state.args.listen).await?;

    info!("Keyshare listening on {}", state.args.listen);
    if state.keys.ttl().is_zero() {
        info!("Key share expiry disabled");
    } else {
        info!(
            "Key shares expire after {}s ({} policy)",
            state.keys.ttl().as_secs(),
            state.keys.policy().as_str()
        );
    }

    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let state = Arc::clone(&state);
                tokio::spawn(async move {
                    let io = TokioIo::new(stream);

                    let service = service_fn(move |req| {
                        let state = Arc::clone(&state);
                        async move { handle_request(state, addr, req).await }
                    });

                    if let Err(err) = http1::Builder::new()
                        .serve_connection(io, service)
                        .await
                    {
                        error!("Error serving connection from {}: {:?}", addr, err);
                    }
                });
            }
            Err(e) => {
                error!("Error accepting connection: {:?}", e);
            }
        }
    }
}

async fn handle_request(
    state: Arc<AppState>,
    addr: SocketAddr,
    req: Request<Incoming>,
) -> std::result::Result<Response<Full<Bytes>>, Infallible> {
    info!("[{}] {} {}", addr, req.method(), req.uri().path());
    Ok(route(state, req).await)
}

/// Route a request to its handler
pub async fn route<B>(state: Arc<AppState>, req: Request<B>) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let path = req.uri().path().to_string();

    match (req.method().clone(), path.as_str()) {
        (_, "/keys") => state.keys.handle(req).await,

        // Liveness probe
        (Method::GET, "/health") | (Method::GET, "/healthz") => {
            routes::health_check(Arc::clone(&state))
        }

        (Method::GET, "/version") => routes::version_info(),

        _ => not_found_response(&path),
    }
}

/// Not found response
fn not_found_response(path: &str) -> Response<Full<Bytes>> {
    let body = serde_json::json!({
        "error": "Not Found",
        "path": path,
        "hint": "Use GET or POST /keys"
    });

    Response::builder()
        .status(StatusCode::NOT_FOUND)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap()
}
