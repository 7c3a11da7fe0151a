//! HTTP server wiring for Sharuco (API, handlers, and shared state).

/// HTTP error mapping for API handlers.
pub mod error;
/// HTTP handlers for snippet and category endpoints.
pub mod handlers;
/// Acting-user extraction.
pub mod identity;
/// Per-user snippet writers.
pub mod writers;

pub use sharuco_core::{config, db, models, AppError, Config, Database, UserId, DEFAULT_PORT};
pub use writers::WriterRegistry;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderName, HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use hyper::HeaderMap;
use sharuco_core::{constants::USER_HEADER, CategoryReader};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

/// Shared state passed to HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub config: Arc<Config>,
    pub writers: Arc<WriterRegistry>,
    pub reader: CategoryReader<Database>,
}

impl AppState {
    /// Construct shared application state.
    ///
    /// # Arguments
    /// - `config`: Loaded configuration.
    /// - `db`: Open database handle.
    pub fn new(config: Config, db: Database) -> Self {
        let db = Arc::new(db);
        let writers = Arc::new(WriterRegistry::new(
            Arc::clone(&db),
            config.max_snippet_size,
        ));
        Self {
            reader: CategoryReader::new(Arc::clone(&db)),
            db,
            config: Arc::new(config),
            writers,
        }
    }
}

/// Resolve the listener address from env var overrides and security policy.
///
/// # Returns
/// A socket address that enforces loopback when public access is disabled.
pub fn resolve_bind_address(config: &Config) -> SocketAddr {
    let default_bind = SocketAddr::from(([127, 0, 0, 1], config.port));
    let requested = match std::env::var("BIND") {
        Ok(value) => match value.trim().parse::<SocketAddr>() {
            Ok(addr) => addr,
            Err(err) => {
                tracing::warn!(
                    "Invalid BIND='{}': {}. Falling back to {}",
                    value,
                    err,
                    default_bind
                );
                default_bind
            }
        },
        Err(_) => default_bind,
    };

    if config.allow_public_access || requested.ip().is_loopback() {
        return requested;
    }

    tracing::warn!(
        "Non-loopback bind {} requested without ALLOW_PUBLIC_ACCESS; forcing 127.0.0.1",
        requested
    );
    SocketAddr::from(([127, 0, 0, 1], requested.port()))
}

fn request_body_limit(max_snippet_size: usize) -> usize {
    // JSON escaping can roughly double the code field.
    max_snippet_size.saturating_mul(2).saturating_add(64 * 1024)
}

fn security_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static("default-src 'none'; frame-ancestors 'none'"),
    );
    headers
}

fn cors_layer(allow_public_access: bool, cors_port: u16) -> CorsLayer {
    let methods = [Method::GET, Method::POST, Method::PUT, Method::DELETE];
    if allow_public_access {
        return CorsLayer::new()
            .allow_origin(tower_http::cors::Any)
            .allow_methods(methods)
            .allow_headers(tower_http::cors::Any);
    }
    let origins: Vec<HeaderValue> = [
        format!("http://localhost:{}", cors_port),
        format!("http://127.0.0.1:{}", cors_port),
    ]
    .into_iter()
    .filter_map(|origin| HeaderValue::from_str(&origin).ok())
    .collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(methods)
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static(USER_HEADER),
        ])
}

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState) -> Router {
    let cors_port = state.config.port;
    create_app_with_cors_port(state, cors_port)
}

fn create_app_with_cors_port(state: AppState, cors_port: u16) -> Router {
    let body_limit = request_body_limit(state.config.max_snippet_size);
    let cors = cors_layer(state.config.allow_public_access, cors_port);

    let mut router = Router::new()
        .route("/api/snippets", post(handlers::snippet::create_snippet))
        .route("/api/snippets/public", get(handlers::category::public_snippets))
        .route("/api/snippets/private", get(handlers::category::private_snippets))
        .route(
            "/api/snippets/favorites",
            get(handlers::category::favorite_snippets),
        )
        .route(
            "/api/snippets/:id/favorite",
            put(handlers::snippet::favorite_snippet)
                .delete(handlers::snippet::unfavorite_snippet),
        )
        .route("/api/dashboard", get(handlers::category::dashboard))
        .with_state(state)
        .layer(
            tower::ServiceBuilder::new()
                .layer(DefaultBodyLimit::max(body_limit))
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(cors),
        );

    for (name, value) in security_headers() {
        if let Some(name) = name {
            router = router.layer(SetResponseHeaderLayer::overriding(name, value));
        }
    }
    router
}

fn listener_cors_port(listener: &tokio::net::TcpListener, fallback_port: u16) -> u16 {
    listener
        .local_addr()
        .map(|addr| addr.port())
        .unwrap_or(fallback_port)
}

/// Run the Axum server with graceful shutdown support.
///
/// # Errors
/// Returns any I/O error produced by `axum::serve`.
pub async fn serve_router(
    listener: tokio::net::TcpListener,
    state: AppState,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<(), std::io::Error> {
    let cors_port = listener_cors_port(&listener, state.config.port);
    let app = create_app_with_cors_port(state, cors_port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await
}
