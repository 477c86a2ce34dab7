//! HTTP surface: the composed page at `/`, one static mount per asset
//! directory, provenance and baseline security headers on everything.

use crate::compose::compose;
use crate::config::{ServerConfig, TlsMaterial};
use crate::emit::Emitter;
use crate::error::ServerError;
use crate::mount::MountTable;
use crate::template::Template;
use axum::extract::{Request, State};
use axum::http::{HeaderName, HeaderValue, StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use quarkboard_plugin::PluginRegistry;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::{debug, error, info};

const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// Browser hardening headers sent with every response unless a handler set
/// its own value. No Content-Security-Policy: plugin fragments may carry
/// inline scripts.
pub const SECURITY_HEADERS: [(HeaderName, HeaderValue); 10] = [
    (header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff")),
    (header::X_FRAME_OPTIONS, HeaderValue::from_static("SAMEORIGIN")),
    (header::REFERRER_POLICY, HeaderValue::from_static("no-referrer")),
    (header::X_DNS_PREFETCH_CONTROL, HeaderValue::from_static("off")),
    (header::X_XSS_PROTECTION, HeaderValue::from_static("0")),
    (
        HeaderName::from_static("x-download-options"),
        HeaderValue::from_static("noopen"),
    ),
    (
        HeaderName::from_static("x-permitted-cross-domain-policies"),
        HeaderValue::from_static("none"),
    ),
    (
        HeaderName::from_static("cross-origin-opener-policy"),
        HeaderValue::from_static("same-origin"),
    ),
    (
        HeaderName::from_static("cross-origin-resource-policy"),
        HeaderValue::from_static("same-origin"),
    ),
    (
        HeaderName::from_static("origin-agent-cluster"),
        HeaderValue::from_static("?1"),
    ),
];

/// Only meaningful over TLS, so it is added by the HTTPS listener alone.
const HSTS: HeaderValue = HeaderValue::from_static("max-age=15552000; includeSubDomains");

/// Immutable state shared by all requests.
#[derive(Clone)]
pub struct AppState {
    pub template: Arc<Template>,
    pub registry: Arc<PluginRegistry>,
    pub emitter: Arc<Emitter>,
}

impl AppState {
    pub fn new(template: Template, registry: PluginRegistry, emitter: Emitter) -> Self {
        Self {
            template: Arc::new(template),
            registry: Arc::new(registry),
            emitter: Arc::new(emitter),
        }
    }
}

/// Assemble the router for the given state and mount table.
pub fn build_router(state: AppState, mounts: &MountTable) -> Router {
    let mut router = Router::new().route("/", get(index));
    for entry in mounts.entries() {
        router = router.nest_service(&entry.url_prefix, ServeDir::new(&entry.directory));
    }
    router = router.fallback(not_found);
    for (name, value) in SECURITY_HEADERS {
        router = router.layer(SetResponseHeaderLayer::if_not_present(name, value));
    }
    router
        .layer(middleware::from_fn_with_state(state.clone(), provenance_headers))
        .with_state(state)
}

async fn index(State(state): State<AppState>) -> Response {
    match compose(&state.template, &state.registry) {
        Ok(composition) => {
            if !composition.failures.is_empty() {
                debug!(
                    "Rendered page without {} failed plugin(s)",
                    composition.failures.len()
                );
            }
            Html(state.emitter.emit(&composition.document)).into_response()
        }
        Err(e) => {
            error!("Failed to compose page: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "failed to compose page").into_response()
        }
    }
}

async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "not found")
}

async fn provenance_headers(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    state.emitter.provenance().apply(response.headers_mut());
    response
}

/// A bound-on-demand HTTP(S) server.
pub struct Server {
    config: ServerConfig,
    router: Router,
    tls: Option<TlsMaterial>,
}

impl Server {
    pub fn new(config: ServerConfig, router: Router, tls: Option<TlsMaterial>) -> Self {
        Self { config, router, tls }
    }

    /// Serve until `cancel` fires, then drain in-flight requests.
    pub async fn run(self, cancel: CancellationToken) -> Result<(), ServerError> {
        let Self {
            config,
            router,
            tls,
        } = self;
        match tls {
            Some(material) => serve_https(&config, router, material, cancel).await,
            None => serve_http(&config, router, cancel).await,
        }
    }
}

async fn serve_http(
    config: &ServerConfig,
    router: Router,
    cancel: CancellationToken,
) -> Result<(), ServerError> {
    let listener = tokio::net::TcpListener::bind((config.hostname.as_str(), config.port))
        .await
        .map_err(|source| ServerError::Bind {
            address: format!("{}:{}", config.hostname, config.port),
            source,
        })?;
    info!("Listening on {}", config.url());

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            cancel.cancelled().await;
        })
        .await?;
    info!("Server stopped");
    Ok(())
}

async fn serve_https(
    config: &ServerConfig,
    router: Router,
    material: TlsMaterial,
    cancel: CancellationToken,
) -> Result<(), ServerError> {
    let address = resolve(&config.hostname, config.port).await?;
    let rustls = axum_server::tls_rustls::RustlsConfig::from_pem(
        material.certificate,
        material.private_key,
    )
    .await
    .map_err(ServerError::Tls)?;

    let handle = axum_server::Handle::new();
    tokio::spawn({
        let handle = handle.clone();
        async move {
            cancel.cancelled().await;
            handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
        }
    });

    info!("Listening on {}", config.url());
    if let Some(key) = &config.private_key {
        info!("Using private key from {}", key.display());
    }
    if let Some(cert) = &config.certificate {
        info!("Using certificate from {}", cert.display());
    }

    let router = router.layer(SetResponseHeaderLayer::if_not_present(
        header::STRICT_TRANSPORT_SECURITY,
        HSTS,
    ));
    axum_server::bind_rustls(address, rustls)
        .handle(handle)
        .serve(router.into_make_service())
        .await?;
    info!("Server stopped");
    Ok(())
}

async fn resolve(host: &str, port: u16) -> Result<SocketAddr, ServerError> {
    tokio::net::lookup_host((host, port))
        .await?
        .next()
        .ok_or_else(|| ServerError::Resolve {
            host: host.to_string(),
            port,
        })
}
