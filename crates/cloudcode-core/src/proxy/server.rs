use axum::{
    extract::DefaultBodyLimit,
    http::Uri,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::future::Future;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::proxy::credentials::CredentialProvider;
use crate::proxy::handlers::{self, ApiError};
use crate::proxy::middleware::{admin_auth_middleware, cors_layer, AdminKey};
use crate::proxy::project_resolver::ProjectResolver;
use crate::proxy::upstream::UpstreamClient;

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 100 * 1024 * 1024;

/// Per-process handles shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub upstream: Arc<UpstreamClient>,
    pub provider: Arc<dyn CredentialProvider>,
    pub resolver: Arc<ProjectResolver>,
}

impl AppState {
    /// Build the state around one upstream client; the provider is shared with it.
    pub fn new(upstream: Arc<UpstreamClient>, project_override: Option<String>) -> Self {
        let provider = Arc::clone(upstream.provider());
        let resolver = Arc::new(ProjectResolver::new(Arc::clone(&upstream), project_override));
        Self { upstream, provider, resolver }
    }

    pub fn with_resolver(mut self, resolver: ProjectResolver) -> Self {
        self.resolver = Arc::new(resolver);
        self
    }
}

pub fn build_proxy_router(state: AppState, admin_key: AdminKey) -> Router {
    let admin = Router::new()
        .route(
            "/admin/credentials",
            get(handlers::admin::handle_credentials_status)
                .post(handlers::admin::handle_credentials_import),
        )
        .layer(axum::middleware::from_fn_with_state(admin_key, admin_auth_middleware));

    Router::new()
        .route("/health", get(health_check))
        .route("/healthz", get(health_check))
        // OpenAI Protocol
        .route("/v1/chat/completions", post(handlers::openai::handle_chat_completions))
        .route("/v1/models", get(handlers::openai::handle_list_models))
        .route(
            "/v1/models/:model",
            get(handlers::openai::handle_get_model).post(handlers::gemini::handle_generate),
        )
        // Gemini Protocol
        .route("/v1beta/models/:model", post(handlers::gemini::handle_generate))
        .merge(admin)
        .fallback(route_not_found)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .with_state(state)
}

async fn health_check() -> impl IntoResponse {
    Json(json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") }))
}

async fn route_not_found(uri: Uri) -> ApiError {
    ApiError::not_found(format!("No route for {}", uri.path()))
}

/// Configuration for starting the Axum server
pub struct ServerStartConfig {
    pub host: String,
    pub port: u16,
    pub state: AppState,
    pub admin_key: AdminKey,
}

pub struct AxumServer {
    config: ServerStartConfig,
}

impl AxumServer {
    pub fn new(config: ServerStartConfig) -> Self {
        Self { config }
    }

    /// Serve until `shutdown` resolves, then drain in-flight requests.
    pub async fn run<F>(self, shutdown: F) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let app = build_proxy_router(self.config.state, self.config.admin_key);

        let listener = tokio::net::TcpListener::bind(&addr).await?;
        tracing::info!("Gateway listening on http://{}", listener.local_addr()?);

        axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
        Ok(())
    }
}
