//! Diagnosis Server
//!
//! Three model-backed prediction endpoints in one process.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     DIAGNOSIS SERVER                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  POST /predict        POST /hd             POST /model      │
//! │  (multipart image)    (clinical JSON)      (symptom JSON)   │
//! │        │                    │                    │          │
//! │        ▼                    ▼                    ▼          │
//! │   Validator            Validator            Validator       │
//! │   Image → NHWC         Tabular row          One-hot vector  │
//! │        │               Column transform     Scaler → PCA    │
//! │        ▼                    ▼                    ▼          │
//! │   ┌─────────────────────────────────────────────────────┐  │
//! │   │        ONNX Runtime (loaded once at startup)        │  │
//! │   └─────────────────────────────────────────────────────┘  │
//! │        ▼                    ▼                    ▼          │
//! │   class + confidence   outcome string       label           │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod extract;
mod features;
mod handlers;
mod inference;
mod models;
mod state;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
};
use tower_http::{
    cors::{AllowHeaders, AllowMethods, Any, CorsLayer},
    trace::TraceLayer,
    compression::CompressionLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use std::net::SocketAddr;

use anyhow::Context;

pub use error::{AppError, AppResult};
pub use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "diagnosis_server=debug,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    tracing::info!("Diagnosis Server starting...");

    // Load model artifacts before accepting any request
    let state = AppState::new(config.clone());
    let loader = state.clone();
    tokio::task::spawn_blocking(move || loader.load_models())
        .await
        .context("model loading task failed")??;

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.host, config.port);
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}

/// CORS for the clinical endpoint: explicit origins, credentials allowed
fn clinical_cors(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", o);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    // Open routes (any origin)
    let open_routes = Router::new()
        .route("/health", get(handlers::health::check))
        .route("/predict", post(handlers::tumor::predict))
        .route("/model", post(handlers::symptoms::predict))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        );

    // Clinical route (allow-list)
    let clinical_routes = Router::new()
        .route("/hd", post(handlers::heart::predict))
        .layer(clinical_cors(&state.config.heart_allowed_origins));

    Router::new()
        .merge(open_routes)
        .merge(clinical_routes)
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
