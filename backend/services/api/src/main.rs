mod error;
mod matching;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Json, Router,
};
use resolver_agent::{EntityResolver, ResolveSource};
use resolver_common::types::ServiceInfo;
use resolver_config::{init_tracing, AppConfig};
use resolver_matching::{rubric_for, Rubric};
use tower_http::cors::CorsLayer;

const SERVICE_NAME: &str = "resolver-api";

/// Read-only after startup; shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<dyn ResolveSource>,
    pub rubric: Arc<Rubric>,
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn info(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> Json<ServiceInfo> {
    Json(
        ServiceInfo::new(SERVICE_NAME)
            .with_rubric(state.rubric.entity_type.as_str(), state.rubric.method.as_str()),
    )
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

fn build_router(state: AppState, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/info", get(info))
        .merge(matching::router())
        .layer(cors_layer(cors_origins))
        .with_state(state)
}

#[tokio::main]
async fn main() {
    let config = AppConfig::from_env().expect("failed to load config");
    init_tracing(&config.log_level);
    tracing::info!(service = SERVICE_NAME, "starting");

    let rubric = rubric_for(&config.entity_type, &config.scoring_method)
        .expect("invalid rubric selection");
    let resolver = EntityResolver::from_config(&config.llm, &config.catalog, &rubric)
        .expect("failed to build resolver");

    let state = AppState {
        resolver: Arc::new(resolver),
        rubric: Arc::new(rubric),
    };

    let app = build_router(state, &config.cors_origins);
    let addr: SocketAddr = config.bind_addr().parse().expect("invalid bind address");

    tracing::info!(%addr, "listening");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind");
    axum::serve(listener, app).await.expect("server error");
}
