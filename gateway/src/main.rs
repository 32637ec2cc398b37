use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Json, Router,
};
use district_data::DistrictAtlas;
use risk_narrative::{ChatClient, NarrativeEngine};
use risk_tiers::TierClassifier;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod narrative_routes;
mod routes;

#[derive(Clone)]
pub struct AppState {
    pub atlas: Arc<DistrictAtlas>,
    pub classifier: Arc<TierClassifier>,
    pub engine: Arc<NarrativeEngine>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "gentry_gateway=debug,info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = config::GatewayConfig::from_env();

    // Startup snapshot: dataset, boundaries, and classifier load once and
    // stay immutable for the process lifetime. A failure here is fatal; the
    // service cannot serve without them.
    let atlas = DistrictAtlas::load(&cfg.data_path, &cfg.boundary_path)
        .context("loading district dataset")?;
    tracing::info!("   Loaded {} districts", atlas.table.len());

    let classifier = TierClassifier::load(&cfg.model_path, &cfg.encoder_path)
        .context("loading classifier artifacts")?;
    tracing::info!("   Classifier labels: {:?}", classifier.labels());

    let engine = NarrativeEngine::new(Arc::new(ChatClient::new(cfg.chat.clone())));

    let state = AppState {
        atlas: Arc::new(atlas),
        classifier: Arc::new(classifier),
        engine: Arc::new(engine),
    };

    // API routes for dashboard and prediction operations
    let risk_routes = Router::new()
        .route("/districts", get(routes::list_districts))
        .route("/districts/:name/dashboard", get(routes::district_dashboard))
        .route(
            "/districts/:name/narrative",
            post(narrative_routes::district_narrative),
        )
        .route("/predict", post(narrative_routes::predict))
        .with_state(state);

    let api_routes = Router::new()
        .route("/health", get(health))
        .nest("/api/v1", risk_routes)
        .layer(CorsLayer::permissive());

    // Static file serving for UI (if dist exists)
    let ui_path = std::path::Path::new("ui/dist");
    let app = if ui_path.exists() {
        tracing::info!("   Serving UI from {}", ui_path.display());
        api_routes.fallback_service(ServeDir::new(ui_path))
    } else {
        api_routes
    };

    let port = std::env::var("GENTRY_GATEWAY_PORT")
        .or_else(|_| std::env::var("PORT"))
        .unwrap_or_else(|_| "18701".to_string());
    let addr = format!("0.0.0.0:{}", port);

    tracing::info!("🏙️  Gentry Gateway starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "gentry-gateway",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
