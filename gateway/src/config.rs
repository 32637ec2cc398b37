//! Environment-driven gateway configuration.

use risk_narrative::ChatConfig;
use std::path::PathBuf;

fn env_path(key: &str, default: &str) -> PathBuf {
    std::env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .into()
}

/// Paths and client settings assembled once at startup.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Tabular risk dataset (CSV).
    pub data_path: PathBuf,
    /// District boundary GeoJSON.
    pub boundary_path: PathBuf,
    /// Classifier artifact.
    pub model_path: PathBuf,
    /// Label encoder artifact.
    pub encoder_path: PathBuf,
    /// Hosted text-generation endpoint settings.
    pub chat: ChatConfig,
}

impl GatewayConfig {
    pub fn from_env() -> Self {
        Self {
            data_path: env_path("RISK_DATA_PATH", "data/districts.csv"),
            boundary_path: env_path("RISK_BOUNDARY_PATH", "data/seoul_districts.geojson"),
            model_path: env_path("RISK_MODEL_PATH", "data/model/classifier.json"),
            encoder_path: env_path("RISK_ENCODER_PATH", "data/model/label_encoder.json"),
            chat: ChatConfig::from_env(),
        }
    }
}
