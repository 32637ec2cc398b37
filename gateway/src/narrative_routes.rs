use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::AppState;
use risk_narrative::{missing_data_message, NarrativeOutcome, SERVICE_FAULT_MESSAGE};
use risk_tiers::{description_for, display_label_for};

/// Form inputs are bounded; anything outside the range is pulled back in
/// before it reaches the classifier.
const INDEX_RANGE: (f64, f64) = (-100.0, 100.0);

/// Placeholder region name when the form leaves it blank.
const DEFAULT_REGION: &str = "사용자 입력 지역";

fn clamp_index(value: f64) -> f64 {
    value.clamp(INDEX_RANGE.0, INDEX_RANGE.1)
}

#[derive(Serialize)]
pub struct NarrativeResponse {
    pub district: String,
    pub accepted: bool,
    pub narrative: String,
    pub factual_score: Option<f64>,
    pub consistency_score: Option<f64>,
    pub attempts: Option<u32>,
}

/// Quality-gated analysis narrative for a district. Failures (missing data,
/// hosted-service fault, gate exhaustion) are messages in the same shape,
/// never HTTP errors: the view renders whatever text comes back.
pub async fn district_narrative(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Json<NarrativeResponse> {
    let Some(record) = state.atlas.get(&name) else {
        return Json(NarrativeResponse {
            district: name.clone(),
            accepted: false,
            narrative: missing_data_message(&name),
            factual_score: None,
            consistency_score: None,
            attempts: None,
        });
    };

    let peers: Vec<String> = state
        .atlas
        .table
        .peers_of(&name)
        .iter()
        .map(|r| r.name.clone())
        .collect();

    let outcome = state.engine.district_narrative(record, &peers).await;
    let narrative = outcome.user_message();
    let response = match outcome {
        NarrativeOutcome::Accepted(report) => NarrativeResponse {
            district: name,
            accepted: true,
            narrative,
            factual_score: Some(report.factual_score),
            consistency_score: Some(report.consistency_score),
            attempts: Some(report.attempts),
        },
        NarrativeOutcome::Rejected { attempts, .. } => NarrativeResponse {
            district: name,
            accepted: false,
            narrative,
            factual_score: None,
            consistency_score: None,
            attempts: Some(attempts),
        },
        NarrativeOutcome::Fault => NarrativeResponse {
            district: name,
            accepted: false,
            narrative,
            factual_score: None,
            consistency_score: None,
            attempts: None,
        },
    };
    Json(response)
}

#[derive(Deserialize)]
pub struct PredictRequest {
    #[serde(default)]
    pub region_name: Option<String>,
    pub business_activation: f64,
    pub business_activation_sns: f64,
    pub gentrification: f64,
    pub gentrification_sns: f64,
}

#[derive(Serialize)]
pub struct PredictResponse {
    pub region: String,
    pub tier: String,
    pub display_label: String,
    pub caution: Option<String>,
    pub description: String,
    pub ai_analysis: String,
}

/// Prediction form: four indices through the trained classifier, then a
/// hosted-model explanation of the predicted tier.
pub async fn predict(
    State(state): State<AppState>,
    Json(request): Json<PredictRequest>,
) -> Json<PredictResponse> {
    let features = [
        clamp_index(request.business_activation),
        clamp_index(request.business_activation_sns),
        clamp_index(request.gentrification),
        clamp_index(request.gentrification_sns),
    ];

    let prediction = state.classifier.predict_tier(&features);
    let region = request
        .region_name
        .filter(|r| !r.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_REGION.to_string());

    let ai_analysis = match state
        .engine
        .prediction_narrative(&region, &prediction.label, &features)
        .await
    {
        Ok(text) => text,
        Err(err) => {
            tracing::warn!("prediction narrative failed: {}", err);
            SERVICE_FAULT_MESSAGE.to_string()
        }
    };

    Json(PredictResponse {
        region,
        display_label: display_label_for(&prediction.label),
        description: description_for(&prediction.label).to_string(),
        caution: prediction.caution.map(str::to_string),
        tier: prediction.label,
        ai_analysis,
    })
}
