//! Quality-gated narrative engine
//!
//! One generation attempt is: complete the analysis prompt, score the text
//! for factual accuracy, then ask the hosted model to self-report a
//! consistency score. Attempts repeat up to the configured bound until both
//! scores clear the threshold. Hosted-service faults are not content
//! failures: they abort the loop immediately and surface as the fixed fault
//! message.

use crate::client::{ChatError, CompletionBackend};
use crate::prompt::{
    consistency_messages, district_analysis_messages, prediction_messages,
    CONSISTENCY_TEMPERATURE, GENERATION_TEMPERATURE,
};
use crate::scoring::{parse_consistency_score, FactualScorer, DEFAULT_MIN_SCORE};
use crate::SERVICE_FAULT_MESSAGE;
use district_data::DistrictRecord;
use std::sync::Arc;
use tracing::{info, warn};

/// Bounded dual-threshold acceptance policy.
#[derive(Debug, Clone, Copy)]
pub struct QualityGate {
    pub max_attempts: u32,
    pub min_score: f64,
}

impl Default for QualityGate {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            min_score: DEFAULT_MIN_SCORE,
        }
    }
}

/// An accepted narrative with its scores.
#[derive(Debug, Clone)]
pub struct NarrativeReport {
    pub text: String,
    pub factual_score: f64,
    pub consistency_score: f64,
    pub attempts: u32,
}

/// Outcome of a gated generation run.
#[derive(Debug, Clone)]
pub enum NarrativeOutcome {
    Accepted(NarrativeReport),
    /// Every attempt fell below a threshold.
    Rejected {
        district: String,
        attempts: u32,
        min_score: f64,
    },
    /// Hosted-service fault; the loop was short-circuited.
    Fault,
}

impl NarrativeOutcome {
    /// The text a user sees: the narrative itself or the fixed failure
    /// message for its failure class.
    pub fn user_message(&self) -> String {
        match self {
            NarrativeOutcome::Accepted(report) => report.text.clone(),
            NarrativeOutcome::Rejected {
                district,
                attempts,
                min_score,
            } => format!(
                "⚠️ '{}'의 설명을 {}번 시도했으나, 사실성({}점)과 일관성({}점) 기준을 만족하지 못했습니다.",
                district, attempts, min_score, min_score
            ),
            NarrativeOutcome::Fault => SERVICE_FAULT_MESSAGE.to_string(),
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, NarrativeOutcome::Accepted(_))
    }
}

/// Narrative engine: completion backend + gate + factual scorer.
pub struct NarrativeEngine {
    backend: Arc<dyn CompletionBackend>,
    gate: QualityGate,
    scorer: FactualScorer,
}

impl NarrativeEngine {
    pub fn new(backend: Arc<dyn CompletionBackend>) -> Self {
        Self {
            backend,
            gate: QualityGate::default(),
            scorer: FactualScorer::default(),
        }
    }

    pub fn with_gate(mut self, gate: QualityGate) -> Self {
        self.gate = gate;
        self
    }

    pub fn with_scorer(mut self, scorer: FactualScorer) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn gate(&self) -> QualityGate {
        self.gate
    }

    /// Quality-gated analysis narrative for one district record.
    pub async fn district_narrative(
        &self,
        record: &DistrictRecord,
        peers: &[String],
    ) -> NarrativeOutcome {
        let messages = district_analysis_messages(record, peers);
        let actual = record.numeric_fields();

        for attempt in 1..=self.gate.max_attempts {
            let text = match self
                .backend
                .complete(messages.clone(), GENERATION_TEMPERATURE)
                .await
            {
                Ok(text) => text,
                Err(err) => {
                    warn!("narrative generation failed for {}: {}", record.name, err);
                    return NarrativeOutcome::Fault;
                }
            };

            let factual_score = self.scorer.score(&text, &actual);
            let consistency_score = match self.judge_consistency(&record.tier_label, &text).await {
                Ok(score) => score,
                Err(err) => {
                    warn!("consistency check failed for {}: {}", record.name, err);
                    return NarrativeOutcome::Fault;
                }
            };

            info!(
                "[시도 {}] {} 사실성: {}점 | 일관성: {}점",
                attempt, record.name, factual_score, consistency_score
            );

            if factual_score >= self.gate.min_score && consistency_score >= self.gate.min_score {
                return NarrativeOutcome::Accepted(NarrativeReport {
                    text,
                    factual_score,
                    consistency_score,
                    attempts: attempt,
                });
            }
        }

        NarrativeOutcome::Rejected {
            district: record.name.clone(),
            attempts: self.gate.max_attempts,
            min_score: self.gate.min_score,
        }
    }

    /// Prediction-form explanation: a single ungated completion.
    pub async fn prediction_narrative(
        &self,
        region: &str,
        risk_level: &str,
        features: &[f64; 4],
    ) -> Result<String, ChatError> {
        self.backend
            .complete(
                prediction_messages(region, risk_level, features),
                GENERATION_TEMPERATURE,
            )
            .await
    }

    async fn judge_consistency(&self, tier_label: &str, text: &str) -> Result<f64, ChatError> {
        let reply = self
            .backend
            .complete(consistency_messages(tier_label, text), CONSISTENCY_TEMPERATURE)
            .await?;
        Ok(parse_consistency_score(&reply))
    }
}
