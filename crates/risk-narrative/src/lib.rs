//! Narrative Generation with Quality Gate
//!
//! Assembles Korean analysis prompts from district records, calls a hosted
//! chat-completion endpoint, and gates the generated text behind two
//! heuristic scores:
//!
//! - **factual accuracy** — regex extraction of `field: number` patterns,
//!   penalized by percentage deviation from the source record;
//! - **consistency** — a second hosted-model call self-reporting a 0-100
//!   alignment score between the text and the stated tier.
//!
//! Generation retries up to a fixed bound until both scores clear the
//! threshold. Transport faults short-circuit the loop; content-quality
//! failures are the only thing worth retrying.

pub mod client;
pub mod engine;
pub mod prompt;
pub mod scoring;

pub use client::{ChatClient, ChatConfig, ChatError, ChatMessage, CompletionBackend};
pub use engine::{NarrativeEngine, NarrativeOutcome, NarrativeReport, QualityGate};
pub use scoring::{parse_consistency_score, FactualScorer};

/// Fixed user-facing message for a district with no dataset row.
pub fn missing_data_message(district: &str) -> String {
    format!(
        "⚠️ '{}'에 대한 데이터가 없습니다. 올바른 행정동을 입력해주세요.",
        district
    )
}

/// Fixed user-facing message for any hosted-service fault.
pub const SERVICE_FAULT_MESSAGE: &str = "⚠️ OpenAI API 호출에 실패했습니다.";
