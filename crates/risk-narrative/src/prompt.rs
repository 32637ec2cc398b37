//! Korean prompt assembly for the analysis and prediction narratives.

use crate::client::ChatMessage;
use district_data::DistrictRecord;
use risk_tiers::{description_for, label_is_high_risk};

/// System persona for the district-analysis narrative.
pub const ANALYST_PERSONA: &str =
    "당신은 서울의 젠트리피케이션과 상권 변화를 분석하는 전문가입니다.";

/// System persona for the prediction-form narrative.
pub const PREDICTION_PERSONA: &str =
    "당신은 젠트리피케이션과 상권 변화를 분석하는 전문가입니다.";

/// Sampling temperature for narrative generation.
pub const GENERATION_TEMPERATURE: f64 = 0.2;

/// Sampling temperature for the consistency self-check.
pub const CONSISTENCY_TEMPERATURE: f64 = 0.0;

/// Cap on peer districts named in the analysis prompt.
pub const MAX_PEERS: usize = 5;

const CONCEPT_PRIMER: &str = "📢 **💡 젠트리피케이션과 상권 활성화란?**\n\
젠트리피케이션(Gentrification)은 특정 지역의 경제가 성장하면서 건물 임대료가 오르고 기존 거주민들이 떠나게 되는 현상을 말합니다.\n\
상권 활성화는 소비와 유동 인구가 증가하면서 지역 경제가 활발해지는 것을 뜻합니다.";

fn progress_comment(tier_label: &str) -> &'static str {
    if label_is_high_risk(tier_label) {
        "📍 이 지역은 이미 다른 지역에 비해 상권 활성화와 젠트리피케이션이 상당히 진행된 상태입니다."
    } else {
        "📍 이 지역은 아직 다른 지역에 비해 젠트리피케이션과 상권 활성화가 상대적으로 덜 진행된 곳입니다."
    }
}

fn peers_line(district: &str, peers: &[String]) -> String {
    if peers.is_empty() {
        "🔹 이 지역과 같은 위험 단계를 가진 다른 지역 정보가 부족합니다.".to_string()
    } else {
        let named: Vec<&str> = peers.iter().take(MAX_PEERS).map(|s| s.as_str()).collect();
        format!(
            "🔹 **'{}'과(와) 같은 위험 단계를 가진 서울 지역:** {} 등",
            district,
            named.join(", ")
        )
    }
}

/// Analysis prompt for one district record: tier, canned description,
/// progress comment, the four indices (2-decimal rounded), and same-tier
/// peer districts.
pub fn district_analysis_messages(record: &DistrictRecord, peers: &[String]) -> Vec<ChatMessage> {
    let tier = &record.tier_label;
    let body = format!(
        "🏙️ **{dong}의 위험 분석**\n\n\
         🔎 이 지역은 **{tier}** 단계에 해당합니다.\n\
         {comment}\n\
         {explanation}\n\n\
         {primer}\n\n\
         📊 **📌 {dong}의 주요 경제 지표**\n\
         - 🏬 **상권 활성화 지수**: {trade:.2}\n\
         - 🏙️ **젠트리피케이션 지수**: {gentri:.2}\n\
         - 📢 **SNS 상권 활성화 점수**: {sns_trade:.2}\n\
         - 💬 **SNS 젠트리피케이션 점수**: {sns_gentri:.2}\n\n\
         {peers}\n\n\
         🔎 **이제 위의 데이터를 바탕으로 {dong}의 경제적 위험성과 향후 전망을 상세히 분석해주세요.**\n\
         - 만약 \"{tier}\"에 \"위험_\"이 포함되어 있으면, 해당 지역은 다른 지역에 비해 상권 활성화와 젠트리피케이션이 상당히 진행된 상태입니다. 이를 고려하여 분석해주세요.\n\
         - 현재 이 지역의 경제적 변화 수준이 다른 지역과 비교했을 때 어느 정도인지 설명해주세요.\n\
         - 상권 활성화가 계속 진행될 가능성이 높은지, 젠트리피케이션이 앞으로 어떤 영향을 미칠지 분석해주세요.\n\
         - 지역 상권과 부동산 시장에 미치는 영향을 포함해서 전망을 이야기해주세요.",
        dong = record.name,
        tier = tier,
        comment = progress_comment(tier),
        explanation = description_for(tier),
        primer = CONCEPT_PRIMER,
        trade = record.business_activation,
        gentri = record.gentrification,
        sns_trade = record.business_activation_sns,
        sns_gentri = record.gentrification_sns,
        peers = peers_line(&record.name, peers),
    );

    vec![ChatMessage::system(ANALYST_PERSONA), ChatMessage::user(body)]
}

/// Self-check prompt asking whether a generated narrative logically matches
/// the stated tier, in the fixed `일관성 점수: [숫자]` response template.
pub fn consistency_messages(tier_label: &str, narrative: &str) -> Vec<ChatMessage> {
    let body = format!(
        "다음 설명이 '{tier}' 위험 단계와 논리적으로 일치하는지 100점 만점으로 평가해 주세요.\n\
         - 위험 단계: {tier}\n\
         - 설명: {narrative}\n\
         결과는 다음 형식으로 제공하세요:\n\
         일관성 점수: [숫자]",
        tier = tier_label,
        narrative = narrative,
    );
    vec![ChatMessage::user(body)]
}

/// Prediction-form prompt: the user-entered indices and the predicted tier.
pub fn prediction_messages(
    region: &str,
    risk_level: &str,
    features: &[f64; 4],
) -> Vec<ChatMessage> {
    let body = format!(
        "당신은 도시 계획 및 젠트리피케이션 전문가입니다.\n\
         현재 사용자가 '{region}' 지역의 젠트리피케이션 위험을 예측하려고 합니다.\n\n\
         {primer}\n\n\
         📊 입력된 지수:\n\
         - 🏬 **상권 활성화 지수**: {trade}\n\
         - 🏙️ **젠트리피케이션 지수**: {gentri}\n\
         - 📢 **SNS 상권 활성화 점수**: {sns_trade}\n\
         - 💬 **SNS 젠트리피케이션 점수**: {sns_gentri}\n\n\
         🏙️ AI 모델이 예측한 위험 단계: {level}\n\n\
         🔍 해당 위험 단계에 대한 분석과 미래 전망을 전문가 수준으로 설명해 주세요.\n\
         - 만약 \"{level}\"에 \"위험_\"이 포함되어 있으면, 해당 지역은 다른 지역에 비해 상권 활성화와 젠트리피케이션이 상당히 진행된 상태입니다. 이를 고려하여 분석해주세요.\n\
         - 현재 이 지역의 경제적 변화 수준이 다른 지역과 비교했을 때 어느 정도인지 설명해주세요.\n\
         - 상권 활성화가 계속 진행될 가능성이 높은지, 젠트리피케이션이 앞으로 어떤 영향을 미칠지 분석해주세요.\n\
         - 지역 상권과 부동산 시장에 미치는 영향을 포함해서 전망을 이야기해주세요.",
        region = region,
        primer = CONCEPT_PRIMER,
        trade = features[0],
        gentri = features[2],
        sns_trade = features[1],
        sns_gentri = features[3],
        level = risk_level,
    );
    vec![
        ChatMessage::system(PREDICTION_PERSONA),
        ChatMessage::user(body),
    ]
}
