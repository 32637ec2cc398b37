//! Narrative quality heuristics
//!
//! The factual scorer is a best-effort textual check, not a strict contract:
//! it only penalizes fields the generated text states in the exact
//! `field: number` form. A paraphrased field silently skips and leaves the
//! score untouched, which inflates it — a documented weakness of the
//! heuristic, accepted rather than patched over. The field list is
//! configuration, so callers can tighten or extend the patterns.

use regex::Regex;

/// Minimum score both heuristics must reach for a narrative to be accepted.
pub const DEFAULT_MIN_SCORE: f64 = 80.0;

/// Regex-based factual-accuracy scorer over `field: number` patterns.
#[derive(Debug, Clone)]
pub struct FactualScorer {
    patterns: Vec<(String, Regex)>,
}

impl FactualScorer {
    /// Build a scorer for the given field names. Each field matches the
    /// generated text as `{field}: {number}` with optional whitespace.
    pub fn new<'a, I>(fields: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let patterns = fields
            .into_iter()
            .map(|field| {
                let pattern = format!(r"{}\s*:\s*([0-9.]+)", regex::escape(field));
                let regex = Regex::new(&pattern).expect("escaped field name is a valid regex");
                (field.to_string(), regex)
            })
            .collect();
        Self { patterns }
    }

    /// Score `text` against the actual `(field, value)` pairs.
    ///
    /// Starts at 100; every recognizable field statement costs the
    /// percentage deviation from the true value, capped at 100 per field.
    /// The result is always within [0, 100] and the function is pure:
    /// identical inputs always score identically.
    pub fn score(&self, text: &str, actual: &[(&str, f64)]) -> f64 {
        let mut score = 100.0;
        for (key, value) in actual {
            let Some((_, regex)) = self.patterns.iter().find(|(k, _)| k == key) else {
                continue;
            };
            let Some(captures) = regex.captures(text) else {
                continue;
            };
            let Ok(generated) = captures[1].parse::<f64>() else {
                continue;
            };
            if *value > 0.0 {
                let error_rate = ((generated - value).abs() / value) * 100.0;
                score -= error_rate.min(100.0);
            }
        }
        score.clamp(0.0, 100.0)
    }
}

impl Default for FactualScorer {
    fn default() -> Self {
        Self::new(district_data::NUMERIC_FIELDS)
    }
}

/// Parse the consistency self-check reply (`일관성 점수: [숫자]` template).
/// A reply that does not follow the template scores 0.
pub fn parse_consistency_score(reply: &str) -> f64 {
    let regex = Regex::new(r"일관성 점수:\s*(\d+)").expect("consistency pattern is a valid regex");
    regex
        .captures(reply)
        .and_then(|c| c[1].parse::<u32>().ok())
        .map(|v| v.min(100) as f64)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn scorer() -> FactualScorer {
        FactualScorer::new(["상권활성화지수", "젠트리피케이션지수"])
    }

    #[test]
    fn test_exact_values_keep_full_score() {
        let text = "상권활성화지수: 10.0 이며 젠트리피케이션지수: 5.0 입니다.";
        let actual = [("상권활성화지수", 10.0), ("젠트리피케이션지수", 5.0)];
        assert_eq!(scorer().score(text, &actual), 100.0);
    }

    #[test]
    fn test_deviation_reduces_score() {
        let actual = [("상권활성화지수", 10.0)];
        let s = scorer();
        // 10% off -> 90
        assert!((s.score("상권활성화지수: 11.0", &actual) - 90.0).abs() < 1e-9);
        // 50% off -> 50
        assert!((s.score("상권활성화지수: 15.0", &actual) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_monotone_in_deviation() {
        let actual = [("상권활성화지수", 10.0)];
        let s = scorer();
        let mut last = 101.0;
        for generated in ["10.0", "10.5", "12.0", "16.0", "40.0"] {
            let score = s.score(&format!("상권활성화지수: {}", generated), &actual);
            assert!(score <= last, "{} should not raise the score", generated);
            last = score;
        }
    }

    #[test]
    fn test_idempotent() {
        let text = "상권활성화지수: 13.7 그리고 젠트리피케이션지수: 2.2";
        let actual = [("상권활성화지수", 10.0), ("젠트리피케이션지수", 5.0)];
        let s = scorer();
        assert_eq!(s.score(text, &actual), s.score(text, &actual));
    }

    #[test]
    fn test_paraphrased_field_is_skipped() {
        // spaced phrasing does not match the column-name pattern
        let text = "상권 활성화 지수: 999.0";
        let actual = [("상권활성화지수", 10.0)];
        assert_eq!(scorer().score(text, &actual), 100.0);
    }

    #[test]
    fn test_per_field_penalty_capped() {
        let text = "상권활성화지수: 99999.0 젠트리피케이션지수: 5.0";
        let actual = [("상권활성화지수", 10.0), ("젠트리피케이션지수", 5.0)];
        // one fully-wrong field costs at most 100
        assert_eq!(scorer().score(text, &actual), 0.0);
    }

    #[test]
    fn test_nonpositive_true_values_are_ignored() {
        let text = "상권활성화지수: 50.0";
        let actual = [("상권활성화지수", -3.0)];
        assert_eq!(scorer().score(text, &actual), 100.0);
    }

    #[test]
    fn test_consistency_parse() {
        assert_eq!(parse_consistency_score("일관성 점수: 85"), 85.0);
        assert_eq!(parse_consistency_score("결과:\n일관성 점수: 100"), 100.0);
        assert_eq!(parse_consistency_score("점수를 드릴 수 없습니다"), 0.0);
        // out-of-template values clamp to the scale
        assert_eq!(parse_consistency_score("일관성 점수: 400"), 100.0);
    }

    proptest! {
        #[test]
        fn prop_score_is_clamped(
            text in ".{0,200}",
            v1 in -1000.0f64..1000.0,
            v2 in -1000.0f64..1000.0,
        ) {
            let actual = [("상권활성화지수", v1), ("젠트리피케이션지수", v2)];
            let score = scorer().score(&text, &actual);
            prop_assert!((0.0..=100.0).contains(&score));
        }

        #[test]
        fn prop_consistency_is_clamped(reply in ".{0,200}") {
            let score = parse_consistency_score(&reply);
            prop_assert!((0.0..=100.0).contains(&score));
        }
    }
}
