//! Decoder for the `feedback_result` payload returned by the critique service.
//!
//! The service embeds the structured critique as a JSON string inside its own
//! JSON response. Decoding is purely structural: every field must be present
//! with the right type, and values are passed through untouched. A payload that
//! fails to decode yields no document at all.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Structured critique of a submitted essay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackDocument {
    /// Expected to fall in 0–100, not enforced.
    pub score: i64,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub overall_advice: String,
}

#[derive(Debug, Error)]
#[error("Malformed feedback payload: {0}")]
pub struct ParseError(#[from] serde_json::Error);

/// Decodes a raw `feedback_result` string into a [`FeedbackDocument`].
///
/// Logs the raw input on failure; the caller decides how to degrade.
pub fn parse(raw: &str) -> Result<FeedbackDocument, ParseError> {
    serde_json::from_str::<FeedbackDocument>(raw).map_err(|e| {
        warn!(error = %e, raw = %raw, "Failed to parse feedback_result");
        ParseError(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{"score":85,"strengths":["clear"],"weaknesses":[],"missing_keywords":["Docker"],"overall_advice":"Add metrics."}"#;

    #[test]
    fn test_parses_well_formed_payload() {
        let doc = parse(SAMPLE).unwrap();
        assert_eq!(doc.score, 85);
        assert_eq!(doc.strengths, vec!["clear".to_string()]);
        assert!(doc.weaknesses.is_empty());
        assert_eq!(doc.missing_keywords, vec!["Docker".to_string()]);
        assert_eq!(doc.overall_advice, "Add metrics.");
    }

    #[test]
    fn test_round_trip_preserves_every_field() {
        let doc = FeedbackDocument {
            score: 72,
            strengths: vec!["structure".to_string(), "tone".to_string()],
            weaknesses: vec!["too long".to_string()],
            missing_keywords: vec!["Kubernetes".to_string(), "CI/CD".to_string()],
            overall_advice: "Cut the intro in half.".to_string(),
        };
        let encoded = serde_json::to_string(&doc).unwrap();
        assert_eq!(parse(&encoded).unwrap(), doc);
    }

    #[test]
    fn test_not_json_is_an_error() {
        assert!(parse("not json").is_err());
        assert!(parse("").is_err());
    }

    #[test]
    fn test_missing_field_rejects_whole_document() {
        let raw = r#"{"score":85,"strengths":[],"weaknesses":[],"overall_advice":""}"#;
        assert!(parse(raw).is_err());
    }

    #[test]
    fn test_wrong_shape_is_an_error() {
        assert!(parse(r#"["score", 85]"#).is_err());
        assert!(parse(r#"{"score":"high","strengths":[],"weaknesses":[],"missing_keywords":[],"overall_advice":""}"#).is_err());
        assert!(parse(r#""just a string""#).is_err());
    }

    #[test]
    fn test_out_of_range_score_passes_through() {
        let raw = r#"{"score":-15,"strengths":[],"weaknesses":[],"missing_keywords":[],"overall_advice":""}"#;
        assert_eq!(parse(raw).unwrap().score, -15);

        let raw = r#"{"score":250,"strengths":[],"weaknesses":[],"missing_keywords":[],"overall_advice":""}"#;
        assert_eq!(parse(raw).unwrap().score, 250);
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let raw = r#"{"score":90,"strengths":[],"weaknesses":[],"missing_keywords":[],"overall_advice":"","model":"x"}"#;
        assert_eq!(parse(raw).unwrap().score, 90);
    }
}
