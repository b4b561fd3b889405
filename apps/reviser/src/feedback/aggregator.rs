use serde::Serialize;

use crate::critique_client::CritiqueResponse;
use crate::feedback::parser::{parse, FeedbackDocument};
use crate::feedback::presentation::{score_band, select_document_text, DocumentSource, ScoreBand};

/// Everything the result screen needs, derived fresh from one response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewModel {
    pub final_document_text: String,
    pub document_source: DocumentSource,
    pub feedback: Option<FeedbackDocument>,
    /// Present exactly when `feedback` is.
    pub score_band: Option<ScoreBand>,
    pub cheer_message: String,
}

/// Builds the view model for a successful critique.
///
/// A malformed `feedback_result` only drops the feedback block; the finalized
/// document is still produced. `fallback` is the last locally generated draft.
pub fn aggregate(response: &CritiqueResponse, fallback: Option<&str>) -> ViewModel {
    let feedback = parse(&response.feedback_result).ok();
    let score_band = feedback.as_ref().map(|f| score_band(f.score));

    let final_document_text =
        select_document_text(&[Some(response.feedback_rewrite.as_str()), fallback]);
    let document_source = if !response.feedback_rewrite.is_empty() {
        DocumentSource::Rewrite
    } else if final_document_text.is_empty() {
        DocumentSource::Empty
    } else {
        DocumentSource::Draft
    };

    ViewModel {
        final_document_text,
        document_source,
        feedback,
        score_band,
        cheer_message: response.cheer_message.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(feedback_result: &str, rewrite: &str) -> CritiqueResponse {
        CritiqueResponse {
            feedback_result: feedback_result.to_string(),
            cheer_message: "Good job".to_string(),
            feedback_rewrite: rewrite.to_string(),
        }
    }

    const SAMPLE: &str = r#"{"score":85,"strengths":["clear"],"weaknesses":[],"missing_keywords":["Docker"],"overall_advice":"Add metrics."}"#;

    #[test]
    fn test_well_formed_response() {
        let vm = aggregate(&response(SAMPLE, "Revised essay text"), None);
        assert_eq!(vm.score_band, Some(ScoreBand::Good));
        assert_eq!(vm.final_document_text, "Revised essay text");
        assert_eq!(vm.document_source, DocumentSource::Rewrite);
        assert_eq!(vm.cheer_message, "Good job");
        let feedback = vm.feedback.unwrap();
        assert_eq!(feedback.missing_keywords, vec!["Docker".to_string()]);
    }

    #[test]
    fn test_malformed_feedback_still_renders_document() {
        let vm = aggregate(&response("not json", "Revised essay text"), Some("draft"));
        assert!(vm.feedback.is_none());
        assert!(vm.score_band.is_none());
        assert_eq!(vm.final_document_text, "Revised essay text");
    }

    #[test]
    fn test_empty_rewrite_uses_draft() {
        let vm = aggregate(&response(SAMPLE, ""), Some("local draft"));
        assert_eq!(vm.final_document_text, "local draft");
        assert_eq!(vm.document_source, DocumentSource::Draft);
        assert_eq!(vm.document_source.heading(), "Generated cover letter");
    }

    #[test]
    fn test_no_text_anywhere_is_empty_string() {
        let vm = aggregate(&response(SAMPLE, ""), None);
        assert_eq!(vm.final_document_text, "");
        assert_eq!(vm.document_source, DocumentSource::Empty);
        assert!(vm.feedback.is_some());
    }

    #[test]
    fn test_aggregate_is_deterministic() {
        let r = response(SAMPLE, "Revised essay text");
        assert_eq!(aggregate(&r, Some("d")), aggregate(&r, Some("d")));
    }
}
