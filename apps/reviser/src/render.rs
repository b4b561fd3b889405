//! Plain-text rendering of the result screen for the terminal.

use std::fmt::Write;

use crate::feedback::aggregator::ViewModel;
use crate::feedback::parser::FeedbackDocument;

pub fn render_result(view: &ViewModel) -> String {
    let mut out = String::new();

    if !view.cheer_message.is_empty() {
        let _ = writeln!(out, "{}\n", view.cheer_message);
    }

    if let (Some(feedback), Some(band)) = (&view.feedback, view.score_band) {
        let _ = writeln!(
            out,
            "== Score: {} / 100 ({}, {})",
            feedback.score,
            band.label(),
            band.tone()
        );
        render_feedback(&mut out, feedback);
    }

    let _ = writeln!(out, "== {}", view.document_source.heading());
    let _ = writeln!(out, "{}", view.final_document_text);
    out
}

fn render_feedback(out: &mut String, feedback: &FeedbackDocument) {
    let _ = writeln!(out, "\n-- Missing keywords");
    if feedback.missing_keywords.is_empty() {
        let _ = writeln!(out, "   All key keywords are covered.");
    } else {
        let _ = writeln!(out, "   {}", feedback.missing_keywords.join(", "));
    }

    let _ = writeln!(out, "\n-- Strengths");
    for s in &feedback.strengths {
        let _ = writeln!(out, " + {s}");
    }

    let _ = writeln!(out, "\n-- Weaknesses");
    if feedback.weaknesses.is_empty() {
        let _ = writeln!(out, "   No notable weaknesses.");
    }
    for w in &feedback.weaknesses {
        let _ = writeln!(out, " - {w}");
    }

    if !feedback.overall_advice.is_empty() {
        let _ = writeln!(out, "\n-- Overall advice\n{}", feedback.overall_advice);
    }
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::critique_client::CritiqueResponse;
    use crate::feedback::aggregator::aggregate;

    fn view(feedback_result: &str, rewrite: &str) -> ViewModel {
        aggregate(
            &CritiqueResponse {
                feedback_result: feedback_result.to_string(),
                cheer_message: "Good job".to_string(),
                feedback_rewrite: rewrite.to_string(),
            },
            Some("draft"),
        )
    }

    #[test]
    fn test_full_result() {
        let text = render_result(&view(
            r#"{"score":85,"strengths":["clear"],"weaknesses":[],"missing_keywords":["Docker"],"overall_advice":"Add metrics."}"#,
            "Revised essay text",
        ));
        assert!(text.starts_with("Good job"));
        assert!(text.contains("Score: 85 / 100 (Good, blue)"));
        assert!(text.contains("Docker"));
        assert!(text.contains(" + clear"));
        assert!(text.contains("No notable weaknesses."));
        assert!(text.contains("Add metrics."));
        assert!(text.contains("== Revised cover letter\nRevised essay text"));
    }

    #[test]
    fn test_feedback_block_omitted_when_unparseable() {
        let text = render_result(&view("not json", "Revised essay text"));
        assert!(!text.contains("Score"));
        assert!(text.contains("Revised essay text"));
    }

    #[test]
    fn test_empty_advice_is_omitted() {
        let text = render_result(&view(
            r#"{"score":40,"strengths":[],"weaknesses":["vague"],"missing_keywords":[],"overall_advice":""}"#,
            "",
        ));
        assert!(text.contains("(Needs improvement, orange)"));
        assert!(text.contains("All key keywords are covered."));
        assert!(!text.contains("Overall advice"));
        assert!(text.contains("== Generated cover letter\ndraft"));
    }
}
