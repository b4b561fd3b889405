use serde::{Deserialize, Serialize};

/// Display band for a critique score. Lower bounds are inclusive.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Excellent,
    Good,
    Fair,
    NeedsImprovement,
}

impl ScoreBand {
    pub fn label(self) -> &'static str {
        match self {
            ScoreBand::Excellent => "Excellent",
            ScoreBand::Good => "Good",
            ScoreBand::Fair => "Fair",
            ScoreBand::NeedsImprovement => "Needs improvement",
        }
    }

    /// Colour family the score badge is drawn in.
    pub fn tone(self) -> &'static str {
        match self {
            ScoreBand::Excellent => "green",
            ScoreBand::Good => "blue",
            ScoreBand::Fair => "yellow",
            ScoreBand::NeedsImprovement => "orange",
        }
    }
}

/// Maps a score to its band. Scores outside 0–100 are not clamped; they fall
/// through the same comparisons.
pub fn score_band(score: i64) -> ScoreBand {
    if score >= 90 {
        ScoreBand::Excellent
    } else if score >= 80 {
        ScoreBand::Good
    } else if score >= 70 {
        ScoreBand::Fair
    } else {
        ScoreBand::NeedsImprovement
    }
}

/// Which candidate ended up as the finalized document.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DocumentSource {
    Rewrite,
    Draft,
    Empty,
}

impl DocumentSource {
    pub fn heading(self) -> &'static str {
        match self {
            DocumentSource::Rewrite => "Revised cover letter",
            DocumentSource::Draft | DocumentSource::Empty => "Generated cover letter",
        }
    }
}

/// Returns the first non-empty candidate in priority order, or `""`.
pub fn select_document_text(candidates: &[Option<&str>]) -> String {
    candidates
        .iter()
        .flatten()
        .find(|s| !s.is_empty())
        .map(|s| s.to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_boundaries() {
        let table = [
            (89, ScoreBand::Good),
            (90, ScoreBand::Excellent),
            (79, ScoreBand::Fair),
            (80, ScoreBand::Good),
            (69, ScoreBand::NeedsImprovement),
            (70, ScoreBand::Fair),
        ];
        for (score, expected) in table {
            assert_eq!(score_band(score), expected, "score {score}");
        }
    }

    #[test]
    fn test_band_out_of_range_scores() {
        assert_eq!(score_band(150), ScoreBand::Excellent);
        assert_eq!(score_band(i64::MAX), ScoreBand::Excellent);
        assert_eq!(score_band(-1), ScoreBand::NeedsImprovement);
        assert_eq!(score_band(i64::MIN), ScoreBand::NeedsImprovement);
    }

    #[test]
    fn test_band_labels_and_tones() {
        assert_eq!(ScoreBand::NeedsImprovement.label(), "Needs improvement");
        assert_eq!(ScoreBand::Excellent.tone(), "green");
        assert_eq!(ScoreBand::Good.tone(), "blue");
    }

    #[test]
    fn test_select_falls_back_past_empty() {
        assert_eq!(select_document_text(&[Some(""), Some("fallback")]), "fallback");
    }

    #[test]
    fn test_select_all_empty_is_empty_string() {
        assert_eq!(select_document_text(&[Some(""), Some("")]), "");
        assert_eq!(select_document_text(&[None, None]), "");
        assert_eq!(select_document_text(&[]), "");
    }

    #[test]
    fn test_select_prefers_primary() {
        assert_eq!(select_document_text(&[Some("primary"), Some("fallback")]), "primary");
        assert_eq!(select_document_text(&[None, Some("fallback")]), "fallback");
    }
}
