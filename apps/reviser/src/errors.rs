use thiserror::Error;

use crate::critique_client::TransportError;
use crate::lifecycle::{Generation, Rejection, Screen};

/// Submission rejected before any request is issued.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Essay text cannot be empty")]
    EmptyEssay,

    #[error("Job description cannot be empty")]
    EmptyJobDescription,
}

/// Clipboard or file export failure. Never affects the lifecycle.
#[derive(Debug, Error)]
pub enum SideEffectError {
    #[error("Clipboard error: {0}")]
    Clipboard(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Nothing to {0}: no result is being shown")]
    NoResult(&'static str),
}

/// Application-level error type used at the session and CLI boundary.
/// Only `Transport` moves the lifecycle. Feedback parse failures never reach
/// this type; they are absorbed by the aggregator.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Request failed: {0}")]
    Transport(#[from] TransportError),

    #[error(transparent)]
    SideEffect(#[from] SideEffectError),

    #[error("A request is already in flight")]
    Busy,

    #[error("Not available on the {0:?} screen")]
    NotApplicable(Screen),

    #[error("Response for generation {0} no longer matches the screen")]
    Stale(Generation),
}

impl From<Rejection> for AppError {
    fn from(rejection: Rejection) -> Self {
        match rejection {
            Rejection::Invalid(e) => AppError::Validation(e),
            Rejection::Busy => AppError::Busy,
            Rejection::NotApplicable(screen) => AppError::NotApplicable(screen),
            Rejection::Stale(generation) => AppError::Stale(generation),
        }
    }
}

impl AppError {
    /// Stable code for logs and notifications.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Transport(_) => "TRANSPORT_ERROR",
            AppError::SideEffect(_) => "SIDE_EFFECT_ERROR",
            AppError::Busy => "BUSY",
            AppError::NotApplicable(_) => "NOT_APPLICABLE",
            AppError::Stale(_) => "STALE_RESPONSE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(
            AppError::from(ValidationError::EmptyEssay).code(),
            "VALIDATION_ERROR"
        );
        assert_eq!(AppError::Busy.code(), "BUSY");
        let side = SideEffectError::Clipboard("no display".to_string());
        assert_eq!(AppError::from(side).code(), "SIDE_EFFECT_ERROR");
    }

    #[test]
    fn test_rejections_keep_their_meaning() {
        assert_eq!(AppError::from(Rejection::Busy).code(), "BUSY");
        let on_result = AppError::from(Rejection::NotApplicable(Screen::Result));
        assert!(matches!(on_result, AppError::NotApplicable(Screen::Result)));
        assert_eq!(on_result.code(), "NOT_APPLICABLE");
        assert_eq!(on_result.to_string(), "Not available on the Result screen");
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            ValidationError::EmptyJobDescription.to_string(),
            "Job description cannot be empty"
        );
        assert_eq!(
            SideEffectError::NoResult("copy").to_string(),
            "Nothing to copy: no result is being shown"
        );
    }
}
