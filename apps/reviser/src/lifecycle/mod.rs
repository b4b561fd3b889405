//! Request lifecycle — the explicit state machine behind the two screens.
//!
//! ```text
//!   Input --Submit--> Submitting --Succeeded--> Result
//!     ^                   |                       |
//!     +------Failed-------+                       |
//!     +------------------Back---------------------+
//! ```
//!
//! Every accepted submit is tagged with a fresh [`Generation`]. Completion
//! events are applied only while `Submitting` under that same generation;
//! anything else is a stray late response and is discarded.

use std::fmt;

use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::critique_client::{CritiqueResponse, TransportError};
use crate::errors::ValidationError;
use crate::feedback::aggregator::{aggregate, ViewModel};

/// What the user submitted. Both fields must be non-empty after trimming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionInput {
    pub essay_text: String,
    pub job_description: String,
}

impl SubmissionInput {
    pub fn new(essay_text: impl Into<String>, job_description: impl Into<String>) -> Self {
        Self {
            essay_text: essay_text.into(),
            job_description: job_description.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.essay_text.trim().is_empty() {
            return Err(ValidationError::EmptyEssay);
        }
        if self.job_description.trim().is_empty() {
            return Err(ValidationError::EmptyJobDescription);
        }
        Ok(())
    }
}

/// Tag distinguishing successive in-flight requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Generation(u64);

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// User-visible screen. `Submitting` renders as a blocking overlay on `Input`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    Input,
    Submitting,
    Result,
}

#[derive(Debug)]
pub enum Event {
    /// `draft` is the locally generated fallback document, if any.
    Submit {
        input: SubmissionInput,
        draft: Option<String>,
    },
    Succeeded {
        generation: Generation,
        response: CritiqueResponse,
    },
    Failed {
        generation: Generation,
        error: TransportError,
    },
    Back,
}

/// Result of an applied transition.
#[derive(Debug)]
pub enum Transition {
    Submitted(Generation),
    ShowingResult(Generation),
    /// Carries the failure back so the caller can report it.
    Reverted(TransportError),
    Reset,
}

/// Why an event left the state untouched.
#[derive(Debug, Error)]
pub enum Rejection {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("A request is already in flight")]
    Busy,

    #[error("Discarded stale response for generation {0}")]
    Stale(Generation),

    #[error("Event not applicable on the {0:?} screen")]
    NotApplicable(Screen),
}

#[derive(Debug)]
enum State {
    Input,
    Submitting {
        generation: Generation,
        input: SubmissionInput,
        draft: Option<String>,
    },
    Result {
        response: CritiqueResponse,
        view: ViewModel,
    },
}

#[derive(Debug)]
pub struct Lifecycle {
    state: State,
    last_generation: u64,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            state: State::Input,
            last_generation: 0,
        }
    }

    pub fn current_state(&self) -> Screen {
        match self.state {
            State::Input => Screen::Input,
            State::Submitting { .. } => Screen::Submitting,
            State::Result { .. } => Screen::Result,
        }
    }

    /// The view model while on the result screen.
    pub fn view_model(&self) -> Option<&ViewModel> {
        match &self.state {
            State::Result { view, .. } => Some(view),
            _ => None,
        }
    }

    /// The response backing the result screen.
    pub fn response(&self) -> Option<&CritiqueResponse> {
        match &self.state {
            State::Result { response, .. } => Some(response),
            _ => None,
        }
    }

    /// The submission awaiting a response.
    pub fn pending(&self) -> Option<(Generation, &SubmissionInput)> {
        match &self.state {
            State::Submitting {
                generation, input, ..
            } => Some((*generation, input)),
            _ => None,
        }
    }

    pub fn transition(&mut self, event: Event) -> Result<Transition, Rejection> {
        match event {
            Event::Submit { input, draft } => self.submit(input, draft),
            Event::Succeeded {
                generation,
                response,
            } => self.succeed(generation, response),
            Event::Failed { generation, error } => self.fail(generation, error),
            Event::Back => self.back(),
        }
    }

    fn submit(
        &mut self,
        input: SubmissionInput,
        draft: Option<String>,
    ) -> Result<Transition, Rejection> {
        match self.state {
            State::Input => {}
            State::Submitting { .. } => return Err(Rejection::Busy),
            State::Result { .. } => return Err(Rejection::NotApplicable(Screen::Result)),
        }
        input.validate()?;

        self.last_generation += 1;
        let generation = Generation(self.last_generation);
        info!(%generation, "Submitting essay for critique");

        self.state = State::Submitting {
            generation,
            input,
            draft,
        };
        Ok(Transition::Submitted(generation))
    }

    fn succeed(
        &mut self,
        generation: Generation,
        response: CritiqueResponse,
    ) -> Result<Transition, Rejection> {
        self.check_in_flight(generation)?;

        let draft = match std::mem::replace(&mut self.state, State::Input) {
            State::Submitting { draft, .. } => draft,
            _ => None,
        };
        let view = aggregate(&response, draft.as_deref());
        info!(
            %generation,
            feedback = view.feedback.is_some(),
            source = ?view.document_source,
            "Critique received"
        );

        self.state = State::Result { response, view };
        Ok(Transition::ShowingResult(generation))
    }

    fn fail(
        &mut self,
        generation: Generation,
        error: TransportError,
    ) -> Result<Transition, Rejection> {
        self.check_in_flight(generation)?;

        error!(%generation, "Critique request failed: {error}");
        self.state = State::Input;
        Ok(Transition::Reverted(error))
    }

    fn back(&mut self) -> Result<Transition, Rejection> {
        match self.state {
            State::Result { .. } => {
                info!("Returning to input; result discarded");
                self.state = State::Input;
                Ok(Transition::Reset)
            }
            _ => Err(Rejection::NotApplicable(self.current_state())),
        }
    }

    fn check_in_flight(&self, generation: Generation) -> Result<(), Rejection> {
        match self.state {
            State::Submitting { generation: current, .. } if current == generation => Ok(()),
            _ => {
                warn!(
                    %generation,
                    state = ?self.current_state(),
                    "Discarding response that does not match the in-flight request"
                );
                Err(Rejection::Stale(generation))
            }
        }
    }
}
