//! Session — drives the lifecycle against the critique service and the
//! user-facing collaborators.
//!
//! `submit` is the one-shot path. Front ends with their own event loop use
//! `begin`, run the request themselves, and hand the outcome to `resolve`,
//! which ignores anything that no longer matches the in-flight generation.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;

use tracing::{debug, info};

use crate::critique_client::{CritiqueResponse, CritiqueService, TransportError};
use crate::draft::generate_draft;
use crate::errors::{AppError, SideEffectError};
use crate::export::{Clipboard, DocumentExporter, EXPORT_FILE_NAME};
use crate::feedback::aggregator::ViewModel;
use crate::lifecycle::{Event, Generation, Lifecycle, Screen, SubmissionInput, Transition};
use crate::notify::{Notification, Notifier};

pub const REQUEST_FAILED_MESSAGE: &str = "Request failed. Please try again.";

/// A critique request detached from the session that issued it.
pub type CritiqueFuture =
    Pin<Box<dyn Future<Output = Result<CritiqueResponse, TransportError>> + Send>>;

pub struct Session {
    lifecycle: Lifecycle,
    service: Arc<dyn CritiqueService>,
    notifier: Arc<dyn Notifier>,
}

/// A request that has been committed to flight.
#[derive(Debug, Clone)]
pub struct PendingRequest {
    pub generation: Generation,
    pub essay_text: String,
    pub job_description: String,
}

impl Session {
    pub fn new(service: Arc<dyn CritiqueService>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            lifecycle: Lifecycle::new(),
            service,
            notifier,
        }
    }

    pub fn current_state(&self) -> Screen {
        self.lifecycle.current_state()
    }

    pub fn view_model(&self) -> Option<&ViewModel> {
        self.lifecycle.view_model()
    }

    /// The raw response behind the result screen.
    pub fn response(&self) -> Option<&CritiqueResponse> {
        self.lifecycle.response()
    }

    /// Generation of the request currently in flight.
    pub fn in_flight(&self) -> Option<Generation> {
        self.lifecycle.pending().map(|(generation, _)| generation)
    }

    /// Validates and submits, then waits for the service and applies the outcome.
    pub async fn submit(
        &mut self,
        essay_text: &str,
        job_description: &str,
    ) -> Result<&ViewModel, AppError> {
        let pending = self.begin(essay_text, job_description)?;
        let outcome = self.dispatch(&pending).await;
        match self.resolve(pending.generation, outcome)? {
            Some(view) => Ok(view),
            None => Err(AppError::Stale(pending.generation)),
        }
    }

    /// Moves to `Submitting`. Nothing is sent if the screen or input rejects it.
    pub fn begin(
        &mut self,
        essay_text: &str,
        job_description: &str,
    ) -> Result<PendingRequest, AppError> {
        match self.current_state() {
            Screen::Input => {}
            Screen::Submitting => return Err(AppError::Busy),
            screen @ Screen::Result => return Err(AppError::NotApplicable(screen)),
        }
        let input = SubmissionInput::new(essay_text, job_description);
        input.validate()?;

        let draft = generate_draft(job_description, &mut rand::thread_rng());
        match self.lifecycle.transition(Event::Submit {
            input,
            draft: Some(draft),
        })? {
            Transition::Submitted(generation) => Ok(PendingRequest {
                generation,
                essay_text: essay_text.to_string(),
                job_description: job_description.to_string(),
            }),
            _ => Err(AppError::NotApplicable(self.current_state())),
        }
    }

    /// Starts the request for `pending` without borrowing the session, so the
    /// caller can keep handling input while it runs.
    pub fn dispatch(&self, pending: &PendingRequest) -> CritiqueFuture {
        let service = Arc::clone(&self.service);
        let essay_text = pending.essay_text.clone();
        let job_description = pending.job_description.clone();
        Box::pin(async move { service.revise(&essay_text, &job_description).await })
    }

    /// Applies the outcome of the request issued under `generation`.
    ///
    /// Returns the new view model on success and `Ok(None)` when the outcome
    /// was stale and dropped.
    pub fn resolve(
        &mut self,
        generation: Generation,
        outcome: Result<CritiqueResponse, TransportError>,
    ) -> Result<Option<&ViewModel>, AppError> {
        let event = match outcome {
            Ok(response) => Event::Succeeded {
                generation,
                response,
            },
            Err(error) => Event::Failed { generation, error },
        };

        match self.lifecycle.transition(event) {
            Ok(Transition::Reverted(error)) => {
                self.notifier.notify(Notification::error(REQUEST_FAILED_MESSAGE));
                Err(AppError::Transport(error))
            }
            Ok(_) => Ok(self.lifecycle.view_model()),
            Err(rejection) => {
                debug!("Outcome ignored: {rejection}");
                Ok(None)
            }
        }
    }

    /// Start over.
    pub fn back(&mut self) -> Result<(), AppError> {
        self.lifecycle.transition(Event::Back)?;
        Ok(())
    }

    pub async fn copy_result(&self, clipboard: &dyn Clipboard) -> Result<(), AppError> {
        let text = self.result_text("copy")?;
        match clipboard.write_text(text).await {
            Ok(()) => {
                self.notifier.notify(Notification::success("Copied to clipboard!"));
                Ok(())
            }
            Err(e) => {
                self.notifier.notify(Notification::error("Copy failed."));
                Err(e.into())
            }
        }
    }

    pub async fn export_result(&self, exporter: &dyn DocumentExporter) -> Result<PathBuf, AppError> {
        let text = self.result_text("export")?;
        match exporter.export(EXPORT_FILE_NAME, text).await {
            Ok(path) => {
                info!("Cover letter exported to {}", path.display());
                self.notifier.notify(Notification::success("Cover letter downloaded!"));
                Ok(path)
            }
            Err(e) => {
                self.notifier.notify(Notification::error("Download failed."));
                Err(e.into())
            }
        }
    }

    fn result_text(&self, action: &'static str) -> Result<&str, SideEffectError> {
        self.lifecycle
            .view_model()
            .map(|vm| vm.final_document_text.as_str())
            .ok_or(SideEffectError::NoResult(action))
    }
}
