//! Client-facing request lifecycle: owns the selected image and the
//! [`GenerationRequestState`], and admits at most one generation at a time.

mod notify;
mod state;

pub use notify::{Notification, NotificationLog, NotificationSink, Severity, TracingNotifier};
pub use state::{ErrorDescriptor, GenerationRequestState};

use crate::{Error, Result, flow::GenerationFlow, recipe::EncodedImage};
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{info, warn};

struct Inner {
    image: Option<EncodedImage>,
    state: GenerationRequestState,
    /// Bumped on every selection so results of older submissions are dropped.
    epoch: u64,
    in_flight: bool,
    updated_at: DateTime<Utc>,
}

impl Inner {
    fn set_state(&mut self, state: GenerationRequestState) {
        self.state = state;
        self.updated_at = Utc::now();
    }
}

/// Proof that [`RequestController::start`] admitted a submission.
#[must_use = "a started submission must be finished, or the controller stays Loading"]
pub struct SubmitTicket {
    epoch: u64,
    image: EncodedImage,
}

#[derive(Debug, Clone)]
pub struct ControllerSnapshot {
    pub has_image: bool,
    pub state: GenerationRequestState,
    pub updated_at: DateTime<Utc>,
}

pub struct RequestController {
    flow: GenerationFlow,
    notifier: Arc<dyn NotificationSink>,
    inner: Mutex<Inner>,
}

// Releases the in-flight slot if `finish` is dropped before completing.
struct InFlightGuard<'a> {
    controller: &'a RequestController,
    epoch: u64,
    armed: bool,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut inner = self.controller.lock();
        inner.in_flight = false;
        if inner.epoch == self.epoch && inner.state.is_loading() {
            warn!("Generation was abandoned before completing");
            inner.set_state(GenerationRequestState::Failed(ErrorDescriptor::from(
                &Error::internal("generation was abandoned"),
            )));
        }
    }
}

impl RequestController {
    pub fn new(flow: GenerationFlow, notifier: Arc<dyn NotificationSink>) -> Self {
        Self {
            flow,
            notifier,
            inner: Mutex::new(Inner {
                image: None,
                state: GenerationRequestState::Idle,
                epoch: 0,
                in_flight: false,
                updated_at: Utc::now(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Replaces the selected image (or clears it) and drops any previous
    /// result, including one still being generated.
    pub fn select_image(&self, image: Option<EncodedImage>) {
        let mut inner = self.lock();
        inner.epoch += 1;
        match &image {
            Some(image) => info!(
                "Image selected: {} ({} base64 chars)",
                image.mime_type(),
                image.payload().len()
            ),
            None => info!("Image selection cleared"),
        }
        if inner.in_flight {
            info!("Result of the in-flight generation will be discarded");
        }
        inner.image = image;
        inner.set_state(GenerationRequestState::Idle);
    }

    /// Records a selection that could not be encoded: the selection is
    /// cleared and the user is told why.
    pub fn selection_failed(&self, error: &Error) {
        warn!("Image selection failed: {}", error);
        self.select_image(None);
        self.notifier
            .notify(Notification::error("Invalid Image", error.user_message()));
    }

    /// Admits a submission and moves to Loading. Rejected, with a
    /// notification, when no image is selected or a generation is running.
    ///
    /// A rejection is not a failed generation: the state is left as it was
    /// (it does not become `Failed`), so an earlier result stays visible and
    /// the reason reaches the user only through the notification and the
    /// returned error.
    pub fn start(&self) -> Result<SubmitTicket> {
        let admitted = {
            let mut inner = self.lock();
            if inner.in_flight {
                Err(Error::RequestInFlight)
            } else if let Some(image) = inner.image.clone() {
                inner.in_flight = true;
                inner.set_state(GenerationRequestState::Loading);
                Ok(SubmitTicket {
                    epoch: inner.epoch,
                    image,
                })
            } else {
                Err(Error::NoImageSelected)
            }
        };

        match admitted {
            Ok(ticket) => {
                info!("⏳ Generation started");
                Ok(ticket)
            }
            Err(e) => {
                warn!("Submission rejected: {}", e);
                let description = match e {
                    Error::NoImageSelected => {
                        "Please select an image before generating a recipe.".to_string()
                    }
                    _ => format!("{}.", e),
                };
                self.notifier.notify(Notification::error("Error", description));
                Err(e)
            }
        }
    }

    /// Runs the generation admitted by `ticket` and records its outcome,
    /// unless a new image was selected in the meantime.
    pub async fn finish(&self, ticket: SubmitTicket) -> GenerationRequestState {
        let mut guard = InFlightGuard {
            controller: self,
            epoch: ticket.epoch,
            armed: true,
        };
        let outcome = self.flow.generate(&ticket.image).await;
        guard.armed = false;

        let notification;
        let state = {
            let mut inner = self.lock();
            inner.in_flight = false;

            if inner.epoch != ticket.epoch {
                info!("Discarding stale generation result");
                return inner.state.clone();
            }

            let state = match outcome {
                Ok(recipe) => {
                    info!("✅ Recipe '{}' generated", recipe.recipe_name);
                    notification =
                        Notification::info("Success!", "Recipe generated successfully.");
                    GenerationRequestState::Success(recipe)
                }
                Err(e) => {
                    warn!("Error generating recipe: {}", e);
                    let descriptor = ErrorDescriptor::from(&e);
                    notification = Notification::error(
                        "Generation Failed",
                        format!("Could not generate recipe. {}", descriptor.message),
                    );
                    GenerationRequestState::Failed(descriptor)
                }
            };
            inner.set_state(state.clone());
            state
        };

        self.notifier.notify(notification);
        state
    }

    /// `start` followed by `finish`.
    pub async fn submit(&self) -> Result<GenerationRequestState> {
        let ticket = self.start()?;
        Ok(self.finish(ticket).await)
    }

    pub fn current_state(&self) -> GenerationRequestState {
        self.lock().state.clone()
    }

    pub fn has_image(&self) -> bool {
        self.lock().image.is_some()
    }

    pub fn snapshot(&self) -> ControllerSnapshot {
        let inner = self.lock();
        ControllerSnapshot {
            has_image: inner.image.is_some(),
            state: inner.state.clone(),
            updated_at: inner.updated_at,
        }
    }
}
