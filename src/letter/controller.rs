//! Form/state controller for one letter-writing session.
//!
//! States: idle, loading, showing a result, and idle with an error. The
//! loading flag is the only guard against duplicate requests: while it is
//! set, [`LetterController::begin_submit`] refuses to start another one.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use utoipa::ToSchema;

use super::model::{LetterRequest, UpdateFormRequest};
use super::validation::{validate_letter_request, ValidationErrors};
use crate::generation::{generate_letter, LetterGenerationFailed, TextGenerator};

#[derive(Debug, Default, Clone)]
pub struct LetterController {
    form: LetterRequest,
    letter: String,
    loading: bool,
    error: Option<String>,
    show_letter: bool,
}

/// Why a submit did not start a request.
#[derive(Debug)]
pub enum SubmitRejected {
    /// A request is already in flight; nothing changed.
    InFlight,
    /// The form is incomplete; nothing changed.
    Invalid(ValidationErrors),
}

impl LetterController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_form(form: LetterRequest) -> Self {
        Self {
            form,
            ..Self::default()
        }
    }

    pub fn form(&self) -> &LetterRequest {
        &self.form
    }

    pub fn letter(&self) -> &str {
        &self.letter
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_showing_letter(&self) -> bool {
        self.show_letter
    }

    /// The letter currently on display, if any.
    pub fn shown_letter(&self) -> Option<&str> {
        self.show_letter.then_some(self.letter.as_str())
    }

    pub fn update_form(&mut self, update: UpdateFormRequest) {
        self.form.apply(update);
    }

    /// `idle -> loading`. Returns the request to send to the backend.
    pub fn begin_submit(&mut self) -> Result<LetterRequest, SubmitRejected> {
        if self.loading {
            return Err(SubmitRejected::InFlight);
        }
        validate_letter_request(&self.form).map_err(SubmitRejected::Invalid)?;

        self.loading = true;
        self.error = None;
        Ok(self.form.clone())
    }

    /// `loading -> result` or `loading -> idle-with-error`.
    pub fn finish_submit(&mut self, outcome: Result<String, LetterGenerationFailed>) {
        match outcome {
            Ok(letter) => {
                self.letter = letter;
                self.show_letter = true;
            }
            Err(e) => {
                self.error = Some(e.to_string());
                self.show_letter = false;
            }
        }
        self.loading = false;
    }

    /// "Write another": drop the letter, keep the form.
    pub fn reset(&mut self) {
        self.show_letter = false;
        self.letter.clear();
    }

    pub fn view(&self) -> ControllerView {
        ControllerView {
            form: self.form.clone(),
            loading: self.loading,
            error: self.error.clone(),
            show_letter: self.show_letter,
            letter: self.shown_letter().map(str::to_string),
        }
    }
}

/// Run a whole submit against a shared controller.
///
/// The lock is released while the backend is being awaited, so concurrent
/// callers observe `loading` and are turned away. The backend call runs on
/// its own task: dropping the returned future (client gone, worker stopping)
/// does not stop it, and `loading` is always cleared when it finishes.
pub async fn submit(
    controller: Arc<Mutex<LetterController>>,
    generator: Arc<dyn TextGenerator>,
) -> Result<ControllerView, SubmitRejected> {
    let request = controller.lock().begin_submit()?;

    let task_controller = controller.clone();
    let task = tokio::spawn(async move {
        let outcome = generate_letter(generator.as_ref(), &request).await;
        let mut guard = task_controller.lock();
        guard.finish_submit(outcome);
        guard.view()
    });

    match task.await {
        Ok(view) => Ok(view),
        Err(e) => {
            log::error!("Letter generation task failed: {}", e);
            let mut guard = controller.lock();
            if guard.is_loading() {
                guard.finish_submit(Err(LetterGenerationFailed));
            }
            Ok(guard.view())
        }
    }
}

#[derive(Serialize, Debug, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ControllerView {
    pub form: LetterRequest,
    pub loading: bool,
    pub error: Option<String>,
    pub show_letter: bool,
    /// Present only while the result is shown.
    pub letter: Option<String>,
}
