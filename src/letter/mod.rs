//! The letter form: its fields, validation, and the per-session controller.

pub mod controller;
pub mod handlers;
pub mod model;
pub mod validation;

pub use controller::{ControllerView, LetterController, SubmitRejected};
pub use model::{FormField, LetterRequest, UpdateFormRequest};
pub use validation::{validate_letter_request, ValidationError, ValidationErrors};
