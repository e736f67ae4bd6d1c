//! Form validation for letter requests.
//!
//! Every field is required; messages name the field by its form label so they
//! can be shown next to the input that needs attention.

use std::fmt;

use super::model::{FormField, LetterRequest};

/// A single field that failed validation.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Wire name of the field
    pub field: String,
    pub message: String,
    /// How the user can fix it
    pub suggestion: Option<String>,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Error for a required field left blank.
    pub fn empty_field(field: FormField) -> Self {
        let input = if field.multiline() {
            "describe it in a few words"
        } else {
            "fill it in"
        };
        Self::new(field.id(), format!("{} must not be empty", field.label()))
            .with_suggestion(format!("Please {} ({})", input, field.placeholder()))
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.field, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, ". {}", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Collection of validation errors with formatted output.
#[derive(Debug, Default)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.errors.iter().map(|e| e.field.as_str())
    }

    /// One line per problem, numbered.
    pub fn to_message(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }

        let mut parts = vec![format!(
            "Validation failed: {} problem(s) found",
            self.errors.len()
        )];

        for (i, error) in self.errors.iter().enumerate() {
            parts.push(format!("{}. {}", i + 1, error));
        }

        parts.join("\n")
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_message())
    }
}

impl std::error::Error for ValidationErrors {}

/// Validate that a string is not empty after trimming.
pub fn validate_required(value: &str, field: FormField, errors: &mut ValidationErrors) {
    if value.trim().is_empty() {
        errors.add(ValidationError::empty_field(field));
    }
}

/// Longest letter text accepted for export, in characters.
pub const MAX_LETTER_CHARS: usize = 6_000;

/// Check letter text submitted for export: present and of letter size.
pub fn validate_letter_text(letter: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if letter.trim().is_empty() {
        errors.add(ValidationError::new("letter", "Letter text must not be empty"));
    } else if letter.chars().count() > MAX_LETTER_CHARS {
        errors.add(
            ValidationError::new(
                "letter",
                format!("Letter text is longer than {} characters", MAX_LETTER_CHARS),
            )
            .with_suggestion("Please shorten the letter"),
        );
    }
    errors.into_result()
}

/// Check that all six fields are filled in.
pub fn validate_letter_request(request: &LetterRequest) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    for field in FormField::ALL {
        validate_required(request.value(field), field, &mut errors);
    }
    errors.into_result()
}
