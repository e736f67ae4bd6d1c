mod common;

use love_letter_server::letter::model::{FormField, LetterRequest};
use love_letter_server::letter::validation::{
    validate_letter_request, validate_required, ValidationError, ValidationErrors,
};
use love_letter_server::ErrorResponse;

use common::filled_form;

#[test]
fn test_validate_required_empty() {
    let mut errors = ValidationErrors::new();
    validate_required("", FormField::RecipientName, &mut errors);
    assert_eq!(errors.len(), 1);
    assert!(errors.to_message().contains("Their Name must not be empty"));
}

#[test]
fn test_validate_required_whitespace_only() {
    let mut errors = ValidationErrors::new();
    validate_required(" \n\t ", FormField::SpecialMemory, &mut errors);
    assert_eq!(errors.len(), 1);
}

#[test]
fn test_validate_required_valid() {
    let mut errors = ValidationErrors::new();
    validate_required("Jane Doe", FormField::RecipientName, &mut errors);
    assert!(errors.is_empty());
}

#[test]
fn test_complete_form_is_valid() {
    assert!(validate_letter_request(&filled_form()).is_ok());
}

#[test]
fn test_empty_form_lists_every_field_in_order() {
    let errors = validate_letter_request(&LetterRequest::default()).unwrap_err();
    let fields: Vec<&str> = errors.fields().collect();
    let expected: Vec<&str> = FormField::ALL.iter().map(|f| f.id()).collect();
    assert_eq!(fields, expected);

    let msg = errors.to_message();
    assert!(msg.contains("6 problem(s)"));
    assert!(msg.contains("e.g., spicy ramen"));
}

#[test]
fn test_validation_error_display() {
    let error = ValidationError::new("eyeColor", "Their Eye Color must not be empty")
        .with_suggestion("Please fill it in");
    assert_eq!(
        error.to_string(),
        "[eyeColor] Their Eye Color must not be empty. Please fill it in"
    );
}

#[test]
fn test_error_response_structure() {
    let response = ErrorResponse::conflict("busy");
    assert_eq!(response.error, "Conflict");
    assert_eq!(response.message, "busy");
    assert!(chrono::DateTime::parse_from_rfc3339(&response.timestamp).is_ok());
}
