mod common;

use std::sync::Arc;

use actix_web::http::{header, StatusCode};
use actix_web::{test, App};
use serde_json::{json, Value};

use love_letter_server::generation::GENERATION_FAILED_MESSAGE;
use love_letter_server::{configure, ErrorResponse};

use common::{filled_form, test_state, MockGenerator};

macro_rules! init_app {
    ($generator:expr) => {
        test::init_service(
            App::new()
                .app_data(test_state(Arc::new($generator)))
                .configure(configure),
        )
        .await
    };
}

#[actix_web::test]
async fn test_health() {
    let app = init_app!(MockGenerator::succeeding("letter"));

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "ok");
}

#[actix_web::test]
async fn test_form_fields_in_display_order() {
    let app = init_app!(MockGenerator::succeeding("letter"));

    let req = test::TestRequest::get().uri("/api/form").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let ids: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["id"].as_str().unwrap())
        .collect();

    assert_eq!(
        ids,
        vec![
            "recipientName",
            "eyeColor",
            "favoriteFood",
            "favoritePlace",
            "specialMemory",
            "senderName"
        ]
    );
    assert_eq!(body[4]["multiline"], true);
}

#[actix_web::test]
async fn test_create_letter() {
    let app = init_app!(MockGenerator::succeeding("My Dearest Jane,"));

    let req = test::TestRequest::post()
        .uri("/api/letters")
        .set_json(filled_form())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["letter"], "My Dearest Jane,");
}

#[actix_web::test]
async fn test_create_letter_backend_failure_is_generic() {
    let app = init_app!(MockGenerator::failing());

    let req = test::TestRequest::post()
        .uri("/api/letters")
        .set_json(filled_form())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.error, "BadGateway");
    assert_eq!(body.message, GENERATION_FAILED_MESSAGE);
}

#[actix_web::test]
async fn test_create_letter_rejects_blank_field() {
    let app = init_app!(MockGenerator::succeeding("letter"));

    let mut form = filled_form();
    form.favorite_food = "   ".to_string();
    let req = test::TestRequest::post()
        .uri("/api/letters")
        .set_json(form)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: ErrorResponse = test::read_body_json(resp).await;
    assert!(body.message.contains("Their Favorite Food"));
}

#[actix_web::test]
async fn test_export_letter_pdf() {
    let app = init_app!(MockGenerator::succeeding("letter"));

    let req = test::TestRequest::post()
        .uri("/api/letters/pdf")
        .set_json(json!({ "recipientName": "Jane", "letter": "My Dearest Jane,\n\nJohn" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/pdf"
    );
    let disposition = resp
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.contains("love-letter-to-Jane.pdf"));

    let body = test::read_body(resp).await;
    assert!(body.starts_with(b"%PDF-"));
}

#[actix_web::test]
async fn test_session_lifecycle() {
    let app = init_app!(MockGenerator::succeeding("My Dearest Jane,\n\nJohn"));

    let req = test::TestRequest::post().uri("/api/sessions").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["state"]["showLetter"], false);

    // Nothing to export yet.
    let req = test::TestRequest::get()
        .uri(&format!("/api/sessions/{}/pdf", id))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);

    // Submitting an empty form changes nothing.
    let req = test::TestRequest::post()
        .uri(&format!("/api/sessions/{}/submit", id))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::put()
        .uri(&format!("/api/sessions/{}/form", id))
        .set_json(filled_form())
        .to_request();
    let updated: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(updated["state"]["form"]["recipientName"], "Jane");

    let req = test::TestRequest::post()
        .uri(&format!("/api/sessions/{}/submit", id))
        .to_request();
    let submitted: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(submitted["state"]["showLetter"], true);
    assert_eq!(submitted["state"]["letter"], "My Dearest Jane,\n\nJohn");

    let req = test::TestRequest::get()
        .uri(&format!("/api/sessions/{}/preview", id))
        .to_request();
    let preview: Value = test::call_and_read_body_json(&app, req).await;
    assert!(preview["dataUrl"]
        .as_str()
        .unwrap()
        .starts_with("data:image/png;base64,"));
    assert_eq!(preview["width"], 736 * 3);

    let req = test::TestRequest::get()
        .uri(&format!("/api/sessions/{}/pdf", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri(&format!("/api/sessions/{}/reset", id))
        .to_request();
    let reset: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(reset["state"]["showLetter"], false);
    assert_eq!(reset["state"]["form"]["senderName"], "John");

    let req = test::TestRequest::delete()
        .uri(&format!("/api/sessions/{}", id))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get()
        .uri(&format!("/api/sessions/{}", id))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_session_submit_failure_reported_in_state() {
    let app = init_app!(MockGenerator::failing());

    let req = test::TestRequest::post().uri("/api/sessions").to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let id = created["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::put()
        .uri(&format!("/api/sessions/{}/form", id))
        .set_json(filled_form())
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/sessions/{}/submit", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["state"]["error"], GENERATION_FAILED_MESSAGE);
    assert_eq!(body["state"]["loading"], false);
    assert_eq!(body["state"]["showLetter"], false);
}

#[actix_web::test]
async fn test_unknown_session_is_not_found() {
    let app = init_app!(MockGenerator::succeeding("letter"));

    let req = test::TestRequest::post()
        .uri(&format!("/api/sessions/{}/submit", uuid::Uuid::new_v4()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.error, "NotFound");
}

#[actix_web::test]
async fn test_export_refuses_oversized_letter() {
    let app = init_app!(MockGenerator::succeeding("letter"));

    // A couple of hundred bytes that would lay out to 171 lines.
    let letter = format!("x{}", "\n".repeat(170));
    let req = test::TestRequest::post()
        .uri("/api/letters/pdf")
        .set_json(json!({ "recipientName": "Jane", "letter": letter }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.error, "BadRequest");
    assert!(body.message.contains("171 lines"));

    let req = test::TestRequest::post()
        .uri("/api/letters/pdf")
        .set_json(json!({ "recipientName": "Jane", "letter": "x".repeat(6_001) }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_export_filename_keeps_non_ascii_recipient() {
    let app = init_app!(MockGenerator::succeeding("letter"));

    let req = test::TestRequest::post()
        .uri("/api/letters/pdf")
        .set_json(json!({ "recipientName": "José", "letter": "Querido José,\n\nJohn" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let disposition = resp
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.contains("filename=\"love-letter-to-Jos_.pdf\""));
    assert!(disposition.contains("filename*=UTF-8''love-letter-to-Jos%C3%A9.pdf"));
}

#[actix_web::test]
async fn test_malformed_body_gets_error_response() {
    let app = init_app!(MockGenerator::succeeding("letter"));

    let req = test::TestRequest::post()
        .uri("/api/letters")
        .insert_header(header::ContentType::json())
        .set_payload("{ malformed json ")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.error, "BadRequest");
    assert!(body.message.starts_with("Invalid request body"));

    let req = test::TestRequest::post()
        .uri("/api/letters/pdf")
        .set_json(json!({ "recipientName": "Jane" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.error, "BadRequest");
}

#[actix_web::test]
async fn test_non_uuid_session_id_gets_error_response() {
    let app = init_app!(MockGenerator::succeeding("letter"));

    let req = test::TestRequest::get()
        .uri("/api/sessions/not-a-uuid")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.error, "NotFound");
}
