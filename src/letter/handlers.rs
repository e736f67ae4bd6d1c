use actix_web::http::header::{
    Charset, ContentDisposition, DispositionParam, DispositionType, ExtendedValue,
};
use actix_web::{web, HttpResponse, Responder};

use super::model::{
    ExportLetterRequest, FormField, FormFieldDescriptor, GeneratedLetterResponse, LetterRequest,
};
use super::validation::{validate_letter_request, validate_letter_text};
use crate::export::{export_letter, ExportedDocument, EXPORT_FAILED_MESSAGE};
use crate::generation::{generate_letter, GENERATION_FAILED_MESSAGE};
use crate::render::RenderError;
use crate::{AppState, ErrorResponse};

/// Run the export on the blocking pool and turn the outcome into a response.
///
/// Holds one export permit until the capture is released.
pub(crate) async fn export_response(
    state: &AppState,
    recipient_name: String,
    letter: String,
) -> HttpResponse {
    let permit = match state.export_permits.clone().acquire_owned().await {
        Ok(permit) => permit,
        Err(e) => {
            log::error!("Export permits unavailable: {}", e);
            return HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error(EXPORT_FAILED_MESSAGE));
        }
    };

    let renderer = state.renderer.clone();
    let result = web::block(move || {
        let _permit = permit;
        export_letter(&renderer, &recipient_name, &letter)
    })
    .await;

    match result {
        Ok(Ok(document)) => pdf_response(document),
        Ok(Err(e)) => {
            log::error!("Failed to export letter: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse::internal_error(EXPORT_FAILED_MESSAGE))
        }
        Err(e) => {
            log::error!("Export task failed: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse::internal_error(EXPORT_FAILED_MESSAGE))
        }
    }
}

/// `filename` (ASCII fallback) plus `filename*` (UTF-8, RFC 5987).
pub(crate) fn attachment(filename: &str) -> ContentDisposition {
    let ascii: String = filename
        .chars()
        .map(|c| if c.is_ascii() && !c.is_ascii_control() { c } else { '_' })
        .collect();

    let mut parameters = vec![DispositionParam::Filename(ascii.clone())];
    if ascii != filename {
        parameters.push(DispositionParam::FilenameExt(ExtendedValue {
            charset: Charset::Ext("UTF-8".to_string()),
            language_tag: None,
            value: filename.as_bytes().to_vec(),
        }));
    }

    ContentDisposition {
        disposition: DispositionType::Attachment,
        parameters,
    }
}

fn pdf_response(document: ExportedDocument) -> HttpResponse {
    log::info!(
        "Exported {} ({} page(s), {} bytes)",
        document.filename,
        document.page_count,
        document.pdf.len()
    );

    HttpResponse::Ok()
        .content_type("application/pdf")
        .insert_header(attachment(&document.filename))
        .insert_header(("X-Page-Count", document.page_count.to_string()))
        .body(document.pdf)
}

#[utoipa::path(
    get,
    path = "/api/form",
    tag = "Letters",
    responses(
        (status = 200, description = "Form inputs in display order", body = [FormFieldDescriptor])
    )
)]
pub async fn get_form_fields() -> impl Responder {
    let fields: Vec<FormFieldDescriptor> =
        FormField::ALL.iter().map(|f| f.descriptor()).collect();
    HttpResponse::Ok().json(fields)
}

#[utoipa::path(
    post,
    path = "/api/letters",
    tag = "Letters",
    request_body = LetterRequest,
    responses(
        (status = 200, description = "Letter generated", body = GeneratedLetterResponse),
        (status = 400, description = "A required field is empty", body = ErrorResponse),
        (status = 502, description = "Generation backend failed", body = ErrorResponse)
    )
)]
pub async fn create_letter(
    state: web::Data<AppState>,
    body: web::Json<LetterRequest>,
) -> impl Responder {
    let request = body.into_inner();
    if let Err(errors) = validate_letter_request(&request) {
        return HttpResponse::BadRequest().json(ErrorResponse::bad_request(&errors.to_message()));
    }

    match generate_letter(state.generator.as_ref(), &request).await {
        Ok(letter) => HttpResponse::Ok().json(GeneratedLetterResponse { letter }),
        Err(_) => HttpResponse::BadGateway().json(ErrorResponse::bad_gateway(GENERATION_FAILED_MESSAGE)),
    }
}

#[utoipa::path(
    post,
    path = "/api/letters/pdf",
    tag = "Letters",
    request_body = ExportLetterRequest,
    responses(
        (status = 200, description = "PDF download", content_type = "application/pdf"),
        (status = 400, description = "Letter text is empty or too long", body = ErrorResponse),
        (status = 500, description = "Export failed", body = ErrorResponse)
    )
)]
pub async fn export_letter_pdf(
    state: web::Data<AppState>,
    body: web::Json<ExportLetterRequest>,
) -> impl Responder {
    let ExportLetterRequest {
        recipient_name,
        letter,
    } = body.into_inner();

    if let Err(errors) = validate_letter_text(&letter) {
        return HttpResponse::BadRequest().json(ErrorResponse::bad_request(&errors.to_message()));
    }

    match state.renderer.check_fits(&letter) {
        Ok(_) => {}
        Err(e @ RenderError::TooManyLines { .. }) => {
            log::debug!("Refusing export: {}", e);
            return HttpResponse::BadRequest().json(ErrorResponse::bad_request(&format!(
                "Letter text is too long to export: {}",
                e
            )));
        }
        Err(e) => {
            log::error!("Failed to lay out letter: {}", e);
            return HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error(EXPORT_FAILED_MESSAGE));
        }
    }

    export_response(&state, recipient_name, letter).await
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/form").route(web::get().to(get_form_fields)))
        .service(web::resource("/letters").route(web::post().to(create_letter)))
        .service(web::resource("/letters/pdf").route(web::post().to(export_letter_pdf)));
}
