use actix_web::{web, HttpResponse, Responder};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::SharedController;
use crate::export::EXPORT_FAILED_MESSAGE;
use crate::letter::controller::{self, ControllerView, SubmitRejected};
use crate::letter::handlers::export_response;
use crate::letter::model::UpdateFormRequest;
use crate::{AppState, ErrorResponse};

#[derive(Serialize, Debug, ToSchema)]
pub struct SessionResponse {
    pub id: Uuid,
    pub state: ControllerView,
}

#[derive(Serialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PreviewResponse {
    /// `data:image/png;base64,...`
    pub data_url: String,
    pub width: u32,
    pub height: u32,
}

async fn find_session(
    state: &web::Data<AppState>,
    id: &Uuid,
) -> Result<SharedController, HttpResponse> {
    state.sessions.get(id).await.ok_or_else(|| {
        log::warn!("Session {} not found", id);
        HttpResponse::NotFound().json(ErrorResponse::not_found("Session not found"))
    })
}

/// Current `(recipient, letter)` pair, if a letter is on display.
fn shown_letter(controller: &SharedController) -> Option<(String, String)> {
    let guard = controller.lock();
    guard
        .shown_letter()
        .map(|letter| (guard.form().recipient_name.clone(), letter.to_string()))
}

#[utoipa::path(
    post,
    path = "/api/sessions",
    tag = "Sessions",
    responses(
        (status = 201, description = "Session created", body = SessionResponse)
    )
)]
pub async fn create_session(state: web::Data<AppState>) -> impl Responder {
    let (id, controller) = state.sessions.create().await;
    let view = controller.lock().view();
    HttpResponse::Created().json(SessionResponse { id, state: view })
}

#[utoipa::path(
    get,
    path = "/api/sessions/{id}",
    tag = "Sessions",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Session state", body = SessionResponse),
        (status = 404, description = "Session not found", body = ErrorResponse)
    )
)]
pub async fn get_session(state: web::Data<AppState>, path: web::Path<Uuid>) -> impl Responder {
    let id = path.into_inner();
    match find_session(&state, &id).await {
        Ok(controller) => {
            let view = controller.lock().view();
            HttpResponse::Ok().json(SessionResponse { id, state: view })
        }
        Err(resp) => resp,
    }
}

#[utoipa::path(
    delete,
    path = "/api/sessions/{id}",
    tag = "Sessions",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 204, description = "Session deleted"),
        (status = 404, description = "Session not found", body = ErrorResponse)
    )
)]
pub async fn delete_session(state: web::Data<AppState>, path: web::Path<Uuid>) -> impl Responder {
    let id = path.into_inner();
    if state.sessions.remove(&id).await {
        HttpResponse::NoContent().finish()
    } else {
        HttpResponse::NotFound().json(ErrorResponse::not_found("Session not found"))
    }
}

#[utoipa::path(
    put,
    path = "/api/sessions/{id}/form",
    tag = "Sessions",
    params(("id" = Uuid, Path, description = "Session ID")),
    request_body = UpdateFormRequest,
    responses(
        (status = 200, description = "Form updated", body = SessionResponse),
        (status = 404, description = "Session not found", body = ErrorResponse)
    )
)]
pub async fn update_form(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateFormRequest>,
) -> impl Responder {
    let id = path.into_inner();
    let controller = match find_session(&state, &id).await {
        Ok(c) => c,
        Err(resp) => return resp,
    };

    let view = {
        let mut guard = controller.lock();
        guard.update_form(body.into_inner());
        guard.view()
    };
    HttpResponse::Ok().json(SessionResponse { id, state: view })
}

#[utoipa::path(
    post,
    path = "/api/sessions/{id}/submit",
    tag = "Sessions",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Request finished; a failure is reported in `error`", body = SessionResponse),
        (status = 400, description = "A required field is empty", body = ErrorResponse),
        (status = 404, description = "Session not found", body = ErrorResponse),
        (status = 409, description = "A request is already in flight", body = ErrorResponse)
    )
)]
pub async fn submit(state: web::Data<AppState>, path: web::Path<Uuid>) -> impl Responder {
    let id = path.into_inner();
    let controller = match find_session(&state, &id).await {
        Ok(c) => c,
        Err(resp) => return resp,
    };

    match controller::submit(controller, state.generator.clone()).await {
        Ok(view) => HttpResponse::Ok().json(SessionResponse { id, state: view }),
        Err(SubmitRejected::InFlight) => {
            log::debug!("Session {}: submit ignored, request in flight", id);
            HttpResponse::Conflict().json(ErrorResponse::conflict(
                "A love letter is already being written for this session",
            ))
        }
        Err(SubmitRejected::Invalid(errors)) => {
            HttpResponse::BadRequest().json(ErrorResponse::bad_request(&errors.to_message()))
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/sessions/{id}/reset",
    tag = "Sessions",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Letter discarded, form kept", body = SessionResponse),
        (status = 404, description = "Session not found", body = ErrorResponse)
    )
)]
pub async fn reset(state: web::Data<AppState>, path: web::Path<Uuid>) -> impl Responder {
    let id = path.into_inner();
    let controller = match find_session(&state, &id).await {
        Ok(c) => c,
        Err(resp) => return resp,
    };

    let view = {
        let mut guard = controller.lock();
        guard.reset();
        guard.view()
    };
    HttpResponse::Ok().json(SessionResponse { id, state: view })
}

#[utoipa::path(
    get,
    path = "/api/sessions/{id}/pdf",
    tag = "Sessions",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 200, description = "PDF download", content_type = "application/pdf"),
        (status = 204, description = "No letter on display"),
        (status = 404, description = "Session not found", body = ErrorResponse),
        (status = 500, description = "Export failed", body = ErrorResponse)
    )
)]
pub async fn download_pdf(state: web::Data<AppState>, path: web::Path<Uuid>) -> impl Responder {
    let id = path.into_inner();
    let controller = match find_session(&state, &id).await {
        Ok(c) => c,
        Err(resp) => return resp,
    };

    match shown_letter(&controller) {
        Some((recipient, letter)) => export_response(&state, recipient, letter).await,
        None => HttpResponse::NoContent().finish(),
    }
}

#[utoipa::path(
    get,
    path = "/api/sessions/{id}/preview",
    tag = "Sessions",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 200, description = "PNG capture of the letter", body = PreviewResponse),
        (status = 204, description = "No letter on display"),
        (status = 404, description = "Session not found", body = ErrorResponse),
        (status = 500, description = "Capture failed", body = ErrorResponse)
    )
)]
pub async fn preview(state: web::Data<AppState>, path: web::Path<Uuid>) -> impl Responder {
    let id = path.into_inner();
    let controller = match find_session(&state, &id).await {
        Ok(c) => c,
        Err(resp) => return resp,
    };

    let letter = match shown_letter(&controller) {
        Some((_, letter)) => letter,
        None => return HttpResponse::NoContent().finish(),
    };

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
        let bitmap = renderer.render(&letter)?;
        let png = bitmap.to_png()?;
        Ok::<_, crate::render::RenderError>((png, bitmap.width(), bitmap.height()))
    })
    .await;

    match result {
        Ok(Ok((png, width, height))) => HttpResponse::Ok().json(PreviewResponse {
            data_url: format!("data:image/png;base64,{}", STANDARD.encode(png)),
            width,
            height,
        }),
        Ok(Err(e)) => {
            log::error!("Session {}: failed to capture preview: {}", id, e);
            HttpResponse::InternalServerError().json(ErrorResponse::internal_error(EXPORT_FAILED_MESSAGE))
        }
        Err(e) => {
            log::error!("Session {}: preview task failed: {}", id, e);
            HttpResponse::InternalServerError().json(ErrorResponse::internal_error(EXPORT_FAILED_MESSAGE))
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/sessions").route(web::post().to(create_session)))
        .service(
            web::resource("/sessions/{id}")
                .route(web::get().to(get_session))
                .route(web::delete().to(delete_session)),
        )
        .service(web::resource("/sessions/{id}/form").route(web::put().to(update_form)))
        .service(web::resource("/sessions/{id}/submit").route(web::post().to(submit)))
        .service(web::resource("/sessions/{id}/reset").route(web::post().to(reset)))
        .service(web::resource("/sessions/{id}/pdf").route(web::get().to(download_pdf)))
        .service(web::resource("/sessions/{id}/preview").route(web::get().to(preview)));
}
