use actix_cors::Cors;
use actix_web::error::{InternalError, JsonPayloadError, PathError};
use actix_web::middleware::Compress;
use actix_web::{http::header, web, App, HttpRequest, HttpResponse, HttpServer, Responder};
use actix_web_prometheus::PrometheusMetricsBuilder;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub mod config;
pub mod export;
pub mod generation;
pub mod letter;
pub mod render;
pub mod session;
pub mod state;

pub use crate::config::AppConfig;
pub use crate::state::AppState;

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error_type: &str, message: &str) -> Self {
        Self {
            error: error_type.to_string(),
            message: message.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn not_found(message: &str) -> Self {
        Self::new("NotFound", message)
    }

    pub fn bad_request(message: &str) -> Self {
        Self::new("BadRequest", message)
    }

    pub fn conflict(message: &str) -> Self {
        Self::new("Conflict", message)
    }

    pub fn bad_gateway(message: &str) -> Self {
        Self::new("BadGateway", message)
    }

    pub fn internal_error(message: &str) -> Self {
        Self::new("InternalServerError", message)
    }
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub sessions: u64,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        sessions: state.sessions.len(),
    })
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        crate::letter::handlers::get_form_fields,
        crate::letter::handlers::create_letter,
        crate::letter::handlers::export_letter_pdf,
        crate::session::handlers::create_session,
        crate::session::handlers::get_session,
        crate::session::handlers::delete_session,
        crate::session::handlers::update_form,
        crate::session::handlers::submit,
        crate::session::handlers::reset,
        crate::session::handlers::download_pdf,
        crate::session::handlers::preview
    ),
    components(
        schemas(
            letter::model::LetterRequest,
            letter::model::UpdateFormRequest,
            letter::model::GeneratedLetterResponse,
            letter::model::ExportLetterRequest,
            letter::model::FormFieldDescriptor,
            letter::controller::ControllerView,
            session::handlers::SessionResponse,
            session::handlers::PreviewResponse,
            HealthResponse,
            ErrorResponse,
        )
    ),
    tags(
        (name = "Letters", description = "Stateless letter generation and PDF export."),
        (name = "Sessions", description = "Form sessions: fill in, submit, reset, export."),
        (name = "Health", description = "Liveness.")
    ),
    servers(
        (url = "http://127.0.0.1:8080", description = "Local server")
    )
)]
pub struct ApiDoc;

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    log::debug!("Rejected request body: {}", err);
    let response = HttpResponse::BadRequest().json(ErrorResponse::bad_request(&format!(
        "Invalid request body: {}",
        err
    )));
    InternalError::from_response(err, response).into()
}

fn path_error_handler(err: PathError, req: &HttpRequest) -> actix_web::Error {
    log::debug!("Rejected path {}: {}", req.path(), err);
    let response = HttpResponse::NotFound().json(ErrorResponse::not_found("Session not found"));
    InternalError::from_response(err, response).into()
}

/// Register every route. `AppState` must already be in the app data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .service(web::resource("/health").route(web::get().to(health)))
        .service(
            web::scope("/api")
                .configure(letter::handlers::config)
                .configure(session::handlers::config),
        );
}

pub async fn run() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration. Please check your .env file. Error: {}", e);
            std::process::exit(1);
        }
    };

    let app_state = match AppState::from_config(&config) {
        Ok(state) => web::Data::new(state),
        Err(e) => {
            log::error!("Failed to load the letter font. Set LETTER_FONT_PATH to a TrueType font. Error: {}", e);
            std::process::exit(1);
        }
    };

    let prometheus = match PrometheusMetricsBuilder::new("love_letter_server")
        .endpoint("/metrics")
        .build()
    {
        Ok(prometheus) => prometheus,
        Err(e) => {
            log::error!("Failed to create Prometheus metrics middleware: {}", e);
            std::process::exit(1);
        }
    };

    let allowed_origins = config.allowed_origins.clone();
    log::info!("Starting server at http://{}:{}", config.host, config.port);

    HttpServer::new(move || {
        let app_state = app_state.clone();
        let prometheus = prometheus.clone();
        let cors = allowed_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
            .expose_headers(vec![header::CONTENT_DISPOSITION])
            .max_age(3600);

        App::new()
            .wrap(Compress::default())
            .wrap(prometheus)
            .wrap(cors)
            .app_data(app_state)
            .configure(configure)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
    })
    .keep_alive(actix_web::http::KeepAlive::Os)
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
