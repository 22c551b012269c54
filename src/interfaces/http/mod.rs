use crate::domain::admin::LoginRequest;
use crate::domain::error::AppError;
use crate::domain::feedback::{FeedbackRow, FeedbackSubmission};
use crate::domain::report::{ReportDocument, DOCX_CONTENT_TYPE};
use crate::interfaces::state::AppState;
use actix_cors::Cors;
use actix_web::http::header::{
    Charset, ContentDisposition, DispositionParam, DispositionType, ExtendedValue,
};
use actix_web::http::StatusCode;
use actix_web::{
    dev::Server, get, post, web, App, HttpResponse, HttpServer, Responder, ResponseError,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Serialize)]
pub struct StatusMessage {
    pub status: &'static str,
    pub message: String,
}

impl StatusMessage {
    fn new(status: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

#[derive(Serialize)]
struct ProductsResponse {
    status: &'static str,
    products: Vec<String>,
}

#[derive(Serialize)]
struct FeedbackListResponse {
    status: &'static str,
    feedback: Vec<FeedbackRow>,
}

#[derive(Deserialize)]
pub struct ReportQuery {
    #[serde(default)]
    pub lang: Option<String>,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(StatusMessage::new("error", self.to_string()))
    }
}

#[get("/health")]
async fn health(data: web::Data<AppState>) -> impl Responder {
    match data.store.readiness() {
        Ok(()) => {
            let ai = if data.annotator.is_configured() {
                "AI annotation enabled"
            } else {
                "AI annotation disabled: GEMINI_API_KEY not set"
            };
            HttpResponse::Ok().json(StatusMessage::new(
                "ok",
                format!("Feedback service is running. {}.", ai),
            ))
        }
        Err(e) => {
            error!(error = %e, "Health check failed");
            e.error_response()
        }
    }
}

#[get("/get-products")]
async fn get_products(data: web::Data<AppState>) -> impl Responder {
    match data.store.list_product_names().await {
        Ok(products) => HttpResponse::Ok().json(ProductsResponse {
            status: "success",
            products,
        }),
        Err(e) => {
            error!(error = %e, "Failed to list products");
            e.error_response()
        }
    }
}

#[post("/submit-feedback")]
async fn submit_feedback(
    data: web::Data<AppState>,
    req: web::Json<FeedbackSubmission>,
) -> impl Responder {
    match data
        .submit_feedback_use_case
        .execute(req.into_inner())
        .await
    {
        Ok(record) => {
            info!(
                product = %record.product_name,
                category = %record.ai_category,
                "Feedback stored"
            );
            HttpResponse::Ok().json(StatusMessage::new("success", "Feedback submitted."))
        }
        Err(e) => {
            error!(error = %e, "An error occurred in /submit-feedback");
            e.error_response()
        }
    }
}

#[post("/admin-login")]
async fn admin_login(data: web::Data<AppState>, req: web::Json<LoginRequest>) -> impl Responder {
    let username = req.username.as_deref().unwrap_or_default();
    match data
        .store
        .authenticate(req.username.as_deref(), req.password.as_deref())
        .await
    {
        Ok(()) => {
            info!(username, "Admin login succeeded");
            HttpResponse::Ok().json(StatusMessage::new("success", "Login successful."))
        }
        Err(e @ AppError::Unauthorized(_)) => {
            warn!(username, "Admin login rejected");
            e.error_response()
        }
        Err(e) => {
            error!(error = %e, "Admin login failed");
            e.error_response()
        }
    }
}

#[get("/get-all-feedback")]
async fn get_all_feedback(data: web::Data<AppState>) -> impl Responder {
    match data.store.list_all_feedback().await {
        Ok(feedback) => HttpResponse::Ok().json(FeedbackListResponse {
            status: "success",
            feedback,
        }),
        Err(e) => {
            error!(error = %e, "Failed to list feedback");
            e.error_response()
        }
    }
}

#[get("/generate-report")]
async fn generate_report(
    data: web::Data<AppState>,
    query: web::Query<ReportQuery>,
) -> impl Responder {
    match data.report_builder.build_report(query.lang.as_deref()).await {
        Ok(report) => HttpResponse::Ok()
            .content_type(DOCX_CONTENT_TYPE)
            .insert_header(attachment(&report))
            .body(report.bytes),
        Err(e @ AppError::NotFound(_)) => {
            warn!("Report requested with no feedback data");
            e.error_response()
        }
        Err(e) => {
            error!(error = %e, "Report generation failed");
            e.error_response()
        }
    }
}

/// ASCII `filename`, plus an RFC 5987 `filename*` when the real name is not ASCII.
fn attachment(report: &ReportDocument) -> ContentDisposition {
    let mut parameters = vec![DispositionParam::Filename(report.fallback_filename.clone())];
    if report.filename != report.fallback_filename {
        parameters.push(DispositionParam::FilenameExt(ExtendedValue {
            charset: Charset::Ext("UTF-8".to_string()),
            language_tag: None,
            value: report.filename.clone().into_bytes(),
        }));
    }
    ContentDisposition {
        disposition: DispositionType::Attachment,
        parameters,
    }
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        let response =
            AppError::ValidationError(format!("Invalid query string: {}", err)).error_response();
        actix_web::error::InternalError::from_response(err, response).into()
    })
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let response =
            AppError::ValidationError(format!("Invalid request body: {}", err)).error_response();
        actix_web::error::InternalError::from_response(err, response).into()
    })
}

/// Registers every route. Shared by the server and the handler tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .service(health)
        .service(get_products)
        .service(submit_feedback)
        .service(admin_login)
        .service(get_all_feedback)
        .service(generate_report);
}

pub fn start_server(state: Arc<AppState>, host: &str, port: u16) -> std::io::Result<Server> {
    let state = web::Data::from(state);

    let server = HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((host, port))?
    .run();

    Ok(server)
}
