//! Local stand-in for the OAuth token, Drive and Sheets endpoints.

use crate::infrastructure::sheets::client::GoogleSheetsApi;
use actix_web::http::{header, StatusCode};
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

pub const STUB_TOKEN: &str = "stub-access-token";

#[derive(Default)]
struct StubState {
    spreadsheet_ids: Vec<String>,
    titles: Vec<String>,
    values_status: Option<u16>,
    values: Value,
    requests: Vec<String>,
    authorizations: Vec<String>,
    token_forms: Vec<String>,
    appended: Vec<Value>,
}

#[derive(Clone, Default)]
pub struct GoogleStub {
    state: Arc<Mutex<StubState>>,
}

impl GoogleStub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_spreadsheet(self, id: &str) -> Self {
        self.state.lock().unwrap().spreadsheet_ids.push(id.to_string());
        self
    }

    pub fn with_worksheets(self, titles: &[&str]) -> Self {
        self.state.lock().unwrap().titles = titles.iter().map(|t| t.to_string()).collect();
        self
    }

    /// Reply for every values read.
    pub fn with_values(self, status: u16, body: Value) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state.values_status = Some(status);
            state.values = body;
        }
        self
    }

    /// `METHOD path?query` of every request, in arrival order.
    pub fn requests(&self) -> Vec<String> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn authorizations(&self) -> Vec<String> {
        self.state.lock().unwrap().authorizations.clone()
    }

    pub fn token_forms(&self) -> Vec<String> {
        self.state.lock().unwrap().token_forms.clone()
    }

    pub fn appended(&self) -> Vec<Value> {
        self.state.lock().unwrap().appended.clone()
    }

    /// Serves on an ephemeral local port and returns the base URL. Needs a
    /// running actix system.
    pub fn start(&self) -> String {
        let stub = self.clone();
        let server = HttpServer::new(move || {
            App::new()
                .app_data(web::Data::new(stub.clone()))
                .route("/token", web::post().to(token))
                .route("/drive/v3/files", web::get().to(drive_files))
                .route("/v4/spreadsheets/{id}", web::get().to(spreadsheet))
                .service(
                    web::resource("/v4/spreadsheets/{id}/values/{range}")
                        .route(web::get().to(read_values))
                        .route(web::post().to(append_values)),
                )
        })
        .workers(1)
        .disable_signals()
        .bind(("127.0.0.1", 0))
        .expect("bind stub server");
        let addr = server.addrs()[0];
        actix_web::rt::spawn(server.run());
        format!("http://{}", addr)
    }

    pub fn api(base: &str) -> GoogleSheetsApi {
        GoogleSheetsApi::with_endpoints(
            reqwest::Client::new(),
            &format!("{}/", base),
            &format!("{}/drive/v3/files", base),
        )
        .unwrap()
    }

    fn record(&self, req: &HttpRequest) {
        let mut state = self.state.lock().unwrap();
        state.requests.push(format!("{} {}", req.method(), req.uri()));
        if let Some(auth) = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
        {
            state.authorizations.push(auth.to_string());
        }
    }
}

async fn token(stub: web::Data<GoogleStub>, req: HttpRequest, form: String) -> HttpResponse {
    stub.record(&req);
    stub.state.lock().unwrap().token_forms.push(form);
    HttpResponse::Ok().json(json!({
        "access_token": STUB_TOKEN,
        "token_type": "Bearer",
        "expires_in": 3600
    }))
}

async fn drive_files(stub: web::Data<GoogleStub>, req: HttpRequest) -> HttpResponse {
    stub.record(&req);
    let files: Vec<Value> = stub
        .state
        .lock()
        .unwrap()
        .spreadsheet_ids
        .iter()
        .map(|id| json!({ "id": id, "name": "PharmaFeedbackApp" }))
        .collect();
    HttpResponse::Ok().json(json!({ "files": files }))
}

async fn spreadsheet(stub: web::Data<GoogleStub>, req: HttpRequest) -> HttpResponse {
    stub.record(&req);
    let sheets: Vec<Value> = stub
        .state
        .lock()
        .unwrap()
        .titles
        .iter()
        .map(|title| json!({ "properties": { "title": title } }))
        .collect();
    HttpResponse::Ok().json(json!({ "sheets": sheets }))
}

async fn read_values(stub: web::Data<GoogleStub>, req: HttpRequest) -> HttpResponse {
    stub.record(&req);
    let state = stub.state.lock().unwrap();
    let status = StatusCode::from_u16(state.values_status.unwrap_or(200)).unwrap();
    HttpResponse::build(status).json(state.values.clone())
}

async fn append_values(
    stub: web::Data<GoogleStub>,
    req: HttpRequest,
    body: web::Json<Value>,
) -> HttpResponse {
    stub.record(&req);
    stub.state.lock().unwrap().appended.push(body.into_inner());
    HttpResponse::Ok().json(json!({ "updates": { "updatedRows": 1 } }))
}
