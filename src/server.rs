use actix_web::{web, App, HttpResponse, HttpServer};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

use crate::candidate_generator::CandidateGenerator;
use crate::carrier::{classify, Carrier};
use crate::config::SharedStore;
use crate::identifier::normalize;
use crate::issuer::NumberIssuer;
use crate::metrics::IssuerMetrics;

pub type SharedGenerator = Box<dyn CandidateGenerator + Send + Sync>;
pub type SharedIssuer = Arc<NumberIssuer<SharedStore, SharedGenerator>>;

const GENERATION_FAILED: &str = "Failed to generate phone number. Please try again.";

pub struct AppState {
    pub issuer: SharedIssuer,
    pub metrics: IssuerMetrics,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UniquePhoneResponse {
    pub identifier: String,
    pub phone: String,
    pub format: String,
    pub carrier: Carrier,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecordPayload {
    pub phone: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecordResponse {
    pub phone: String,
    pub recorded: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CarrierResponse {
    pub phone: String,
    pub carrier: Carrier,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_body(message: impl Into<String>) -> ErrorResponse {
    ErrorResponse { error: message.into() }
}

async fn unique_phone(state: web::Data<AppState>) -> HttpResponse {
    let span = tracing::info_span!("unique_phone", request_id = %Uuid::new_v4());
    let issuer = Arc::clone(&state.issuer);
    let worker_span = span.clone();

    let outcome = web::block(move || worker_span.in_scope(|| issuer.issue()))
        .instrument(span.clone())
        .await;

    let _entered = span.enter();
    match outcome {
        Ok(Ok(phone)) => {
            let carrier = classify(&phone);
            tracing::info!(phone = %phone, %carrier, "served unique phone number");
            HttpResponse::Ok().json(UniquePhoneResponse {
                identifier: phone.clone(),
                phone,
                format: "international".to_string(),
                carrier,
            })
        }
        Ok(Err(e)) => {
            tracing::error!(error = %e, "error generating phone number");
            HttpResponse::InternalServerError().json(error_body(GENERATION_FAILED))
        }
        Err(e) => {
            tracing::error!(error = %e, "issuer task failed");
            HttpResponse::InternalServerError().json(error_body(GENERATION_FAILED))
        }
    }
}

async fn record_used(state: web::Data<AppState>, payload: web::Json<RecordPayload>) -> HttpResponse {
    let phone = match normalize(&payload.phone) {
        Ok(phone) => phone,
        Err(e) => return HttpResponse::BadRequest().json(error_body(e.to_string())),
    };
    let issuer = Arc::clone(&state.issuer);
    let candidate = phone.clone();

    match web::block(move || issuer.record_used(&candidate)).await {
        Ok(Ok(recorded)) => HttpResponse::Ok().json(RecordResponse { phone, recorded }),
        Ok(Err(e)) => {
            tracing::error!(error = %e, phone = %phone, "error recording phone number");
            HttpResponse::InternalServerError().json(error_body("Failed to record phone number."))
        }
        Err(e) => {
            tracing::error!(error = %e, "issuer task failed");
            HttpResponse::InternalServerError().json(error_body("Failed to record phone number."))
        }
    }
}

async fn carrier(phone: web::Path<String>) -> HttpResponse {
    let phone = phone.into_inner();
    let carrier = classify(&phone);
    HttpResponse::Ok().json(CarrierResponse { phone, carrier })
}

async fn metrics(state: web::Data<AppState>) -> HttpResponse {
    match state.metrics.render() {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/plain; version=0.0.4")
            .body(body),
        Err(e) => {
            tracing::error!(error = %e, "error encoding metrics");
            HttpResponse::InternalServerError().finish()
        }
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/unique-phone", web::get().to(unique_phone))
        .route("/api/unique-phone/used", web::post().to(record_used))
        .route("/api/carrier/{phone}", web::get().to(carrier))
        .route("/metrics", web::get().to(metrics));
}

pub async fn run(bind: &str, state: AppState) -> std::io::Result<()> {
    let state = web::Data::new(state);
    tracing::info!(%bind, "listening");

    HttpServer::new(move || App::new().app_data(state.clone()).configure(configure))
        .bind(bind)?
        .run()
        .await
}
