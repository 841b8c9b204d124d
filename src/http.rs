//! HTTP surface: `POST /api/scrape-xpaths` and `GET /health`.
//!
//! Error bodies carry fixed, user-facing messages only. Details go to the
//! server log and, summarised, to the job's `logs`.

use crate::aggregate::{ElementRecord, Summary};
use crate::error::ScrapeError;
use crate::job::{JobController, JobStatus, ScrapeJob};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub const URL_REQUIRED: &str = "URL is required";
pub const SCRAPE_FAILED: &str = "Scraping failed. Try another site or check logs.";

#[derive(Debug, Clone, Deserialize)]
pub struct ScrapeRequest {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseSummary {
    #[serde(flatten)]
    pub categories: Summary,
    pub classification_failures: usize,
    pub skipped_nodes: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScrapeResponse {
    pub xpaths: Vec<ElementRecord>,
    pub logs: String,
    pub summary: ResponseSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ScrapeResponse {
    fn from_job(job: ScrapeJob) -> Self {
        let summary = ResponseSummary {
            categories: job.aggregation().summary(),
            classification_failures: job.stats().classification_failures,
            skipped_nodes: job.stats().skipped,
        };
        let logs = job.logs().join("\n");
        Self { xpaths: job.records().to_vec(), logs, summary }
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(ErrorResponse { error: message.to_string() })).into_response()
}

/// Build the application router
pub fn router(controller: Arc<JobController>) -> Router {
    Router::new()
        .route("/api/scrape-xpaths", post(scrape_xpaths))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .with_state(controller)
}

async fn health() -> &'static str {
    "ok"
}

async fn scrape_xpaths(
    State(controller): State<Arc<JobController>>,
    payload: Result<Json<ScrapeRequest>, JsonRejection>,
) -> Response {
    let url = match payload {
        Ok(Json(ScrapeRequest { url: Some(url) })) if !url.trim().is_empty() => url,
        Ok(_) => return error_response(StatusCode::BAD_REQUEST, URL_REQUIRED),
        Err(rejection) => {
            log::debug!("Rejected scrape request body: {}", rejection);
            return error_response(StatusCode::BAD_REQUEST, URL_REQUIRED);
        }
    };

    let job = controller.run(&url).await;
    match (job.status(), job.error()) {
        (JobStatus::Done, _) => (StatusCode::OK, Json(ScrapeResponse::from_job(job))).into_response(),
        // Input errors describe the caller's own request and are safe to echo
        (_, Some(ScrapeError::InvalidInput(message))) => error_response(StatusCode::BAD_REQUEST, message),
        _ => error_response(StatusCode::INTERNAL_SERVER_ERROR, SCRAPE_FAILED),
    }
}
