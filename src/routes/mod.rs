pub mod files;
pub mod health;
pub mod studies;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::config::BridgeConfig;
use crate::orthanc::OrthancClient;

/// Shared state for every route: the archive client (one keep-alive pool
/// for the whole process) plus the listing fan-out bound.
#[derive(Clone)]
pub struct AppState {
    pub client: Arc<OrthancClient>,
    pub enrichment_concurrency: usize,
}

pub fn build_router(client: Arc<OrthancClient>, bridge: &BridgeConfig) -> Router {
    let state = AppState {
        client,
        enrichment_concurrency: bridge.enrichment_concurrency,
    };

    Router::new()
        .route("/api/studies", get(studies::list_studies))
        .route(
            "/api/patient/{orthanc_patient_id}",
            get(studies::patient_details),
        )
        .route("/api/study/{study_id}/reports", get(studies::study_reports))
        .route("/api/instance/{instance_id}/pdf", get(files::instance_file))
        .route(
            "/api/upload",
            post(files::upload_instance).layer(DefaultBodyLimit::max(bridge.max_upload_bytes)),
        )
        .route("/api/health", get(health::health_check))
        .with_state(state)
}
