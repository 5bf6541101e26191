//! Study listing, patient detail and report listing routes.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use futures_util::stream::{self, StreamExt, TryStreamExt};
use serde_json::Value;

use crate::error::BridgeError;
use crate::models::{ReportReference, StudySummary};
use crate::orthanc::FindQuery;
use crate::routes::AppState;

/// GET /api/studies. One find for the study collection, then one
/// document-existence probe per study, at most `enrichment_concurrency`
/// in flight at a time. A single failed probe fails the whole listing.
pub async fn list_studies(
    State(state): State<AppState>,
) -> Result<Json<Vec<StudySummary>>, BridgeError> {
    let found = state.client.find(&FindQuery::all_studies()).await?;
    // The archive may answer OK with a non-array body when nothing matches.
    let records = match found {
        Value::Array(records) => records,
        _ => Vec::new(),
    };

    tracing::debug!(studies = records.len(), "enriching study listing");

    // Each probe future owns its record; borrowing from the iterated slice
    // does not satisfy the stream adapter's closure bound.
    let mut summaries: Vec<(usize, StudySummary)> = stream::iter(records.into_iter().enumerate())
        .map(|(position, record)| {
            let client = Arc::clone(&state.client);
            async move {
                let study_id = record.get("ID").and_then(Value::as_str).unwrap_or_default();
                let has_pdf_report = client.has_document_series(study_id).await?;
                Ok::<_, BridgeError>((position, StudySummary::from_record(&record, has_pdf_report)))
            }
        })
        .buffer_unordered(state.enrichment_concurrency)
        .try_collect()
        .await?;

    // Probes complete in any order; the listing must keep the archive's
    // enumeration order.
    summaries.sort_by_key(|(position, _)| *position);
    Ok(Json(
        summaries.into_iter().map(|(_, summary)| summary).collect(),
    ))
}

/// GET /api/patient/{orthancPatientId}: the archive-native full patient
/// record, forwarded as-is.
pub async fn patient_details(
    State(state): State<AppState>,
    Path(orthanc_patient_id): Path<String>,
) -> Result<Json<Value>, BridgeError> {
    let response = state
        .client
        .get(&format!("/patients/{orthanc_patient_id}?full=true"))
        .await?;
    Ok(Json(response.into_structured()))
}

/// GET /api/study/{studyId}/reports: one reference per document-bearing
/// series under the study.
pub async fn study_reports(
    State(state): State<AppState>,
    Path(study_id): Path<String>,
) -> Result<Json<Vec<ReportReference>>, BridgeError> {
    let response = state
        .client
        .get(&format!("/studies/{study_id}/series"))
        .await?;

    let reports = response
        .into_structured()
        .as_array()
        .map(|series_list| {
            series_list
                .iter()
                .filter(|series| ReportReference::is_document_series(series))
                .filter_map(ReportReference::from_series)
                .collect()
        })
        .unwrap_or_default();

    Ok(Json(reports))
}
