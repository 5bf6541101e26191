//! Connectivity probe against the archive.

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::error::BridgeError;
use crate::routes::AppState;

/// GET /api/health: one authenticated GET of the archive's `/system`
/// record. A 401 surfaces the credential diagnostic, a transport failure
/// the connection one, so misconfiguration is obvious from a single call.
pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, BridgeError> {
    match state.client.system_info().await {
        Ok(system) => Ok(Json(json!({ "status": "ok", "orthanc": system }))),
        Err(err) => {
            if matches!(err, BridgeError::Authentication) {
                tracing::warn!(
                    "archive rejected the configured credential; cross-check \
                     [orthanc] username/password against the archive's orthanc.json"
                );
            }
            Err(err)
        }
    }
}
