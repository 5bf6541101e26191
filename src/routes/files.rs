//! Binary file proxying and DICOM upload relaying.

use axum::body::{Body, Bytes};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::error::BridgeError;
use crate::routes::AppState;

/// Hop-by-hop headers that must not be forwarded to the viewer.
const HOP_BY_HOP: [&str; 4] = ["connection", "keep-alive", "transfer-encoding", "trailer"];

/// GET /api/instance/{instanceId}/pdf. Forwards upstream status and
/// content headers verbatim and streams the body through as the bytes
/// arrive; report documents can be tens of megabytes and are never
/// buffered whole.
pub async fn instance_file(
    State(state): State<AppState>,
    Path(instance_id): Path<String>,
) -> Response {
    let upstream = match state
        .client
        .open_stream(&format!("/instances/{instance_id}/file"))
        .await
    {
        Ok(upstream) => upstream,
        Err(err) => {
            tracing::error!("file proxy failed before any bytes: {err}");
            return (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response();
        }
    };

    let status = upstream.status();
    if status.as_u16() >= 400 {
        return (status, format!("Erro do Orthanc: {}", status.as_u16())).into_response();
    }

    let mut builder = Response::builder().status(status);
    for (name, value) in upstream.headers() {
        if HOP_BY_HOP.iter().any(|h| name.as_str().eq_ignore_ascii_case(h)) {
            continue;
        }
        builder = builder.header(name, value);
    }

    match builder.body(Body::from_stream(upstream.bytes_stream())) {
        Ok(response) => response,
        Err(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response(),
    }
}

/// POST /api/upload. Relays the raw DICOM payload to the archive's
/// ingestion endpoint; uploads are never retried here.
pub async fn upload_instance(State(state): State<AppState>, body: Bytes) -> Response {
    if body.is_empty() {
        return BridgeError::validation("Nenhum ficheiro recebido.").into_response();
    }

    match state.client.store_instance(body).await {
        Ok(details) => Json(json!({
            "message": "Ficheiro DICOM enviado com sucesso!",
            "details": details,
        }))
        .into_response(),
        Err(err) => {
            tracing::error!("upload relay failed: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "message": format!("Falha no upload para o Orthanc: {err}") })),
            )
                .into_response()
        }
    }
}
