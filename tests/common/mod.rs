//! In-process Orthanc stand-in used by the integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::extract::{Path, Request, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tower::ServiceExt;

use ponte::config::{BridgeConfig, OrthancConfig};
use ponte::orthanc::OrthancClient;

/// base64("admin:admin123"), the credential the bridge must present.
pub const BASIC_ADMIN: &str = "Basic YWRtaW46YWRtaW4xMjM=";

#[derive(Clone)]
pub struct MockOrthanc {
    /// Body answered for Level=Study finds; may be a non-array.
    pub studies: Value,
    /// Study IDs that own at least one DOC series.
    pub doc_studies: HashSet<String>,
    /// Study IDs whose series probe answers 503.
    pub failing_probes: HashSet<String>,
    /// Artificial probe latency per study, to force out-of-order completion.
    pub probe_delays_ms: HashMap<String, u64>,
    /// Expanded series per study for `/studies/{id}/series`.
    pub series: HashMap<String, Value>,
    pub patient: Value,
    /// Body served from `/instances/{id}/file`; empty means 404.
    pub pdf_body: Bytes,
    /// Reject every request with 401 when set.
    pub reject_auth: bool,
    pub uploads: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl Default for MockOrthanc {
    fn default() -> Self {
        Self {
            studies: json!([]),
            doc_studies: HashSet::new(),
            failing_probes: HashSet::new(),
            probe_delays_ms: HashMap::new(),
            series: HashMap::new(),
            patient: json!({
                "ID": "p1",
                "MainDicomTags": { "PatientName": "SILVA^MARIA" }
            }),
            pdf_body: Bytes::new(),
            reject_auth: false,
            uploads: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl MockOrthanc {
    pub async fn spawn(self) -> SocketAddr {
        let app = Router::new()
            .route("/tools/find", post(tools_find))
            .route("/patients/{id}", get(patient_details))
            .route("/studies/{id}/series", get(study_series))
            .route("/instances/{id}/file", get(instance_file))
            .route("/instances", post(store_instance))
            .route("/system", get(system_info))
            .with_state(self);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock archive");
        let addr = listener.local_addr().expect("mock archive address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock archive serve");
        });
        addr
    }
}

fn check_auth(mock: &MockOrthanc, headers: &HeaderMap) -> Option<Response> {
    let presented = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    if mock.reject_auth || presented != Some(BASIC_ADMIN) {
        return Some((StatusCode::UNAUTHORIZED, "unauthorized").into_response());
    }
    None
}

async fn tools_find(
    State(mock): State<MockOrthanc>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Some(denied) = check_auth(&mock, &headers) {
        return denied;
    }

    let query: Value = serde_json::from_slice(&body).expect("find body is JSON");
    match query["Level"].as_str() {
        Some("Study") => Json(mock.studies.clone()).into_response(),
        Some("Series") => {
            assert_eq!(query["Limit"], json!(1), "series probe must cap results at 1");
            assert_eq!(query["Query"]["Modality"], json!("DOC"));

            let parent = query["Query"]["ParentStudy"].as_str().unwrap_or_default();
            if let Some(ms) = mock.probe_delays_ms.get(parent) {
                tokio::time::sleep(Duration::from_millis(*ms)).await;
            }
            if mock.failing_probes.contains(parent) {
                return (StatusCode::SERVICE_UNAVAILABLE, "probe down").into_response();
            }
            let hits = if mock.doc_studies.contains(parent) {
                json!(["series-1"])
            } else {
                json!([])
            };
            Json(hits).into_response()
        }
        _ => StatusCode::BAD_REQUEST.into_response(),
    }
}

async fn patient_details(
    State(mock): State<MockOrthanc>,
    headers: HeaderMap,
    Path(_id): Path<String>,
) -> Response {
    if let Some(denied) = check_auth(&mock, &headers) {
        return denied;
    }
    Json(mock.patient.clone()).into_response()
}

async fn study_series(
    State(mock): State<MockOrthanc>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if let Some(denied) = check_auth(&mock, &headers) {
        return denied;
    }
    Json(mock.series.get(&id).cloned().unwrap_or(json!([]))).into_response()
}

async fn instance_file(
    State(mock): State<MockOrthanc>,
    headers: HeaderMap,
    Path(_id): Path<String>,
) -> Response {
    if let Some(denied) = check_auth(&mock, &headers) {
        return denied;
    }
    if mock.pdf_body.is_empty() {
        return (StatusCode::NOT_FOUND, "unknown resource").into_response();
    }
    (
        [(header::CONTENT_TYPE, "application/pdf")],
        mock.pdf_body.clone(),
    )
        .into_response()
}

async fn store_instance(
    State(mock): State<MockOrthanc>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Some(denied) = check_auth(&mock, &headers) {
        return denied;
    }
    assert_eq!(
        headers.get(header::CONTENT_TYPE).unwrap(),
        "application/dicom"
    );
    mock.uploads.lock().unwrap().push(body.to_vec());
    Json(json!({
        "ID": "i-new",
        "ParentSeries": "se-new",
        "ParentStudy": "st-new",
        "ParentPatient": "pa-new",
        "Status": "Success"
    }))
    .into_response()
}

async fn system_info(State(mock): State<MockOrthanc>, headers: HeaderMap) -> Response {
    if let Some(denied) = check_auth(&mock, &headers) {
        return denied;
    }
    Json(json!({ "Name": "ORTHANC", "Version": "1.12.4" })).into_response()
}

/// Builds the bridge router pointed at the given archive address.
pub fn bridge_router(archive: SocketAddr) -> Router {
    let orthanc = OrthancConfig {
        host: archive.ip().to_string(),
        port: archive.port(),
        username: "admin".to_string(),
        password: "admin123".to_string(),
    };
    let client = OrthancClient::new(orthanc).expect("build archive client");
    ponte::routes::build_router(Arc::new(client), &BridgeConfig::default())
}

/// An address nothing listens on, for connection-refused scenarios.
pub async fn unreachable_addr() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind probe listener");
    let addr = listener.local_addr().expect("probe address");
    drop(listener);
    addr
}

pub async fn send(app: Router, request: Request) -> Response {
    app.oneshot(request).await.expect("router handled request")
}

pub async fn fetch(app: Router, uri: &str) -> Response {
    send(
        app,
        Request::builder().uri(uri).body(Body::empty()).unwrap(),
    )
    .await
}

pub async fn read_bytes(response: Response) -> Bytes {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read response body")
}

pub async fn read_json(response: Response) -> Value {
    let bytes = read_bytes(response).await;
    serde_json::from_slice(&bytes).expect("response body is JSON")
}
