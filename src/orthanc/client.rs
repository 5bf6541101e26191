//! Authenticated client for the archive's REST API.

use axum::body::Bytes;
use http::header::CONTENT_TYPE;
use http::Method;
use serde::Serialize;
use serde_json::{json, Value};

use crate::config::OrthancConfig;
use crate::error::BridgeError;
use crate::orthanc::headers;
use crate::orthanc::response::{is_binary_content_type, parse_structured, UpstreamResponse};

/// A `/tools/find` request body in the archive's native shape.
#[derive(Debug, Clone, Serialize)]
pub struct FindQuery {
    #[serde(rename = "Level")]
    pub level: String,
    #[serde(rename = "Query")]
    pub query: Value,
    #[serde(rename = "Limit", skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl FindQuery {
    /// Every study. Deliberately no expand mode: the default find response
    /// already carries the tag groups the bridge needs, at roughly half
    /// the payload and archive-side cost.
    pub fn all_studies() -> Self {
        Self {
            level: "Study".to_string(),
            query: json!({ "PatientName": "*" }),
            limit: None,
        }
    }

    /// Existence probe for document-bearing series under one study.
    /// Limit 1: the caller only needs to know whether any exist.
    pub fn document_series(study_id: &str) -> Self {
        Self {
            level: "Series".to_string(),
            query: json!({ "ParentStudy": study_id, "Modality": "DOC" }),
            limit: Some(1),
        }
    }

    fn to_payload(&self) -> Bytes {
        Bytes::from(serde_json::to_vec(self).expect("find query always serializes"))
    }
}

/// One instance of this client is shared process-wide; the underlying
/// `reqwest::Client` keeps connections alive across concurrent requests.
#[derive(Debug, Clone)]
pub struct OrthancClient {
    http: reqwest::Client,
    config: OrthancConfig,
}

impl OrthancClient {
    pub fn new(config: OrthancConfig) -> Result<Self, BridgeError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| BridgeError::connection(e.to_string()))?;
        Ok(Self { http, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url(), path)
    }

    /// One authenticated round-trip. The body is always read to completion
    /// and classified by content type; `open_stream` is the streaming
    /// alternative used by the file proxy.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        payload: Option<Bytes>,
        content_type: &str,
    ) -> Result<UpstreamResponse, BridgeError> {
        let request_headers = headers::build(&self.config, payload.as_deref(), content_type);
        let mut request = self
            .http
            .request(method, self.url(path))
            .headers(request_headers);
        if let Some(body) = payload {
            request = request.body(body);
        }

        let response = request.send().await?;

        let status = response.status();
        let response_headers = response.headers().clone();
        let content_type = response_headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        // Resets mid-transfer surface as connection failures too.
        let bytes = response.bytes().await?;

        if status.as_u16() >= 400 {
            return Err(upstream_error(status.as_u16(), &bytes));
        }

        if is_binary_content_type(&content_type) {
            Ok(UpstreamResponse::Binary {
                bytes,
                headers: response_headers,
            })
        } else {
            Ok(UpstreamResponse::Structured(parse_structured(&bytes)))
        }
    }

    pub async fn get(&self, path: &str) -> Result<UpstreamResponse, BridgeError> {
        self.request(Method::GET, path, None, headers::DEFAULT_CONTENT_TYPE)
            .await
    }

    pub async fn find(&self, query: &FindQuery) -> Result<Value, BridgeError> {
        let response = self
            .request(
                Method::POST,
                "/tools/find",
                Some(query.to_payload()),
                headers::DEFAULT_CONTENT_TYPE,
            )
            .await?;
        Ok(response.into_structured())
    }

    /// Whether at least one document-bearing (Modality "DOC") series
    /// exists under the given study.
    pub async fn has_document_series(&self, study_id: &str) -> Result<bool, BridgeError> {
        let found = self.find(&FindQuery::document_series(study_id)).await?;
        Ok(found.as_array().is_some_and(|series| !series.is_empty()))
    }

    /// GET with the response left unconsumed: status and headers are
    /// available immediately, the body arrives as a byte stream.
    pub async fn open_stream(&self, path: &str) -> Result<reqwest::Response, BridgeError> {
        let request_headers = headers::build(&self.config, None, headers::DEFAULT_CONTENT_TYPE);
        Ok(self
            .http
            .get(self.url(path))
            .headers(request_headers)
            .send()
            .await?)
    }

    /// Relays one raw DICOM payload to the archive's ingestion endpoint and
    /// returns its acceptance record.
    pub async fn store_instance(&self, body: Bytes) -> Result<Value, BridgeError> {
        let response = self
            .request(Method::POST, "/instances", Some(body), "application/dicom")
            .await?;
        Ok(response.into_structured())
    }

    /// The archive's `/system` record, used by the connectivity probe.
    pub async fn system_info(&self) -> Result<Value, BridgeError> {
        Ok(self.get("/system").await?.into_structured())
    }
}

fn upstream_error(status: u16, body: &[u8]) -> BridgeError {
    if status == 401 {
        BridgeError::Authentication
    } else {
        BridgeError::Upstream {
            status,
            body: String::from_utf8_lossy(body).into_owned(),
        }
    }
}
