//! Error taxonomy for the bridge. Every failure surfaces to the HTTP
//! client as a `{"message": ...}` JSON body with a matching status code.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, BridgeError>;

#[derive(Debug, Error)]
pub enum BridgeError {
    /// Transport-level failure: the archive could not be reached or the
    /// connection dropped mid-transfer. Not the same thing as the archive
    /// rejecting a request.
    #[error("Não foi possível conectar ao Orthanc: {0}")]
    Connection(String),

    /// The archive answered 401: the configured credential is wrong.
    #[error(
        "Credenciais inválidas ou não fornecidas na configuração da ponte. \
         Verifique se utilizador e senha correspondem ao orthanc.json."
    )]
    Authentication,

    /// The archive answered with any other status >= 400.
    #[error("Erro do Orthanc: {status}. Resposta: {body}")]
    Upstream { status: u16, body: String },

    /// Malformed client input, e.g. an empty upload body.
    #[error("{0}")]
    Validation(String),
}

impl BridgeError {
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            BridgeError::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<reqwest::Error> for BridgeError {
    fn from(err: reqwest::Error) -> Self {
        BridgeError::Connection(err.to_string())
    }
}

impl IntoResponse for BridgeError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(%status, "{self}");
        }
        (status, Json(json!({ "message": self.to_string() }))).into_response()
    }
}
