//! HttpDocQaClient - REST client for the document Q&A backend.
//!
//! Endpoints:
//! - `POST {base_url}/documents/upload/` (multipart, field `file`)
//! - `POST {base_url}/qa/` (JSON)

use async_trait::async_trait;
use docqa_core::config::{ClientConfig, DEFAULT_BASE_URL};
use docqa_core::error::DocQaError;
use docqa_core::{
    Answer, DocumentFile, DocumentService, QaService, QuestionRequest, ServiceError, UploadReceipt,
};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;

const UPLOAD_PATH: &str = "/documents/upload/";
const QA_PATH: &str = "/qa/";

/// Which endpoint a failure came from; decides the error kind.
#[derive(Debug, Clone, Copy)]
enum Endpoint {
    Upload,
    Query,
}

impl Endpoint {
    fn error(self, message: impl Into<String>) -> ServiceError {
        match self {
            Self::Upload => ServiceError::upload(message),
            Self::Query => ServiceError::query(message),
        }
    }
}

/// Client for the document Q&A HTTP API.
#[derive(Clone)]
pub struct HttpDocQaClient {
    client: Client,
    base_url: String,
}

impl HttpDocQaClient {
    /// Creates a client for the given base URL with no request timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Creates a client from configuration, applying the request timeout.
    ///
    /// # Errors
    ///
    /// Returns a config error if the underlying HTTP client cannot be built.
    pub fn from_config(config: &ClientConfig) -> Result<Self, DocQaError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| DocQaError::config(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn read_json<T: DeserializeOwned>(
        endpoint: Endpoint,
        response: Response,
    ) -> Result<T, ServiceError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            return Err(map_http_error(endpoint, status, &body));
        }

        response.json::<T>().await.map_err(|err| {
            endpoint
                .error(format!("Failed to parse response: {err}"))
                .with_status(status.as_u16())
        })
    }
}

impl Default for HttpDocQaClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[async_trait]
impl DocumentService for HttpDocQaClient {
    async fn upload(&self, file: &DocumentFile) -> Result<UploadReceipt, ServiceError> {
        let url = self.endpoint(UPLOAD_PATH);
        tracing::debug!(url = %url, file = %file.name, bytes = file.size(), "Uploading document");

        let part = Part::bytes(file.bytes.clone())
            .file_name(file.name.clone())
            .mime_str(&file.mime_type)
            .map_err(|err| ServiceError::upload(format!("Invalid MIME type: {err}")))?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|err| ServiceError::upload(format!("Upload request failed: {err}")))?;

        Self::read_json(Endpoint::Upload, response).await
    }
}

#[async_trait]
impl QaService for HttpDocQaClient {
    async fn ask(&self, request: &QuestionRequest) -> Result<Answer, ServiceError> {
        let url = self.endpoint(QA_PATH);
        tracing::debug!(
            url = %url,
            document_id = %request.document_id,
            history = request.chat_history.len(),
            "Asking question"
        );

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|err| ServiceError::query(format!("Question request failed: {err}")))?;

        Self::read_json(Endpoint::Query, response).await
    }
}

/// Maps a non-success response into a service error.
///
/// The backend reports failures as `{"detail": "..."}`; validation failures
/// carry a structured `detail`, which is kept as JSON text.
fn map_http_error(endpoint: Endpoint, status: StatusCode, body: &str) -> ServiceError {
    let detail = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| match value.get("detail") {
            Some(serde_json::Value::String(text)) => Some(text.clone()),
            Some(other) => Some(other.to_string()),
            None => None,
        });

    let message = match detail {
        Some(detail) => detail,
        None if body.trim().is_empty() => status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string(),
        None => body.trim().to_string(),
    };

    endpoint
        .error(format!("{} ({})", message, status.as_u16()))
        .with_status(status.as_u16())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_http_error_uses_detail() {
        let err = map_http_error(
            Endpoint::Query,
            StatusCode::NOT_FOUND,
            r#"{"detail":"Document not found"}"#,
        );
        assert!(err.is_query());
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.message(), "Document not found (404)");
    }

    #[test]
    fn test_map_http_error_structured_detail() {
        let err = map_http_error(
            Endpoint::Upload,
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"detail":[{"loc":["body","file"],"msg":"field required"}]}"#,
        );
        assert!(err.is_upload());
        assert!(err.message().contains("field required"));
    }

    #[test]
    fn test_map_http_error_plain_body() {
        let err = map_http_error(Endpoint::Upload, StatusCode::BAD_GATEWAY, "upstream down\n");
        assert_eq!(err.message(), "upstream down (502)");
    }

    #[test]
    fn test_map_http_error_empty_body() {
        let err = map_http_error(Endpoint::Query, StatusCode::INTERNAL_SERVER_ERROR, "");
        assert_eq!(err.message(), "Internal Server Error (500)");
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = HttpDocQaClient::new("http://localhost:8000/");
        assert_eq!(client.endpoint(QA_PATH), "http://localhost:8000/qa/");
    }

    #[test]
    fn test_from_config() {
        let config = ClientConfig::default().with_base_url("https://qa.example.com/");
        let client = HttpDocQaClient::from_config(&config).unwrap();
        assert_eq!(client.base_url(), "https://qa.example.com");
    }
}
