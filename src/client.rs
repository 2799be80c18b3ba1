use reqwest::multipart;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ServiceConfig;
use crate::types::{AnswerFormat, Citation};

/// Generic status line when the index operation fails without a usable
/// `detail` message from the service.
pub const UPLOAD_FALLBACK: &str = "Upload failed.";
/// Same, for the ask operation.
pub const ASK_FALLBACK: &str = "Query failed.";

/// Failure of one of the two network operations, split the way the UI
/// reports them: a non-2xx response with a `detail` body is surfaced
/// verbatim, everything else collapses into the operation's generic
/// fallback message (the underlying cause goes to the log, not the UI).
#[derive(Debug, Error)]
pub enum ClientError {
    /// The service answered non-2xx and explained itself.
    #[error("service reported: {0}")]
    Server(String),
    /// Network failure, timeout, or a body that failed to parse.
    #[error("transport: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ClientError {
    /// Text shown to the user in place of the expected result.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ClientError::Server(detail) => detail.clone(),
            ClientError::Transport(_) => fallback.to_string(),
        }
    }
}

/// Successful `/upload-and-index` response. The service also returns
/// chunking parameters inside `metadata`; only the count is displayed.
#[derive(Debug, Deserialize)]
pub struct IndexOutcome {
    pub file_name: String,
    pub metadata: IndexMetadata,
}

#[derive(Debug, Deserialize)]
pub struct IndexMetadata {
    pub count: u64,
}

/// Successful `/ask` response. Both fields are filled with defaults when
/// absent so a sparse body parses instead of erroring.
#[derive(Debug, Default, Deserialize)]
pub struct Answer {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub results: Vec<Citation>,
}

/// Error body the service attaches to non-2xx responses. `detail` is
/// optional; a missing or malformed body yields the generic fallback.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<String>,
}

#[derive(Debug, Serialize)]
struct AskRequest<'a> {
    query: &'a str,
    index_dir: &'a str,
    top_k: u32,
    answer_format: AnswerFormat,
}

/// Thin wrapper over the document-search HTTP service.
/// Holds a connection-pooling reqwest client; cheap to share via Tauri
/// managed state.
pub struct SearchClient {
    http: reqwest::Client,
    config: ServiceConfig,
}

impl SearchClient {
    pub fn new(config: ServiceConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Upload a PDF and rebuild the service-side index from it.
    /// `POST /upload-and-index`, multipart form with a single `file` field.
    pub async fn upload_and_index(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<IndexOutcome, ClientError> {
        let part = multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str("application/pdf")?;
        let form = multipart::Form::new().part("file", part);

        let response = self
            .http
            .post(format!("{}/upload-and-index", self.config.base_address))
            .timeout(self.config.timeout)
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::server_error(response, UPLOAD_FALLBACK).await);
        }
        Ok(response.json::<IndexOutcome>().await?)
    }

    /// Ask a question over the indexed document.
    /// `POST /ask` with the trimmed question, the configured index location
    /// and result limit, and the chosen answer format.
    pub async fn ask(
        &self,
        question: &str,
        answer_format: AnswerFormat,
    ) -> Result<Answer, ClientError> {
        let body = AskRequest {
            query: question,
            index_dir: &self.config.index_location,
            top_k: self.config.result_limit,
            answer_format,
        };

        let response = self
            .http
            .post(format!("{}/ask", self.config.base_address))
            .timeout(self.config.timeout)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::server_error(response, ASK_FALLBACK).await);
        }
        Ok(response.json::<Answer>().await?)
    }

    /// One-shot reachability probe against `GET /health`.
    /// Informational only; neither workflow gates on it.
    pub async fn health(&self) -> bool {
        self.http
            .get(format!("{}/health", self.config.base_address))
            .timeout(self.config.timeout)
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }

    /// Extract a `detail` message from a non-2xx response, degrading to
    /// `fallback` when the body is missing, non-JSON, or has no detail.
    async fn server_error(response: reqwest::Response, fallback: &str) -> ClientError {
        let detail = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.detail);
        ClientError::Server(detail.unwrap_or_else(|| fallback.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(base: String) -> SearchClient {
        SearchClient::new(ServiceConfig {
            base_address: base,
            ..ServiceConfig::default()
        })
    }

    #[tokio::test]
    async fn upload_parses_count_and_file_name() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/upload-and-index")
            .with_status(200)
            .with_body(
                r#"{"message":"file uploaded and index rebuilt",
                    "file_name":"report.pdf",
                    "metadata":{"count":42,"chunk_size":1000,"overlap":200}}"#,
            )
            .create_async()
            .await;

        let client = test_client(server.url());
        let outcome = client
            .upload_and_index("report.pdf", b"%PDF-1.4".to_vec())
            .await
            .unwrap();
        assert_eq!(outcome.file_name, "report.pdf");
        assert_eq!(outcome.metadata.count, 42);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn upload_surfaces_server_detail_verbatim() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/upload-and-index")
            .with_status(400)
            .with_body(r#"{"detail":"Only .pdf, .txt, .md are supported."}"#)
            .create_async()
            .await;

        let client = test_client(server.url());
        let err = client
            .upload_and_index("report.pdf", vec![1, 2, 3])
            .await
            .unwrap_err();
        match err {
            ClientError::Server(detail) => {
                assert_eq!(detail, "Only .pdf, .txt, .md are supported.")
            }
            other => panic!("expected Server error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn upload_error_with_empty_body_uses_fallback() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/upload-and-index")
            .with_status(500)
            .with_body("")
            .create_async()
            .await;

        let client = test_client(server.url());
        let err = client
            .upload_and_index("report.pdf", vec![0])
            .await
            .unwrap_err();
        assert_eq!(err.user_message(UPLOAD_FALLBACK), UPLOAD_FALLBACK);
    }

    #[tokio::test]
    async fn ask_fills_missing_fields_with_defaults() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/ask")
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let client = test_client(server.url());
        let answer = client.ask("what is this?", AnswerFormat::Paragraph).await.unwrap();
        assert_eq!(answer.summary, "");
        assert!(answer.results.is_empty());
    }

    #[tokio::test]
    async fn ask_sends_configured_limit_and_location() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/ask")
            .match_body(mockito::Matcher::Json(serde_json::json!({
                "query": "who signed it?",
                "index_dir": "data/index",
                "top_k": 5,
                "answer_format": "bullets"
            })))
            .with_status(200)
            .with_body(r#"{"summary":"- nobody","results":[]}"#)
            .create_async()
            .await;

        let client = test_client(server.url());
        let answer = client.ask("who signed it?", AnswerFormat::Bullets).await.unwrap();
        assert_eq!(answer.summary, "- nobody");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn unreachable_service_is_a_transport_error() {
        // Nothing listens on this address; connect fails fast.
        let client = test_client("http://127.0.0.1:1".to_string());
        let err = client.ask("anything", AnswerFormat::Paragraph).await.unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));
        assert_eq!(err.user_message(ASK_FALLBACK), ASK_FALLBACK);
    }

    #[tokio::test]
    async fn health_reflects_service_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/health")
            .with_status(200)
            .with_body(r#"{"status":"ok"}"#)
            .create_async()
            .await;

        let client = test_client(server.url());
        assert!(client.health().await);

        let dead = test_client("http://127.0.0.1:1".to_string());
        assert!(!dead.health().await);
    }
}
