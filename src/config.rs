use std::time::Duration;

/// Connection settings for the document-search service.
/// Injected into [`crate::client::SearchClient`] at construction so tests
/// can point the client at a local mock server.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Base address of the search service, without a trailing slash.
    pub base_address: String,
    /// Index directory identifier sent with every ask request.
    pub index_location: String,
    /// How many chunks to request per question.
    pub result_limit: u32,
    /// Per-request timeout. Index builds on large PDFs can take a while,
    /// so this is generous.
    pub timeout: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_address: "http://127.0.0.1:8000".to_string(),
            index_location: "data/index".to_string(),
            result_limit: 5,
            timeout: Duration::from_secs(120),
        }
    }
}
