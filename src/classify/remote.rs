use crate::classify::Classifier;
use crate::classify::category::Category;
use crate::dom::ElementMetadata;
use crate::error::ClassificationError;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// Inference endpoint used when none is configured
pub const DEFAULT_ENDPOINT: &str =
    "https://api-inference.huggingface.co/models/bhadresh-savani/distilbert-base-uncased-emotion";

/// Settings for the remote label service
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteClassifierConfig {
    pub endpoint: String,
    /// Sent as a bearer token when present
    pub api_token: Option<String>,
    /// Per-request bound, shorter than the navigation timeout
    pub timeout: Duration,
}

impl Default for RemoteClassifierConfig {
    fn default() -> Self {
        Self { endpoint: DEFAULT_ENDPOINT.to_string(), api_token: None, timeout: Duration::from_secs(10) }
    }
}

impl RemoteClassifierConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self { endpoint: endpoint.into(), ..Default::default() }
    }

    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Delegates classification to an external label service.
///
/// The service is untrusted: every response is validated before its label
/// is mapped onto [`Category`].
pub struct RemoteClassifier {
    client: Client,
    config: RemoteClassifierConfig,
}

impl RemoteClassifier {
    pub fn new(config: RemoteClassifierConfig) -> Result<Self, ClassificationError> {
        let client = Client::builder()
            .user_agent(concat!("xpath-scraper/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .connect_timeout(config.timeout)
            .build()
            .map_err(|e| ClassificationError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &RemoteClassifierConfig {
        &self.config
    }

    async fn request_label(&self, html: &str) -> Result<String, ClassificationError> {
        let mut request = self.client.post(&self.config.endpoint).json(&serde_json::json!({ "inputs": html }));
        if let Some(token) = &self.config.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClassificationError::Status(status.as_u16()));
        }

        let body: Value = response.json().await.map_err(|e| {
            if e.is_timeout() {
                ClassificationError::Timeout(self.config.timeout)
            } else {
                ClassificationError::MalformedResponse(format!("body is not JSON: {}", e))
            }
        })?;

        parse_label(&body)
    }

    fn transport_error(&self, error: reqwest::Error) -> ClassificationError {
        if error.is_timeout() {
            ClassificationError::Timeout(self.config.timeout)
        } else {
            ClassificationError::Transport(error.to_string())
        }
    }
}

#[async_trait]
impl Classifier for RemoteClassifier {
    fn name(&self) -> &str {
        "remote"
    }

    async fn classify(&self, element: &ElementMetadata) -> Result<Category, ClassificationError> {
        let label = self.request_label(&element.html_snippet).await?;
        Category::from_label(&label).ok_or(ClassificationError::UnknownLabel(label))
    }
}

/// Pull the label out of `{"label": "..."}` or the inference-list form
/// `[{"label": "...", "score": 0.9}, ...]`, where the first entry wins.
pub fn parse_label(body: &Value) -> Result<String, ClassificationError> {
    let entry = match body {
        Value::Object(_) => body,
        Value::Array(entries) => entries
            .first()
            .ok_or_else(|| ClassificationError::MalformedResponse("empty label list".to_string()))?,
        other => {
            return Err(ClassificationError::MalformedResponse(format!("expected object or list, got {}", kind(other))));
        }
    };

    match entry.get("label") {
        Some(Value::String(label)) if !label.trim().is_empty() => Ok(label.trim().to_string()),
        Some(Value::String(_)) => Err(ClassificationError::MalformedResponse("empty label".to_string())),
        Some(other) => Err(ClassificationError::MalformedResponse(format!("label is {}, not a string", kind(other)))),
        None => Err(ClassificationError::MalformedResponse("missing label field".to_string())),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
