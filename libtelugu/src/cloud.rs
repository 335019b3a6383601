//! Network suggestion service.
//!
//! Two providers are supported:
//! - Google Input Tools (default): `GET /request?text=..&itc=te-t-i0-und`,
//!   answering `["SUCCESS", [[<query>, [<candidates>...], ...]]]`
//! - Custom endpoint: `POST {"query": "<text>"}`, answering either a JSON
//!   array of strings or an array of `{"text": ...}` objects
//!
//! Requests run on the async `reqwest` client and race the controller's
//! cancellation token, so a superseded lookup is dropped mid-flight.

use liblipi_core::{CancelToken, SuggestError, SuggestionFuture, SuggestionService};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, trace};

pub const GOOGLE_INPUT_TOOLS_ENDPOINT: &str = "https://inputtools.google.com/request";

/// Default Google Input Tools transliteration id for Telugu.
pub const DEFAULT_INPUT_TOOL: &str = "te-t-i0-und";

/// Cloud suggestion provider options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CloudProvider {
    /// Google Input Tools transliteration API
    #[default]
    GoogleInputTools,
    /// Custom endpoint URL for a user-deployed suggestion server
    Custom(String),
}

impl CloudProvider {
    /// Parse the `provider` config value: `google` (or empty) selects Google
    /// Input Tools, anything else is taken as a custom endpoint URL.
    pub fn from_setting(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case("google") {
            Self::GoogleInputTools
        } else {
            Self::Custom(value.to_string())
        }
    }
}

/// Async client for an online suggestion provider.
#[derive(Debug, Clone)]
pub struct CloudSuggestions {
    client: reqwest::Client,
    provider: CloudProvider,
    input_tool: String,
}

impl CloudSuggestions {
    pub fn new(provider: CloudProvider, input_tool: &str, timeout: Duration) -> Result<Self, SuggestError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SuggestError::Transport(e.to_string()))?;
        let input_tool = if input_tool.trim().is_empty() {
            DEFAULT_INPUT_TOOL.to_string()
        } else {
            input_tool.trim().to_string()
        };
        Ok(Self {
            client,
            provider,
            input_tool,
        })
    }

    pub fn provider(&self) -> &CloudProvider {
        &self.provider
    }

    pub fn input_tool(&self) -> &str {
        &self.input_tool
    }

    /// Query the provider once, without cancellation.
    pub async fn query(&self, text: &str) -> Result<Vec<String>, SuggestError> {
        if text.is_empty() {
            return Ok(Vec::new());
        }
        match &self.provider {
            CloudProvider::GoogleInputTools => self.query_input_tools(text).await,
            CloudProvider::Custom(url) => self.query_custom(url, text).await,
        }
    }

    async fn query_input_tools(&self, text: &str) -> Result<Vec<String>, SuggestError> {
        let url = format!(
            "{}?text={}&itc={}",
            GOOGLE_INPUT_TOOLS_ENDPOINT,
            urlencoding::encode(text),
            urlencoding::encode(&self.input_tool)
        );
        trace!(%url, "querying input tools");
        let body = self.read_json(self.client.get(&url)).await?;
        Ok(parse_input_tools_response(&body))
    }

    async fn query_custom(&self, url: &str, text: &str) -> Result<Vec<String>, SuggestError> {
        let request = self.client.post(url).json(&serde_json::json!({ "query": text }));
        let body = self.read_json(request).await?;
        Ok(parse_custom_response(&body))
    }

    async fn read_json(&self, request: reqwest::RequestBuilder) -> Result<Value, SuggestError> {
        let response = request
            .send()
            .await
            .map_err(|e| SuggestError::Transport(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(SuggestError::Status(status.as_u16()));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| SuggestError::Transport(e.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|e| SuggestError::Malformed(e.to_string()))
    }
}

impl SuggestionService for CloudSuggestions {
    fn fetch(&self, text: String, cancel: CancelToken) -> SuggestionFuture {
        let this = self.clone();
        Box::pin(async move {
            if cancel.is_cancelled() {
                return Err(SuggestError::Cancelled);
            }
            tokio::select! {
                result = this.query(&text) => result,
                _ = cancel.cancelled() => {
                    debug!(buffer = %text, "cloud request cancelled");
                    Err(SuggestError::Cancelled)
                }
            }
        })
    }
}

/// Extract candidates from an Input Tools response.
///
/// Anything that is not `["SUCCESS", [[_, [candidates...]]]]` yields no
/// candidates; empty and non-string entries are skipped.
pub fn parse_input_tools_response(body: &Value) -> Vec<String> {
    let Some(items) = body.as_array() else {
        return Vec::new();
    };
    if items.first().and_then(Value::as_str) != Some("SUCCESS") {
        return Vec::new();
    }
    body.pointer("/1/0/1")
        .and_then(Value::as_array)
        .map(|list| {
            list.iter()
                .filter_map(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Extract candidates from a custom endpoint response.
pub fn parse_custom_response(body: &Value) -> Vec<String> {
    let Some(items) = body.as_array() else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s.as_str()),
            Value::Object(map) => map.get("text").and_then(Value::as_str),
            _ => None,
        })
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
