// src/modules/chat/client.rs
//! Outbound completion calls against an OpenAI-compatible endpoint.

use std::future::Future;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::message::Message;
use super::transcript::Transcript;
use crate::error::{ChatError, Result};

/// Fixed per-session generation knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            model: "llama3-8b-8192".to_string(),
            max_tokens: 200,
            temperature: 0.7,
        }
    }
}

/// Request body of `POST /chat/completions`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl CompletionRequest {
    /// The whole transcript, in order, plus the generation knobs.
    pub fn from_transcript(transcript: &Transcript, params: &GenerationParams) -> Self {
        Self {
            model: params.model.clone(),
            messages: transcript.messages().to_vec(),
            max_tokens: params.max_tokens,
            temperature: params.temperature,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Anything that can turn a request into a single reply string.
pub trait CompletionClient: Send + Sync + 'static {
    fn complete(
        &self,
        request: CompletionRequest,
    ) -> impl Future<Output = Result<String>> + Send;
}

#[derive(Debug, Clone)]
pub struct HttpCompletionClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl HttpCompletionClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

impl CompletionClient for HttpCompletionClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        let url = self.endpoint();
        debug!(%url, messages = request.messages.len(), "sending completion request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "completion endpoint rejected request");
            return Err(ChatError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        parse_reply(&body)
    }
}

/// Pull `choices[0].message.content` out of a response body.
fn parse_reply(body: &str) -> Result<String> {
    let parsed: CompletionResponse =
        serde_json::from_str(body).map_err(|e| ChatError::MalformedBody(e.to_string()))?;

    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| ChatError::MalformedBody("missing choices[0].message.content".to_string()))
}
