//! LLM Client: the single point of entry for all Gemini API calls in scout.
//!
//! ARCHITECTURAL RULE: No other module may call the generation API directly.
//! Pipeline code depends on the `GenerationBackend` trait; `GeminiClient` is the
//! production implementation.
//!
//! This module never retries. Retry policy lives in `pipeline::retry` so every
//! stage shares one schedule.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;

pub mod prompts;

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const API_VERSION: &str = "v1beta";
const REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}, {code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// How a backend error should be treated by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// 429 / RESOURCE_EXHAUSTED. Worth waiting and retrying.
    RateLimited,
    /// 404 / NOT_FOUND. The configured model does not exist for this key.
    ModelNotFound,
    Unclassified,
}

impl LlmError {
    pub fn class(&self) -> ErrorClass {
        match self {
            LlmError::Api { status, code, .. } => {
                if *status == 429 || code == "RESOURCE_EXHAUSTED" {
                    ErrorClass::RateLimited
                } else if *status == 404 || code == "NOT_FOUND" {
                    ErrorClass::ModelNotFound
                } else {
                    ErrorClass::Unclassified
                }
            }
            LlmError::Http(_) | LlmError::Parse(_) => ErrorClass::Unclassified,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Backend seam
// ────────────────────────────────────────────────────────────────────────────

/// One generation call: a system instruction, the user input, and whether the
/// backend may ground its answer with live web search.
#[derive(Debug, Clone, Copy)]
pub struct GenerationRequest<'a> {
    pub instruction: &'a str,
    pub input: &'a str,
    pub search: bool,
}

/// Anything that can turn a `GenerationRequest` into a response envelope.
///
/// Shared across stages as `Arc<dyn GenerationBackend>`.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    async fn generate(
        &self,
        request: &GenerationRequest<'_>,
    ) -> Result<GenerationResponse, LlmError>;

    /// Model identifier, for diagnostics.
    fn model(&self) -> &str;
}

// ────────────────────────────────────────────────────────────────────────────
// Wire format
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: InstructionContent<'a>,
    contents: Vec<RequestContent<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Tool>,
}

#[derive(Debug, Serialize)]
struct InstructionContent<'a> {
    parts: Vec<TextPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'a str,
    parts: Vec<TextPart<'a>>,
}

#[derive(Debug, Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct Tool {
    google_search: GoogleSearch,
}

#[derive(Debug, Serialize)]
struct GoogleSearch {}

impl<'a> GenerateContentRequest<'a> {
    fn from_request(request: &GenerationRequest<'a>) -> Self {
        let tools = if request.search {
            vec![Tool {
                google_search: GoogleSearch {},
            }]
        } else {
            Vec::new()
        };

        Self {
            system_instruction: InstructionContent {
                parts: vec![TextPart {
                    text: request.instruction,
                }],
            },
            contents: vec![RequestContent {
                role: "user",
                parts: vec![TextPart {
                    text: request.input,
                }],
            }],
            tools,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<Content>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Part {
    pub text: Option<String>,
    /// Set on reasoning summaries, which are not part of the answer.
    #[serde(default)]
    pub thought: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
}

impl GenerationResponse {
    /// Concatenates every answer text part of the first candidate.
    /// Returns `None` when the envelope carries no text at all.
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter(|part| !part.thought)
            .filter_map(|part| part.text.as_deref())
            .collect();

        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// A single-candidate response with one text part.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            candidates: vec![Candidate {
                content: Some(Content {
                    parts: vec![Part {
                        text: Some(text.into()),
                        thought: false,
                    }],
                }),
                finish_reason: Some("STOP".to_string()),
            }],
            usage_metadata: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeminiErrorEnvelope {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
    #[serde(default)]
    status: String,
}

/// One entry from the model listing endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    pub name: String,
    pub display_name: Option<String>,
    #[serde(default)]
    pub supported_generation_methods: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListModelsResponse {
    #[serde(default)]
    models: Vec<ModelInfo>,
    next_page_token: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// GeminiClient
// ────────────────────────────────────────────────────────────────────────────

/// The Gemini `generateContent` client. Created once per process and shared
/// read-only by every stage.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    api_base: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: String, api_base: &str, model: &str) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            api_key,
            api_base: api_base.trim_end_matches('/').to_string(),
            model: model.trim_start_matches("models/").to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, LlmError> {
        Self::new(config.api_key.clone(), &config.api_base, &config.model)
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/{API_VERSION}/models/{}:generateContent",
            self.api_base, self.model
        )
    }

    /// Lists every model visible to the configured key, following pagination.
    pub async fn list_models(&self) -> Result<Vec<ModelInfo>, LlmError> {
        let url = format!("{}/{API_VERSION}/models", self.api_base);
        let mut models = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .get(&url)
                .header("x-goog-api-key", &self.api_key);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token.as_str())]);
            }

            let response = request.send().await?;
            if !response.status().is_success() {
                return Err(read_api_error(response).await);
            }

            let page: ListModelsResponse = serde_json::from_str(&response.text().await?)?;
            models.extend(page.models);

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) if page_token.as_deref() == Some(token.as_str()) => {
                    warn!("Model listing repeated page token {token}; stopping");
                    break;
                }
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(models)
    }
}

#[async_trait]
impl GenerationBackend for GeminiClient {
    async fn generate(
        &self,
        request: &GenerationRequest<'_>,
    ) -> Result<GenerationResponse, LlmError> {
        let body = GenerateContentRequest::from_request(request);

        let response = self
            .client
            .post(self.generate_url())
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(read_api_error(response).await);
        }

        let parsed: GenerationResponse = serde_json::from_str(&response.text().await?)?;

        if let Some(usage) = &parsed.usage_metadata {
            debug!(
                "Gemini call succeeded: prompt_tokens={}, candidate_tokens={}",
                usage.prompt_token_count, usage.candidates_token_count
            );
        }

        Ok(parsed)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Turns a non-2xx response into `LlmError::Api`, using the JSON error
/// envelope when the body has one.
async fn read_api_error(response: reqwest::Response) -> LlmError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();

    match serde_json::from_str::<GeminiErrorEnvelope>(&body) {
        Ok(envelope) => LlmError::Api {
            status,
            code: envelope.error.status,
            message: envelope.error.message,
        },
        Err(_) => LlmError::Api {
            status,
            code: String::new(),
            message: body,
        },
    }
}
