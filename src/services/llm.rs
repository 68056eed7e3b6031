//! OpenAI-compatible chat client and the LLM-backed primary analyzer.

use crate::config::LlmSettings;
use crate::core::analyzer::{AnalysisInput, Analyzer, ExtractionError};
use crate::core::sources::attach_origins;
use crate::models::{AnalysisResult, Category};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("upstream returned error: status={status} message={message}")]
    Upstream { status: StatusCode, message: String },

    #[error("completion contained no content")]
    NoContent,

    #[error("LLM provider is not configured")]
    NotConfigured,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatCompletionChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionChoice {
    pub message: ChatCompletionMessage,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorObject,
}

#[derive(Debug, Deserialize)]
struct ErrorObject {
    message: Option<String>,
}

/// Max bytes of an error body kept in `LlmError::Upstream`
const MAX_ERROR_BODY_BYTES: usize = 2048;

#[derive(Clone)]
pub struct LlmClient {
    base_url: String,
    api_key: String,
    http: Client,
}

impl LlmClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, LlmError> {
        let http = Client::builder()
            .user_agent(concat!("brand-fit/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            http,
        })
    }

    /// First choice's message content
    pub async fn complete(&self, request: &ChatCompletionRequest) -> Result<String, LlmError> {
        let url = format!("{}/chat/completions", self.base_url);
        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let mut body = resp.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ErrorEnvelope>(&body) {
                Ok(parsed) => parsed
                    .error
                    .message
                    .unwrap_or_else(|| "unknown upstream error".to_string()),
                Err(_) => {
                    if body.len() > MAX_ERROR_BODY_BYTES {
                        let mut cut = MAX_ERROR_BODY_BYTES;
                        while !body.is_char_boundary(cut) {
                            cut -= 1;
                        }
                        body.truncate(cut);
                    }
                    body
                }
            };
            return Err(LlmError::Upstream { status, message });
        }

        let completion: ChatCompletionResponse = resp.json().await?;
        completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(LlmError::NoContent)
    }
}

const SYSTEM_PROMPT: &str = "You analyze customer feedback about fashion brands. \
Return ONLY a JSON object, no prose. Keys: \"fit\", \"quality\", \"fabric\", \"washCare\", \
\"materials\", \"overallConfidence\". Each aspect is an object {\"recommendation\": string, \
\"confidence\": \"low\"|\"medium\"|\"high\", \"evidence\": [string]}. \"materials\" is \
{\"composition\": [string], \"confidence\": ..., \"evidence\": [string]} and is only included \
for a specific clothing item. Omit any aspect without real evidence in the supplied results. \
Evidence entries must be direct quotes copied from the result snippets. Set confidence from the \
volume and consistency of evidence: high only for many consistent mentions, medium for a few, \
low otherwise.";

/// LLM-backed analyzer with a strict structured-output contract
pub struct PrimaryAnalyzer {
    client: LlmClient,
    model: String,
    max_tokens: u32,
    temperature: f32,
    max_results: usize,
}

impl PrimaryAnalyzer {
    pub fn new(client: LlmClient, settings: &LlmSettings) -> Self {
        Self {
            client,
            model: settings.model.clone(),
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
            max_results: settings.max_results_in_prompt,
        }
    }

    /// Build from settings; `NotConfigured` without an API key
    pub fn from_settings(settings: &LlmSettings) -> Result<Self, LlmError> {
        let api_key = settings.api_key().ok_or(LlmError::NotConfigured)?;
        let client = LlmClient::new(
            &settings.base_url,
            api_key,
            Duration::from_secs(settings.timeout_secs),
        )?;
        Ok(Self::new(client, settings))
    }

    pub fn build_request(&self, input: &AnalysisInput<'_>) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                Message::system(SYSTEM_PROMPT),
                Message::user(user_prompt(input, self.max_results)),
            ],
            temperature: Some(self.temperature),
            max_tokens: Some(self.max_tokens),
            response_format: Some(ResponseFormat {
                kind: "json_object".to_string(),
            }),
        }
    }
}

fn user_prompt(input: &AnalysisInput<'_>, max_results: usize) -> String {
    let mut prompt = format!("Brand: {}\nCategory: {}\n", input.brand, input.category);
    if !input.item_name.trim().is_empty() {
        prompt.push_str(&format!("Item: {}\n", input.item_name.trim()));
    }
    prompt.push_str(&format!(
        "Specific item search: {}\n\nSearch results:\n",
        input.specific_item
    ));
    for (n, result) in input.results.iter().take(max_results).enumerate() {
        prompt.push_str(&format!(
            "[{}] {} | {} | {}\n",
            n + 1,
            result.title.trim(),
            result.snippet.trim(),
            result.url
        ));
    }
    prompt
}

/// The outermost JSON object in `content`, tolerating code fences and prose
pub fn extract_json_object(content: &str) -> Option<&str> {
    let start = content.find('{')?;
    let end = content.rfind('}')?;
    (end > start).then(|| &content[start..=end])
}

/// Parse a completion into a settled analysis with evidence joined to results
pub fn parse_analysis(
    content: &str,
    input: &AnalysisInput<'_>,
) -> Result<AnalysisResult, ExtractionError> {
    let json = extract_json_object(content)
        .ok_or_else(|| ExtractionError::Malformed("no JSON object in completion".to_string()))?;
    let mut analysis: AnalysisResult =
        serde_json::from_str(json).map_err(|e| ExtractionError::Malformed(e.to_string()))?;

    if !(input.specific_item && input.category == Category::Clothing) {
        analysis.materials = None;
    }
    attach_origins(&mut analysis, input.results);

    let analysis = analysis.settle();
    if analysis.is_empty() {
        return Err(ExtractionError::Empty);
    }
    Ok(analysis)
}

#[async_trait]
impl Analyzer for PrimaryAnalyzer {
    fn name(&self) -> &'static str {
        "llm"
    }

    async fn analyze(&self, input: &AnalysisInput<'_>) -> Result<AnalysisResult, ExtractionError> {
        if input.results.is_empty() {
            return Err(ExtractionError::Empty);
        }
        let request = self.build_request(input);
        let content = self
            .client
            .complete(&request)
            .await
            .map_err(|e| ExtractionError::Request(e.to_string()))?;
        parse_analysis(&content, input)
    }
}
