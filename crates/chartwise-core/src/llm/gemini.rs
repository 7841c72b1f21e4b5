//! Google Gemini provider using the generateContent API.
//!
//! Sends the analysis prompt and the chart as inline base64 data in a single
//! user turn.

use super::image::ChartImage;
use super::prompt::ANALYSIS_PROMPT;
use super::provider::{body_snippet, join_url, network_error, ChartAnalyzer, ProviderResponse};
use crate::config::GeminiConfig;
use crate::error::{AnalysisError, RequestResult};
use crate::keys::ProviderKind;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

const PROVIDER: ProviderKind = ProviderKind::Gemini;

/// Gemini chart-analysis client.
pub struct GeminiClient {
    endpoint: String,
    model: String,
    temperature: f32,
    max_output_tokens: u32,
    timeout: Duration,
    client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(config: &GeminiConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
            timeout: Duration::from_millis(config.timeout_ms),
            client: reqwest::Client::new(),
        }
    }

    fn url(&self) -> String {
        join_url(&self.endpoint, &format!("models/{}:generateContent", self.model))
    }
}

// --- Request types ---

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text { text: &'a str },
    InlineData { inline_data: InlineData<'a> },
}

#[derive(Serialize)]
struct InlineData<'a> {
    mime_type: &'a str,
    data: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

// --- Response types ---

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
    model_version: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

/// Classify a non-2xx generateContent response.
///
/// Gemini reports a bad key as HTTP 400 with `API_KEY_INVALID`, so the body
/// is inspected as well as the status.
pub(crate) fn classify_failure(status: u16, body: &str) -> AnalysisError {
    if matches!(status, 401 | 403)
        || body.contains("API_KEY_INVALID")
        || body.contains("API key not valid")
    {
        return AnalysisError::Auth { provider: PROVIDER };
    }
    if status == 429 || body.contains("RESOURCE_EXHAUSTED") || body.contains("QUOTA_EXCEEDED") {
        return AnalysisError::RateLimit { provider: PROVIDER };
    }
    if body.contains("SAFETY") {
        return AnalysisError::ContentRejected(
            "The image was blocked by safety filters".to_string(),
        );
    }
    AnalysisError::Transport {
        provider: PROVIDER,
        message: format!("HTTP {status}: {}", body_snippet(body)),
        status_code: Some(status),
    }
}

/// Pull the answer text out of a successful response.
fn response_text(resp: &GenerateResponse) -> RequestResult<String> {
    if let Some(reason) = resp
        .prompt_feedback
        .as_ref()
        .and_then(|f| f.block_reason.as_deref())
    {
        return Err(AnalysisError::ContentRejected(format!(
            "The image was blocked by safety filters ({reason})"
        )));
    }

    let candidate = resp.candidates.first();
    if candidate.and_then(|c| c.finish_reason.as_deref()) == Some("SAFETY") {
        return Err(AnalysisError::ContentRejected(
            "The response was blocked by safety filters".to_string(),
        ));
    }

    let text: String = candidate
        .and_then(|c| c.content.as_ref())
        .map(|content| {
            content
                .parts
                .iter()
                .filter_map(|p| p.text.as_deref())
                .collect()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(AnalysisError::MalformedResponse("empty response".to_string()));
    }
    Ok(text)
}

#[async_trait]
impl ChartAnalyzer for GeminiClient {
    fn model(&self) -> &str {
        &self.model
    }

    async fn analyze(&self, image: &ChartImage, api_key: &str) -> RequestResult<ProviderResponse> {
        let start = Instant::now();

        let body = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![
                    Part::Text {
                        text: ANALYSIS_PROMPT,
                    },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: image.media_type(),
                            data: image.base64(),
                        },
                    },
                ],
            }],
            generation_config: GenerationConfig {
                temperature: self.temperature,
                max_output_tokens: self.max_output_tokens,
            },
        };

        tracing::debug!(
            model = %self.model,
            bytes = image.len(),
            "Sending chart to Gemini"
        );

        let resp = self
            .client
            .post(self.url())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| network_error(PROVIDER, self.timeout, e))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(classify_failure(status.as_u16(), &text));
        }

        let parsed: GenerateResponse = resp.json().await.map_err(|e| {
            AnalysisError::MalformedResponse(format!("Failed to parse Gemini response: {e}"))
        })?;

        let text = response_text(&parsed)?;
        let latency_ms = start.elapsed().as_millis() as u64;
        tracing::debug!(model = %self.model, latency_ms, "Gemini responded");

        Ok(ProviderResponse {
            text,
            model: parsed.model_version.unwrap_or_else(|| self.model.clone()),
            latency_ms,
        })
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }
}
