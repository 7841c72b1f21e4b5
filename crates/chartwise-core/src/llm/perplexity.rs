//! Perplexity Sonar provider using the Chat Completions API.
//!
//! A system message sets the analyst role and the user message asks for a
//! JSON array of news items about the ticker.

use super::prompt::{news_user_prompt, NEWS_SYSTEM_PROMPT};
use super::provider::{body_snippet, join_url, network_error, NewsSearcher, ProviderResponse};
use crate::config::PerplexityConfig;
use crate::error::{AnalysisError, RequestResult};
use crate::keys::ProviderKind;
use crate::ticker::Ticker;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

const PROVIDER: ProviderKind = ProviderKind::Perplexity;

/// Perplexity news-search client.
pub struct PerplexityClient {
    endpoint: String,
    model: String,
    temperature: f32,
    top_p: f32,
    max_tokens: u32,
    search_recency_filter: String,
    search_context_size: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl PerplexityClient {
    pub fn new(config: &PerplexityConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            top_p: config.top_p,
            max_tokens: config.max_tokens,
            search_recency_filter: config.search_recency_filter.clone(),
            search_context_size: config.search_context_size.clone(),
            timeout: Duration::from_millis(config.timeout_ms),
            client: reqwest::Client::new(),
        }
    }

    fn request_body<'a>(&'a self, user_prompt: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: NEWS_SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            top_p: self.top_p,
            search_recency_filter: &self.search_recency_filter,
            web_search_options: WebSearchOptions {
                search_context_size: &self.search_context_size,
            },
        }
    }
}

// --- Request types ---

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
    search_recency_filter: &'a str,
    web_search_options: WebSearchOptions<'a>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct WebSearchOptions<'a> {
    search_context_size: &'a str,
}

// --- Response types ---

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    model: Option<String>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Classify a non-2xx chat-completions response.
pub(crate) fn classify_failure(status: u16, body: &str) -> AnalysisError {
    match status {
        401 => AnalysisError::Auth { provider: PROVIDER },
        429 => AnalysisError::RateLimit { provider: PROVIDER },
        _ => AnalysisError::Transport {
            provider: PROVIDER,
            message: format!("HTTP {status}: {}", body_snippet(body)),
            status_code: Some(status),
        },
    }
}

#[async_trait]
impl NewsSearcher for PerplexityClient {
    fn model(&self) -> &str {
        &self.model
    }

    async fn search(&self, ticker: &Ticker, api_key: &str) -> RequestResult<ProviderResponse> {
        let start = Instant::now();
        let user_prompt = news_user_prompt(ticker);
        let body = self.request_body(&user_prompt);

        tracing::debug!(model = %self.model, %ticker, "Searching news with Perplexity");

        let resp = self
            .client
            .post(join_url(&self.endpoint, "chat/completions"))
            .header("Authorization", format!("Bearer {api_key}"))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| network_error(PROVIDER, self.timeout, e))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(classify_failure(status.as_u16(), &text));
        }

        let chat_resp: ChatResponse = resp.json().await.map_err(|e| {
            AnalysisError::MalformedResponse(format!("Failed to parse Perplexity response: {e}"))
        })?;

        let text = chat_resp
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| {
                AnalysisError::MalformedResponse("no content in response".to_string())
            })?;

        let latency_ms = start.elapsed().as_millis() as u64;
        tracing::debug!(model = %self.model, latency_ms, "Perplexity responded");

        Ok(ProviderResponse {
            text,
            model: chat_resp.model.unwrap_or_else(|| self.model.clone()),
            latency_ms,
        })
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }
}
