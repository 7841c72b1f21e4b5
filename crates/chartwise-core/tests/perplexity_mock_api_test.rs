//! Mock API tests for the Perplexity news search.
//!
//! Responses follow the chat-completions shape Perplexity returns; the
//! client is pointed at a local wiremock server through `perplexity.endpoint`.

use chartwise_core::keys::MemoryBackend;
use chartwise_core::{
    AnalysisError, CancellationToken, Chartwise, Config, ImpactLevel, KeyStore, ProviderKind,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PPLX_KEY: &str = "pplx-0123456789abcdefghijABCDEFGHIJ0123456789";

fn chat_response(content: &str) -> serde_json::Value {
    json!({
        "id": "3c2a9f1e",
        "model": "sonar",
        "object": "chat.completion",
        "created": 1760400000,
        "choices": [{
            "index": 0,
            "finish_reason": "stop",
            "message": {"role": "assistant", "content": content}
        }],
        "citations": ["https://www.reuters.com/"]
    })
}

fn chartwise_for(server: &MockServer, timeout_ms: u64) -> Chartwise {
    let mut config = Config::default();
    config.perplexity.endpoint = server.uri();
    config.perplexity.timeout_ms = timeout_ms;
    config.perplexity.api_key = String::new();
    config.gemini.api_key = String::new();

    let keys = KeyStore::new(Box::new(MemoryBackend::new()));
    keys.save(ProviderKind::Perplexity, PPLX_KEY).unwrap();
    Chartwise::new(config, Arc::new(keys))
}

async fn respond_with_status(status: u16) -> AnalysisError {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(status).set_body_json(json!({
            "error": {"message": "failure", "type": "error", "code": status}
        })))
        .mount(&server)
        .await;

    chartwise_for(&server, 5_000)
        .search_news("AAPL", &CancellationToken::new())
        .await
        .unwrap_err()
}

#[tokio::test]
async fn test_search_sends_expected_request() {
    let server = MockServer::start().await;
    let content = "Here you go:\n```json\n[{\"title\":\"Apple beats\",\"summary\":\"Record quarter\",\"source\":\"Reuters\",\"impact_level\":\"HIGH\",\"tags\":[\"earnings\"]}]\n```";

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("Authorization", format!("Bearer {PPLX_KEY}").as_str()))
        .and(header("Content-Type", "application/json"))
        .and(body_partial_json(json!({
            "model": "sonar",
            "max_tokens": 2000,
            "search_recency_filter": "month",
            "web_search_options": {"search_context_size": "medium"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_response(content)))
        .expect(1)
        .mount(&server)
        .await;

    let result = chartwise_for(&server, 5_000)
        .search_news(" aapl", &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(result.ticker, "AAPL");
    assert_eq!(result.news.len(), 1);
    assert_eq!(result.news[0].title, "Apple beats");
    assert_eq!(result.news[0].impact_level, ImpactLevel::High);
    assert_eq!(result.news[0].url, "#");
}

#[tokio::test]
async fn test_prose_without_json_yields_empty_list() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(chat_response("I could not find relevant news [1].")),
        )
        .mount(&server)
        .await;

    let result = chartwise_for(&server, 5_000)
        .search_news("AAPL", &CancellationToken::new())
        .await
        .unwrap();
    assert!(result.news.is_empty());
}

#[tokio::test]
async fn test_status_401_is_auth() {
    assert_eq!(
        respond_with_status(401).await,
        AnalysisError::Auth {
            provider: ProviderKind::Perplexity
        }
    );
}

#[tokio::test]
async fn test_status_429_is_rate_limit() {
    assert_eq!(
        respond_with_status(429).await,
        AnalysisError::RateLimit {
            provider: ProviderKind::Perplexity
        }
    );
}

#[tokio::test]
async fn test_other_status_is_transport_with_code() {
    let err = respond_with_status(500).await;
    assert!(matches!(
        err,
        AnalysisError::Transport {
            provider: ProviderKind::Perplexity,
            status_code: Some(500),
            ..
        }
    ));
    assert_eq!(err.user_message(), "Perplexity API error: 500");
}

#[tokio::test]
async fn test_missing_content_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let err = chartwise_for(&server, 5_000)
        .search_news("AAPL", &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, AnalysisError::MalformedResponse(_)));
}

#[tokio::test]
async fn test_slow_server_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(chat_response("[]"))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let chartwise = chartwise_for(&server, 100);
    let err = chartwise
        .search_news("AAPL", &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(
        err,
        AnalysisError::Timeout {
            provider: ProviderKind::Perplexity,
            timeout_ms: 100
        }
    );
    assert!(chartwise.latest_news().is_none());
}

#[tokio::test]
async fn test_invalid_ticker_never_hits_server() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_response("[]")))
        .expect(0)
        .mount(&server)
        .await;

    let err = chartwise_for(&server, 5_000)
        .search_news("no spaces", &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, AnalysisError::InvalidInput(_)));
}
