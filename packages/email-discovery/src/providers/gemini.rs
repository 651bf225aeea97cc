//! Gemini `generateContent` with Google Search grounding.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{CollaboratorError, CollaboratorResult};
use crate::security::{ExposeSecret, SecretString};
use crate::traits::search::{BusinessSearch, SearchText};

pub const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(45);

/// Used when a 429 carries no usable `Retry-After`.
const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(60);

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    tools: Vec<Tool>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct Tool {
    google_search: GoogleSearch,
}

#[derive(Debug, Serialize)]
struct GoogleSearch {}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// [`BusinessSearch`] backed by Gemini with the `google_search` tool enabled.
#[derive(Clone)]
pub struct GeminiClient {
    http_client: reqwest::Client,
    api_key: SecretString,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: SecretString, model: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            api_key,
            model: model.into(),
            base_url: GEMINI_API_URL.to_string(),
        }
    }

    /// Set a custom base URL (proxies, tests).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl BusinessSearch for GeminiClient {
    async fn grounded_business_search(&self, prompt: &str) -> CollaboratorResult<SearchText> {
        let start = Instant::now();
        let request = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
            tools: vec![Tool {
                google_search: GoogleSearch {},
            }],
        };

        let response = self
            .http_client
            .post(format!(
                "{}/models/{}:generateContent",
                self.base_url, self.model
            ))
            .header("x-goog-api-key", self.api_key.expose_secret())
            .timeout(REQUEST_TIMEOUT)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Gemini request failed");
                if e.is_timeout() {
                    CollaboratorError::Timeout(REQUEST_TIMEOUT)
                } else {
                    CollaboratorError::from(e)
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_RETRY_AFTER);
            warn!(retry_after_secs = retry_after.as_secs(), "Gemini rate limited");
            return Err(CollaboratorError::RateLimited { retry_after });
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %message, "Gemini API error");
            return Err(CollaboratorError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| CollaboratorError::Parse(e.to_string()))?;

        let text = body
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| CollaboratorError::Parse("Gemini returned no text".into()))?;

        debug!(
            model = %self.model,
            duration_ms = start.elapsed().as_millis() as u64,
            chars = text.len(),
            "Gemini grounded search"
        );
        Ok(SearchText { text })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> GeminiClient {
        GeminiClient::new(SecretString::from("g-key"), "gemini-2.0-flash").with_base_url(server.uri())
    }

    #[tokio::test]
    async fn test_grounded_search_joins_parts() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-2.0-flash:generateContent"))
            .and(header("x-goog-api-key", "g-key"))
            .and(body_partial_json(json!({"tools": [{"google_search": {}}]})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": {"parts": [
                        {"text": "Owner Name: Jane Doe\n"},
                        {"text": "Services: Plumbing"}
                    ]}
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let result = client(&server).grounded_business_search("prompt").await.unwrap();
        assert_eq!(result.text, "Owner Name: Jane Doe\nServices: Plumbing");
    }

    #[tokio::test]
    async fn test_429_is_rate_limited_with_retry_after() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "17"))
            .mount(&server)
            .await;

        let err = client(&server).grounded_business_search("p").await.unwrap_err();
        assert!(matches!(
            err,
            CollaboratorError::RateLimited { retry_after } if retry_after == Duration::from_secs(17)
        ));
    }

    #[tokio::test]
    async fn test_429_without_header_uses_default() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let err = client(&server).grounded_business_search("p").await.unwrap_err();
        assert!(matches!(
            err,
            CollaboratorError::RateLimited { retry_after } if retry_after == DEFAULT_RETRY_AFTER
        ));
    }

    #[tokio::test]
    async fn test_server_error_and_empty_answer() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;
        let err = client(&server).grounded_business_search("p").await.unwrap_err();
        assert!(matches!(err, CollaboratorError::Api { status: 500, .. }));

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"candidates": []})))
            .mount(&server)
            .await;
        let err = client(&server).grounded_business_search("p").await.unwrap_err();
        assert!(matches!(err, CollaboratorError::Parse(_)));
    }
}
