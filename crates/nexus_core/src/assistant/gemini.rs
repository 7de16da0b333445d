//! Gemini `generateContent` over blocking HTTP.
//!
//! # Invariants
//! - Every request carries the configured client timeout.
//! - Transient failures are retried up to `max_retries` times, waiting
//!   `retry_backoff` through the injected `Delay` between attempts.
//! - The API key travels in a header and is never logged.

use super::transport::{AssistantError, AssistantResult, GenerateRequest, GenerativeTransport};
use crate::config::AssistantConfig;
use crate::store::latency::{Delay, ThreadDelay};
use log::{error, info, warn};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

const API_KEY_HEADER: &str = "x-goog-api-key";

pub struct GeminiTransport {
    client: Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
    max_retries: u32,
    retry_backoff: Duration,
    delay: Box<dyn Delay>,
}

impl GeminiTransport {
    /// Builds the HTTP client. A missing API key is reported per request, not here.
    pub fn new(config: &AssistantConfig) -> AssistantResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(AssistantError::from_reqwest)?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_retries: config.max_retries,
            retry_backoff: config.retry_backoff,
            delay: Box::new(ThreadDelay),
        })
    }

    /// Replaces the backoff sleeper; tests use `NoDelay` or `RecordingDelay`.
    pub fn with_delay(mut self, delay: impl Delay + 'static) -> Self {
        self.delay = Box::new(delay);
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    fn send_once(&self, api_key: &str, request: &GenerateRequest) -> AssistantResult<String> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part {
                    text: &request.prompt,
                }],
            }],
            generation_config: request.json_response.then_some(GenerationConfig {
                response_mime_type: "application/json",
            }),
        };

        let response = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, api_key)
            .json(&body)
            .send()
            .map_err(AssistantError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            return Err(AssistantError::Http {
                status: status.as_u16(),
            });
        }

        let payload: GenerateContentResponse =
            response.json().map_err(AssistantError::from_reqwest)?;
        Ok(payload.text())
    }
}

impl GenerativeTransport for GeminiTransport {
    fn generate(&self, request: &GenerateRequest) -> AssistantResult<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(AssistantError::MissingCredentials)?;
        let started_at = Instant::now();
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            match self.send_once(api_key, request) {
                Ok(text) => {
                    info!(
                        "event=assistant_request module=assistant status=ok model={} attempts={} chars={} duration_ms={}",
                        self.model,
                        attempt,
                        text.len(),
                        started_at.elapsed().as_millis()
                    );
                    return Ok(text);
                }
                Err(err) if err.is_retryable() && attempt <= self.max_retries => {
                    warn!(
                        "event=assistant_request module=assistant status=retry model={} attempt={} error_kind={}",
                        self.model,
                        attempt,
                        err.kind()
                    );
                    self.delay.wait(self.retry_backoff);
                }
                Err(err) => {
                    error!(
                        "event=assistant_request module=assistant status=error model={} attempts={} error_kind={} duration_ms={}",
                        self.model,
                        attempt,
                        err.kind(),
                        started_at.elapsed().as_millis()
                    );
                    return Err(err);
                }
            }
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
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
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
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

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate.
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|part| part.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::{GenerateContentRequest, GenerateContentResponse, GenerationConfig};

    #[test]
    fn response_text_joins_first_candidate_parts() {
        let payload: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"Hello "},{"text":"there"}]}},
                {"content":{"parts":[{"text":"ignored"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(payload.text(), "Hello there");

        let empty: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.text(), "");
    }

    #[test]
    fn json_requests_set_response_mime_type() {
        let body = GenerateContentRequest {
            contents: Vec::new(),
            generation_config: Some(GenerationConfig {
                response_mime_type: "application/json",
            }),
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(
            value["generationConfig"]["responseMimeType"],
            "application/json"
        );

        let plain = GenerateContentRequest {
            contents: Vec::new(),
            generation_config: None,
        };
        let value = serde_json::to_value(&plain).unwrap();
        assert!(value.get("generationConfig").is_none());
    }
}
