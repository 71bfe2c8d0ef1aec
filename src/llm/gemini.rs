use std::time::Duration;

use anyhow::{anyhow, Result};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::config::CONFIG;
use crate::llm::TextGenerator;
use crate::utils::http::get_http_client;
use crate::utils::text::truncate_for_log;
use crate::utils::timing::log_llm_timing;

const GEMINI_MAX_RETRY_ATTEMPTS: usize = 2;
const GEMINI_RETRY_BASE_DELAY_MS: u64 = 900;

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    parts: Option<Vec<GeminiPart>>,
}

#[derive(Debug, Deserialize)]
struct GeminiPart {
    text: Option<String>,
}

fn redact_gemini_api_key(text: &str) -> String {
    let key = CONFIG.gemini_api_key.trim();
    if key.is_empty() {
        return text.to_string();
    }
    text.replace(key, "[redacted]")
}

fn gemini_should_retry_error(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect()
}

fn gemini_should_retry_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS
        || status == StatusCode::REQUEST_TIMEOUT
        || status.is_server_error()
}

fn gemini_retry_delay(attempt: usize) -> Duration {
    let attempt = attempt.max(1) as u64;
    Duration::from_millis(GEMINI_RETRY_BASE_DELAY_MS.saturating_mul(attempt))
}

fn extract_text(response: &GeminiResponse) -> Option<String> {
    let parts = response
        .candidates
        .as_ref()?
        .first()?
        .content
        .as_ref()?
        .parts
        .as_ref()?;
    let text = parts
        .iter()
        .filter_map(|part| part.text.as_deref())
        .collect::<Vec<_>>()
        .join("\n");
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Gemini `generateContent` client. Network-level retries here are about
/// transport flakiness only; the validation retry of the direct generator is
/// a separate concern and stays in `generator`.
#[derive(Debug, Clone, Default)]
pub struct GeminiClient;

impl GeminiClient {
    pub fn new() -> Self {
        GeminiClient
    }

    async fn call_once(&self, payload: &Value) -> Result<String> {
        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent?key={}",
            CONFIG.gemini_model, CONFIG.gemini_api_key
        );

        let mut last_error: Option<anyhow::Error> = None;
        for attempt in 0..=GEMINI_MAX_RETRY_ATTEMPTS {
            if attempt > 0 {
                tokio::time::sleep(gemini_retry_delay(attempt)).await;
            }

            let response = match get_http_client().post(&url).json(payload).send().await {
                Ok(response) => response,
                Err(err) => {
                    if gemini_should_retry_error(&err) && attempt < GEMINI_MAX_RETRY_ATTEMPTS {
                        warn!("Gemini request failed (attempt {}): {err}", attempt + 1);
                        last_error = Some(err.into());
                        continue;
                    }
                    return Err(err.into());
                }
            };

            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            if !status.is_success() {
                let redacted = redact_gemini_api_key(&truncate_for_log(&body, 2000));
                if gemini_should_retry_status(status) && attempt < GEMINI_MAX_RETRY_ATTEMPTS {
                    warn!("Gemini returned {status} (attempt {}): {redacted}", attempt + 1);
                    last_error = Some(anyhow!("Gemini returned {status}: {redacted}"));
                    continue;
                }
                return Err(anyhow!("Gemini returned {status}: {redacted}"));
            }

            let parsed: GeminiResponse = serde_json::from_str(&body)
                .map_err(|err| anyhow!("Failed to parse Gemini response: {err}"))?;
            return extract_text(&parsed)
                .ok_or_else(|| anyhow!("Gemini response contained no text candidates"));
        }

        Err(last_error.unwrap_or_else(|| anyhow!("Gemini request failed")))
    }
}

impl TextGenerator for GeminiClient {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        temperature: f32,
        max_output_tokens: i32,
    ) -> Result<String> {
        if CONFIG.gemini_api_key.trim().is_empty() {
            return Err(anyhow!("GEMINI_API_KEY is not configured"));
        }

        let payload = json!({
            "systemInstruction": { "parts": [{ "text": system_prompt }] },
            "contents": [{ "role": "user", "parts": [{ "text": user_prompt }] }],
            "generationConfig": {
                "temperature": temperature,
                "maxOutputTokens": max_output_tokens,
            },
        });
        debug!(
            "Gemini request: model={} temperature={} max_tokens={} user_prompt={}",
            CONFIG.gemini_model,
            temperature,
            max_output_tokens,
            truncate_for_log(user_prompt, 200)
        );

        log_llm_timing(
            "gemini",
            &CONFIG.gemini_model,
            "generate_prompt",
            Some(json!({ "temperature": temperature, "max_output_tokens": max_output_tokens })),
            || async { self.call_once(&payload).await },
        )
        .await
    }
}
