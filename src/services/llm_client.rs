use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{AISettings, Provider};
use crate::utils::Telemetry;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const NVIDIA_CHAT_URL: &str = "https://integrate.api.nvidia.com/v1/chat/completions";

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("{0} not found in environment variables")]
    MissingApiKey(&'static str),

    #[error("request timed out")]
    Timeout,

    #[error("HTTP/network error: {0}")]
    Http(reqwest::Error),

    #[error("API returned error {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Http(e)
        }
    }
}

/// Black-box text generation backend: one prompt in, generated text out.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}

pub fn build_generator(
    settings: &AISettings,
    log: Telemetry,
) -> Result<Arc<dyn TextGenerator>, LlmError> {
    let generator: Arc<dyn TextGenerator> = match settings.provider {
        Provider::Gemini => Arc::new(GeminiClient::new(settings, log)?),
        Provider::Nvidia => Arc::new(NvidiaClient::new(settings, log)?),
    };
    Ok(generator)
}

fn http_client(timeout_secs: u64) -> Result<reqwest::Client, LlmError> {
    Ok(reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs.max(1)))
        .build()?)
}

async fn read_success_body(response: reqwest::Response) -> Result<String, LlmError> {
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(LlmError::Status { status, body });
    }
    Ok(response.text().await?)
}

// ─── Gemini generateContent ───

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<GenerateContent<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct GenerateContent<'a> {
    parts: Vec<GeneratePart<'a>>,
}

#[derive(Serialize)]
struct GeneratePart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    url: String,
    temperature: f32,
    log: Telemetry,
}

impl GeminiClient {
    pub fn new(settings: &AISettings, log: Telemetry) -> Result<Self, LlmError> {
        let url = format!("{}/{}:generateContent", GEMINI_BASE_URL, settings.model_name());
        log::debug!(
            target: log.target(),
            "GeminiClient initialized | Model={} Timeout={}s URL={}",
            settings.model_name(),
            settings.timeout_secs,
            url
        );
        Ok(Self {
            client: http_client(settings.timeout_secs)?,
            api_key: settings.api_key.clone(),
            url,
            temperature: settings.temperature,
            log,
        })
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        if self.api_key.is_empty() {
            return Err(LlmError::MissingApiKey(Provider::Gemini.api_key_env()));
        }

        let request = GenerateRequest {
            contents: vec![GenerateContent {
                parts: vec![GeneratePart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: self.temperature,
            },
        };

        let response = self
            .client
            .post(&self.url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await?;
        log::debug!(target: self.log.target(), "Gemini response status={}", response.status());

        let body = read_success_body(response).await?;
        let parsed: GenerateResponse =
            serde_json::from_str(&body).map_err(|e| LlmError::Decode(e.to_string()))?;

        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text)
            .unwrap_or_default();
        log::debug!(target: self.log.target(), "Gemini generated text: {}", text);
        Ok(text)
    }
}

// ─── NVIDIA OpenAI-compatible chat completions ───

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatSendMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatSendMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatRecvMessage,
}

#[derive(Deserialize)]
struct ChatRecvMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    reasoning_content: Option<String>,
}

pub struct NvidiaClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    temperature: f32,
    log: Telemetry,
}

impl NvidiaClient {
    pub fn new(settings: &AISettings, log: Telemetry) -> Result<Self, LlmError> {
        log::debug!(
            target: log.target(),
            "NvidiaClient initialized | Model={} Timeout={}s",
            settings.model_name(),
            settings.timeout_secs
        );
        Ok(Self {
            client: http_client(settings.timeout_secs)?,
            api_key: settings.api_key.clone(),
            model: settings.model_name().to_string(),
            temperature: settings.temperature,
            log,
        })
    }
}

#[async_trait]
impl TextGenerator for NvidiaClient {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        if self.api_key.is_empty() {
            return Err(LlmError::MissingApiKey(Provider::Nvidia.api_key_env()));
        }

        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatSendMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.temperature,
            max_tokens: 512,
        };

        let response = self
            .client
            .post(NVIDIA_CHAT_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?;
        log::debug!(target: self.log.target(), "NVIDIA response status={}", response.status());

        let body = read_success_body(response).await?;
        let parsed: ChatResponse =
            serde_json::from_str(&body).map_err(|e| LlmError::Decode(e.to_string()))?;

        // Reasoning models sometimes leave `content` empty.
        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content.filter(|s| !s.trim().is_empty()).or(c.message.reasoning_content))
            .unwrap_or_default();
        log::debug!(target: self.log.target(), "NVIDIA generated text: {}", text);
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_key_fails_without_network() {
        let settings = AISettings::default();
        let client = GeminiClient::new(&settings, Telemetry::root()).unwrap();
        let err = client.generate("hello").await.unwrap_err();
        assert!(matches!(err, LlmError::MissingApiKey("GEMINI_API_KEY")));

        let settings = AISettings {
            provider: Provider::Nvidia,
            ..AISettings::default()
        };
        let client = NvidiaClient::new(&settings, Telemetry::root()).unwrap();
        let err = client.generate("hello").await.unwrap_err();
        assert!(matches!(err, LlmError::MissingApiKey("NVIDIA_API_KEY")));
    }

    #[test]
    fn test_gemini_request_shape() {
        let request = GenerateRequest {
            contents: vec![GenerateContent {
                parts: vec![GeneratePart { text: "ping" }],
            }],
            generation_config: GenerationConfig { temperature: 0.0 },
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["contents"][0]["parts"][0]["text"], "ping");
        assert_eq!(value["generationConfig"]["temperature"], 0.0);
    }

    #[test]
    fn test_gemini_response_tolerates_missing_parts() {
        let parsed: GenerateResponse = serde_json::from_str(r#"{"candidates": [{}]}"#).unwrap();
        assert!(parsed.candidates[0].content.is_none());
    }
}
