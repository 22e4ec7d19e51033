use crate::traits::Classifier;
use crate::types::{FilterError, Result, SamplingConfig};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info};

pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

/// Google Gemini over the Generative Language REST API.
pub struct GeminiAdapter {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiAdapter {
    pub fn new(api_key: String, model: String) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(FilterError::MissingCredential(GEMINI_API_KEY_ENV.to_string()));
        }

        let client = Client::builder().build()?;

        Ok(Self {
            client,
            api_key,
            model,
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
        })
    }

    /// Read the API key from `GEMINI_API_KEY`.
    pub fn from_env(model: String) -> Result<Self> {
        let api_key = std::env::var(GEMINI_API_KEY_ENV)
            .map_err(|_| FilterError::MissingCredential(GEMINI_API_KEY_ENV.to_string()))?;
        Self::new(api_key, model)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_k: u32,
    top_p: f32,
    max_output_tokens: u32,
}

impl From<&SamplingConfig> for GenerationConfig {
    fn from(sampling: &SamplingConfig) -> Self {
        Self {
            temperature: sampling.temperature,
            top_k: sampling.top_k,
            top_p: sampling.top_p,
            max_output_tokens: sampling.max_output_tokens,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
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

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
    status: Option<String>,
}

/// Text of the first candidate, parts joined in order.
fn extract_text(response: GenerateContentResponse) -> Result<String> {
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| {
            FilterError::Classification("response contained no candidates".to_string())
        })?;

    let content = candidate.content.ok_or_else(|| {
        FilterError::Classification(format!(
            "candidate has no content (finish reason: {})",
            candidate.finish_reason.as_deref().unwrap_or("unknown")
        ))
    })?;

    Ok(content
        .parts
        .into_iter()
        .filter_map(|p| p.text)
        .collect::<Vec<_>>()
        .join(""))
}

#[async_trait]
impl Classifier for GeminiAdapter {
    fn adapter_name(&self) -> String {
        format!("Gemini ({})", self.model)
    }

    async fn classify(
        &self,
        prompt: &str,
        instruction: &str,
        sampling: &SamplingConfig,
    ) -> Result<String> {
        let request = GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part { text: instruction }],
            },
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part { text: prompt }],
            }],
            generation_config: sampling.into(),
        };

        info!("------------Calling Gemini--------------");
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                FilterError::Classification(format!("error sending message to Gemini: {}", e))
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| {
                FilterError::Classification(format!("error reading Gemini response: {}", e))
            })?;

        if !status.is_success() {
            let detail = match serde_json::from_str::<ApiErrorBody>(&body) {
                Ok(parsed) => format!(
                    "{} ({})",
                    parsed.error.message,
                    parsed.error.status.unwrap_or_else(|| status.to_string())
                ),
                Err(_) => format!("HTTP {}", status),
            };
            return Err(FilterError::Classification(detail));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body).map_err(|e| {
            FilterError::Classification(format!("unexpected Gemini response: {}", e))
        })?;
        let text = extract_text(parsed)?;
        debug!("Gemini returned {} bytes", text.len());
        Ok(text)
    }
}

/// Deterministic stand-in that returns a canned answer and remembers what it was asked.
pub struct MockClassifier {
    name: String,
    response: std::result::Result<String, String>,
    calls: Mutex<Vec<MockCall>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MockCall {
    pub prompt: String,
    pub instruction: String,
    pub sampling: SamplingConfig,
}

impl MockClassifier {
    /// Always answers `response`.
    pub fn new(name: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            response: Ok(response.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every call fails with `message`.
    pub fn failing(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            response: Err(message.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub async fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl Classifier for MockClassifier {
    fn adapter_name(&self) -> String {
        format!("Mock classifier ({})", self.name)
    }

    async fn classify(
        &self,
        prompt: &str,
        instruction: &str,
        sampling: &SamplingConfig,
    ) -> Result<String> {
        self.calls.lock().await.push(MockCall {
            prompt: prompt.to_string(),
            instruction: instruction.to_string(),
            sampling: sampling.clone(),
        });

        self.response
            .clone()
            .map_err(FilterError::Classification)
    }
}
