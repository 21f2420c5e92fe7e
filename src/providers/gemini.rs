use std::time::Duration;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Serialize, Deserialize};
use reqwest::{Client, StatusCode};
use url::Url;
use log::error;

use crate::errors::ProviderError;
use crate::providers::{DocumentPrompt, Provider};

/// Default public endpoint of the Generative Language API
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

/// Gemini client for the generateContent API
pub struct Gemini {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// API endpoint URL (optional, defaults to public API)
    endpoint: String,
    /// Model name, e.g. `gemini-2.5-pro`
    model: String,
    /// Temperature for generation
    temperature: Option<f32>,
    /// Maximum number of tokens to generate
    max_output_tokens: Option<u32>,
}

impl std::fmt::Debug for Gemini {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gemini")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

/// generateContent request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiRequest {
    /// The conversation turns
    contents: Vec<GeminiContent>,

    /// Sampling settings
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationSettings>,
}

/// One conversation turn
#[derive(Debug, Serialize, Deserialize)]
pub struct GeminiContent {
    /// Role of the sender (user, model)
    #[serde(default)]
    pub role: String,

    /// Text and inline-data parts
    #[serde(default)]
    pub parts: Vec<GeminiPart>,
}

/// A content part: either text or inline binary data
#[derive(Debug, Serialize, Deserialize)]
pub struct GeminiPart {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", alias = "inlineData")]
    pub inline_data: Option<InlineData>,
}

/// Base64 payload with its MIME type
#[derive(Debug, Serialize, Deserialize)]
pub struct InlineData {
    #[serde(alias = "mimeType")]
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Serialize, Default)]
#[serde(rename_all = "camelCase")]
struct GenerationSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

/// Token usage information
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
}

/// generateContent response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiResponse {
    /// Generated candidates, best first
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
    /// Token usage information
    #[serde(default)]
    pub usage_metadata: Option<UsageMetadata>,
}

/// One generated candidate
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiCandidate {
    #[serde(default)]
    pub content: Option<GeminiContent>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

impl GeminiRequest {
    /// Create an empty request
    pub fn new() -> Self {
        Self {
            contents: Vec::new(),
            generation_config: None,
        }
    }

    /// Add a user turn holding the instruction followed by the inline document
    pub fn add_document_turn(mut self, instruction: impl Into<String>, mime_type: impl Into<String>, document: &[u8]) -> Self {
        self.contents.push(GeminiContent {
            role: "user".to_string(),
            parts: vec![
                GeminiPart {
                    text: Some(instruction.into()),
                    inline_data: None,
                },
                GeminiPart {
                    text: None,
                    inline_data: Some(InlineData {
                        mime_type: mime_type.into(),
                        data: STANDARD.encode(document),
                    }),
                },
            ],
        });
        self
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.generation_config.get_or_insert_with(GenerationSettings::default).temperature = Some(temperature);
        self
    }

    /// Set the output token limit
    pub fn max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.generation_config.get_or_insert_with(GenerationSettings::default).max_output_tokens = Some(max_output_tokens);
        self
    }
}

impl Default for GeminiRequest {
    fn default() -> Self {
        Self::new()
    }
}

impl Gemini {
    /// Create a new Gemini client
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>, model: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            model: model.into(),
            temperature: None,
            max_output_tokens: None,
        }
    }

    /// Set sampling options applied to every request
    pub fn with_generation_options(mut self, temperature: Option<f32>, max_output_tokens: Option<u32>) -> Self {
        self.temperature = temperature;
        self.max_output_tokens = max_output_tokens;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Build the generateContent URL; the key travels in a header, never in the URL
    pub fn api_url(&self) -> Result<Url, ProviderError> {
        let base = if self.endpoint.is_empty() {
            DEFAULT_ENDPOINT
        } else {
            self.endpoint.trim_end_matches('/')
        };
        let mut url = Url::parse(&format!("{}/v1beta/models/{}:generateContent", base, self.model))
            .map_err(|e| ProviderError::RequestFailed(format!("Invalid Gemini endpoint '{}': {}", base, e)))?;
        Ok(url)
    }

    /// Build a request for one document prompt
    pub fn build_request(&self, prompt: &DocumentPrompt) -> GeminiRequest {
        let mut request = GeminiRequest::new()
            .add_document_turn(prompt.instruction.as_str(), prompt.mime_type.as_str(), &prompt.document);
        if let Some(temperature) = self.temperature {
            request = request.temperature(temperature);
        }
        if let Some(max_output_tokens) = self.max_output_tokens {
            request = request.max_output_tokens(max_output_tokens);
        }
        request
    }

    /// Send a generateContent request
    pub async fn generate(&self, request: &GeminiRequest) -> Result<GeminiResponse, ProviderError> {
        let url = self.api_url()?;

        let response = self.client.post(url)
            .header("Content-Type", "application/json")
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                let e = e.without_url();
                if e.is_connect() || e.is_timeout() {
                    ProviderError::ConnectionError(format!("Failed to reach Gemini API: {}", e))
                } else {
                    ProviderError::RequestFailed(format!("Failed to send request to Gemini API: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Gemini API error ({}): {}", status, error_text);
            return Err(Self::map_status(status, error_text));
        }

        response.json::<GeminiResponse>().await
            .map_err(|e| ProviderError::ParseError(format!("Failed to parse Gemini API response: {}", e.without_url())))
    }

    /// Map a non-success HTTP status to a provider error
    pub fn map_status(status: StatusCode, message: String) -> ProviderError {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderError::AuthenticationError(message),
            StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimitExceeded(message),
            _ => ProviderError::ApiError {
                status_code: status.as_u16(),
                message,
            },
        }
    }

    /// Concatenate the text parts of the first candidate
    pub fn extract_text_from_response(response: &GeminiResponse) -> String {
        response.candidates.first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content.parts.iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl Provider for Gemini {
    type Request = DocumentPrompt;
    type Response = GeminiResponse;

    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError> {
        let body = self.build_request(&request);
        let response = self.generate(&body).await?;
        if let Some(usage) = &response.usage_metadata {
            log::debug!("Gemini usage: {} prompt tokens, {} output tokens",
                usage.prompt_token_count, usage.candidates_token_count);
        }
        Ok(response)
    }

    fn extract_text(response: &Self::Response) -> String {
        Self::extract_text_from_response(response)
    }
}
