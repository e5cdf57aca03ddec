//! Google Gemini provider implementation
//!
//! Supports Gemini models via the Google AI `generateContent` API.

use std::sync::Arc;

use async_trait::async_trait;
use papergen_http::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use papergen_http::{HttpClient, HttpClientTrait, HttpConfig, HttpError};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::{
    error::ProviderError,
    models::{ChatRequest, ChatResponse, FinishReason, Message, ModelInfo, TokenUsage},
    provider::Provider,
};

/// Public Gemini endpoint
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Google Gemini provider implementation
pub struct GoogleProvider {
    api_key: String,
    client: Arc<dyn HttpClientTrait>,
    base_url: String,
}

impl GoogleProvider {
    /// Create a new Google provider instance
    pub fn new(api_key: String) -> Result<Self, ProviderError> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    /// Create a new Google provider with a custom base URL
    pub fn with_base_url(api_key: String, base_url: String) -> Result<Self, ProviderError> {
        let client = HttpClient::new(HttpConfig::ai_provider())?;
        Self::with_client_and_base_url(Arc::new(client), api_key, base_url)
    }

    /// Create a new Google provider with a custom HTTP client and base URL
    pub fn with_client_and_base_url(
        client: Arc<dyn HttpClientTrait>,
        api_key: String,
        base_url: String,
    ) -> Result<Self, ProviderError> {
        if api_key.is_empty() {
            return Err(ProviderError::ConfigError(
                "Google API key is required".to_string(),
            ));
        }

        Ok(Self {
            api_key,
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn headers(&self) -> Result<HeaderMap, ProviderError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let key = HeaderValue::from_str(&self.api_key).map_err(|_| {
            ProviderError::ConfigError("Google API key contains invalid characters".to_string())
        })?;
        headers.insert(API_KEY_HEADER, key);
        Ok(headers)
    }

    /// Build the wire request; system messages become `systemInstruction`
    fn build_request(request: &ChatRequest) -> GoogleChatRequest {
        let system: Vec<GooglePart> = request
            .messages
            .iter()
            .filter(|m| m.role == "system")
            .map(|m| GooglePart {
                text: m.content.clone(),
            })
            .collect();

        let contents = request
            .messages
            .iter()
            .filter(|m| m.role != "system")
            .map(|m: &Message| GoogleContent {
                role: if m.role == "assistant" {
                    "model".to_string()
                } else {
                    "user".to_string()
                },
                parts: vec![GooglePart {
                    text: m.content.clone(),
                }],
            })
            .collect();

        let generation_config = if request.temperature.is_some() || request.max_tokens.is_some() {
            Some(GoogleGenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_tokens,
            })
        } else {
            None
        };

        GoogleChatRequest {
            system_instruction: if system.is_empty() {
                None
            } else {
                Some(GoogleSystemInstruction { parts: system })
            },
            contents,
            generation_config,
        }
    }

    /// Convert Google API response to our ChatResponse
    fn convert_response(
        response: GoogleChatResponse,
        model: String,
    ) -> Result<ChatResponse, ProviderError> {
        let candidate = response
            .candidates
            .first()
            .ok_or_else(|| ProviderError::ProviderError("No candidates in response".to_string()))?;

        let content = candidate
            .content
            .as_ref()
            .map(|c| {
                c.parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .filter(|text| !text.is_empty())
            .ok_or_else(|| ProviderError::ProviderError("No content in response".to_string()))?;

        let finish_reason = candidate
            .finish_reason
            .as_deref()
            .map(|reason| match reason {
                "STOP" => FinishReason::Stop,
                "MAX_TOKENS" => FinishReason::Length,
                "SAFETY" | "RECITATION" => FinishReason::Safety,
                "ERROR" => FinishReason::Error,
                _ => FinishReason::Stop,
            })
            .unwrap_or(FinishReason::Stop);

        let usage = response
            .usage_metadata
            .map(|u| TokenUsage {
                prompt_tokens: u.prompt_token_count,
                completion_tokens: u.candidates_token_count,
                total_tokens: u.total_token_count,
            })
            .unwrap_or_default();

        Ok(ChatResponse {
            content,
            model,
            usage,
            finish_reason,
        })
    }
}

#[async_trait]
impl Provider for GoogleProvider {
    fn id(&self) -> &str {
        "google"
    }

    fn name(&self) -> &str {
        "Google"
    }

    fn models(&self) -> Vec<ModelInfo> {
        [
            ("gemini-2.0-flash", "Gemini 2.0 Flash", 1_000_000),
            ("gemini-1.5-pro", "Gemini 1.5 Pro", 2_000_000),
            ("gemini-1.5-flash", "Gemini 1.5 Flash", 1_000_000),
            ("gemini-1.0-pro", "Gemini 1.0 Pro", 32_000),
        ]
        .into_iter()
        .map(|(id, name, context_window)| ModelInfo {
            id: id.to_string(),
            name: name.to_string(),
            provider: "google".to_string(),
            context_window,
        })
        .collect()
    }

    /// Listed models plus any other `gemini-*` id
    fn supports_model(&self, model: &str) -> bool {
        model.starts_with("gemini-") || self.models().iter().any(|m| m.id == model)
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError> {
        if !self.supports_model(&request.model) {
            return Err(ProviderError::InvalidModel(request.model.clone()));
        }

        let google_request = Self::build_request(&request);
        let body = serde_json::to_value(&google_request)?;

        debug!(
            "Sending chat request to Google for model: {}",
            request.model
        );

        let url = format!("{}/{}:generateContent", self.base_url, request.model);
        let response = self
            .client
            .post_json(&url, self.headers()?, &body)
            .await
            .map_err(|e| {
                error!("Google API request failed: {}", e);
                ProviderError::from(e)
            })?;

        let google_response: GoogleChatResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::SerializationError(e.to_string()))?;
        Self::convert_response(google_response, request.model)
    }

    async fn health_check(&self) -> Result<bool, ProviderError> {
        debug!("Performing health check for Google provider");

        match self.client.get(&self.base_url, self.headers()?).await {
            Ok(_) => {
                debug!("Google health check passed");
                Ok(true)
            }
            Err(HttpError::HttpStatus { status, .. })
                if status.as_u16() == 401 || status.as_u16() == 403 =>
            {
                error!("Google health check failed: authentication error");
                Err(ProviderError::AuthError)
            }
            Err(e) => {
                warn!("Google health check failed: {}", e);
                Ok(false)
            }
        }
    }
}

/// Google API request format
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GoogleChatRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GoogleSystemInstruction>,
    contents: Vec<GoogleContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GoogleGenerationConfig>,
}

#[derive(Debug, Serialize)]
struct GoogleSystemInstruction {
    parts: Vec<GooglePart>,
}

/// Google API content format
#[derive(Debug, Serialize, Deserialize)]
struct GoogleContent {
    #[serde(default)]
    role: String,
    #[serde(default)]
    parts: Vec<GooglePart>,
}

/// Google API part format
#[derive(Debug, Serialize, Deserialize)]
struct GooglePart {
    #[serde(default)]
    text: String,
}

/// Google API generation config
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GoogleGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<usize>,
}

/// Google API response format
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoogleChatResponse {
    #[serde(default)]
    candidates: Vec<GoogleCandidate>,
    #[serde(default)]
    usage_metadata: Option<GoogleUsageMetadata>,
}

/// Google API candidate format
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoogleCandidate {
    content: Option<GoogleContent>,
    finish_reason: Option<String>,
}

/// Google API usage metadata
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoogleUsageMetadata {
    #[serde(default)]
    prompt_token_count: usize,
    #[serde(default)]
    candidates_token_count: usize,
    #[serde(default)]
    total_token_count: usize,
}
