use crate::traits::{LlmClient, LlmResponse};
use async_trait::async_trait;
use pagemark_common::{PagemarkError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

const SAFETY_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GeminiGenerationConfig>,
    safety_settings: Vec<GeminiSafetySetting>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct GeminiSafetySetting {
    category: &'static str,
    threshold: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    usage_metadata: Option<GeminiUsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiResponseContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsageMetadata {
    total_token_count: Option<u32>,
}

/// Google Gemini API client.
///
/// Requires a valid API key and internet access.
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    /// Create a new client against the public Gemini endpoint.
    pub fn new(api_key: String, model: String) -> Result<Self> {
        Self::with_base_url(GEMINI_BASE_URL, api_key, model)
    }

    /// Create a client against an alternative endpoint (proxies, test servers).
    pub fn with_base_url(base_url: &str, api_key: String, model: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| PagemarkError::Llm(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model,
        })
    }

    fn safety_settings() -> Vec<GeminiSafetySetting> {
        SAFETY_CATEGORIES
            .iter()
            .map(|&category| GeminiSafetySetting {
                category,
                threshold: "BLOCK_NONE",
            })
            .collect()
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn generate(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        max_tokens: Option<u32>,
        temperature: Option<f32>,
    ) -> Result<LlmResponse> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);

        let generation_config = (max_tokens.is_some() || temperature.is_some()).then(|| {
            GeminiGenerationConfig {
                temperature,
                max_output_tokens: max_tokens,
            }
        });

        let request = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config,
            safety_settings: Self::safety_settings(),
            system_instruction: system_prompt.map(|sys| GeminiContent {
                parts: vec![GeminiPart {
                    text: sys.to_string(),
                }],
            }),
        };

        tracing::debug!(model = %self.model, "llm.gemini.request");

        let resp = self
            .client
            .post(&url)
            .query(&[("key", &self.api_key)])
            .json(&request)
            .send()
            .await
            .map_err(|e| PagemarkError::Llm(format!("Gemini request failed: {}", e)))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let error_text = resp.text().await.unwrap_or_default();

            return Err(PagemarkError::Llm(match status.as_u16() {
                429 => "Rate limit exceeded".to_string(),
                401 => "Invalid API key".to_string(),
                403 => "API access forbidden".to_string(),
                _ => format!("Gemini API error ({}): {}", status, error_text),
            }));
        }

        let gemini_response: GeminiResponse = resp.json().await.map_err(|e| {
            PagemarkError::Llm(format!("Failed to parse Gemini response: {}", e))
        })?;

        let Some(candidate) = gemini_response.candidates.first() else {
            return Err(PagemarkError::Llm(
                "No candidates returned from Gemini".to_string(),
            ));
        };

        let text = candidate
            .content
            .as_ref()
            .and_then(|c| c.parts.first())
            .map(|p| p.text.clone())
            .filter(|t| !t.trim().is_empty());

        let Some(text) = text else {
            let reason = candidate.finish_reason.as_deref().unwrap_or("N/A");
            tracing::warn!(finish_reason = reason, "llm.gemini.empty_candidate");
            return Err(PagemarkError::Llm(format!(
                "Gemini returned no text content (finish reason: {reason})"
            )));
        };

        Ok(LlmResponse {
            text,
            model: Some(self.model.clone()),
            tokens_used: gemini_response
                .usage_metadata
                .and_then(|u| u.total_token_count),
        })
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
