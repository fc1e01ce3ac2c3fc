use crate::traits::{LlmClient, LlmResponse};
use async_trait::async_trait;
use pagemark_common::{PagemarkError, Result};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

const OLLAMA_CONNECTION_ERROR: &str = "No running Ollama server detected. Start it with: `ollama serve` (after installing). Install instructions: https://github.com/ollama/ollama";

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagEntry>,
}

#[derive(Debug, Deserialize)]
struct TagEntry {
    name: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
    eval_count: Option<u32>,
}

/// Ollama client for local model inference.
///
/// Expects a running Ollama server (see https://github.com/ollama/ollama).
pub struct OllamaClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    /// Create a new client, verifying the server is up and the model is present.
    pub async fn new(base_url: String, model: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| PagemarkError::Llm(format!("Failed to create HTTP client: {}", e)))?;

        let ollama_client = Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
        };

        let models = ollama_client.fetch_available_models().await?;
        if !models.contains(&ollama_client.model) {
            tracing::info!(model = %ollama_client.model, "llm.ollama.pull");
            ollama_client.pull_model().await?;
        }

        Ok(ollama_client)
    }

    async fn fetch_available_models(&self) -> Result<Vec<String>> {
        let url = format!("{}/api/tags", self.base_url);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|_| PagemarkError::Llm(OLLAMA_CONNECTION_ERROR.to_string()))?;

        if !resp.status().is_success() {
            return Err(PagemarkError::Llm(OLLAMA_CONNECTION_ERROR.to_string()));
        }

        let tags: TagsResponse = resp
            .json()
            .await
            .map_err(|e| PagemarkError::Llm(format!("Failed to parse models response: {}", e)))?;

        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    async fn pull_model(&self) -> Result<()> {
        let url = format!("{}/api/pull", self.base_url);
        let resp = self
            .client
            .post(&url)
            .json(&json!({ "model": self.model, "stream": false }))
            .send()
            .await
            .map_err(|e| PagemarkError::Llm(format!("Failed to pull model: {}", e)))?;

        if resp.status().is_success() {
            Ok(())
        } else {
            Err(PagemarkError::Llm(format!(
                "Failed to pull model {}: HTTP {}",
                self.model,
                resp.status()
            )))
        }
    }
}

#[async_trait]
impl LlmClient for OllamaClient {
    async fn generate(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        max_tokens: Option<u32>,
        temperature: Option<f32>,
    ) -> Result<LlmResponse> {
        let url = format!("{}/api/generate", self.base_url);

        let mut options = serde_json::Map::new();
        if let Some(temp) = temperature {
            options.insert("temperature".to_string(), json!(temp));
        }
        if let Some(max_tok) = max_tokens {
            options.insert("num_predict".to_string(), json!(max_tok));
        }

        let mut payload = json!({
            "model": self.model,
            "prompt": prompt,
            "stream": false,
            "options": options,
        });
        if let Some(sys) = system_prompt {
            payload["system"] = json!(sys);
        }

        let resp = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| PagemarkError::Llm(format!("Generate request failed: {}", e)))?;

        if !resp.status().is_success() {
            return Err(PagemarkError::Llm(format!(
                "Generate failed: HTTP {}",
                resp.status()
            )));
        }

        let body: GenerateResponse = resp
            .json()
            .await
            .map_err(|e| PagemarkError::Llm(format!("Failed to parse response: {}", e)))?;

        Ok(LlmResponse {
            text: body.response,
            model: Some(self.model.clone()),
            tokens_used: body.eval_count,
        })
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
