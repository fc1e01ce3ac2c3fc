//! Provider-agnostic LLM integration for pagemark.
//!
//! This crate exposes a common [`traits::LlmClient`] interface, concrete
//! clients for Gemini and Ollama, and the [`describe::ElementDescriber`]
//! used to attach purpose descriptions to scanned elements.
//!
//! # Examples
//! ```no_run
//! use pagemark_config::LlmSettings;
//! use pagemark_llm::build_describer;
//!
//! # #[tokio::main]
//! # async fn main() -> pagemark_common::Result<()> {
//! let describer = build_describer(&LlmSettings::default()).await?;
//! # let _ = describer;
//! # Ok(())
//! # }
//! ```
pub mod describe;
pub mod gemini;
pub mod ollama;
pub mod traits;

use std::sync::Arc;

use describe::{ElementDescriber, LlmDescriber, StaticDescriber};
use gemini::GeminiClient;
use ollama::OllamaClient;
use pagemark_config::{LlmProvider, LlmSettings};
use traits::LlmClient;

/// Build the client for `settings`, or `None` when no provider is configured.
pub async fn build_llm_client(settings: &LlmSettings) -> pagemark_common::Result<Option<Arc<dyn LlmClient>>> {
    match &settings.provider {
        LlmProvider::Gemini { api_key, model, .. } => {
            if api_key.trim().is_empty() || api_key.contains("${") {
                tracing::warn!("Gemini API key not set. Using fallback descriptions.");
                return Ok(None);
            }
            let client = GeminiClient::new(api_key.clone(), model.clone())?;
            Ok(Some(Arc::new(client)))
        }
        LlmProvider::Ollama {
            model, endpoint, ..
        } => {
            let client = OllamaClient::new(endpoint.clone(), model.clone()).await?;
            Ok(Some(Arc::new(client)))
        }
        LlmProvider::None => Ok(None),
    }
}

/// Build the describer for `settings`, using static descriptions when no
/// usable provider is configured.
pub async fn build_describer(settings: &LlmSettings) -> pagemark_common::Result<Arc<dyn ElementDescriber>> {
    let (temperature, max_tokens) = match &settings.provider {
        LlmProvider::Gemini {
            temperature,
            max_tokens,
            ..
        }
        | LlmProvider::Ollama {
            temperature,
            max_tokens,
            ..
        } => (*temperature, *max_tokens),
        LlmProvider::None => (None, None),
    };

    Ok(match build_llm_client(settings).await? {
        Some(client) => {
            tracing::info!(model = client.model_name(), "describe.provider_ready");
            Arc::new(LlmDescriber::new(client, temperature, max_tokens))
        }
        None => Arc::new(StaticDescriber),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unset_gemini_key_degrades_to_static() {
        let settings = LlmSettings {
            describe_delay_ms: 0,
            provider: LlmProvider::Gemini {
                api_key: "${GOOGLE_AI_API_KEY}".into(),
                model: "gemini-2.5-flash".into(),
                temperature: Some(0.1),
                max_tokens: Some(1500),
            },
        };
        assert!(build_llm_client(&settings).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn gemini_with_key_builds_client() {
        let settings = LlmSettings {
            describe_delay_ms: 0,
            provider: LlmProvider::Gemini {
                api_key: "k".into(),
                model: "gemini-2.5-flash".into(),
                temperature: None,
                max_tokens: None,
            },
        };
        let client = build_llm_client(&settings).await.unwrap().unwrap();
        assert_eq!(client.model_name(), "gemini-2.5-flash");
    }

    #[tokio::test]
    async fn no_provider_means_no_client() {
        assert!(build_llm_client(&LlmSettings::default()).await.unwrap().is_none());
    }
}
