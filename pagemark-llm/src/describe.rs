//! One-sentence purpose descriptions for scanned elements.
//!
//! Description is best effort: [`ElementDescriber::describe`] never fails and
//! substitutes [`fallback_description`] whenever the provider errors or
//! returns nothing usable.

use std::sync::Arc;

use async_trait::async_trait;
use pagemark_common::Result;
use pagemark_core::{fallback_description, ElementDescriptor};
use tracing::{error, warn};

use crate::traits::LlmClient;

#[async_trait]
pub trait ElementDescriber: Send + Sync {
    /// Produce a description, or an error the caller may recover from.
    async fn try_describe(&self, element: &ElementDescriptor, page_title: &str) -> Result<String>;

    /// Describe `element`, falling back to the static sentence on failure.
    async fn describe(&self, element: &ElementDescriptor, page_title: &str) -> String {
        match self.try_describe(element, page_title).await {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => {
                warn!(selector = %element.selector, "describe.empty_response");
                fallback_description(element)
            }
            Err(e) => {
                error!(selector = %element.selector, error = %e, "describe.failed");
                fallback_description(element)
            }
        }
    }
}

/// Describer that never calls out and always uses the static sentence.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticDescriber;

#[async_trait]
impl ElementDescriber for StaticDescriber {
    async fn try_describe(&self, element: &ElementDescriptor, _page_title: &str) -> Result<String> {
        Ok(fallback_description(element))
    }
}

/// Describer backed by any [`LlmClient`].
pub struct LlmDescriber {
    client: Arc<dyn LlmClient>,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

impl LlmDescriber {
    pub fn new(client: Arc<dyn LlmClient>, temperature: Option<f32>, max_tokens: Option<u32>) -> Self {
        Self {
            client,
            temperature,
            max_tokens,
        }
    }
}

#[async_trait]
impl ElementDescriber for LlmDescriber {
    async fn try_describe(&self, element: &ElementDescriptor, page_title: &str) -> Result<String> {
        let prompt = build_prompt(element, page_title);
        let response = self
            .client
            .generate(&prompt, None, self.max_tokens, self.temperature)
            .await?;
        Ok(response.text)
    }
}

/// Prompt asking for a single-sentence summary of the element's function.
pub fn build_prompt(element: &ElementDescriptor, page_title: &str) -> String {
    let classes = element.classes.join(" ");
    let or_na = |s: &str| if s.is_empty() { "N/A".to_string() } else { s.to_string() };

    format!(
        "As a web developer, describe the purpose of an HTML element on a page titled '{page_title}'. \
         The element details are: Tag: <{tag}>, ID: '{id}', Classes: '{classes}', ARIA Role: '{role}'. \
         Provide a concise, one-sentence summary of its function.",
        tag = element.tag,
        id = or_na(element.id.as_deref().unwrap_or_default()),
        classes = or_na(&classes),
        role = or_na(element.role.as_deref().unwrap_or_default()),
    )
}
