//! Common types and utilities shared across pagemark crates.
//!
//! This crate defines the shared error type and the observability helpers
//! used throughout the workspace. It stays lightweight so every crate can
//! depend on it without pulling in heavy transitive costs.
//!
//! # Overview
//!
//! - [`observability`]: Centralised tracing/logging initialisation
//! - [`PagemarkError`] and [`Result`]: Shared error handling
//!
//! # Examples
//!
//! ```rust
//! use pagemark_common::PagemarkError;
//!
//! let err = PagemarkError::Llm("quota exhausted".into());
//! assert_eq!(err.to_string(), "LLM error: quota exhausted");
//! ```

pub mod observability;

/// Error raised by the description providers.
///
/// Other layers carry their own errors (`DomError`, `StoreError`, config
/// `ConfigError`) or `anyhow` at the binary and driver edges.
#[derive(thiserror::Error, Debug)]
pub enum PagemarkError {
    /// A description provider failed or returned unusable output.
    #[error("LLM error: {0}")]
    Llm(String),
}

/// Convenient alias for results that use [`PagemarkError`].
pub type Result<T> = std::result::Result<T, PagemarkError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn failing_call() -> Result<()> {
        Err(PagemarkError::Llm("HTTP 429".into()))
    }

    #[test]
    fn provider_errors_convert_into_anyhow() {
        let err = anyhow::Error::from(failing_call().unwrap_err());
        assert_eq!(err.to_string(), "LLM error: HTTP 429");
        assert!(matches!(
            err.downcast_ref::<PagemarkError>(),
            Some(PagemarkError::Llm(msg)) if msg == "HTTP 429"
        ));
    }
}
