//! Persistence for page summaries and the queue of domains awaiting a scrape.
//!
//! - [`sqlite::SqliteStore`]: summaries (`scraper`) and pending domains
//!   (`scraper_misses`) in SQLite
//! - [`files`]: `<domain>_summary.json` exports
//! - [`domain_to_url`]: normalise queued domain names into fetchable URLs

pub mod files;
pub mod sqlite;

pub use files::{url_to_filename, write_summary_file};
pub use sqlite::{MissRow, SqliteStore, StoredSummary};

use url::Url;

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid url `{input}`: {reason}")]
    InvalidUrl { input: String, reason: String },
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Turn a bare domain into an `https://` URL; explicit schemes are kept.
pub fn domain_to_url(domain: &str) -> Result<Url> {
    let domain = domain.trim();
    let candidate = if domain.starts_with("http://") || domain.starts_with("https://") {
        domain.to_string()
    } else {
        format!("https://{domain}")
    };
    Url::parse(&candidate).map_err(|e| StoreError::InvalidUrl {
        input: domain.to_string(),
        reason: e.to_string(),
    })
}
