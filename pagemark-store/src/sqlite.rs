//! SQLite tables backing the summary archive and the domain work queue.
//!
//! `scraper` keeps every summary ever produced for a domain; readers take the
//! newest row. `scraper_misses` counts how often a domain was requested without
//! a summary on file, and is drained by the batch pipeline.
use std::str::FromStr;

use chrono::{DateTime, Utc};
use pagemark_core::PageSummary;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use tracing::{debug, info};

use crate::Result;

const SCHEMA: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS scraper (
        id             INTEGER PRIMARY KEY AUTOINCREMENT,
        domain_name    TEXT NOT NULL,
        scraper_output TEXT NOT NULL,
        source         TEXT NOT NULL,
        html_checksum  TEXT,
        created_at     TEXT NOT NULL
    )"#,
    r#"CREATE INDEX IF NOT EXISTS idx_scraper_domain
        ON scraper (domain_name, created_at)"#,
    r#"CREATE TABLE IF NOT EXISTS scraper_misses (
        domain_name TEXT PRIMARY KEY,
        count       INTEGER NOT NULL DEFAULT 1
    )"#,
];

/// A queued domain and how many times it was requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissRow {
    pub domain_name: String,
    pub count: i64,
}

#[derive(Debug, Clone)]
pub struct StoredSummary {
    pub id: i64,
    pub domain_name: String,
    pub summary: PageSummary,
    pub source: String,
    pub html_checksum: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (creating if needed) the database at `url` and apply the schema.
    pub async fn connect(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = pool_options(url).connect_with(options).await?;
        let store = Self::new(pool);
        store.ensure_schema().await?;
        info!(url, "store.connected");
        Ok(store)
    }

    pub async fn ensure_schema(&self) -> Result<()> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        debug!("store.schema.ready");
        Ok(())
    }

    /// Append a summary row for `domain`. Returns the new row id.
    pub async fn insert_summary(
        &self,
        domain: &str,
        summary: &PageSummary,
        source: &str,
        html_checksum: Option<&str>,
    ) -> Result<i64> {
        let output = serde_json::to_string(summary)?;
        let res = sqlx::query(
            r#"INSERT INTO scraper
               (domain_name, scraper_output, source, html_checksum, created_at)
               VALUES (?1, ?2, ?3, ?4, ?5)"#,
        )
        .bind(domain)
        .bind(output)
        .bind(source)
        .bind(html_checksum)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        let id = res.last_insert_rowid();
        info!(
            domain,
            source,
            id,
            elements = summary.len(),
            "store.insert_summary"
        );
        Ok(id)
    }

    /// Newest summary stored for `domain`, if any.
    pub async fn latest_summary(&self, domain: &str) -> Result<Option<StoredSummary>> {
        let row = sqlx::query(
            r#"SELECT id, domain_name, scraper_output, source, html_checksum, created_at
               FROM scraper
               WHERE domain_name = ?1
               ORDER BY created_at DESC, id DESC
               LIMIT 1"#,
        )
        .bind(domain)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            debug!(domain, "store.latest_summary.none");
            return Ok(None);
        };
        let raw: String = row.try_get("scraper_output")?;
        Ok(Some(StoredSummary {
            id: row.try_get("id")?,
            domain_name: row.try_get("domain_name")?,
            summary: serde_json::from_str(&raw)?,
            source: row.try_get("source")?,
            html_checksum: row.try_get("html_checksum")?,
            created_at: row.try_get("created_at")?,
        }))
    }

    /// Count a request for a domain that had no summary on file.
    pub async fn record_miss(&self, domain: &str) -> Result<()> {
        sqlx::query(
            r#"INSERT INTO scraper_misses (domain_name, count)
               VALUES (?1, 1)
               ON CONFLICT(domain_name) DO UPDATE SET count = count + 1"#,
        )
        .bind(domain)
        .execute(&self.pool)
        .await?;
        debug!(domain, "store.record_miss");
        Ok(())
    }

    /// Pending domains, most requested first.
    pub async fn list_misses(&self) -> Result<Vec<MissRow>> {
        let rows = sqlx::query(
            r#"SELECT domain_name, count
               FROM scraper_misses
               ORDER BY count DESC, domain_name ASC"#,
        )
        .fetch_all(&self.pool)
        .await?;
        let misses = rows
            .into_iter()
            .map(|r| {
                Ok(MissRow {
                    domain_name: r.try_get("domain_name")?,
                    count: r.try_get("count")?,
                })
            })
            .collect::<std::result::Result<Vec<_>, sqlx::Error>>()?;
        info!(pending = misses.len(), "store.list_misses");
        Ok(misses)
    }

    /// Drop `domain` from the queue. Returns whether a row was removed.
    pub async fn remove_miss(&self, domain: &str) -> Result<bool> {
        let res = sqlx::query("DELETE FROM scraper_misses WHERE domain_name = ?1")
            .bind(domain)
            .execute(&self.pool)
            .await?;
        let removed = res.rows_affected() > 0;
        debug!(domain, removed, "store.remove_miss");
        Ok(removed)
    }
}

/// An in-memory database lives only as long as its connection, so those
/// pools hold exactly one connection and never reap it.
fn pool_options(url: &str) -> SqlitePoolOptions {
    if url.contains(":memory:") {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(4)
    }
}
