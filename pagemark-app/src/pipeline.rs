//! Capture → scan → describe → persist.
//!
//! The analysis core runs synchronously on an owned HTML string; only the
//! describer and capture calls await.
use std::time::Duration;

use anyhow::{Context, Result};
use pagemark_core::rank::PAGE_BODY_DESCRIPTION;
use pagemark_core::{PageSummary, ScanOptions};
use pagemark_drivers::{PageCapture, PageCapturer};
use pagemark_llm::describe::ElementDescriber;
use pagemark_store::{SqliteStore, domain_to_url};
use tracing::{error, info, warn};
use url::Url;

pub const SCRAPED_SOURCE: &str = "scraped";

#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    pub scan: ScanOptions,
    /// Pause between consecutive description calls.
    pub describe_delay: Duration,
}

/// Summarise an already captured document.
pub async fn summarize_html(
    html: &str,
    page_title: &str,
    describer: &dyn ElementDescriber,
    options: &PipelineOptions,
) -> PageSummary {
    let ranked = pagemark_core::analyze(html, &options.scan);
    info!(elements = ranked.len(), title = page_title, "pipeline.analyzed");

    let mut summary = PageSummary::default();
    let mut described = 0usize;
    for element in ranked {
        if element.is_page_body() {
            summary.push(
                element.key,
                PAGE_BODY_DESCRIPTION.to_string(),
                element.descriptor.selector,
            );
            continue;
        }
        if described > 0 && !options.describe_delay.is_zero() {
            tokio::time::sleep(options.describe_delay).await;
        }
        info!(key = %element.key, selector = %element.descriptor.selector, "pipeline.describe");
        let description = describer.describe(&element.descriptor, page_title).await;
        described += 1;
        summary.push(element.key, description, element.descriptor.selector);
    }
    summary
}

pub struct UrlSummary {
    pub capture: PageCapture,
    pub summary: PageSummary,
}

pub async fn summarize_url(
    url: &Url,
    capturer: &dyn PageCapturer,
    describer: &dyn ElementDescriber,
    options: &PipelineOptions,
) -> Result<UrlSummary> {
    let capture = capturer
        .capture(url)
        .await
        .with_context(|| format!("failed to capture {url}"))?;
    let summary = summarize_html(&capture.html, &capture.title, describer, options).await;
    info!(url = %url, elements = summary.len(), "pipeline.summarized");
    Ok(UrlSummary { capture, summary })
}

/// Outcome of one pass over the miss queue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainReport {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// Scrape every queued domain, store its summary and dequeue it.
///
/// A domain that fails to capture or store stays queued and is counted in
/// `failed`. Failing to dequeue after a successful insert only warns.
pub async fn drain_misses(
    store: &SqliteStore,
    capturer: &dyn PageCapturer,
    describer: &dyn ElementDescriber,
    options: &PipelineOptions,
) -> Result<DrainReport> {
    let misses = store
        .list_misses()
        .await
        .context("failed to read the miss queue")?;
    let mut report = DrainReport {
        total: misses.len(),
        ..DrainReport::default()
    };
    if misses.is_empty() {
        info!("pipeline.drain.empty");
        return Ok(report);
    }

    for miss in misses {
        let domain = miss.domain_name.trim();
        if domain.is_empty() {
            warn!("pipeline.drain.skip_blank_domain");
            report.skipped += 1;
            continue;
        }
        info!(domain, count = miss.count, "pipeline.drain.domain");

        match process_domain(store, domain, capturer, describer, options).await {
            Ok(()) => {
                if let Err(e) = store.remove_miss(&miss.domain_name).await {
                    warn!(domain, error = %e, "pipeline.drain.dequeue_failed");
                }
                report.succeeded += 1;
            }
            Err(e) => {
                error!(domain, error = ?e, "pipeline.drain.failed");
                report.failed += 1;
            }
        }
    }

    info!(
        total = report.total,
        succeeded = report.succeeded,
        failed = report.failed,
        skipped = report.skipped,
        "pipeline.drain.done"
    );
    Ok(report)
}

async fn process_domain(
    store: &SqliteStore,
    domain: &str,
    capturer: &dyn PageCapturer,
    describer: &dyn ElementDescriber,
    options: &PipelineOptions,
) -> Result<()> {
    let url = domain_to_url(domain)?;
    let result = summarize_url(&url, capturer, describer, options).await?;
    let checksum = result.capture.html_checksum();
    store
        .insert_summary(domain, &result.summary, SCRAPED_SOURCE, Some(&checksum))
        .await
        .with_context(|| format!("failed to store summary for {domain}"))?;
    Ok(())
}
