//! Command line surface for `pagemark`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use pagemark_common::observability::LogFormat;
use pagemark_config::PagemarkConfig;
use pagemark_core::PageSummary;
use pagemark_drivers::WebDriverCapturer;
use pagemark_llm::build_describer;
use pagemark_llm::describe::ElementDescriber;
use pagemark_store::{SqliteStore, domain_to_url, write_summary_file};
use tracing::{info, warn};

use crate::pipeline::{PipelineOptions, drain_misses, summarize_html, summarize_url};

/// Find the major elements of a web page and address each with a CSS selector.
#[derive(Parser, Debug)]
#[command(name = "pagemark")]
#[command(version)]
pub(crate) struct Cli {
    /// YAML configuration file (defaults to ./pagemark.yaml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log encoding: text or json
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Mirror log events to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Summarise a single page
    Analyze {
        /// Page URL or bare domain; with --html it only names the output file
        #[arg(required_unless_present = "html")]
        url: Option<String>,

        /// Read HTML from a file instead of driving a browser
        #[arg(long)]
        html: Option<PathBuf>,

        /// Page title passed to the describer in --html mode
        #[arg(long, requires = "html")]
        title: Option<String>,

        /// Directory for <domain>_summary.json (overrides store.output_dir)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Scrape every domain waiting in the miss queue
    Drain,

    /// Print the stored summary for a domain, queueing it when missing
    Lookup {
        domain: String,
    },
}

pub(crate) fn pipeline_options(cfg: &PagemarkConfig) -> PipelineOptions {
    PipelineOptions {
        scan: cfg.scan,
        describe_delay: Duration::from_millis(cfg.llm.describe_delay_ms),
    }
}

pub(crate) async fn run(cli: Cli, cfg: PagemarkConfig) -> Result<()> {
    match cli.command {
        Commands::Analyze {
            url,
            html,
            title,
            out,
        } => {
            let describer = build_describer(&cfg.llm).await?;
            let options = pipeline_options(&cfg);
            let url = url.as_deref().map(domain_to_url).transpose()?;

            let summary = match (&html, &url) {
                (Some(path), _) => {
                    analyze_file(path, title.as_deref(), describer.as_ref(), &options).await?
                }
                (None, Some(url)) => {
                    let capturer = WebDriverCapturer::new(cfg.browser.clone());
                    summarize_url(url, &capturer, describer.as_ref(), &options)
                        .await?
                        .summary
                }
                (None, None) => bail!("either a URL or --html is required"),
            };

            println!("{}", serde_json::to_string_pretty(&summary)?);

            if let Some(dir) = out.or_else(|| cfg.store.output_dir.clone()) {
                match &url {
                    Some(url) => {
                        let path = write_summary_file(&dir, url, &summary).await?;
                        eprintln!("saved {}", path.display());
                    }
                    None => warn!("cli.analyze.no_url_for_output_file"),
                }
            }
            Ok(())
        }
        Commands::Drain => {
            let store = SqliteStore::connect(&cfg.store.database_url).await?;
            let describer = build_describer(&cfg.llm).await?;
            let capturer = WebDriverCapturer::new(cfg.browser.clone());
            let report =
                drain_misses(&store, &capturer, describer.as_ref(), &pipeline_options(&cfg)).await?;

            println!("Total domains processed: {}", report.total);
            println!("Successful: {}", report.succeeded);
            println!("Errors: {}", report.failed);
            if report.skipped > 0 {
                println!("Skipped: {}", report.skipped);
            }
            Ok(())
        }
        Commands::Lookup { domain } => {
            let store = SqliteStore::connect(&cfg.store.database_url).await?;
            let domain = domain.trim();
            match store.latest_summary(domain).await? {
                Some(stored) => {
                    info!(domain, id = stored.id, source = %stored.source, "cli.lookup.hit");
                    println!("{}", serde_json::to_string_pretty(&stored.summary)?);
                }
                None => {
                    store.record_miss(domain).await?;
                    info!(domain, "cli.lookup.miss");
                    eprintln!("no summary stored for {domain}; queued for the next drain");
                }
            }
            Ok(())
        }
    }
}

/// Summarise a saved HTML file. The title defaults to the file stem.
pub(crate) async fn analyze_file(
    path: &Path,
    title: Option<&str>,
    describer: &dyn ElementDescriber,
    options: &PipelineOptions,
) -> Result<PageSummary> {
    let html = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let title = match title {
        Some(t) => t.to_string(),
        None => path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default(),
    };
    Ok(summarize_html(&html, &title, describer, options).await)
}
