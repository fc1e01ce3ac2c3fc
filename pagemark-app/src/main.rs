use anyhow::Result;
use clap::Parser;
use pagemark_common::observability::{LogConfig, init_logging};
use pagemark_config::{PagemarkConfig, PagemarkConfigLoader};

use cli::Cli;
mod cli;
mod pipeline;

const DEFAULT_CONFIG_FILE: &str = "pagemark.yaml";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // An explicit --config must exist; the default file is optional.
    let loader = PagemarkConfigLoader::new();
    let loader = match &cli.config {
        Some(path) => loader.with_file(path),
        None => loader.with_optional_file(DEFAULT_CONFIG_FILE),
    };
    let cfg: PagemarkConfig = loader.load()?;

    init_logging(LogConfig {
        emit_stderr: cli.verbose,
        format: cli.log_format,
        ..LogConfig::default()
    })?;

    cli::run(cli, cfg).await
}
