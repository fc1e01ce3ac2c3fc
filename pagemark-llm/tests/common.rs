use std::sync::OnceLock;

use pagemark_common::observability::{LogConfig, LogFormat};

static INIT_PATH: OnceLock<std::path::PathBuf> = OnceLock::new();

pub fn init_test_tracing() {
    let _ = INIT_PATH.get_or_init(|| {
        let format = std::env::var("PAGEMARK_LOG_FORMAT")
            .ok()
            .and_then(|raw| raw.parse::<LogFormat>().ok())
            .unwrap_or_default();

        let config = LogConfig {
            app_name: "pagemark-tests",
            emit_stderr: true,
            format,
            default_filter: "debug",
            ..LogConfig::default()
        };

        pagemark_common::observability::init_logging(config).unwrap_or_default()
    });
}
