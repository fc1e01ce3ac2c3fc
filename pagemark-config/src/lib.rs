//! Loader for pagemark configuration with YAML + environment overlays.
//!
//! Sources are merged in the order they are added to the loader; the
//! `PAGEMARK_` environment overlay (nested keys separated by `__`, e.g.
//! `PAGEMARK_BROWSER__HEADLESS=false`) is registered first and therefore loses
//! to explicit files. After merging, `${VAR}` placeholders anywhere in string
//! values are expanded from the process environment.
//!
//! Every section is optional:
//!
//! ```yaml
//! version: "1"
//! scan:
//!   per_pattern_limit: 5
//!   max_ranked_elements: 10
//! browser:
//!   webdriver_url: "http://localhost:9515"
//!   headless: true
//!   page_load_timeout_secs: 30
//! llm:
//!   provider: gemini
//!   api_key: "${GOOGLE_AI_API_KEY}"
//!   describe_delay_ms: 1000
//! store:
//!   database_url: "sqlite://pagemark.db"
//!   output_dir: "./summaries"
//! ```
use config::{Config, ConfigError, Environment, File};
use pagemark_core::ScanOptions;
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3.2:3b";

#[derive(Debug, Default, Deserialize)]
pub struct PagemarkConfig {
    pub version: Option<String>,
    #[serde(default)]
    pub scan: ScanOptions,
    #[serde(default)]
    pub browser: BrowserSettings,
    #[serde(default)]
    pub llm: LlmSettings,
    #[serde(default)]
    pub store: StoreSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BrowserSettings {
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,
    #[serde(default = "default_true")]
    pub headless: bool,
    #[serde(default = "default_page_load_timeout_secs")]
    pub page_load_timeout_secs: u64,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            webdriver_url: default_webdriver_url(),
            headless: true,
            page_load_timeout_secs: default_page_load_timeout_secs(),
        }
    }
}

/// Description provider plus the pacing applied between calls.
#[derive(Debug, Clone, Deserialize)]
pub struct LlmSettings {
    #[serde(default = "default_describe_delay_ms")]
    pub describe_delay_ms: u64,
    #[serde(flatten)]
    pub provider: LlmProvider,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            describe_delay_ms: default_describe_delay_ms(),
            provider: LlmProvider::None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "provider", rename_all = "lowercase")]
pub enum LlmProvider {
    Gemini {
        api_key: String,
        #[serde(default = "default_gemini_model")]
        model: String,
        #[serde(default = "default_temperature")]
        temperature: Option<f32>,
        #[serde(default = "default_max_tokens")]
        max_tokens: Option<u32>,
    },
    Ollama {
        #[serde(default = "default_ollama_model")]
        model: String,
        #[serde(default = "default_ollama_endpoint")]
        endpoint: String,
        #[serde(default = "default_temperature")]
        temperature: Option<f32>,
        #[serde(default = "default_max_tokens")]
        max_tokens: Option<u32>,
    },
    /// No model; every element gets the static fallback description.
    None,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreSettings {
    #[serde(default = "default_database_url")]
    pub database_url: String,
    /// When set, each summary is also written to `<domain>_summary.json` here.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            output_dir: None,
        }
    }
}

fn default_true() -> bool {
    true
}
fn default_webdriver_url() -> String {
    "http://localhost:9515".into()
}
fn default_page_load_timeout_secs() -> u64 {
    30
}
fn default_describe_delay_ms() -> u64 {
    1000
}
fn default_gemini_model() -> String {
    DEFAULT_GEMINI_MODEL.into()
}
fn default_ollama_model() -> String {
    DEFAULT_OLLAMA_MODEL.into()
}
fn default_ollama_endpoint() -> String {
    "http://localhost:11434".into()
}
fn default_temperature() -> Option<f32> {
    Some(0.1)
}
fn default_max_tokens() -> Option<u32> {
    Some(1500)
}
fn default_database_url() -> String {
    "sqlite://pagemark.db".into()
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => break,
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hides the `config` crate wiring (YAML + env overrides).
pub struct PagemarkConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for PagemarkConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl PagemarkConfigLoader {
    /// Start from `PAGEMARK_` environment overrides only.
    ///
    /// ```
    /// use pagemark_config::PagemarkConfigLoader;
    ///
    /// let config = PagemarkConfigLoader::new()
    ///     .with_yaml_str("version: '1'")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(config.version.as_deref(), Some("1"));
    /// assert_eq!(config.scan.per_pattern_limit, 5);
    /// assert_eq!(config.scan.max_ranked_elements, 10);
    /// ```
    pub fn new() -> Self {
        let builder = Config::builder().add_source(
            Environment::with_prefix("PAGEMARK")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );
        Self { builder }
    }

    /// Attach a required YAML/TOML/JSON file; the format is inferred by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that is silently skipped when missing.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Merge an inline YAML snippet.
    ///
    /// ```
    /// use pagemark_config::{LlmProvider, PagemarkConfigLoader};
    ///
    /// let cfg = PagemarkConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// llm:
    ///   provider: ollama
    ///   model: "llama3"
    ///   describe_delay_ms: 0
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(cfg.llm.describe_delay_ms, 0);
    /// assert!(matches!(cfg.llm.provider, LlmProvider::Ollama { ref model, .. } if model == "llama3"));
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources into strongly typed config.
    ///
    /// ```
    /// use pagemark_config::{LlmProvider, PagemarkConfigLoader};
    ///
    /// unsafe { std::env::set_var("PAGEMARK_DOC_KEY", "injected-from-env"); }
    ///
    /// let config = PagemarkConfigLoader::new()
    ///     .with_yaml_str(r#"
    /// llm:
    ///   provider: gemini
    ///   api_key: "${PAGEMARK_DOC_KEY}"
    /// "#)
    ///     .load()
    ///     .expect("valid configuration");
    ///
    /// match &config.llm.provider {
    ///     LlmProvider::Gemini { api_key, model, .. } => {
    ///         assert_eq!(api_key, "injected-from-env");
    ///         assert_eq!(model, "gemini-2.5-flash");
    ///     }
    ///     other => panic!("expected Gemini configuration, got {other:?}"),
    /// }
    ///
    /// unsafe { std::env::remove_var("PAGEMARK_DOC_KEY"); }
    /// ```
    pub fn load(self) -> Result<PagemarkConfig, ConfigError> {
        let cfg = self.builder.build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))
    }
}
