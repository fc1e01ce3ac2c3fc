use pagemark_config::{LlmProvider, PagemarkConfigLoader};
use serial_test::serial;
use std::{fs, path::PathBuf};
use tempfile::TempDir;

/// Helper to write a YAML file in a temp dir and return its path.
fn write_yaml(tmp: &TempDir, name: &str, yaml: &str) -> PathBuf {
    let p = tmp.path().join(name);
    fs::write(&p, yaml).expect("write yaml");
    p
}

#[test]
#[serial]
fn loads_full_file_with_env_placeholders() {
    let tmp = TempDir::new().unwrap();
    let file_yaml = r#"
version: "1"
scan:
  per_pattern_limit: 4
  max_ranked_elements: 8
browser:
  webdriver_url: "http://chromedriver:9515"
  headless: false
  page_load_timeout_secs: 45
llm:
  provider: gemini
  api_key: "${PAGEMARK_TEST_GEMINI_KEY}"
  temperature: 0.2
  describe_delay_ms: 250
store:
  database_url: "sqlite://${PAGEMARK_TEST_DB_DIR}/pagemark.db"
  output_dir: "./out"
"#;
    let p = write_yaml(&tmp, "pagemark.yaml", file_yaml);

    temp_env::with_vars(
        [
            ("PAGEMARK_TEST_GEMINI_KEY", Some("secret")),
            ("PAGEMARK_TEST_DB_DIR", Some("/data")),
        ],
        || {
            let config = PagemarkConfigLoader::new()
                .with_file(&p)
                .load()
                .expect("load config");

            assert_eq!(config.scan.per_pattern_limit, 4);
            assert_eq!(config.scan.max_ranked_elements, 8);
            assert_eq!(config.browser.webdriver_url, "http://chromedriver:9515");
            assert!(!config.browser.headless);
            assert_eq!(config.browser.page_load_timeout_secs, 45);
            assert_eq!(config.llm.describe_delay_ms, 250);
            match &config.llm.provider {
                LlmProvider::Gemini {
                    api_key,
                    temperature,
                    max_tokens,
                    ..
                } => {
                    assert_eq!(api_key, "secret");
                    assert_eq!(*temperature, Some(0.2));
                    assert_eq!(*max_tokens, Some(1500));
                }
                other => panic!("expected gemini, got {other:?}"),
            }
            assert_eq!(config.store.database_url, "sqlite:///data/pagemark.db");
            assert_eq!(config.store.output_dir, Some(PathBuf::from("./out")));
        },
    );
}

#[test]
#[serial]
fn missing_optional_file_falls_back_to_defaults() {
    let tmp = TempDir::new().unwrap();
    let config = PagemarkConfigLoader::new()
        .with_optional_file(tmp.path().join("absent.yaml"))
        .load()
        .expect("defaults");
    assert!(matches!(config.llm.provider, LlmProvider::None));
}

#[test]
#[serial]
fn missing_required_file_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let result = PagemarkConfigLoader::new()
        .with_file(tmp.path().join("absent.yaml"))
        .load();
    assert!(result.is_err());
}

#[test]
#[serial]
fn environment_overrides_nested_keys() {
    temp_env::with_vars(
        [
            ("PAGEMARK_BROWSER__HEADLESS", Some("false")),
            ("PAGEMARK_SCAN__PER_PATTERN_LIMIT", Some("2")),
        ],
        || {
            let config = PagemarkConfigLoader::new().load().expect("env only");
            assert!(!config.browser.headless);
            assert_eq!(config.scan.per_pattern_limit, 2);
        },
    );
}
