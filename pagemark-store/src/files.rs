use std::path::{Path, PathBuf};

use pagemark_core::PageSummary;
use tracing::info;
use url::Url;

use crate::Result;

/// `https://www.example.co.uk/x` → `example_co_uk_summary.json`.
pub fn url_to_filename(url: &Url) -> String {
    let mut host = url.host_str().unwrap_or("page").replace("www.", "");
    if let Some(port) = url.port() {
        host = format!("{host}_{port}");
    }
    format!("{}_summary.json", host.replace('.', "_"))
}

/// Write `summary` as pretty JSON into `dir`, returning the file path.
pub async fn write_summary_file(dir: &Path, url: &Url, summary: &PageSummary) -> Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(url_to_filename(url));
    let body = serde_json::to_string_pretty(summary)?;
    tokio::fs::write(&path, body).await?;
    info!(path = %path.display(), "store.summary_file.written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(raw: &str) -> Url {
        Url::parse(raw).unwrap()
    }

    #[test]
    fn filename_strips_www_and_dots() {
        assert_eq!(url_to_filename(&url("https://www.example.com/a?b")), "example_com_summary.json");
        assert_eq!(url_to_filename(&url("https://docs.rs")), "docs_rs_summary.json");
    }

    #[test]
    fn filename_keeps_port_without_colon() {
        assert_eq!(url_to_filename(&url("http://localhost:8080/")), "localhost_8080_summary.json");
    }

    #[tokio::test]
    async fn writes_pretty_json() {
        let tmp = tempfile::tempdir().unwrap();
        let mut summary = PageSummary::default();
        summary.push("entire_page_body".into(), "Body.".into(), "body".into());

        let path = write_summary_file(&tmp.path().join("nested"), &url("https://example.com"), &summary)
            .await
            .unwrap();

        assert!(path.ends_with("example_com_summary.json"));
        let raw = std::fs::read_to_string(&path).unwrap();
        let back: PageSummary = serde_json::from_str(&raw).unwrap();
        assert_eq!(back, summary);
        assert!(raw.contains("\n  \"major_elements\""));
    }
}
