//! FAQ source provider.
//!
//! The engine only needs a single UTF-8 string in the documented block
//! grammar; where it comes from is configuration. A missing source is a
//! fatal startup error — without the FAQ text there is nothing to answer
//! from.

use anyhow::{Context, Result};

use crate::config::SourceConfig;

/// Fetch the raw FAQ text from the configured file path or URL.
pub async fn fetch_source(config: &SourceConfig) -> Result<String> {
    if let Some(path) = &config.path {
        return std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read FAQ source file: {}", path.display()));
    }

    if let Some(url) = &config.url {
        let response = reqwest::get(url)
            .await
            .with_context(|| format!("Failed to fetch FAQ source from {url}"))?;
        let response = response
            .error_for_status()
            .with_context(|| format!("FAQ source fetch returned an error status for {url}"))?;
        return response
            .text()
            .await
            .context("Failed to read FAQ source response body");
    }

    anyhow::bail!("No FAQ source configured: set source.path or source.url")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_reads_file_source() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "שאלה: ש\nתשובה: ת\n").unwrap();

        let config = SourceConfig {
            path: Some(file.path().to_path_buf()),
            url: None,
        };
        let text = fetch_source(&config).await.unwrap();
        assert!(text.contains("שאלה: ש"));
    }

    #[tokio::test]
    async fn test_missing_file_is_an_error() {
        let config = SourceConfig {
            path: Some("/nonexistent/faq.txt".into()),
            url: None,
        };
        assert!(fetch_source(&config).await.is_err());
    }

    #[tokio::test]
    async fn test_unconfigured_source_is_an_error() {
        let config = SourceConfig {
            path: None,
            url: None,
        };
        assert!(fetch_source(&config).await.is_err());
    }
}
