use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub source: SourceConfig,
    #[serde(default)]
    pub matching: MatchingConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
}

/// Where the raw FAQ text comes from. Exactly one of `path`/`url` is set.
#[derive(Debug, Deserialize, Clone)]
pub struct SourceConfig {
    #[serde(default)]
    pub path: Option<PathBuf>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MatchingConfig {
    /// Boosted lexical score at or above which the lexical match is
    /// trusted outright. Historical deployments used 55 (default) or 80
    /// (strict); this is configuration, not a constant.
    #[serde(default = "default_lexical_threshold")]
    pub lexical_threshold: f64,
    /// Maximum distance for a semantic hit to be accepted.
    #[serde(default = "default_semantic_threshold")]
    pub semantic_threshold: f32,
    /// Looser distance bound used only by the combined not-found check.
    #[serde(default = "default_fallback_threshold")]
    pub fallback_threshold: f32,
    /// Looser distance bound for collecting related questions.
    #[serde(default = "default_related_threshold")]
    pub related_threshold: f32,
    /// How many nearest records to retrieve per query.
    #[serde(default = "default_candidate_k")]
    pub candidate_k: usize,
    /// Maximum related questions attached to a semantic hit.
    #[serde(default = "default_related_limit")]
    pub related_limit: usize,
    /// Apply the colloquial request-verb rewrite to live queries.
    #[serde(default = "default_canonicalize_queries")]
    pub canonicalize_queries: bool,
    /// Domain keywords that pull semantic hits closer when shared
    /// between query and candidate.
    #[serde(default = "default_boost_keywords")]
    pub boost_keywords: Vec<String>,
    /// Distance subtracted per shared boost keyword.
    #[serde(default = "default_boost_penalty")]
    pub boost_penalty: f32,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            lexical_threshold: default_lexical_threshold(),
            semantic_threshold: default_semantic_threshold(),
            fallback_threshold: default_fallback_threshold(),
            related_threshold: default_related_threshold(),
            candidate_k: default_candidate_k(),
            related_limit: default_related_limit(),
            canonicalize_queries: default_canonicalize_queries(),
            boost_keywords: default_boost_keywords(),
            boost_penalty: default_boost_penalty(),
        }
    }
}

fn default_lexical_threshold() -> f64 {
    55.0
}
fn default_semantic_threshold() -> f32 {
    1.1
}
fn default_fallback_threshold() -> f32 {
    1.2
}
fn default_related_threshold() -> f32 {
    1.3
}
fn default_candidate_k() -> usize {
    5
}
fn default_related_limit() -> usize {
    3
}
fn default_canonicalize_queries() -> bool {
    true
}
fn default_boost_keywords() -> Vec<String> {
    ["יפוי", "כוח", "הרשאה", "ייצוג", "מייצג", "מעסיק", "מבוטח"]
        .into_iter()
        .map(String::from)
        .collect()
}
fn default_boost_penalty() -> f32 {
    0.15
}

#[derive(Debug, Deserialize, Clone)]
pub struct EmbeddingConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: "disabled".to_string(),
            model: None,
            url: None,
            max_retries: default_max_retries(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_provider() -> String {
    "disabled".to_string()
}
fn default_max_retries() -> u32 {
    5
}
fn default_timeout_secs() -> u64 {
    30
}

impl EmbeddingConfig {
    pub fn is_enabled(&self) -> bool {
        self.provider != "disabled"
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    match (&config.source.path, &config.source.url) {
        (Some(_), Some(_)) => anyhow::bail!("source.path and source.url are mutually exclusive"),
        (None, None) => anyhow::bail!("one of source.path or source.url is required"),
        _ => {}
    }

    let m = &config.matching;
    if m.semantic_threshold <= 0.0 {
        anyhow::bail!("matching.semantic_threshold must be > 0");
    }
    if m.fallback_threshold < m.semantic_threshold {
        anyhow::bail!("matching.fallback_threshold must be >= matching.semantic_threshold");
    }
    if m.candidate_k == 0 {
        anyhow::bail!("matching.candidate_k must be >= 1");
    }
    if m.boost_penalty < 0.0 {
        anyhow::bail!("matching.boost_penalty must be >= 0");
    }

    match config.embedding.provider.as_str() {
        "disabled" | "openai" | "ollama" => {}
        other => anyhow::bail!(
            "Unknown embedding provider: '{}'. Must be disabled, openai, or ollama.",
            other
        ),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_gets_defaults() {
        let config: Config = toml::from_str("[source]\npath = \"faq.txt\"\n").unwrap();
        validate(&config).unwrap();
        assert!((config.matching.lexical_threshold - 55.0).abs() < 1e-9);
        assert!((config.matching.semantic_threshold - 1.1).abs() < 1e-6);
        assert_eq!(config.matching.candidate_k, 5);
        assert_eq!(config.matching.related_limit, 3);
        assert_eq!(config.embedding.provider, "disabled");
        assert!(!config.embedding.is_enabled());
    }

    #[test]
    fn test_strict_threshold_override() {
        let config: Config = toml::from_str(
            "[source]\nurl = \"https://example.com/faq.txt\"\n\n[matching]\nlexical_threshold = 80.0\n",
        )
        .unwrap();
        validate(&config).unwrap();
        assert!((config.matching.lexical_threshold - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_source_required() {
        let config: Config = toml::from_str("[source]\n").unwrap();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_source_exclusive() {
        let config: Config =
            toml::from_str("[source]\npath = \"faq.txt\"\nurl = \"https://x\"\n").unwrap();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_unknown_provider_rejected() {
        let config: Config = toml::from_str(
            "[source]\npath = \"faq.txt\"\n\n[embedding]\nprovider = \"faiss\"\n",
        )
        .unwrap();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_threshold_ordering_enforced() {
        let config: Config = toml::from_str(
            "[source]\npath = \"faq.txt\"\n\n[matching]\nsemantic_threshold = 1.3\nfallback_threshold = 1.1\n",
        )
        .unwrap();
        assert!(validate(&config).is_err());
    }
}
