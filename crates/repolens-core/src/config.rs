use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration from `.repolens.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub corpus: CorpusConfig,
    #[serde(default)]
    pub partition: PartitionConfig,
    #[serde(default)]
    pub strip: StripConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusConfig {
    /// Optional newline-delimited URL list; each repository keys by the
    /// URL's last path segment.
    #[serde(default)]
    pub url_manifest: Option<String>,
    /// Path substrings that exclude a file from analysis.
    #[serde(default = "default_exclude_patterns")]
    pub exclude_patterns: Vec<String>,
}

fn default_exclude_patterns() -> Vec<String> {
    vec![
        ".git/".to_string(),
        "__pycache__/".to_string(),
        ".venv/".to_string(),
        ".tox/".to_string(),
    ]
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            url_manifest: None,
            exclude_patterns: default_exclude_patterns(),
        }
    }
}

/// Partition granularity. Partitions are contiguous slices of a repository's
/// non-blank line stream; their size does not change the merged totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartitionConfig {
    #[serde(default = "default_max_lines")]
    pub max_lines: usize,
}

fn default_max_lines() -> usize {
    5000
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self {
            max_lines: default_max_lines(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StripConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

fn default_output_dir() -> String {
    "preprocessed".to_string()
}

impl Default for StripConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

impl Config {
    /// Load configuration from a `.repolens.toml` file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{}'", path.display()))?;
        let config: Config = toml::from_str(&content).with_context(|| {
            format!(
                "failed to parse '{}'. Run `repolens init` to create a valid config file",
                path.display()
            )
        })?;
        Ok(config)
    }

    /// Load from `.repolens.toml` in the given directory or any ancestor, or
    /// return defaults.
    pub fn load_or_default(dir: &Path) -> Self {
        let start = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
        let mut current = start.as_path();
        loop {
            let config_path = current.join(".repolens.toml");
            if config_path.exists() {
                return match Self::load(&config_path) {
                    Ok(config) => config,
                    Err(e) => {
                        eprintln!(
                            "Warning: failed to load config from '{}': {e:#}. Using defaults.",
                            config_path.display()
                        );
                        Self::default()
                    }
                };
            }
            match current.parent() {
                Some(parent) => current = parent,
                None => break,
            }
        }
        Self::default()
    }

    /// Generate default TOML content for `repolens init`.
    pub fn default_toml() -> String {
        r#"# repolens - Corpus Metrics Configuration
# See https://github.com/rebelopsio/repolens for documentation

[corpus]
# Optional newline-delimited list of repository URLs; a repository directory
# is matched by the URL's last path segment.
# url_manifest = "url_list.csv"

# Path substrings that exclude a file from analysis
exclude_patterns = [".git/", "__pycache__/", ".venv/", ".tox/"]

[partition]
# Maximum non-blank lines per partition. Duplication is estimated inside
# each partition, so smaller partitions trade accuracy for parallelism.
max_lines = 5000

[strip]
# Where `repolens strip` writes the comment-free artifacts
output_dir = "preprocessed"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.corpus.url_manifest.is_none());
        assert_eq!(config.partition.max_lines, 5000);
        assert_eq!(config.strip.output_dir, "preprocessed");
        assert!(config
            .corpus
            .exclude_patterns
            .contains(&"__pycache__/".to_string()));
    }

    #[test]
    fn test_deserialize_config() {
        let toml_str = r#"
[corpus]
url_manifest = "urls.csv"
exclude_patterns = ["vendor/"]

[partition]
max_lines = 128

[strip]
output_dir = "out"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.corpus.url_manifest.as_deref(), Some("urls.csv"));
        assert_eq!(config.corpus.exclude_patterns, vec!["vendor/"]);
        assert_eq!(config.partition.max_lines, 128);
        assert_eq!(config.strip.output_dir, "out");
    }

    #[test]
    fn test_default_toml_is_valid() {
        let toml_str = Config::default_toml();
        let config: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.partition.max_lines, 5000);
    }

    #[test]
    fn test_partial_config_backward_compatible() {
        let toml_str = r#"
[partition]
max_lines = 64
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.partition.max_lines, 64);
        assert_eq!(config.strip.output_dir, "preprocessed");
    }
}
