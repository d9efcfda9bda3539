//! Grading defaults and their loader.
//!
//! Rubric fields left unset by the question bank fall back to the values
//! here instead of being coalesced inline by each grader.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Fallback values applied when a rubric leaves a field unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradingConfig {
    /// Word count that earns full length credit.
    #[serde(default = "default_min_words")]
    pub default_min_words: u32,
    /// Shortest spoken answer that earns full duration credit, in ms.
    #[serde(default = "default_min_duration_ms")]
    pub default_min_duration_ms: u64,
    /// Longest spoken answer before the over-length penalty, in ms.
    #[serde(default = "default_max_duration_ms")]
    pub default_max_duration_ms: u64,
}

fn default_min_words() -> u32 {
    30
}
fn default_min_duration_ms() -> u64 {
    30_000
}
fn default_max_duration_ms() -> u64 {
    120_000
}

impl Default for GradingConfig {
    fn default() -> Self {
        Self {
            default_min_words: default_min_words(),
            default_min_duration_ms: default_min_duration_ms(),
            default_max_duration_ms: default_max_duration_ms(),
        }
    }
}

impl GradingConfig {
    /// Effective minimum word count. Zero is treated as unset.
    pub fn min_words(&self, configured: Option<u32>) -> u32 {
        match configured {
            Some(0) => {
                tracing::warn!(
                    "rubric min_words is 0, using default of {}",
                    self.default_min_words
                );
                self.default_min_words.max(1)
            }
            Some(n) => n,
            None => self.default_min_words.max(1),
        }
    }

    /// Effective duration window in ms. Zero bounds are treated as unset.
    pub fn duration_window(&self, min: Option<u64>, max: Option<u64>) -> (u64, u64) {
        let min = min
            .filter(|&m| m > 0)
            .unwrap_or(self.default_min_duration_ms)
            .max(1);
        let max = max
            .filter(|&m| m > 0)
            .unwrap_or(self.default_max_duration_ms);
        (min, max)
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `lingograde.toml` in the current directory
/// 2. `~/.config/lingograde/config.toml`
///
/// Environment variable override: `LINGOGRADE_MIN_WORDS`.
pub fn load_config() -> Result<GradingConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<GradingConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("lingograde.toml");
        if local.exists() {
            Some(local)
        } else if let Some(home) = dirs_path() {
            let global = home.join("config.toml");
            if global.exists() {
                Some(global)
            } else {
                None
            }
        } else {
            None
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config_str(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => GradingConfig::default(),
    };

    if let Ok(value) = std::env::var("LINGOGRADE_MIN_WORDS") {
        config.default_min_words = value
            .trim()
            .parse()
            .with_context(|| format!("invalid LINGOGRADE_MIN_WORDS: '{value}'"))?;
    }

    anyhow::ensure!(
        config.default_min_words > 0,
        "default_min_words must be at least 1"
    );

    Ok(config)
}

/// Parse a TOML config string.
pub fn parse_config_str(content: &str) -> Result<GradingConfig> {
    let config: GradingConfig = toml::from_str(content)?;
    anyhow::ensure!(
        config.default_min_duration_ms <= config.default_max_duration_ms,
        "default_min_duration_ms ({}) exceeds default_max_duration_ms ({})",
        config.default_min_duration_ms,
        config.default_max_duration_ms
    );
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("lingograde"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = GradingConfig::default();
        assert_eq!(config.default_min_words, 30);
        assert_eq!(config.default_min_duration_ms, 30_000);
        assert_eq!(config.default_max_duration_ms, 120_000);
    }

    #[test]
    fn parse_partial_config() {
        let config = parse_config_str("default_min_words = 50\n").unwrap();
        assert_eq!(config.default_min_words, 50);
        assert_eq!(config.default_max_duration_ms, 120_000);
    }

    #[test]
    fn reject_inverted_duration_window() {
        let toml = "default_min_duration_ms = 90000\ndefault_max_duration_ms = 60000\n";
        assert!(parse_config_str(toml).is_err());
    }

    #[test]
    fn min_words_fallbacks() {
        let config = GradingConfig::default();
        assert_eq!(config.min_words(None), 30);
        assert_eq!(config.min_words(Some(0)), 30);
        assert_eq!(config.min_words(Some(50)), 50);
    }

    #[test]
    fn duration_window_fallbacks() {
        let config = GradingConfig::default();
        assert_eq!(config.duration_window(None, None), (30_000, 120_000));
        assert_eq!(config.duration_window(Some(60_000), Some(0)), (60_000, 120_000));
        assert_eq!(
            config.duration_window(Some(60_000), Some(180_000)),
            (60_000, 180_000)
        );
    }

    #[test]
    fn explicit_missing_path_is_an_error() {
        let err = load_config_from(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lingograde.toml");
        std::fs::write(&path, "default_min_duration_ms = 45000\n").unwrap();
        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.default_min_duration_ms, 45_000);
    }
}
