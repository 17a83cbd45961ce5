use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{BriefingError, Result};

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 16_0 like Mac OS X) \
     AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.0 Mobile/15E148 Safari/604.1";

/// Root configuration, loaded from `~/.config/briefing/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BriefingConfig {
    pub output: OutputConfig,
    pub news: NewsConfig,
    pub limit_up: LimitUpConfig,
    pub http: HttpConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: PathBuf,
    pub sectors_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsConfig {
    pub max_headlines_per_category: usize,
    pub feed_url: String,
    pub hl: String,
    pub gl: String,
    pub ceid: String,
    pub categories: Vec<NewsCategory>,
}

/// One output key in the `news` section and the feed query behind it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsCategory {
    pub key: String,
    pub query: String,
}

impl NewsCategory {
    pub fn new(key: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            query: query.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitUpConfig {
    pub queries: Vec<String>,
    pub items_per_query: usize,
    pub max_picks: usize,
    /// Fetch the article page when a title yields no names.
    pub article_fallback: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub user_agent: String,
    pub accept_language: String,
    pub timeout_secs: u64,
    pub min_interval_ms: u64,
    pub max_retries: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

// ─── Defaults ──────────────────────────────────────────────

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("briefing.json"),
            sectors_path: PathBuf::from("data").join("sectors.json"),
        }
    }
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            max_headlines_per_category: 5,
            feed_url: "https://news.google.com/rss/search".to_string(),
            hl: "ko".to_string(),
            gl: "KR".to_string(),
            ceid: "KR:ko".to_string(),
            categories: vec![
                NewsCategory::new("economy", "경제"),
                NewsCategory::new("politics", "정치"),
                NewsCategory::new("entertainment", "연예"),
                NewsCategory::new("market", "증시 OR 코스피 OR 코스닥"),
            ],
        }
    }
}

impl Default for LimitUpConfig {
    fn default() -> Self {
        Self {
            queries: vec![
                "상한가 종목".to_string(),
                "특징주 상한가".to_string(),
                "코스닥 상한가".to_string(),
                "코스피 상한가".to_string(),
            ],
            items_per_query: 8,
            max_picks: 10,
            article_fallback: true,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_language: "ko-KR,ko;q=0.9".to_string(),
            timeout_secs: 8,
            min_interval_ms: 400,
            max_retries: 1,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

// ─── Load / Save ───────────────────────────────────────────

impl BriefingConfig {
    /// Standard config file path: `~/.config/briefing/config.toml`
    pub fn config_path() -> PathBuf {
        // Allow override via env var
        if let Ok(path) = std::env::var("BRIEFING_CONFIG") {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("briefing")
            .join("config.toml")
    }

    /// Load config from disk, falling back to defaults if file doesn't exist.
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        Self::load_from(&path)
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    fn validate(&self) -> Result<()> {
        if self.news.feed_url.trim().is_empty() {
            return Err(BriefingError::Config("news.feed_url is empty".to_string()));
        }
        if let Some(dup) = first_duplicate(self.news.categories.iter().map(|c| c.key.as_str())) {
            return Err(BriefingError::Config(format!(
                "duplicate news category key: {dup}"
            )));
        }
        Ok(())
    }
}

fn first_duplicate<'a>(keys: impl Iterator<Item = &'a str>) -> Option<&'a str> {
    let mut seen = Vec::new();
    for key in keys {
        if seen.contains(&key) {
            return Some(key);
        }
        seen.push(key);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let cfg = BriefingConfig::default();
        assert_eq!(cfg.news.max_headlines_per_category, 5);
        assert_eq!(cfg.news.categories.len(), 4);
        assert_eq!(cfg.news.categories[0].key, "economy");
        assert_eq!(cfg.limit_up.max_picks, 10);
        assert_eq!(cfg.output.path, PathBuf::from("briefing.json"));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_config_toml_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let mut cfg = BriefingConfig::default();
        cfg.limit_up.max_picks = 3;
        cfg.save_to(&path).unwrap();

        let loaded = BriefingConfig::load_from(&path).unwrap();
        assert_eq!(loaded.limit_up.max_picks, 3);
        assert_eq!(loaded.news.categories, cfg.news.categories);
        assert_eq!(loaded.http.user_agent, cfg.http.user_agent);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[http]\ntimeout_secs = 3\n").unwrap();

        let cfg = BriefingConfig::load_from(&path).unwrap();
        assert_eq!(cfg.http.timeout_secs, 3);
        assert_eq!(cfg.http.min_interval_ms, 400);
        assert_eq!(cfg.limit_up.queries.len(), 4);
    }

    #[test]
    fn test_load_nonexistent_returns_default() {
        let cfg =
            BriefingConfig::load_from(Path::new("/tmp/nonexistent_briefing_config.toml")).unwrap();
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn test_duplicate_category_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[news]
categories = [
  { key = "economy", query = "경제" },
  { key = "economy", query = "금리" },
]
"#,
        )
        .unwrap();

        let err = BriefingConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, BriefingError::Config(_)));
    }
}
