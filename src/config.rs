use crate::persistence::read_optional;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

pub const API_URL_ENV: &str = "MOMENTUM_API_URL";

/// User settings from `config.toml`. Every key is optional.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_url: String,
    pub request_timeout_secs: u64,
    pub motivation_tone: String,
    pub use_emoji: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:5000".to_string(),
            request_timeout_secs: 30,
            motivation_tone: "encouraging".to_string(),
            use_emoji: true,
        }
    }
}

impl Config {
    /// Load from `path`, falling back to defaults when the file is absent
    pub fn load(path: &Path) -> Result<Self> {
        match read_optional(path)? {
            Some(content) => Self::parse(&content)
                .with_context(|| format!("Invalid config file: {}", path.display())),
            None => Ok(Self::default()),
        }
    }

    fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply overrides in increasing precedence: environment, then CLI flag
    pub fn with_overrides(mut self, env_url: Option<String>, cli_url: Option<String>) -> Self {
        if let Some(url) = cli_url.or(env_url).filter(|u| !u.trim().is_empty()) {
            self.api_url = url;
        }
        self.api_url = self.api_url.trim_end_matches('/').to_string();
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "motivation_tone = \"calm\"\nuse_emoji = false\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.motivation_tone, "calm");
        assert!(!config.use_emoji);
        assert_eq!(config.api_url, "http://localhost:5000");
    }

    #[test]
    fn test_bad_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "request_timeout_secs = \"soon\"").unwrap();
        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn test_override_precedence() {
        let env = Some("http://env:1".to_string());
        let cli = Some("http://cli:2/".to_string());

        let config = Config::default().with_overrides(env.clone(), cli);
        assert_eq!(config.api_url, "http://cli:2");

        let config = Config::default().with_overrides(env, None);
        assert_eq!(config.api_url, "http://env:1");

        let config = Config::default().with_overrides(None, Some("  ".to_string()));
        assert_eq!(config.api_url, "http://localhost:5000");
    }
}
