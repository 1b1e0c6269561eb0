use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::github::transport::DEFAULT_ENDPOINT;
use crate::model::AccountType;

const CONFIG_FILE: &str = ".pr-summary.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level configuration loaded from .pr-summary.toml.
/// All fields are optional; the account and token may also come from the
/// command line and the environment.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// GitHub-specific settings
    #[serde(default)]
    pub github: GitHubConfig,

    /// Local snapshot cache settings
    #[serde(default)]
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GitHubConfig {
    /// GitHub API token. If None, falls back to GITHUB_TOKEN env var.
    pub token: Option<String>,
    /// Default account login when none is given on the command line.
    pub account: Option<String>,
    /// Default account type when none is given on the command line.
    pub account_type: Option<AccountType>,
    /// GraphQL endpoint, for GitHub Enterprise installs.
    pub endpoint: Option<String>,
    /// Stop with an error after this many pages of a single collection.
    pub max_pages: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheConfig {
    pub dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from .pr-summary.toml in the current directory.
    /// Returns default config if the file doesn't exist.
    pub fn load() -> Result<Config, ConfigError> {
        let path = Path::new(CONFIG_FILE);
        let mut config = if path.exists() {
            Self::load_from(path)?
        } else {
            Config::default()
        };

        if config.github.token.is_none() {
            if let Ok(token) = std::env::var("GITHUB_TOKEN") {
                config.github.token = Some(token);
            }
        }

        Ok(config)
    }

    /// Load from a specific path (useful for testing).
    pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Resolve the GitHub token: config file value takes precedence,
    /// falls back to GITHUB_TOKEN env var.
    pub fn github_token(&self) -> Option<String> {
        self.github
            .token
            .clone()
            .or_else(|| std::env::var("GITHUB_TOKEN").ok())
    }

    pub fn endpoint(&self) -> &str {
        self.github.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }

    /// Cache directory: configured value, else the platform cache dir.
    pub fn cache_dir(&self) -> PathBuf {
        self.cache.dir.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .map(|dir| dir.join("pr-summary"))
                .unwrap_or_else(|| PathBuf::from(".pr-summary-cache"))
        })
    }
}
