//! Configuration loading logic

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use super::schema::Config;

const APP_DIR: &str = "agent-dev-helpers";
const LOCAL_CONFIG_FILE: &str = ".agent-dev-helpers.toml";
const IDENTITY_CACHE_FILE: &str = "identity.json";

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Load configuration with fallback
    ///
    /// Load priority:
    /// 1. Local config (.agent-dev-helpers.toml in `repo_root`, when known)
    /// 2. Global config (~/.config/agent-dev-helpers/config.toml)
    /// 3. Default config
    ///
    /// # Errors
    /// Returns an error if a configuration file exists but cannot be read or parsed
    pub fn load(repo_root: Option<&Path>) -> Result<Self> {
        if let Some(root) = repo_root {
            let local_config = Self::local_config_path_from(root);
            if local_config.exists() {
                return Self::from_file(&local_config);
            }
        }

        if let Some(global_config) = Self::global_config_path() {
            if global_config.exists() {
                return Self::from_file(&global_config);
            }
        }

        Ok(Self::default())
    }

    /// Path to the local config file in the given repository root
    #[must_use]
    pub fn local_config_path_from(repo_root: &Path) -> PathBuf {
        repo_root.join(LOCAL_CONFIG_FILE)
    }

    /// Get the global config path
    /// Respects `XDG_CONFIG_HOME` environment variable on all platforms.
    /// Fallback: `$HOME/.config/agent-dev-helpers/config.toml`
    #[must_use]
    pub fn global_config_path() -> Option<PathBuf> {
        let config_home = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .filter(|p| p.is_absolute())
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))?;

        Some(config_home.join(APP_DIR).join("config.toml"))
    }

    /// Location of the identity cache file
    ///
    /// `[identity] cache_file` wins; otherwise `XDG_CACHE_HOME` is respected,
    /// falling back to `$HOME/.cache/agent-dev-helpers/identity.json`.
    #[must_use]
    pub fn identity_cache_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.identity.cache_file {
            return Some(path.clone());
        }

        let cache_home = std::env::var_os("XDG_CACHE_HOME")
            .map(PathBuf::from)
            .filter(|p| p.is_absolute())
            .or_else(|| dirs::home_dir().map(|home| home.join(".cache")))?;

        Some(cache_home.join(APP_DIR).join(IDENTITY_CACHE_FILE))
    }
}
