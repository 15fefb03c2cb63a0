//! Configuration schema and type definitions

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for agent-dev-helpers
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub git: GitConfig,
    #[serde(default)]
    pub identity: IdentityConfig,
}

/// Git settings used by the branch workflow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitConfig {
    /// Remote used for default-branch lookup, pulling and the duplicate warning
    #[serde(default = "default_remote")]
    pub remote: String,
    /// Local branches tried, in order, when the remote has no default ref
    #[serde(default = "default_primary_candidates")]
    pub primary_candidates: Vec<String>,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            remote: default_remote(),
            primary_candidates: default_primary_candidates(),
        }
    }
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_primary_candidates() -> Vec<String> {
    vec!["main".to_string(), "master".to_string()]
}

/// Identity cache settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct IdentityConfig {
    /// Override for the identity cache file location
    #[serde(default)]
    pub cache_file: Option<PathBuf>,
}
