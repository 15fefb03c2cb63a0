//! Identity cache
//!
//! The GitHub username used as branch prefix is looked up once through `gh`
//! and then kept in a small JSON object on disk. A missing or corrupt record
//! only costs a fresh lookup.

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

use crate::color::Reporter;
use crate::error::BranchError;
use crate::integrations::gh::GhClient;

/// Key holding the cached username
pub const USERNAME_KEY: &str = "github_username";

/// Persistent JSON object with explicit read, write and merge steps
pub trait KeyValueStore {
    /// Read the whole record
    ///
    /// # Errors
    /// Returns an error if the record exists but cannot be read or parsed
    fn read(&self) -> Result<Map<String, Value>>;

    /// Replace the whole record
    ///
    /// # Errors
    /// Returns an error if the record cannot be written
    fn write(&self, entries: &Map<String, Value>) -> Result<()>;

    /// Set one key and keep every other key already present
    ///
    /// An unreadable existing record is treated as empty.
    ///
    /// # Errors
    /// Returns an error if the merged record cannot be written
    fn merge(&self, key: &str, value: Value) -> Result<()> {
        let mut entries = self.read().unwrap_or_default();
        entries.insert(key.to_string(), value);
        self.write(&entries)
    }
}

/// `KeyValueStore` backed by a pretty-printed JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueStore for JsonFileStore {
    fn read(&self) -> Result<Map<String, Value>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("Failed to read {}", self.path.display()))
            }
        };

        match serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", self.path.display()))?
        {
            Value::Object(entries) => Ok(entries),
            _ => anyhow::bail!("{} does not contain a JSON object", self.path.display()),
        }
    }

    fn write(&self, entries: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let data = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, format!("{data}\n"))
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }
}

/// Return the GitHub username, preferring the cached value
///
/// A cached non-empty username is returned as is. Otherwise `gh` is asked and
/// the answer is merged into the cache; a failed cache write is only reported.
///
/// # Errors
/// Returns `BranchError::IdentityUnavailable` when there is no cached value and
/// `gh` fails or returns an empty login.
pub fn resolve_identity<S, H>(store: &S, gh: &H, reporter: &Reporter) -> Result<String, BranchError>
where
    S: KeyValueStore,
    H: GhClient,
{
    match store.read() {
        Ok(entries) => {
            let cached = entries
                .get(USERNAME_KEY)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|name| !name.is_empty());
            if let Some(name) = cached {
                reporter.debug(format!("Using cached GitHub username: {name}"));
                return Ok(name.to_string());
            }
            reporter.debug("No cached GitHub username, asking gh");
        }
        Err(err) => reporter.debug(format!("Ignoring unreadable identity cache: {err:#}")),
    }

    let username = gh
        .current_user()
        .map_err(|err| BranchError::IdentityUnavailable(format!("{err:#}")))?;
    let username = username.trim().to_string();
    if username.is_empty() {
        return Err(BranchError::IdentityUnavailable(
            "gh returned an empty username".to_string(),
        ));
    }

    if let Err(err) = store.merge(USERNAME_KEY, Value::String(username.clone())) {
        reporter.warn(format!("Could not save identity cache: {err:#}"));
    }

    Ok(username)
}
