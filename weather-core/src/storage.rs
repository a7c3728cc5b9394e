use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fmt::Debug, fs, path::PathBuf};

/// Durable home of the last-entered query.
pub trait QueryStore: Send + Sync + Debug {
    /// The stored query, or an empty string when nothing was stored yet.
    fn load(&self) -> Result<String>;

    fn save(&self, query: &str) -> Result<()>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredState {
    #[serde(default)]
    location: String,
}

/// Keeps the query in a small TOML file: `location = "..."`.
#[derive(Debug, Clone)]
pub struct FileQueryStore {
    path: PathBuf,
}

impl FileQueryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl QueryStore for FileQueryStore {
    fn load(&self) -> Result<String> {
        if !self.path.exists() {
            return Ok(String::new());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read state file: {}", self.path.display()))?;

        let state: StoredState = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse state file: {}", self.path.display()))?;

        Ok(state.location)
    }

    fn save(&self, query: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create state directory: {}", parent.display())
            })?;
        }

        let state = StoredState { location: query.to_string() };
        let toml = toml::to_string(&state).context("Failed to serialize state to TOML")?;

        fs::write(&self.path, toml)
            .with_context(|| format!("Failed to write state file: {}", self.path.display()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> FileQueryStore {
        FileQueryStore::new(dir.path().join("nested").join("state.toml"))
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(store_in(&dir).load().unwrap(), "");
    }

    #[test]
    fn saved_query_survives_reload() {
        let dir = tempfile::tempdir().unwrap();

        for value in ["Berlin", "", "B", "São Paulo", "quote \" and \\ slash", "  padded  "] {
            store_in(&dir).save(value).unwrap();
            assert_eq!(store_in(&dir).load().unwrap(), value);
        }
    }

    #[test]
    fn file_without_key_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "").unwrap();

        assert_eq!(store.load().unwrap(), "");
    }

    #[test]
    fn corrupt_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "location = [").unwrap();

        let err = store.load().unwrap_err();
        assert!(err.to_string().contains("Failed to parse state file"));
    }
}
