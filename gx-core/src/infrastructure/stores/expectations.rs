// gx-core/src/infrastructure/stores/expectations.rs

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};
use walkdir::WalkDir;

use crate::domain::error::DomainError;
use crate::domain::expectations::ExpectationSuite;
use crate::error::GxError;
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::atomic_write;

#[derive(Debug, Clone)]
pub struct ExpectationsStore {
    dir: PathBuf,
}

impl ExpectationsStore {
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_of(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.json", name))
    }

    /// Suite names, sorted.
    pub fn list_suite_names(&self) -> Result<Vec<String>, GxError> {
        if !self.dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in WalkDir::new(&self.dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| InfrastructureError::Io(e.into()))?;
            let path = entry.path();
            if entry.file_type().is_file() && path.extension().is_some_and(|e| e == "json") {
                if let Some(stem) = path.file_stem() {
                    names.push(stem.to_string_lossy().to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    pub fn exists(&self, name: &str) -> bool {
        self.path_of(name).is_file()
    }

    #[instrument(skip(self))]
    pub fn get(&self, name: &str) -> Result<ExpectationSuite, GxError> {
        let path = self.path_of(name);
        if !path.is_file() {
            return Err(DomainError::SuiteNotFound(name.to_string()).into());
        }
        let content = fs::read_to_string(&path)?;
        let suite = serde_json::from_str(&content).map_err(InfrastructureError::from)?;
        Ok(suite)
    }

    #[instrument(skip(self, suite), fields(suite = %suite.name()))]
    pub fn save(&self, suite: &ExpectationSuite) -> Result<PathBuf, GxError> {
        let path = self.path_of(suite.name());
        let json = serde_json::to_string_pretty(suite).map_err(InfrastructureError::from)?;
        atomic_write(&path, json)?;
        debug!(path = ?path, expectations = suite.expectations.len(), "Suite saved");
        Ok(path)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::expectations::Expectation;
    use anyhow::Result;
    use tempfile::tempdir;

    #[test]
    fn test_save_list_get() -> Result<()> {
        let dir = tempdir()?;
        let store = ExpectationsStore::new(&dir.path().join("expectations"));
        assert!(store.list_suite_names()?.is_empty());

        let mut suite = ExpectationSuite::new("main.titanic.warning");
        suite
            .expectations
            .push(Expectation::ExpectTableRowCountToBeBetween {
                min_value: 1,
                max_value: 2,
            });
        store.save(&suite)?;
        store.save(&ExpectationSuite::new("alpha"))?;

        assert_eq!(
            store.list_suite_names()?,
            vec!["alpha".to_string(), "main.titanic.warning".to_string()]
        );
        assert!(store.exists("alpha"));
        assert_eq!(store.get("main.titanic.warning")?, suite);
        Ok(())
    }

    #[test]
    fn test_missing_suite() -> Result<()> {
        let dir = tempdir()?;
        let store = ExpectationsStore::new(dir.path());
        let err = store.get("nope").unwrap_err();
        assert!(matches!(err, GxError::Domain(DomainError::SuiteNotFound(_))));
        Ok(())
    }
}
