// gx-core/src/infrastructure/stores/validations.rs

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};
use walkdir::WalkDir;

use crate::domain::validation::{RunId, SuiteValidationResult, ValidationKey};
use crate::error::GxError;
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::atomic_write;

/// `<dir>/<suite>/<run_id>/<fingerprint>.json`
#[derive(Debug, Clone)]
pub struct ValidationsStore {
    dir: PathBuf,
}

impl ValidationsStore {
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
        }
    }

    #[instrument(skip(self, result), fields(suite = %result.meta.expectation_suite_name))]
    pub fn save(&self, result: &SuiteValidationResult) -> Result<ValidationKey, GxError> {
        let key = result.key();
        let path = self.dir.join(key.relative_path("json"));
        let json = serde_json::to_string_pretty(result).map_err(InfrastructureError::from)?;
        atomic_write(&path, json)?;
        debug!(path = ?path, success = result.success, "Validation result stored");
        Ok(key)
    }

    pub fn get(&self, key: &ValidationKey) -> Result<SuiteValidationResult, GxError> {
        let content = fs::read_to_string(self.dir.join(key.relative_path("json")))?;
        let result = serde_json::from_str(&content).map_err(InfrastructureError::from)?;
        Ok(result)
    }

    /// Every stored result, sorted by suite then run id.
    pub fn list_keys(&self) -> Result<Vec<ValidationKey>, GxError> {
        if !self.dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut keys = Vec::new();
        for entry in WalkDir::new(&self.dir).min_depth(3).max_depth(3) {
            let entry = entry.map_err(|e| InfrastructureError::Io(e.into()))?;
            let path = entry.path();
            if !entry.file_type().is_file() || path.extension().is_none_or(|e| e != "json") {
                continue;
            }
            let Ok(relative) = path.strip_prefix(&self.dir) else {
                continue;
            };
            let parts: Vec<String> = relative
                .iter()
                .map(|p| p.to_string_lossy().to_string())
                .collect();
            if let [suite, run_id, file] = parts.as_slice() {
                keys.push(ValidationKey {
                    suite: suite.clone(),
                    run_id: RunId::from(run_id.as_str()),
                    fingerprint: file.trim_end_matches(".json").to_string(),
                });
            }
        }
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::batch::BatchKwargs;
    use crate::domain::validation::ValidationMeta;
    use anyhow::Result;
    use tempfile::tempdir;

    fn result(run: &str) -> SuiteValidationResult {
        let batch = BatchKwargs::table("titanic", Some("main"), "titanic");
        SuiteValidationResult::new(
            Vec::new(),
            ValidationMeta {
                expectation_suite_name: "warning".into(),
                run_id: RunId::from(run),
                batch_fingerprint: batch.fingerprint(),
                batch_kwargs: batch,
                validation_time: run.into(),
                version: "test".into(),
            },
        )
    }

    #[test]
    fn test_save_and_list() -> Result<()> {
        let dir = tempdir()?;
        let store = ValidationsStore::new(dir.path());
        assert!(store.list_keys()?.is_empty());

        let second = store.save(&result("20200102T000000.000000Z"))?;
        let first = store.save(&result("20200101T000000.000000Z"))?;

        let keys = store.list_keys()?;
        assert_eq!(keys, vec![first.clone(), second]);
        assert_eq!(store.get(&first)?, result("20200101T000000.000000Z"));
        Ok(())
    }
}
