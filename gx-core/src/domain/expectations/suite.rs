// gx-core/src/domain/expectations/suite.rs

use serde::{Deserialize, Serialize};

use crate::domain::batch::BatchKwargs;
use crate::domain::error::DomainError;
use crate::domain::expectations::Expectation;

pub const GX_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Suffix of the suite name proposed by the wizard.
pub const DEFAULT_SUITE_TAG: &str = "warning";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfilerMeta {
    pub profiler: String,
    pub batch_kwargs: BatchKwargs,
    pub created_at: String,
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuiteMeta {
    #[serde(rename = "great_expectations.__version__", default = "default_version")]
    pub version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profiled_with: Option<ProfilerMeta>,
}

impl Default for SuiteMeta {
    fn default() -> Self {
        Self {
            version: default_version(),
            profiled_with: None,
        }
    }
}

fn default_version() -> String {
    GX_VERSION.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectationSuite {
    pub expectation_suite_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_asset_type: Option<String>,
    #[serde(default)]
    pub expectations: Vec<Expectation>,
    #[serde(default)]
    pub meta: SuiteMeta,
}

impl ExpectationSuite {
    pub fn new(name: &str) -> Self {
        Self {
            expectation_suite_name: name.to_string(),
            data_asset_type: None,
            expectations: Vec::new(),
            meta: SuiteMeta::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.expectation_suite_name
    }

    /// Columns mentioned by at least one column-level rule, in first-seen order.
    pub fn columns(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for column in self.expectations.iter().filter_map(|e| e.column()) {
            if !seen.contains(&column) {
                seen.push(column);
            }
        }
        seen
    }

    /// `<asset>.warning`, e.g. `main.titanic.warning`.
    pub fn default_name_for(asset_name: &str) -> String {
        format!("{}.{}", asset_name, DEFAULT_SUITE_TAG)
    }
}

/// Suite names become file names: letters, digits, `_`, `-` and `.`, not starting with a dot.
pub fn validate_suite_name(name: &str) -> Result<(), DomainError> {
    let valid = !name.is_empty()
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if valid {
        Ok(())
    } else {
        Err(DomainError::InvalidName(name.to_string()))
    }
}
