// gx-core/src/domain/project/configuration.rs
//
// Schema of great_expectations.yml (the subset gx reads and writes).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::error::DomainError;

pub const DEFAULT_SITE_NAME: &str = "local_site";
pub const EXPECTATIONS_STORE: &str = "expectations_store";
pub const VALIDATIONS_STORE: &str = "validations_store";
pub const EVALUATION_PARAMETER_STORE: &str = "evaluation_parameter_store";

const FILESYSTEM_BACKEND: &str = "TupleFilesystemStoreBackend";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ClassRef {
    pub class_name: String,

    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl ClassRef {
    pub fn new(class_name: &str) -> Self {
        Self {
            class_name: class_name.to_string(),
            extra: BTreeMap::new(),
        }
    }
}

/// Which engine family a datasource belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasourceKind {
    Sql,
    Files,
}

impl DatasourceKind {
    pub const SQL_CLASS: &'static str = "SqlAlchemyDatasource";
    pub const SQL_ASSET_CLASS: &'static str = "SqlAlchemyDataset";
    pub const FILES_CLASS: &'static str = "FilesystemDatasource";
    pub const FILES_ASSET_CLASS: &'static str = "FileDataset";

    pub fn asset_class(&self) -> &'static str {
        match self {
            Self::Sql => Self::SQL_ASSET_CLASS,
            Self::Files => Self::FILES_ASSET_CLASS,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct DatasourceConfig {
    pub class_name: String,
    pub data_asset_type: ClassRef,

    /// Either a `${variable}` reference into config_variables.yml or an inline mapping.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<serde_yaml::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_directory: Option<String>,

    /// Keys such as `module_name` or `batch_kwargs_generators` are carried through untouched.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl DatasourceConfig {
    /// SQL datasource whose credentials live under `credentials_key` in config_variables.yml.
    pub fn sql(credentials_key: &str) -> Self {
        Self {
            class_name: DatasourceKind::SQL_CLASS.to_string(),
            data_asset_type: ClassRef::new(DatasourceKind::SQL_ASSET_CLASS),
            credentials: Some(serde_yaml::Value::String(format!(
                "${{{}}}",
                credentials_key
            ))),
            base_directory: None,
            extra: BTreeMap::new(),
        }
    }

    pub fn files(base_directory: &str) -> Self {
        Self {
            class_name: DatasourceKind::FILES_CLASS.to_string(),
            data_asset_type: ClassRef::new(DatasourceKind::FILES_ASSET_CLASS),
            credentials: None,
            base_directory: Some(base_directory.to_string()),
            extra: BTreeMap::new(),
        }
    }

    pub fn kind(&self) -> Option<DatasourceKind> {
        match self.class_name.as_str() {
            DatasourceKind::SQL_CLASS => Some(DatasourceKind::Sql),
            DatasourceKind::FILES_CLASS => Some(DatasourceKind::Files),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct StoreBackendConfig {
    pub class_name: String,
    pub base_directory: String,

    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl StoreBackendConfig {
    pub fn filesystem(base_directory: &str) -> Self {
        Self {
            class_name: FILESYSTEM_BACKEND.to_string(),
            base_directory: base_directory.to_string(),
            extra: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct StoreConfig {
    pub class_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_backend: Option<StoreBackendConfig>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SiteConfig {
    pub class_name: String,
    pub store_backend: StoreBackendConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_index_builder: Option<ClassRef>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ProjectConfig {
    #[serde(default = "default_config_version")]
    pub config_version: u32,

    #[serde(default)]
    pub datasources: BTreeMap<String, DatasourceConfig>,

    #[serde(default = "default_config_variables_file_path")]
    pub config_variables_file_path: String,

    #[serde(default = "default_plugins_directory")]
    pub plugins_directory: String,

    #[serde(default = "default_expectations_store_name")]
    pub expectations_store_name: String,

    #[serde(default = "default_validations_store_name")]
    pub validations_store_name: String,

    #[serde(default = "default_evaluation_parameter_store_name")]
    pub evaluation_parameter_store_name: String,

    #[serde(default = "default_stores")]
    pub stores: BTreeMap<String, StoreConfig>,

    #[serde(default = "default_data_docs_sites")]
    pub data_docs_sites: BTreeMap<String, SiteConfig>,

    /// Keys gx does not know about are kept as-is on save.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            config_version: default_config_version(),
            datasources: BTreeMap::new(),
            config_variables_file_path: default_config_variables_file_path(),
            plugins_directory: default_plugins_directory(),
            expectations_store_name: default_expectations_store_name(),
            validations_store_name: default_validations_store_name(),
            evaluation_parameter_store_name: default_evaluation_parameter_store_name(),
            stores: default_stores(),
            data_docs_sites: default_data_docs_sites(),
            extra: BTreeMap::new(),
        }
    }
}

impl ProjectConfig {
    /// Base directory (relative to the project dir) of a filesystem-backed store.
    pub fn store_base_directory(&self, store_name: &str) -> Option<&str> {
        self.stores
            .get(store_name)
            .and_then(|s| s.store_backend.as_ref())
            .map(|b| b.base_directory.as_str())
    }

    pub fn expectations_base_directory(&self) -> &str {
        self.store_base_directory(&self.expectations_store_name)
            .unwrap_or("expectations/")
    }

    pub fn validations_base_directory(&self) -> &str {
        self.store_base_directory(&self.validations_store_name)
            .unwrap_or("uncommitted/validations/")
    }

    pub fn datasource_names(&self) -> Vec<String> {
        self.datasources.keys().cloned().collect()
    }
}

/// Datasource names double as config_variables.yml keys: `^[A-Za-z0-9_-]+$`.
pub fn validate_datasource_name(name: &str) -> Result<(), DomainError> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(DomainError::InvalidName(name.to_string()))
    }
}

fn default_config_version() -> u32 {
    1
}
fn default_config_variables_file_path() -> String {
    "uncommitted/config_variables.yml".to_string()
}
fn default_plugins_directory() -> String {
    "plugins/".to_string()
}
fn default_expectations_store_name() -> String {
    EXPECTATIONS_STORE.to_string()
}
fn default_validations_store_name() -> String {
    VALIDATIONS_STORE.to_string()
}
fn default_evaluation_parameter_store_name() -> String {
    EVALUATION_PARAMETER_STORE.to_string()
}

fn default_stores() -> BTreeMap<String, StoreConfig> {
    let mut stores = BTreeMap::new();
    stores.insert(
        EXPECTATIONS_STORE.to_string(),
        StoreConfig {
            class_name: "ExpectationsStore".to_string(),
            store_backend: Some(StoreBackendConfig::filesystem("expectations/")),
            extra: BTreeMap::new(),
        },
    );
    stores.insert(
        VALIDATIONS_STORE.to_string(),
        StoreConfig {
            class_name: "ValidationsStore".to_string(),
            store_backend: Some(StoreBackendConfig::filesystem("uncommitted/validations/")),
            extra: BTreeMap::new(),
        },
    );
    stores.insert(
        EVALUATION_PARAMETER_STORE.to_string(),
        StoreConfig {
            class_name: "EvaluationParameterStore".to_string(),
            store_backend: None,
            extra: BTreeMap::new(),
        },
    );
    stores
}

fn default_data_docs_sites() -> BTreeMap<String, SiteConfig> {
    let mut sites = BTreeMap::new();
    sites.insert(
        DEFAULT_SITE_NAME.to_string(),
        SiteConfig {
            class_name: "SiteBuilder".to_string(),
            store_backend: StoreBackendConfig::filesystem("uncommitted/data_docs/local_site/"),
            site_index_builder: Some(ClassRef::new("DefaultSiteIndexBuilder")),
            extra: BTreeMap::new(),
        },
    );
    sites
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn test_datasource_names() {
        assert!(validate_datasource_name("titanic").is_ok());
        assert!(validate_datasource_name("my-db_2").is_ok());
        assert!(validate_datasource_name("").is_err());
        assert!(validate_datasource_name("sink me").is_err());
        assert!(validate_datasource_name("a.b").is_err());
    }

    #[test]
    fn test_default_config_points_stores_at_standard_dirs() {
        let config = ProjectConfig::default();
        assert_eq!(config.expectations_base_directory(), "expectations/");
        assert_eq!(
            config.validations_base_directory(),
            "uncommitted/validations/"
        );
        assert!(config.data_docs_sites.contains_key(DEFAULT_SITE_NAME));
    }

    #[test]
    fn test_sql_datasource_references_config_variable() -> Result<()> {
        let ds = DatasourceConfig::sql("titanic");
        assert_eq!(ds.kind(), Some(DatasourceKind::Sql));
        assert_eq!(ds.data_asset_type.class_name, "SqlAlchemyDataset");
        assert_eq!(
            ds.credentials,
            Some(serde_yaml::Value::String("${titanic}".into()))
        );
        Ok(())
    }

    #[test]
    fn test_minimal_yaml_gets_defaults_and_keeps_unknown_keys() -> Result<()> {
        let yaml = "config_version: 1\ndatasources: {}\nanonymous_usage_statistics:\n  enabled: false\n";
        let config: ProjectConfig = serde_yaml::from_str(yaml)?;
        assert!(config.datasources.is_empty());
        assert_eq!(config.expectations_store_name, EXPECTATIONS_STORE);
        assert!(config.extra.contains_key("anonymous_usage_statistics"));

        let back = serde_yaml::to_string(&config)?;
        assert!(back.contains("anonymous_usage_statistics"));
        Ok(())
    }

    #[test]
    fn test_custom_store_directory_is_honoured() -> Result<()> {
        let yaml = r#"
expectations_store_name: my_store
stores:
  my_store:
    class_name: ExpectationsStore
    store_backend:
      class_name: TupleFilesystemStoreBackend
      base_directory: suites/
"#;
        let config: ProjectConfig = serde_yaml::from_str(yaml)?;
        assert_eq!(config.expectations_base_directory(), "suites/");
        // Validation store missing from the map: falls back to the default
        assert_eq!(
            config.validations_base_directory(),
            "uncommitted/validations/"
        );
        Ok(())
    }
}
