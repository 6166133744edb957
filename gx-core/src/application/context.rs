// gx-core/src/application/context.rs
//
// The loaded project: configuration plus access to its stores and datasources.

use serde_yaml::{Mapping, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

use crate::application::datasource::credentials_to_url;
use crate::domain::error::DomainError;
use crate::domain::project::{
    DatasourceConfig, DatasourceKind, ProjectConfig, ProjectLayout, validate_datasource_name,
};
use crate::error::GxError;
use crate::infrastructure::adapters::{DuckDBConnector, connect_url};
use crate::infrastructure::config::{
    ConfigVariables, load_config_variables, load_project_config, save_config_variable,
    save_project_config, substitute,
};
use crate::infrastructure::error::{ConnectionError, InfrastructureError};
use crate::infrastructure::stores::{ExpectationsStore, ValidationsStore};
use crate::ports::connector::Connector;

pub struct DataContext {
    layout: ProjectLayout,
    config: ProjectConfig,
}

impl DataContext {
    /// Loads `<project_dir>/great_expectations/great_expectations.yml`.
    #[instrument(skip(project_dir), fields(project_dir = %project_dir.display()))]
    pub fn load(project_dir: &Path) -> Result<Self, GxError> {
        let layout = ProjectLayout::new(project_dir);
        let config = load_project_config(&layout)?;
        info!(
            datasources = config.datasources.len(),
            "Data context loaded"
        );
        Ok(Self { layout, config })
    }

    pub fn layout(&self) -> &ProjectLayout {
        &self.layout
    }

    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    /// Directory that contains `great_expectations/`.
    pub fn project_dir(&self) -> PathBuf {
        self.layout
            .ge_dir()
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn expectations_store(&self) -> ExpectationsStore {
        ExpectationsStore::new(&self.layout.expectations_dir(&self.config))
    }

    pub fn validations_store(&self) -> ValidationsStore {
        ValidationsStore::new(&self.layout.validations_dir(&self.config))
    }

    pub fn datasource_names(&self) -> Vec<String> {
        self.config.datasource_names()
    }

    pub fn list_suite_names(&self) -> Result<Vec<String>, GxError> {
        self.expectations_store().list_suite_names()
    }

    pub fn datasource(&self, name: &str) -> Result<&DatasourceConfig, GxError> {
        self.config
            .datasources
            .get(name)
            .ok_or_else(|| DomainError::DatasourceNotFound(name.to_string()).into())
    }

    /// Config-relative path of the config variables file, e.g.
    /// `great_expectations/uncommitted/config_variables.yml`.
    pub fn config_variables_display_path(&self) -> String {
        format!(
            "{}/{}",
            ProjectLayout::GE_DIR,
            self.config.config_variables_file_path
        )
    }

    pub fn config_variables(&self) -> Result<ConfigVariables, GxError> {
        let path = self.layout.config_variables_path(&self.config);
        Ok(load_config_variables(&path)?)
    }

    /// Validates the name, registers the datasource, then stores the
    /// credentials (if any) under it in config_variables.yml. A failed
    /// credentials write puts the previous project config back.
    #[instrument(skip(self, datasource, credentials))]
    pub fn add_datasource(
        &mut self,
        name: &str,
        datasource: DatasourceConfig,
        credentials: Option<Mapping>,
    ) -> Result<(), GxError> {
        validate_datasource_name(name)?;
        if self.config.datasources.contains_key(name) {
            return Err(DomainError::DuplicateDatasource(name.to_string()).into());
        }

        let mut updated = self.config.clone();
        updated.datasources.insert(name.to_string(), datasource);
        save_project_config(&self.layout, &updated)?;

        if let Some(credentials) = credentials {
            let path = self.layout.config_variables_path(&updated);
            if let Err(err) = save_config_variable(&path, name, Value::Mapping(credentials)) {
                warn!(datasource = name, error = %err, "Credentials not saved, reverting config");
                save_project_config(&self.layout, &self.config)?;
                return Err(err.into());
            }
        }

        self.config = updated;
        info!(datasource = name, "Datasource added");
        Ok(())
    }

    /// Connection string of a SQL datasource, with `${variables}` resolved.
    pub fn datasource_url(&self, name: &str) -> Result<String, GxError> {
        let datasource = self.datasource(name)?;
        let raw = datasource.credentials.as_ref().ok_or_else(|| {
            DomainError::DatasourceConfig(format!("datasource '{}' has no credentials", name))
        })?;
        let resolved = substitute(raw, &self.config_variables()?)?;
        match resolved {
            Value::String(url) => Ok(url),
            Value::Mapping(map) => credentials_to_url(&map),
            other => Err(DomainError::DatasourceConfig(format!(
                "unexpected credentials for '{}': {:?}",
                name, other
            ))
            .into()),
        }
    }

    /// Base directory of a files datasource, resolved against the project dir.
    pub fn datasource_directory(&self, name: &str) -> Result<PathBuf, GxError> {
        let datasource = self.datasource(name)?;
        let base = datasource.base_directory.as_deref().ok_or_else(|| {
            DomainError::DatasourceConfig(format!("datasource '{}' has no base_directory", name))
        })?;
        Ok(self.layout.resolve(base))
    }

    /// Opens (and pings) the engine behind a datasource.
    pub async fn open_datasource(&self, name: &str) -> Result<Box<dyn Connector>, GxError> {
        let datasource = self.datasource(name)?;
        let connector: Box<dyn Connector> = match datasource.kind() {
            Some(DatasourceKind::Sql) => connect_url(&self.datasource_url(name)?)?,
            Some(DatasourceKind::Files) => {
                let dir = self.datasource_directory(name)?;
                if !dir.is_dir() {
                    return Err(ConnectionError::DirectoryNotFound(dir.display().to_string()).into());
                }
                Box::new(DuckDBConnector::in_memory()?)
            }
            None => {
                return Err(InfrastructureError::ConfigError(format!(
                    "datasource '{}' has unsupported class '{}'",
                    name, datasource.class_name
                ))
                .into());
            }
        };
        connector.ping().await?;
        debug!(datasource = name, engine = connector.engine_name(), "Datasource opened");
        Ok(connector)
    }
}
