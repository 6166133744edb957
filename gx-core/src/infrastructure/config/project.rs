// gx-core/src/infrastructure/config/project.rs

use std::fs;
use tracing::{debug, info, instrument};

use crate::domain::project::{ProjectConfig, ProjectLayout};
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::atomic_write;

const CONFIG_HEADER: &str = "\
# Welcome to Great Expectations! Always know what to expect from your data.
#
# Here you can define datasources, batch kwargs generators, integrations and
# more. This file is intended to be committed to your repo. For help with
# configuration please:
#   - Read our docs: https://docs.greatexpectations.io/en/latest/reference/data_context_reference.html#configuration
#   - Join our slack channel: http://greatexpectations.io/slack
#
# Secrets such as database credentials live in the config_variables.yml file
# under uncommitted/ and are referenced here as ${variable_name}.

";

pub fn is_initialized(layout: &ProjectLayout) -> bool {
    layout.config_path().is_file()
}

// --- LOADER ---

#[instrument(skip(layout), fields(path = ?layout.config_path()))] // Log automatique de l'entrée/sortie de la fonction
pub fn load_project_config(layout: &ProjectLayout) -> Result<ProjectConfig, InfrastructureError> {
    // 1. Découverte du fichier principal
    let config_path = layout.config_path();
    if !config_path.is_file() {
        return Err(InfrastructureError::ConfigNotFound(
            config_path.display().to_string(),
        ));
    }
    info!("Loading project configuration");

    // 2. Chargement YAML
    let content = fs::read_to_string(&config_path)?;
    if content.trim().is_empty() {
        debug!("Empty configuration file, using defaults");
        return Ok(ProjectConfig::default());
    }
    let config: ProjectConfig = serde_yaml::from_str(&content).map_err(|e| {
        InfrastructureError::ConfigError(format!(
            "Failed to parse {}: {}",
            config_path.display(),
            e
        ))
    })?;

    debug!(datasources = config.datasources.len(), "Project configuration loaded");
    Ok(config)
}

#[instrument(skip(layout, config))]
pub fn save_project_config(
    layout: &ProjectLayout,
    config: &ProjectConfig,
) -> Result<(), InfrastructureError> {
    let body = serde_yaml::to_string(config)?;
    atomic_write(layout.config_path(), format!("{}{}", CONFIG_HEADER, body))?;
    debug!("Project configuration saved");
    Ok(())
}
