// gx-core/src/application/scaffold.rs
//
// Creates the great_expectations/ tree. Safe to run on an existing project:
// missing pieces are added, existing files are never touched.

use serde_json::json;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info, instrument};

use crate::domain::project::{ProjectConfig, ProjectLayout};
use crate::error::GxError;
use crate::infrastructure::config::variables::CONFIG_VARIABLES_HEADER;
use crate::infrastructure::config::{is_initialized, load_project_config, save_project_config};
use crate::infrastructure::fs::write_if_missing;
use crate::infrastructure::render::assets::CUSTOM_STYLES_TEMPLATE;

const GITIGNORE: &str = "uncommitted/\n";

/// What a scaffold pass added.
#[derive(Debug, Default)]
pub struct ScaffoldReport {
    pub created: Vec<PathBuf>,
}

impl ScaffoldReport {
    pub fn is_empty(&self) -> bool {
        self.created.is_empty()
    }
}

#[instrument(skip(layout), fields(ge_dir = %layout.ge_dir().display()))]
pub fn scaffold_project(layout: &ProjectLayout) -> Result<ScaffoldReport, GxError> {
    let mut report = ScaffoldReport::default();

    let config = if is_initialized(layout) {
        load_project_config(layout)?
    } else {
        let config = ProjectConfig::default();
        save_project_config(layout, &config)?;
        report.created.push(layout.config_path());
        config
    };

    let mut dirs = vec![
        layout.expectations_dir(&config),
        layout.validations_dir(&config),
        layout.uncommitted_dir().join("data_docs"),
    ];
    let custom = layout.custom_data_docs_dir(&config);
    for sub in ["renderers", "styles", "views"] {
        dirs.push(custom.join(sub));
    }
    for flavour in ProjectLayout::NOTEBOOK_FLAVOURS {
        dirs.push(layout.notebooks_dir().join(flavour));
    }
    for dir in dirs {
        if !dir.is_dir() {
            fs::create_dir_all(&dir)?;
            report.created.push(dir);
        }
    }

    let mut files = vec![
        (layout.gitignore_path(), GITIGNORE.to_string()),
        (
            layout.config_variables_path(&config),
            CONFIG_VARIABLES_HEADER.to_string(),
        ),
        (
            custom.join("styles").join(ProjectLayout::CUSTOM_STYLES),
            CUSTOM_STYLES_TEMPLATE.to_string(),
        ),
    ];
    for flavour in ProjectLayout::NOTEBOOK_FLAVOURS {
        files.push((
            layout
                .notebooks_dir()
                .join(flavour)
                .join(ProjectLayout::NOTEBOOK_NAME),
            validation_playground(flavour)?,
        ));
    }
    for (path, content) in files {
        if write_if_missing(&path, content)? {
            report.created.push(path);
        }
    }

    if report.is_empty() {
        debug!("Project tree already complete");
    } else {
        info!(created = report.created.len(), "Project tree scaffolded");
    }
    Ok(report)
}

/// Starter notebook showing how to validate a batch by hand.
fn validation_playground(flavour: &str) -> Result<String, GxError> {
    let load_batch = match flavour {
        "sql" => {
            "batch_kwargs = {\"datasource\": datasource_name, \"schema\": \"main\", \"table\": \"my_table\"}"
        }
        _ => "batch_kwargs = {\"datasource\": datasource_name, \"path\": \"/path/to/my_file.csv\"}",
    };
    let notebook = json!({
        "cells": [
            {
                "cell_type": "markdown",
                "metadata": {},
                "source": [
                    format!("# Validation Playground ({})\n", flavour),
                    "\n",
                    "Use this notebook to validate a batch of data against an expectation suite ",
                    "and look at the results in Data Docs.\n"
                ]
            },
            {
                "cell_type": "code",
                "execution_count": null,
                "metadata": {},
                "outputs": [],
                "source": [
                    "import great_expectations as ge\n",
                    "context = ge.data_context.DataContext()\n",
                    "context.list_expectation_suite_names()"
                ]
            },
            {
                "cell_type": "code",
                "execution_count": null,
                "metadata": {},
                "outputs": [],
                "source": [
                    "expectation_suite_name = \"\"  # one of the names listed above\n",
                    "datasource_name = \"\"  # a datasource from great_expectations.yml\n",
                    format!("{}\n", load_batch),
                    "batch = context.get_batch(batch_kwargs, expectation_suite_name)\n",
                    "batch.head()"
                ]
            },
            {
                "cell_type": "code",
                "execution_count": null,
                "metadata": {},
                "outputs": [],
                "source": [
                    "results = context.run_validation_operator(\"action_list_operator\", assets_to_validate=[batch])\n",
                    "context.open_data_docs()"
                ]
            }
        ],
        "metadata": {
            "kernelspec": {
                "display_name": "Python 3",
                "language": "python",
                "name": "python3"
            },
            "language_info": { "name": "python" }
        },
        "nbformat": 4,
        "nbformat_minor": 2
    });
    let text = serde_json::to_string_pretty(&notebook)
        .map_err(crate::infrastructure::error::InfrastructureError::from)?;
    Ok(text)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::infrastructure::fs::directory_tree;
    use anyhow::Result;
    use tempfile::tempdir;

    #[test]
    fn test_scaffold_new_project_tree() -> Result<()> {
        let dir = tempdir()?;
        let layout = ProjectLayout::new(dir.path());
        let report = scaffold_project(&layout)?;
        assert!(!report.is_empty());

        let tree = directory_tree(layout.ge_dir())?;
        assert_eq!(
            tree,
            "\
great_expectations/
    .gitignore
    great_expectations.yml
    expectations/
    notebooks/
        pandas/
            validation_playground.ipynb
        spark/
            validation_playground.ipynb
        sql/
            validation_playground.ipynb
    plugins/
        custom_data_docs/
            renderers/
            styles/
                data_docs_custom_styles.css
            views/
    uncommitted/
        config_variables.yml
        data_docs/
        validations/
"
        );
        assert_eq!(fs::read_to_string(layout.gitignore_path())?, "uncommitted/\n");
        Ok(())
    }

    #[test]
    fn test_scaffold_is_idempotent_and_repairs() -> Result<()> {
        let dir = tempdir()?;
        let layout = ProjectLayout::new(dir.path());
        scaffold_project(&layout)?;

        fs::write(layout.gitignore_path(), "custom\n")?;
        fs::remove_dir_all(layout.notebooks_dir())?;

        let report = scaffold_project(&layout)?;
        assert!(report.created.iter().any(|p| p.ends_with("validation_playground.ipynb")));
        assert_eq!(fs::read_to_string(layout.gitignore_path())?, "custom\n");

        assert!(scaffold_project(&layout)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_notebooks_are_valid_json() -> Result<()> {
        for flavour in ProjectLayout::NOTEBOOK_FLAVOURS {
            let nb: serde_json::Value = serde_json::from_str(&validation_playground(flavour)?)?;
            assert_eq!(nb["nbformat"], 4);
        }
        Ok(())
    }
}
