// gx-core/src/domain/project/layout.rs

use std::path::{Path, PathBuf};

use crate::domain::project::ProjectConfig;

/// Fixed names of a project on disk.
#[derive(Debug, Clone)]
pub struct ProjectLayout {
    root: PathBuf,
}

impl ProjectLayout {
    pub const GE_DIR: &'static str = "great_expectations";
    pub const GE_YML: &'static str = "great_expectations.yml";
    pub const GITIGNORE: &'static str = ".gitignore";
    pub const UNCOMMITTED: &'static str = "uncommitted";
    pub const NOTEBOOK_FLAVOURS: [&'static str; 3] = ["pandas", "spark", "sql"];
    pub const NOTEBOOK_NAME: &'static str = "validation_playground.ipynb";
    pub const CUSTOM_STYLES: &'static str = "data_docs_custom_styles.css";

    /// `project_dir` is the directory that contains (or will contain) `great_expectations/`.
    pub fn new(project_dir: &Path) -> Self {
        Self {
            root: project_dir.join(Self::GE_DIR),
        }
    }

    /// Layout for an already resolved `great_expectations/` directory.
    pub fn from_ge_dir(ge_dir: &Path) -> Self {
        Self {
            root: ge_dir.to_path_buf(),
        }
    }

    pub fn ge_dir(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join(Self::GE_YML)
    }

    pub fn gitignore_path(&self) -> PathBuf {
        self.root.join(Self::GITIGNORE)
    }

    pub fn uncommitted_dir(&self) -> PathBuf {
        self.root.join(Self::UNCOMMITTED)
    }

    pub fn notebooks_dir(&self) -> PathBuf {
        self.root.join("notebooks")
    }

    pub fn custom_data_docs_dir(&self, config: &ProjectConfig) -> PathBuf {
        self.resolve(&config.plugins_directory)
            .join("custom_data_docs")
    }

    pub fn config_variables_path(&self, config: &ProjectConfig) -> PathBuf {
        self.resolve(&config.config_variables_file_path)
    }

    pub fn expectations_dir(&self, config: &ProjectConfig) -> PathBuf {
        self.resolve(config.expectations_base_directory())
    }

    pub fn validations_dir(&self, config: &ProjectConfig) -> PathBuf {
        self.resolve(config.validations_base_directory())
    }

    /// Joins a config-relative path (trailing slashes allowed) onto the project dir.
    pub fn resolve(&self, relative: &str) -> PathBuf {
        let trimmed = relative.trim_end_matches('/');
        let path = Path::new(trimmed);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// Path of `target` as it should be written in the config: relative to the project
    /// dir when `target` lives next to it, absolute otherwise.
    pub fn relative_to_project(&self, target: &Path) -> String {
        let Some(parent) = self.root.parent() else {
            return target.to_string_lossy().to_string();
        };
        if target == self.root {
            return ".".to_string();
        }
        if let Ok(inside) = target.strip_prefix(&self.root) {
            return inside.to_string_lossy().to_string();
        }
        if let Ok(sibling) = target.strip_prefix(parent) {
            return Path::new("..").join(sibling).to_string_lossy().to_string();
        }
        target.to_string_lossy().to_string()
    }
}
