// gx-core/src/infrastructure/config/mod.rs

pub mod project;
pub mod variables;

pub use crate::domain::project::ProjectConfig;
pub use project::{is_initialized, load_project_config, save_project_config};
pub use variables::{ConfigVariables, load_config_variables, save_config_variable, substitute};
