// gx/src/commands/mod.rs

pub mod datasource;
pub mod docs;
pub mod init;
pub mod suite;

use std::path::Path;

use gx_core::application::DataContext;
use gx_core::domain::project::ProjectLayout;
use gx_core::infrastructure::config::is_initialized;

/// Loads the project of `directory`, or explains why there is none.
pub fn load_context(directory: &Path) -> anyhow::Result<Option<DataContext>> {
    if !is_initialized(&ProjectLayout::new(directory)) {
        eprintln!(
            "❌ No great_expectations project found in {}.\n👉 Run `gx init -d {}` first.",
            directory.display(),
            directory.display()
        );
        return Ok(None);
    }
    Ok(Some(DataContext::load(directory)?))
}
