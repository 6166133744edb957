// gx-core/src/infrastructure/mod.rs

pub mod adapters;
pub mod browser;
pub mod config;
pub mod console;
pub mod error;
pub mod fs;
pub mod render;
pub mod stores;

// Re-exports so the CLI does not need the module paths
pub use browser::SystemBrowser;
pub use console::LineConsole;
