// gx-core/src/infrastructure/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DatabaseError {
    #[error("SQLite Engine Error: {0}")]
    #[diagnostic(
        code(gx::infra::database::sqlite),
        help("An error occurred inside the SQLite engine.")
    )]
    Sqlite(#[from] rusqlite::Error),

    #[error("DuckDB Engine Error: {0}")]
    #[diagnostic(
        code(gx::infra::database::duckdb),
        help("An error occurred inside the SQL engine.")
    )]
    DuckDB(#[from] duckdb::Error),

    #[error("Engine lock poisoned ({0})")]
    #[diagnostic(code(gx::infra::database::poisoned))]
    Poisoned(&'static str),
}

/// Why a datasource could not be reached. These are the "targeted" failures
/// the wizard reports without a stack trace.
#[derive(Error, Debug, Diagnostic)]
pub enum ConnectionError {
    #[error("'{0}' is not a valid connection string")]
    #[diagnostic(
        code(gx::infra::connection::url),
        help("Expected something like sqlite:///path/to/file.db or duckdb:///path/to/file.duckdb")
    )]
    InvalidUrl(String),

    #[error("No driver is available for the '{0}' dialect (supported: sqlite, duckdb)")]
    #[diagnostic(code(gx::infra::connection::dialect))]
    UnsupportedDialect(String),

    #[error("Database file not found: {0}")]
    #[diagnostic(code(gx::infra::connection::missing_file))]
    DatabaseNotFound(String),

    #[error("Data directory not found: {0}")]
    #[diagnostic(code(gx::infra::connection::missing_dir))]
    DirectoryNotFound(String),

    #[error("{0}")]
    #[diagnostic(transparent)]
    Engine(#[from] DatabaseError),
}

#[derive(Error, Debug, Diagnostic)]
pub enum InfrastructureError {
    // --- DATABASE (Abstracted) ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Connection(#[from] ConnectionError),

    // --- FILESYSTEM (IO) ---
    #[error("File System Error: {0}")]
    #[diagnostic(
        code(gx::infra::io),
        help("Check file permissions or path validity.")
    )]
    Io(#[from] std::io::Error),

    // --- CONFIG / YAML ---
    #[error("YAML Parsing Error: {0}")]
    #[diagnostic(
        code(gx::infra::yaml),
        help("Check your YAML syntax (indentation, types).")
    )]
    YamlError(#[from] serde_yaml::Error),

    #[error("JSON Error: {0}")]
    #[diagnostic(code(gx::infra::json))]
    JsonError(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    #[diagnostic(code(gx::infra::config))]
    ConfigError(String),

    #[error("Project configuration not found at '{0}'")]
    #[diagnostic(
        code(gx::infra::config_missing),
        help("Run `gx init` to create a project first.")
    )]
    ConfigNotFound(String),

    // --- TEMPLATING ---
    #[error("Template Rendering Error: {0}")]
    #[diagnostic(code(gx::infra::template))]
    TemplateError(#[from] minijinja::Error),
}

// Shortcuts for `?` on engine calls
impl From<rusqlite::Error> for InfrastructureError {
    fn from(err: rusqlite::Error) -> Self {
        InfrastructureError::Database(DatabaseError::Sqlite(err))
    }
}

impl From<duckdb::Error> for InfrastructureError {
    fn from(err: duckdb::Error) -> Self {
        InfrastructureError::Database(DatabaseError::DuckDB(err))
    }
}
