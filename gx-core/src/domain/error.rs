// gx-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DomainError {
    #[error("Invalid name '{0}'")]
    #[diagnostic(
        code(gx::domain::invalid_name),
        help("Use letters, digits, '_' and '-'. Suite names may also contain '.'.")
    )]
    InvalidName(String),

    #[error("A datasource named '{0}' already exists")]
    #[diagnostic(code(gx::domain::duplicate_datasource))]
    DuplicateDatasource(String),

    #[error("Datasource '{0}' not found in project configuration")]
    #[diagnostic(code(gx::domain::datasource_not_found))]
    DatasourceNotFound(String),

    #[error("An expectation suite named '{0}' already exists")]
    #[diagnostic(code(gx::domain::duplicate_suite))]
    DuplicateSuite(String),

    #[error("Expectation suite '{0}' not found")]
    #[diagnostic(code(gx::domain::suite_not_found))]
    SuiteNotFound(String),

    #[error("Rejected SQL: {0}")]
    #[diagnostic(
        code(gx::domain::sql),
        help("Only a single read-only query (SELECT / WITH ...) can be used as a batch.")
    )]
    RejectedQuery(String),

    #[error("Datasource configuration error: {0}")]
    #[diagnostic(code(gx::domain::datasource_config))]
    DatasourceConfig(String),
}
