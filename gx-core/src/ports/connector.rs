// gx-core/src/ports/connector.rs

// What the use cases need from a SQL engine, without knowing which one.
// SQLite and DuckDB both sit behind this trait.

use crate::error::GxError;
use async_trait::async_trait;
use std::fmt;

// Struct simple pour décrire une colonne (indépendant de la DB)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSchema {
    pub name: String,
    /// Declared type as reported by the engine; may be empty (SQLite expressions).
    pub data_type: String,
}

/// A user table or view.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct TableRef {
    pub schema: Option<String>,
    pub name: String,
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.schema {
            Some(schema) => write!(f, "{}.{}", schema, self.name),
            None => f.write_str(&self.name),
        }
    }
}

#[async_trait]
pub trait Connector: Send + Sync {
    /// Cheap round trip proving the database is reachable and readable.
    async fn ping(&self) -> Result<(), GxError>;

    async fn list_tables(&self) -> Result<Vec<TableRef>, GxError>;

    /// Columns of anything usable after `FROM` (table, sub-query, table function).
    async fn fetch_columns(&self, relation: &str) -> Result<Vec<ColumnSchema>, GxError>;

    /// First column of every row, as floats. NULL and non-numeric values are `None`.
    async fn query_floats(&self, sql: &str) -> Result<Vec<Option<f64>>, GxError>;

    /// First column of every non-NULL row, as text.
    async fn query_strings(&self, sql: &str) -> Result<Vec<String>, GxError>;

    async fn query_scalar(&self, sql: &str) -> Result<Option<f64>, GxError> {
        Ok(self.query_floats(sql).await?.into_iter().next().flatten())
    }

    fn engine_name(&self) -> &str;
}
