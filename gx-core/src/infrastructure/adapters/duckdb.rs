// gx-core/src/infrastructure/adapters/duckdb.rs

use async_trait::async_trait;
use duckdb::{Config, Connection};
use std::sync::{Arc, Mutex, MutexGuard};

// Imports Hexagonaux
use crate::error::GxError;
use crate::infrastructure::adapters::DatabaseTarget;
use crate::infrastructure::error::{ConnectionError, DatabaseError, InfrastructureError};
use crate::ports::connector::{ColumnSchema, Connector, TableRef};

pub struct DuckDBConnector {
    conn: Arc<Mutex<Connection>>,
}

impl DuckDBConnector {
    pub fn open(target: DatabaseTarget) -> Result<Self, ConnectionError> {
        let config = Config::default();

        // Si tu veux lecture/écriture, c'est le défaut.
        let conn = match target {
            DatabaseTarget::Memory => {
                Connection::open_in_memory_with_flags(config).map_err(DatabaseError::from)?
            }
            DatabaseTarget::File(path) => {
                if !path.is_file() {
                    return Err(ConnectionError::DatabaseNotFound(
                        path.display().to_string(),
                    ));
                }
                Connection::open_with_flags(&path, config).map_err(DatabaseError::from)?
            }
        };

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Engine for files datasources: nothing is stored, files are read in place.
    pub fn in_memory() -> Result<Self, ConnectionError> {
        Self::open(DatabaseTarget::Memory)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, GxError> {
        self.conn.lock().map_err(|_| {
            GxError::Infrastructure(InfrastructureError::Database(DatabaseError::Poisoned(
                "DuckDB",
            )))
        })
    }

    pub fn execute(&self, sql: &str) -> Result<(), GxError> {
        let conn = self.lock()?;
        conn.execute_batch(sql).map_err(InfrastructureError::from)?;
        Ok(())
    }
}

#[async_trait]
impl Connector for DuckDBConnector {
    async fn ping(&self) -> Result<(), GxError> {
        self.query_scalar("SELECT 1").await?;
        Ok(())
    }

    async fn list_tables(&self) -> Result<Vec<TableRef>, GxError> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(
                "SELECT table_schema, table_name FROM information_schema.tables \
                 WHERE table_schema NOT IN ('information_schema', 'pg_catalog') \
                 ORDER BY table_schema, table_name",
            )
            .map_err(InfrastructureError::from)?;

        let rows = stmt
            .query_map([], |row| {
                Ok(TableRef {
                    schema: Some(row.get(0)?),
                    name: row.get(1)?,
                })
            })
            .map_err(InfrastructureError::from)?;

        let mut tables = Vec::new();
        for row in rows {
            tables.push(row.map_err(InfrastructureError::from)?);
        }
        Ok(tables)
    }

    async fn fetch_columns(&self, relation: &str) -> Result<Vec<ColumnSchema>, GxError> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(&format!("DESCRIBE SELECT * FROM {}", relation))
            .map_err(InfrastructureError::from)?;

        let rows = stmt
            .query_map([], |row| {
                Ok(ColumnSchema {
                    name: row.get(0)?,
                    data_type: row.get(1)?,
                })
            })
            .map_err(InfrastructureError::from)?;

        let mut columns = Vec::new();
        for row in rows {
            columns.push(row.map_err(InfrastructureError::from)?);
        }

        Ok(columns)
    }

    async fn query_floats(&self, sql: &str) -> Result<Vec<Option<f64>>, GxError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(sql).map_err(InfrastructureError::from)?;
        let rows = stmt
            .query_map([], |row| row.get::<_, Option<f64>>(0))
            .map_err(InfrastructureError::from)?;

        let mut values = Vec::new();
        for row in rows {
            values.push(row.map_err(InfrastructureError::from)?);
        }
        Ok(values)
    }

    async fn query_strings(&self, sql: &str) -> Result<Vec<String>, GxError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(sql).map_err(InfrastructureError::from)?;
        let rows = stmt
            .query_map([], |row| row.get::<_, Option<String>>(0))
            .map_err(InfrastructureError::from)?;

        let mut values = Vec::new();
        for row in rows {
            if let Some(value) = row.map_err(InfrastructureError::from)? {
                values.push(value);
            }
        }
        Ok(values)
    }

    fn engine_name(&self) -> &str {
        "duckdb"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_duckdb_flow() -> Result<()> {
        let connector = DuckDBConnector::in_memory()?;
        connector.ping().await?;

        // 1. Create table
        connector.execute(
            "CREATE TABLE users (id INTEGER, name VARCHAR); \
             INSERT INTO users VALUES (1, 'ann'), (2, NULL), (3, 'cy');",
        )?;

        // 2. Fetch columns
        let columns = connector.fetch_columns("\"users\"").await?;
        assert_eq!(columns.len(), 2);

        let name_col = columns
            .iter()
            .find(|c| c.name == "name")
            .ok_or_else(|| anyhow::anyhow!("Column 'name' not found"))?;
        assert_eq!(name_col.data_type, "VARCHAR");

        let tables = connector.list_tables().await?;
        assert_eq!(tables[0].to_string(), "main.users");

        let names = connector
            .query_strings("SELECT name FROM users ORDER BY id")
            .await?;
        assert_eq!(names, vec!["ann", "cy"]);

        let mean = connector
            .query_scalar("SELECT CAST(AVG(id) AS DOUBLE) FROM users")
            .await?;
        assert_eq!(mean, Some(2.0));
        Ok(())
    }

    #[tokio::test]
    async fn test_reads_csv_in_place() -> Result<()> {
        let dir = tempdir()?;
        let csv = dir.path().join("people.csv");
        std::fs::write(&csv, "name,age\nann,30\nbob,41\n")?;

        let connector = DuckDBConnector::in_memory()?;
        let relation = format!("read_csv_auto('{}')", csv.display());
        let columns = connector.fetch_columns(&relation).await?;
        assert_eq!(columns.len(), 2);
        assert_eq!(columns[1].name, "age");
        Ok(())
    }

    #[tokio::test]
    async fn test_duckdb_error() -> Result<()> {
        let connector = DuckDBConnector::in_memory()?;
        // Invalid SQL
        let result = connector.query_floats("SELECT * FROM non_existent_table").await;
        assert!(result.is_err());
        Ok(())
    }

    #[test]
    fn test_missing_file() {
        let result = DuckDBConnector::open(DatabaseTarget::File("/nope/x.duckdb".into()));
        assert!(matches!(result, Err(ConnectionError::DatabaseNotFound(_))));
    }
}
