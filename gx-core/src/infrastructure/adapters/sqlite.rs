// gx-core/src/infrastructure/adapters/sqlite.rs

use async_trait::async_trait;
use rusqlite::types::Value;
use rusqlite::{Connection, OpenFlags};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

use crate::error::GxError;
use crate::infrastructure::adapters::DatabaseTarget;
use crate::infrastructure::error::{ConnectionError, DatabaseError, InfrastructureError};
use crate::ports::connector::{ColumnSchema, Connector, TableRef};

// Temp view used to read the column list of any relation through PRAGMA
const PROBE_VIEW: &str = "gx_relation_probe";

pub struct SqliteConnector {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteConnector {
    /// Opens an existing database file (never creates one) or an in-memory database.
    pub fn open(target: DatabaseTarget) -> Result<Self, ConnectionError> {
        let conn = match target {
            DatabaseTarget::Memory => Connection::open_in_memory().map_err(DatabaseError::from)?,
            DatabaseTarget::File(path) => {
                if !path.is_file() {
                    return Err(ConnectionError::DatabaseNotFound(
                        path.display().to_string(),
                    ));
                }
                // READ_WRITE without CREATE: a typo in the path must not leave an empty file behind
                Connection::open_with_flags(
                    &path,
                    OpenFlags::SQLITE_OPEN_READ_WRITE
                        | OpenFlags::SQLITE_OPEN_URI
                        | OpenFlags::SQLITE_OPEN_NO_MUTEX,
                )
                .map_err(DatabaseError::from)?
            }
        };

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, GxError> {
        self.conn.lock().map_err(|_| {
            GxError::Infrastructure(InfrastructureError::Database(DatabaseError::Poisoned(
                "SQLite",
            )))
        })
    }

    fn first_column(&self, sql: &str) -> Result<Vec<Value>, GxError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(sql).map_err(InfrastructureError::from)?;
        let rows = stmt
            .query_map([], |row| row.get::<_, Value>(0))
            .map_err(InfrastructureError::from)?;

        let mut values = Vec::new();
        for row in rows {
            values.push(row.map_err(InfrastructureError::from)?);
        }
        Ok(values)
    }
}

#[async_trait]
impl Connector for SqliteConnector {
    async fn ping(&self) -> Result<(), GxError> {
        // Reading the schema fails on files that are not SQLite databases
        self.first_column("SELECT count(*) FROM sqlite_master")?;
        Ok(())
    }

    async fn list_tables(&self) -> Result<Vec<TableRef>, GxError> {
        let names = self.query_strings(
            "SELECT name FROM sqlite_master \
             WHERE type IN ('table', 'view') AND name NOT LIKE 'sqlite_%' \
             ORDER BY name",
        )
        .await?;
        Ok(names
            .into_iter()
            .map(|name| TableRef {
                schema: Some("main".to_string()),
                name,
            })
            .collect())
    }

    async fn fetch_columns(&self, relation: &str) -> Result<Vec<ColumnSchema>, GxError> {
        let conn = self.lock()?;
        conn.execute_batch(&format!(
            "DROP VIEW IF EXISTS temp.{probe}; CREATE TEMP VIEW {probe} AS SELECT * FROM {relation};",
            probe = PROBE_VIEW,
            relation = relation
        ))
        .map_err(InfrastructureError::from)?;

        let columns = {
            let mut stmt = conn
                .prepare(&format!("PRAGMA temp.table_info({})", PROBE_VIEW))
                .map_err(InfrastructureError::from)?;
            let rows = stmt
                .query_map([], |row| {
                    Ok(ColumnSchema {
                        name: row.get("name")?,
                        data_type: row.get::<_, Option<String>>("type")?.unwrap_or_default(),
                    })
                })
                .map_err(InfrastructureError::from)?;

            let mut columns = Vec::new();
            for row in rows {
                columns.push(row.map_err(InfrastructureError::from)?);
            }
            columns
        };

        conn.execute_batch(&format!("DROP VIEW IF EXISTS temp.{};", PROBE_VIEW))
            .map_err(InfrastructureError::from)?;
        debug!("{} columns in {}", columns.len(), relation);
        Ok(columns)
    }

    async fn query_floats(&self, sql: &str) -> Result<Vec<Option<f64>>, GxError> {
        Ok(self
            .first_column(sql)?
            .into_iter()
            .map(|value| match value {
                Value::Integer(i) => Some(i as f64),
                Value::Real(f) => Some(f),
                Value::Text(s) => s.trim().parse().ok(),
                Value::Null | Value::Blob(_) => None,
            })
            .collect())
    }

    async fn query_strings(&self, sql: &str) -> Result<Vec<String>, GxError> {
        Ok(self
            .first_column(sql)?
            .into_iter()
            .filter_map(|value| match value {
                Value::Integer(i) => Some(i.to_string()),
                Value::Real(f) => Some(f.to_string()),
                Value::Text(s) => Some(s),
                Value::Blob(b) => Some(String::from_utf8_lossy(&b).into_owned()),
                Value::Null => None,
            })
            .collect())
    }

    fn engine_name(&self) -> &str {
        "sqlite"
    }
}
