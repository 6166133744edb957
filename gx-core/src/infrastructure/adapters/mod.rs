// gx-core/src/infrastructure/adapters/mod.rs

pub mod duckdb;
pub mod sqlite;

use std::path::PathBuf;
use tracing::debug;

use crate::error::GxError;
use crate::infrastructure::error::ConnectionError;
use crate::ports::connector::Connector;

pub use self::duckdb::DuckDBConnector;
pub use self::sqlite::SqliteConnector;

/// Where a connection string points to, once parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseTarget {
    Memory,
    File(PathBuf),
}

/// Parsed `dialect[+driver]://rest` connection string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionUrl {
    pub dialect: String,
    pub rest: String,
}

impl ConnectionUrl {
    pub fn parse(url: &str) -> Result<Self, ConnectionError> {
        let url = url.trim();
        let (scheme, rest) = url
            .split_once("://")
            .ok_or_else(|| ConnectionError::InvalidUrl(url.to_string()))?;
        let dialect = scheme.split('+').next().unwrap_or_default().to_ascii_lowercase();
        if dialect.is_empty() || !dialect.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ConnectionError::InvalidUrl(url.to_string()));
        }
        Ok(Self {
            dialect,
            rest: rest.to_string(),
        })
    }

    /// File-style URLs: `x://` is in memory, `x:///rel` relative, `x:////abs` absolute.
    pub fn target(&self) -> Result<DatabaseTarget, ConnectionError> {
        if self.rest.is_empty() {
            return Ok(DatabaseTarget::Memory);
        }
        match self.rest.strip_prefix('/') {
            Some(path) if !path.is_empty() => Ok(DatabaseTarget::File(PathBuf::from(path))),
            _ => Err(ConnectionError::InvalidUrl(format!(
                "{}://{}",
                self.dialect, self.rest
            ))),
        }
    }
}

/// Opens and pings the engine behind a connection string.
pub fn connect_url(url: &str) -> Result<Box<dyn Connector>, GxError> {
    let parsed = ConnectionUrl::parse(url)?;
    debug!("Opening '{}' connection", parsed.dialect);
    let connector: Box<dyn Connector> = match parsed.dialect.as_str() {
        "sqlite" => Box::new(SqliteConnector::open(parsed.target()?)?),
        "duckdb" => Box::new(DuckDBConnector::open(parsed.target()?)?),
        other => return Err(ConnectionError::UnsupportedDialect(other.to_string()).into()),
    };
    Ok(connector)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn test_parse_sqlite_forms() -> Result<()> {
        assert_eq!(
            ConnectionUrl::parse("sqlite://")?.target()?,
            DatabaseTarget::Memory
        );
        assert_eq!(
            ConnectionUrl::parse("sqlite:///data/titanic.db")?.target()?,
            DatabaseTarget::File(PathBuf::from("data/titanic.db"))
        );
        assert_eq!(
            ConnectionUrl::parse("  sqlite:////tmp/titanic.db \n")?.target()?,
            DatabaseTarget::File(PathBuf::from("/tmp/titanic.db"))
        );
        Ok(())
    }

    #[test]
    fn test_parse_driver_suffix() -> Result<()> {
        let url = ConnectionUrl::parse("postgresql+psycopg2://user:pw@localhost:5432/db")?;
        assert_eq!(url.dialect, "postgresql");
        Ok(())
    }

    #[test]
    fn test_invalid_urls() {
        assert!(matches!(
            ConnectionUrl::parse("titanic.db"),
            Err(ConnectionError::InvalidUrl(_))
        ));
        assert!(matches!(
            ConnectionUrl::parse("sqlite://host/db").unwrap().target(),
            Err(ConnectionError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_unsupported_dialect_is_a_connection_failure() {
        let err = connect_url("mysql://root@localhost/db").err().unwrap();
        assert!(err.is_connection_failure());
        assert!(err.to_string().contains("mysql"));
    }

    #[test]
    fn test_missing_sqlite_file() {
        let err = connect_url("sqlite:////definitely/not/here.db").err().unwrap();
        assert!(err.is_connection_failure());
    }
}
