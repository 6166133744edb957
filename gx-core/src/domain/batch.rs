// gx-core/src/domain/batch.rs
//
// A batch is the set of rows a suite is profiled and validated against.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::path::Path;

use crate::domain::compiler::{quote_ident, quote_literal};

/// How a file asset is read by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReaderMethod {
    ReadCsv,
    ReadParquet,
}

impl ReaderMethod {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("csv") | Some("tsv") => Some(Self::ReadCsv),
            Some("parquet") => Some(Self::ReadParquet),
            _ => None,
        }
    }

    fn table_function(&self) -> &'static str {
        match self {
            Self::ReadCsv => "read_csv_auto",
            Self::ReadParquet => "read_parquet",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BatchSource {
    Table {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        schema: Option<String>,
        table: String,
    },
    Query {
        query: String,
    },
    Path {
        path: String,
        reader_method: ReaderMethod,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchKwargs {
    pub datasource: String,
    #[serde(flatten)]
    pub source: BatchSource,
}

impl BatchKwargs {
    pub fn table(datasource: &str, schema: Option<&str>, table: &str) -> Self {
        Self {
            datasource: datasource.to_string(),
            source: BatchSource::Table {
                schema: schema.map(str::to_string),
                table: table.to_string(),
            },
        }
    }

    pub fn query(datasource: &str, query: &str) -> Self {
        Self {
            datasource: datasource.to_string(),
            source: BatchSource::Query {
                query: query.to_string(),
            },
        }
    }

    pub fn path(datasource: &str, path: &Path, reader_method: ReaderMethod) -> Self {
        Self {
            datasource: datasource.to_string(),
            source: BatchSource::Path {
                path: path.to_string_lossy().to_string(),
                reader_method,
            },
        }
    }

    /// SQL usable after `FROM`.
    pub fn relation(&self) -> String {
        match &self.source {
            BatchSource::Table { schema, table } => match schema {
                Some(s) => format!("{}.{}", quote_ident(s), quote_ident(table)),
                None => quote_ident(table),
            },
            BatchSource::Query { query } => format!("({}) AS gx_batch", query),
            BatchSource::Path {
                path,
                reader_method,
            } => format!("{}({})", reader_method.table_function(), quote_literal(path)),
        }
    }

    /// Short human name, also the prefix of the default suite name.
    pub fn asset_name(&self) -> String {
        match &self.source {
            BatchSource::Table { schema, table } => match schema {
                Some(s) => format!("{}.{}", s, table),
                None => table.clone(),
            },
            BatchSource::Query { .. } => "query".to_string(),
            BatchSource::Path { path, .. } => Path::new(path)
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| path.clone()),
        }
    }

    /// Content address of the batch: 32 lowercase hex characters.
    pub fn fingerprint(&self) -> String {
        // serde_json keeps struct field order, so the encoding is canonical
        let canonical = serde_json::to_string(self).unwrap_or_else(|_| format!("{:?}", self));
        let digest = Sha256::digest(canonical.as_bytes());
        digest[..16].iter().map(|b| format!("{:02x}", b)).collect()
    }
}

impl fmt::Display for BatchKwargs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.asset_name(), self.datasource)
    }
}
