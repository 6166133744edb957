// gx-core/src/domain/compiler/quoter.rs
//
// SQL text helpers shared by every engine: identifier/literal quoting and the
// guard that decides whether a line typed at the table prompt is a usable query.

use sqlparser::ast::{SetExpr, Statement};
use sqlparser::dialect::GenericDialect;
use sqlparser::parser::Parser;

use crate::domain::error::DomainError;

/// `name` -> `"name"` (embedded quotes doubled). Works on SQLite and DuckDB.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// `it's` -> `'it''s'`
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

pub struct QueryGuard;

impl QueryGuard {
    /// Accepts exactly one read-only query and returns it normalised
    /// (trimmed, without trailing `;`) so it can be wrapped as a sub-query.
    pub fn check(sql: &str) -> Result<String, DomainError> {
        let candidate = sql.trim().trim_end_matches(';').trim();
        if candidate.is_empty() {
            return Err(DomainError::RejectedQuery("empty query".into()));
        }

        let dialect = GenericDialect {};
        let ast = Parser::parse_sql(&dialect, candidate)
            .map_err(|e| DomainError::RejectedQuery(e.to_string()))?;

        match ast.as_slice() {
            [Statement::Query(query)] => {
                if Self::is_read_only(&query.body) {
                    tracing::debug!("Accepted batch query: {}", candidate);
                    Ok(candidate.to_string())
                } else {
                    Err(DomainError::RejectedQuery(
                        "only SELECT queries can be used".into(),
                    ))
                }
            }
            [_] => Err(DomainError::RejectedQuery(
                "only SELECT queries can be used".into(),
            )),
            _ => Err(DomainError::RejectedQuery(
                "expected exactly one statement".into(),
            )),
        }
    }

    fn is_read_only(body: &SetExpr) -> bool {
        match body {
            SetExpr::Select(_) | SetExpr::Values(_) | SetExpr::Table(_) => true,
            SetExpr::Query(q) => Self::is_read_only(&q.body),
            SetExpr::SetOperation { left, right, .. } => {
                Self::is_read_only(left) && Self::is_read_only(right)
            }
            _ => false,
        }
    }
}
