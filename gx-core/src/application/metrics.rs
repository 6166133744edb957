// gx-core/src/application/metrics.rs
//
// Metric queries over a batch. The SQL is portable between SQLite and
// DuckDB: every numeric result is cast to DOUBLE, every value compared as
// text is cast to VARCHAR.

use tracing::trace;

use crate::domain::compiler::quote_ident;
use crate::error::GxError;
use crate::ports::connector::Connector;

pub struct Metrics<'a> {
    connector: &'a dyn Connector,
    relation: String,
}

impl<'a> Metrics<'a> {
    /// `relation` is anything usable after `FROM` (see `BatchKwargs::relation`).
    pub fn new(connector: &'a dyn Connector, relation: String) -> Self {
        Self {
            connector,
            relation,
        }
    }

    async fn scalar(&self, sql: String) -> Result<Option<f64>, GxError> {
        trace!(%sql, "metric");
        self.connector.query_scalar(&sql).await
    }

    async fn count(&self, sql: String) -> Result<u64, GxError> {
        Ok(self.scalar(sql).await?.map(|v| v.max(0.0) as u64).unwrap_or(0))
    }

    pub async fn row_count(&self) -> Result<u64, GxError> {
        self.count(format!(
            "SELECT CAST(COUNT(*) AS DOUBLE) FROM {}",
            self.relation
        ))
        .await
    }

    pub async fn null_count(&self, column: &str) -> Result<u64, GxError> {
        self.count(format!(
            "SELECT CAST(COUNT(*) AS DOUBLE) FROM {} WHERE {} IS NULL",
            self.relation,
            quote_ident(column)
        ))
        .await
    }

    pub async fn distinct_count(&self, column: &str) -> Result<u64, GxError> {
        self.count(format!(
            "SELECT CAST(COUNT(DISTINCT {}) AS DOUBLE) FROM {}",
            quote_ident(column),
            self.relation
        ))
        .await
    }

    async fn aggregate(&self, function: &str, column: &str) -> Result<Option<f64>, GxError> {
        self.scalar(format!(
            "SELECT CAST({}({}) AS DOUBLE) FROM {}",
            function,
            quote_ident(column),
            self.relation
        ))
        .await
    }

    pub async fn min(&self, column: &str) -> Result<Option<f64>, GxError> {
        self.aggregate("MIN", column).await
    }

    pub async fn max(&self, column: &str) -> Result<Option<f64>, GxError> {
        self.aggregate("MAX", column).await
    }

    pub async fn mean(&self, column: &str) -> Result<Option<f64>, GxError> {
        self.aggregate("AVG", column).await
    }

    /// Middle value of the non-null values; the mean of the two middle ones
    /// for an even count.
    pub async fn median(&self, column: &str) -> Result<Option<f64>, GxError> {
        let col = quote_ident(column);
        let n = self
            .count(format!(
                "SELECT CAST(COUNT({}) AS DOUBLE) FROM {}",
                col, self.relation
            ))
            .await?;
        if n == 0 {
            return Ok(None);
        }
        let (limit, offset) = if n % 2 == 1 { (1, (n - 1) / 2) } else { (2, n / 2 - 1) };
        let values = self
            .connector
            .query_floats(&format!(
                "SELECT CAST({col} AS DOUBLE) AS v FROM {rel} WHERE {col} IS NOT NULL \
                 ORDER BY v LIMIT {limit} OFFSET {offset}",
                col = col,
                rel = self.relation,
                limit = limit,
                offset = offset
            ))
            .await?;
        let values: Vec<f64> = values.into_iter().flatten().collect();
        if values.is_empty() {
            return Ok(None);
        }
        Ok(Some(values.iter().sum::<f64>() / values.len() as f64))
    }

    fn length_expr(column: &str) -> String {
        format!("LENGTH(CAST({} AS VARCHAR))", quote_ident(column))
    }

    /// Shortest and longest text rendering of the non-null values.
    pub async fn length_range(&self, column: &str) -> Result<(Option<u64>, Option<u64>), GxError> {
        let expr = Self::length_expr(column);
        let min = self
            .scalar(format!(
                "SELECT CAST(MIN({}) AS DOUBLE) FROM {}",
                expr, self.relation
            ))
            .await?;
        let max = self
            .scalar(format!(
                "SELECT CAST(MAX({}) AS DOUBLE) FROM {}",
                expr, self.relation
            ))
            .await?;
        Ok((min.map(|v| v as u64), max.map(|v| v as u64)))
    }

    pub async fn lengths_outside(&self, column: &str, min: u64, max: u64) -> Result<u64, GxError> {
        let expr = Self::length_expr(column);
        self.count(format!(
            "SELECT CAST(COUNT(*) AS DOUBLE) FROM {rel} WHERE {col} IS NOT NULL AND ({expr} < {min} OR {expr} > {max})",
            rel = self.relation,
            col = quote_ident(column),
            expr = expr,
            min = min,
            max = max
        ))
        .await
    }

    /// Sorted distinct non-null values, as text.
    pub async fn distinct_values(&self, column: &str) -> Result<Vec<String>, GxError> {
        let col = quote_ident(column);
        self.connector
            .query_strings(&format!(
                "SELECT DISTINCT CAST({col} AS VARCHAR) AS v FROM {rel} WHERE {col} IS NOT NULL ORDER BY v",
                col = col,
                rel = self.relation
            ))
            .await
    }

    pub async fn column_names(&self) -> Result<Vec<String>, GxError> {
        Ok(self
            .connector
            .fetch_columns(&self.relation)
            .await?
            .into_iter()
            .map(|c| c.name)
            .collect())
    }
}
