// gx-core/src/application/profiler.rs

use chrono::Utc;
use tracing::{debug, info, instrument};

use crate::application::metrics::Metrics;
use crate::domain::batch::BatchKwargs;
use crate::domain::expectations::{ExpectationSuite, ProfilerMeta};
use crate::domain::profiling::{
    Cardinality, ColumnKind, ColumnRole, ColumnStats, ColumnSummary, PROFILER_NAME, TableStats,
    build_sample_expectations, choose_columns,
};
use crate::error::GxError;
use crate::ports::connector::Connector;

/// Builds a small demonstration suite from a batch: a couple of columns,
/// a handful of expectations pinned to what the data looks like today.
pub struct SampleSuiteProfiler;

impl SampleSuiteProfiler {
    #[instrument(skip(connector, batch), fields(batch = %batch))]
    pub async fn profile(
        connector: &dyn Connector,
        batch: &BatchKwargs,
        suite_name: &str,
        data_asset_type: &str,
    ) -> Result<ExpectationSuite, GxError> {
        let metrics = Metrics::new(connector, batch.relation());

        let columns = connector.fetch_columns(&batch.relation()).await?;
        let row_count = metrics.row_count().await?;

        let mut summaries = Vec::with_capacity(columns.len());
        for column in &columns {
            let nulls = metrics.null_count(&column.name).await?;
            let distinct = metrics.distinct_count(&column.name).await?;
            let summary = ColumnSummary {
                name: column.name.clone(),
                kind: ColumnKind::from_declared_type(&column.data_type),
                cardinality: Cardinality::classify(row_count.saturating_sub(nulls), distinct),
            };
            debug!(column = %summary.name, kind = ?summary.kind, cardinality = ?summary.cardinality);
            summaries.push(summary);
        }

        let chosen = choose_columns(&summaries);
        let mut stats = Vec::with_capacity(chosen.len());
        for (idx, role) in &chosen {
            let column = summaries[*idx].name.clone();
            let null_count = metrics.null_count(&column).await?;
            let column_stats = match role {
                ColumnRole::Numeric => ColumnStats::Numeric {
                    min: metrics.min(&column).await?,
                    max: metrics.max(&column).await?,
                    mean: metrics.mean(&column).await?,
                    median: metrics.median(&column).await?,
                    null_count,
                    column,
                },
                ColumnRole::Text => {
                    let (min_length, max_length) = metrics.length_range(&column).await?;
                    ColumnStats::Text {
                        column,
                        null_count,
                        min_length,
                        max_length,
                    }
                }
                ColumnRole::Categorical => ColumnStats::Categorical {
                    values: metrics.distinct_values(&column).await?,
                    column,
                    null_count,
                },
            };
            stats.push(column_stats);
        }

        let table = TableStats {
            row_count,
            columns: columns.iter().map(|c| c.name.clone()).collect(),
        };

        let mut suite = ExpectationSuite::new(suite_name);
        suite.data_asset_type = Some(data_asset_type.to_string());
        suite.expectations = build_sample_expectations(&table, &stats);
        suite.meta.profiled_with = Some(ProfilerMeta {
            profiler: PROFILER_NAME.to_string(),
            batch_kwargs: batch.clone(),
            created_at: Utc::now().to_rfc3339(),
            columns: chosen
                .iter()
                .map(|(idx, _)| summaries[*idx].name.clone())
                .collect(),
        });

        info!(
            expectations = suite.expectations.len(),
            rows = row_count,
            "Sample suite generated"
        );
        Ok(suite)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::expectations::Expectation;
    use crate::infrastructure::adapters::DuckDBConnector;
    use anyhow::Result;

    #[tokio::test]
    async fn test_profile_small_table() -> Result<()> {
        let connector = DuckDBConnector::in_memory()?;
        let mut sql = String::from("CREATE TABLE people (id INTEGER, name VARCHAR, team VARCHAR, blob BLOB);\n");
        for i in 0..20 {
            sql.push_str(&format!(
                "INSERT INTO people VALUES ({}, 'person_{}', '{}', NULL);\n",
                i,
                i,
                if i % 2 == 0 { "red" } else { "blue" }
            ));
        }
        connector.execute(&sql)?;

        let batch = BatchKwargs::table("mem", Some("main"), "people");
        let suite = SampleSuiteProfiler::profile(&connector, &batch, "people.warning", "SqlAlchemyDataset").await?;

        // table (2) + id numeric (5) + name text (2) + team categorical (2); blob is all-null
        assert_eq!(suite.expectations.len(), 11);
        assert_eq!(suite.columns(), vec!["id", "name", "team"]);
        assert!(suite.expectations.contains(&Expectation::ExpectColumnDistinctValuesToBeInSet {
            column: "team".into(),
            value_set: vec!["blue".into(), "red".into()],
        }));
        assert!(suite.expectations.contains(&Expectation::ExpectColumnMedianToBeBetween {
            column: "id".into(),
            min_value: 9.5,
            max_value: 9.5,
        }));
        let meta = suite.meta.profiled_with.unwrap();
        assert_eq!(meta.batch_kwargs, batch);
        Ok(())
    }
}
