// gx-core/src/application/validator.rs

use chrono::Utc;
use tracing::{debug, info, instrument};

use crate::application::metrics::Metrics;
use crate::domain::batch::BatchKwargs;
use crate::domain::expectations::{Expectation, ExpectationSuite, suite::GX_VERSION};
use crate::domain::validation::{
    ExpectationValidationResult, Observation, RunId, SuiteValidationResult, ValidationMeta,
    evaluate,
};
use crate::error::GxError;
use crate::ports::connector::Connector;

/// Runs every expectation of a suite against a batch.
///
/// A rule whose metric query fails is recorded as an unsuccessful result
/// with the engine message, the run itself carries on.
#[instrument(skip(connector, batch, suite, run_id), fields(suite = %suite.name(), run_id = %run_id))]
pub async fn validate(
    connector: &dyn Connector,
    batch: &BatchKwargs,
    suite: &ExpectationSuite,
    run_id: RunId,
) -> Result<SuiteValidationResult, GxError> {
    let metrics = Metrics::new(connector, batch.relation());

    let mut results = Vec::with_capacity(suite.expectations.len());
    for expectation in &suite.expectations {
        let result = match observe(&metrics, expectation).await {
            Ok(observation) => evaluate(expectation, &observation),
            Err(e) => {
                debug!(expectation = expectation.expectation_type(), error = %e, "Metric failed");
                ExpectationValidationResult::errored(expectation, e.to_string())
            }
        };
        results.push(result);
    }

    let result = SuiteValidationResult::new(
        results,
        ValidationMeta {
            expectation_suite_name: suite.name().to_string(),
            run_id,
            batch_kwargs: batch.clone(),
            batch_fingerprint: batch.fingerprint(),
            validation_time: Utc::now().to_rfc3339(),
            version: GX_VERSION.to_string(),
        },
    );
    info!(
        success = result.success,
        evaluated = result.statistics.evaluated_expectations,
        "Validation finished"
    );
    Ok(result)
}

async fn observe(metrics: &Metrics<'_>, expectation: &Expectation) -> Result<Observation, GxError> {
    use Expectation as E;

    let observation = match expectation {
        E::ExpectTableRowCountToBeBetween { .. } => Observation::RowCount(metrics.row_count().await?),
        E::ExpectTableColumnsToMatchOrderedList { .. } => {
            Observation::Columns(metrics.column_names().await?)
        }
        E::ExpectColumnValuesToNotBeNull { column, .. } => Observation::NullCount {
            element_count: metrics.row_count().await?,
            null_count: metrics.null_count(column).await?,
        },
        E::ExpectColumnMinToBeBetween { column, .. } => Observation::Value(metrics.min(column).await?),
        E::ExpectColumnMaxToBeBetween { column, .. } => Observation::Value(metrics.max(column).await?),
        E::ExpectColumnMeanToBeBetween { column, .. } => {
            Observation::Value(metrics.mean(column).await?)
        }
        E::ExpectColumnMedianToBeBetween { column, .. } => {
            Observation::Value(metrics.median(column).await?)
        }
        E::ExpectColumnValueLengthsToBeBetween {
            column,
            min_value,
            max_value,
        } => {
            let element_count = metrics.row_count().await?;
            let nulls = metrics.null_count(column).await?;
            let (min_length, max_length) = metrics.length_range(column).await?;
            Observation::LengthsOutside {
                element_count,
                nonnull_count: element_count.saturating_sub(nulls),
                unexpected_count: metrics.lengths_outside(column, *min_value, *max_value).await?,
                min_length,
                max_length,
            }
        }
        E::ExpectColumnDistinctValuesToBeInSet { column, .. } => {
            Observation::DistinctValues(metrics.distinct_values(column).await?)
        }
    };
    Ok(observation)
}
