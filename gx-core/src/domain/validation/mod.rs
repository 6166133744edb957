// gx-core/src/domain/validation/mod.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use std::path::PathBuf;

use crate::domain::batch::BatchKwargs;
use crate::domain::expectations::Expectation;

/// UTC timestamp identifying one validation run, e.g. `20191121T104217.354209Z`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(String);

impl RunId {
    pub const FORMAT: &'static str = "%Y%m%dT%H%M%S%.6fZ";

    pub fn now() -> Self {
        Self::from_time(Utc::now())
    }

    pub fn from_time(time: DateTime<Utc>) -> Self {
        Self(time.format(Self::FORMAT).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RunId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Address of a stored validation result: `<suite>/<run_id>/<fingerprint>`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ValidationKey {
    pub suite: String,
    pub run_id: RunId,
    pub fingerprint: String,
}

impl ValidationKey {
    pub fn relative_path(&self, extension: &str) -> PathBuf {
        PathBuf::from(&self.suite)
            .join(self.run_id.as_str())
            .join(format!("{}.{}", self.fingerprint, extension))
    }
}

/// What the engine measured for one expectation.
#[derive(Debug, Clone, PartialEq)]
pub enum Observation {
    RowCount(u64),
    Columns(Vec<String>),
    NullCount {
        element_count: u64,
        null_count: u64,
    },
    Value(Option<f64>),
    LengthsOutside {
        element_count: u64,
        nonnull_count: u64,
        unexpected_count: u64,
        min_length: Option<u64>,
        max_length: Option<u64>,
    },
    DistinctValues(Vec<String>),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObservedResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed_value: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unexpected_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unexpected_percent: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectationValidationResult {
    pub success: bool,
    pub expectation_config: Expectation,
    pub result: ObservedResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exception_info: Option<String>,
}

impl ExpectationValidationResult {
    /// A rule the engine could not measure counts as failed.
    pub fn errored(expectation: &Expectation, message: String) -> Self {
        Self {
            success: false,
            expectation_config: expectation.clone(),
            result: ObservedResult::default(),
            exception_info: Some(message),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationStatistics {
    pub evaluated_expectations: usize,
    pub successful_expectations: usize,
    pub unsuccessful_expectations: usize,
    pub success_percent: Option<f64>,
}

impl ValidationStatistics {
    pub fn from_results(results: &[ExpectationValidationResult]) -> Self {
        let evaluated = results.len();
        let successful = results.iter().filter(|r| r.success).count();
        Self {
            evaluated_expectations: evaluated,
            successful_expectations: successful,
            unsuccessful_expectations: evaluated - successful,
            success_percent: (evaluated > 0)
                .then(|| successful as f64 / evaluated as f64 * 100.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationMeta {
    pub expectation_suite_name: String,
    pub run_id: RunId,
    pub batch_kwargs: BatchKwargs,
    pub batch_fingerprint: String,
    pub validation_time: String,
    #[serde(rename = "great_expectations.__version__")]
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuiteValidationResult {
    pub success: bool,
    pub statistics: ValidationStatistics,
    pub results: Vec<ExpectationValidationResult>,
    pub meta: ValidationMeta,
}

impl SuiteValidationResult {
    pub fn new(results: Vec<ExpectationValidationResult>, meta: ValidationMeta) -> Self {
        Self {
            success: results.iter().all(|r| r.success),
            statistics: ValidationStatistics::from_results(&results),
            results,
            meta,
        }
    }

    pub fn key(&self) -> ValidationKey {
        ValidationKey {
            suite: self.meta.expectation_suite_name.clone(),
            run_id: self.meta.run_id.clone(),
            fingerprint: self.meta.batch_fingerprint.clone(),
        }
    }
}

/// Judges one expectation against what was observed for it.
pub fn evaluate(expectation: &Expectation, observation: &Observation) -> ExpectationValidationResult {
    use Expectation as E;
    use Observation as O;

    let (success, result) = match (expectation, observation) {
        (E::ExpectTableRowCountToBeBetween { min_value, max_value }, O::RowCount(n)) => (
            (*min_value..=*max_value).contains(n),
            ObservedResult {
                observed_value: Some(json!(n)),
                ..Default::default()
            },
        ),
        (E::ExpectTableColumnsToMatchOrderedList { column_list }, O::Columns(columns)) => (
            column_list == columns,
            ObservedResult {
                observed_value: Some(json!(columns)),
                ..Default::default()
            },
        ),
        (
            E::ExpectColumnValuesToNotBeNull { mostly, .. },
            O::NullCount {
                element_count,
                null_count,
            },
        ) => {
            let ratio = ratio_of(*element_count - (*null_count).min(*element_count), *element_count);
            let success = match mostly {
                Some(m) => ratio >= *m,
                None => *null_count == 0,
            };
            (
                success,
                ObservedResult {
                    element_count: Some(*element_count),
                    unexpected_count: Some(*null_count),
                    unexpected_percent: Some(percent_of(*null_count, *element_count)),
                    ..Default::default()
                },
            )
        }
        (E::ExpectColumnMinToBeBetween { min_value, max_value, .. }, O::Value(v))
        | (E::ExpectColumnMaxToBeBetween { min_value, max_value, .. }, O::Value(v))
        | (E::ExpectColumnMeanToBeBetween { min_value, max_value, .. }, O::Value(v))
        | (E::ExpectColumnMedianToBeBetween { min_value, max_value, .. }, O::Value(v)) => (
            v.is_some_and(|v| within(v, *min_value, *max_value)),
            ObservedResult {
                observed_value: Some(json!(v)),
                ..Default::default()
            },
        ),
        (
            E::ExpectColumnValueLengthsToBeBetween { .. },
            O::LengthsOutside {
                element_count,
                nonnull_count,
                unexpected_count,
                min_length,
                max_length,
            },
        ) => (
            *unexpected_count == 0,
            ObservedResult {
                observed_value: Some(json!({ "min": min_length, "max": max_length })),
                element_count: Some(*element_count),
                unexpected_count: Some(*unexpected_count),
                unexpected_percent: Some(percent_of(*unexpected_count, *nonnull_count)),
            },
        ),
        (E::ExpectColumnDistinctValuesToBeInSet { value_set, .. }, O::DistinctValues(values)) => (
            values.iter().all(|v| value_set.contains(v)),
            ObservedResult {
                observed_value: Some(json!(values)),
                ..Default::default()
            },
        ),
        (expectation, observation) => {
            return ExpectationValidationResult::errored(
                expectation,
                format!(
                    "{} cannot be judged from {:?}",
                    expectation.expectation_type(),
                    observation
                ),
            );
        }
    };

    ExpectationValidationResult {
        success,
        expectation_config: expectation.clone(),
        result,
        exception_info: None,
    }
}

// Pinned values come back from the engine through a float cast
fn within(value: f64, min: f64, max: f64) -> bool {
    let tolerance = 1e-9 * value.abs().max(1.0);
    value >= min - tolerance && value <= max + tolerance
}

fn ratio_of(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        1.0
    } else {
        part as f64 / whole as f64
    }
}

fn percent_of(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;
    use chrono::TimeZone;
    use regex::Regex;

    #[test]
    fn test_run_id_format() -> Result<()> {
        let time = Utc.with_ymd_and_hms(2019, 11, 21, 10, 42, 17).unwrap();
        let run_id = RunId::from_time(time);
        assert_eq!(run_id.as_str(), "20191121T104217.000000Z");
        assert!(Regex::new(r"^\d*T\d*\.\d*Z$")?.is_match(RunId::now().as_str()));
        Ok(())
    }

    #[test]
    fn test_key_path() {
        let key = ValidationKey {
            suite: "warning".into(),
            run_id: RunId::from("20191121T104217.354209Z"),
            fingerprint: "ab".repeat(16),
        };
        assert_eq!(
            key.relative_path("json"),
            PathBuf::from("warning/20191121T104217.354209Z").join(format!("{}.json", "ab".repeat(16)))
        );
    }

    #[test]
    fn test_not_null_with_mostly() {
        let rule = Expectation::ExpectColumnValuesToNotBeNull {
            column: "Age".into(),
            mostly: Some(0.85),
        };
        let ok = evaluate(
            &rule,
            &Observation::NullCount {
                element_count: 1313,
                null_count: 188,
            },
        );
        assert!(ok.success);
        assert_eq!(ok.result.unexpected_count, Some(188));

        let ko = evaluate(
            &rule,
            &Observation::NullCount {
                element_count: 100,
                null_count: 50,
            },
        );
        assert!(!ko.success);
    }

    #[test]
    fn test_pinned_value_tolerates_float_noise() {
        let rule = Expectation::ExpectColumnMeanToBeBetween {
            column: "Age".into(),
            min_value: 30.397989417989418,
            max_value: 30.397989417989418,
        };
        assert!(evaluate(&rule, &Observation::Value(Some(30.39798941798942))).success);
        assert!(!evaluate(&rule, &Observation::Value(Some(31.0))).success);
        assert!(!evaluate(&rule, &Observation::Value(None)).success);
    }

    #[test]
    fn test_distinct_values_in_set() {
        let rule = Expectation::ExpectColumnDistinctValuesToBeInSet {
            column: "Sex".into(),
            value_set: vec!["female".into(), "male".into()],
        };
        assert!(evaluate(&rule, &Observation::DistinctValues(vec!["male".into()])).success);
        assert!(!evaluate(&rule, &Observation::DistinctValues(vec!["other".into()])).success);
    }

    #[test]
    fn test_mismatched_observation_is_an_error_result() {
        let rule = Expectation::ExpectTableRowCountToBeBetween {
            min_value: 1,
            max_value: 2,
        };
        let result = evaluate(&rule, &Observation::Value(Some(1.0)));
        assert!(!result.success);
        assert!(result.exception_info.is_some());
    }

    #[test]
    fn test_statistics() {
        let rule = Expectation::ExpectTableRowCountToBeBetween {
            min_value: 1,
            max_value: 2,
        };
        let results = vec![
            evaluate(&rule, &Observation::RowCount(1)),
            evaluate(&rule, &Observation::RowCount(5)),
        ];
        let stats = ValidationStatistics::from_results(&results);
        assert_eq!(stats.evaluated_expectations, 2);
        assert_eq!(stats.successful_expectations, 1);
        assert_eq!(stats.success_percent, Some(50.0));
    }
}
