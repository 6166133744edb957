// gx-core/src/domain/expectations/expectation.rs

use serde::{Deserialize, Serialize};

/// A single validation rule.
///
/// Serialised the way suites are stored on disk:
/// `{"expectation_type": "expect_...", "kwargs": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "expectation_type", content = "kwargs", rename_all = "snake_case")]
pub enum Expectation {
    ExpectTableRowCountToBeBetween {
        min_value: u64,
        max_value: u64,
    },
    ExpectTableColumnsToMatchOrderedList {
        column_list: Vec<String>,
    },
    ExpectColumnValuesToNotBeNull {
        column: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        mostly: Option<f64>,
    },
    ExpectColumnMinToBeBetween {
        column: String,
        min_value: f64,
        max_value: f64,
    },
    ExpectColumnMaxToBeBetween {
        column: String,
        min_value: f64,
        max_value: f64,
    },
    ExpectColumnMeanToBeBetween {
        column: String,
        min_value: f64,
        max_value: f64,
    },
    ExpectColumnMedianToBeBetween {
        column: String,
        min_value: f64,
        max_value: f64,
    },
    ExpectColumnValueLengthsToBeBetween {
        column: String,
        min_value: u64,
        max_value: u64,
    },
    ExpectColumnDistinctValuesToBeInSet {
        column: String,
        value_set: Vec<String>,
    },
}

impl Expectation {
    pub fn expectation_type(&self) -> &'static str {
        match self {
            Self::ExpectTableRowCountToBeBetween { .. } => "expect_table_row_count_to_be_between",
            Self::ExpectTableColumnsToMatchOrderedList { .. } => {
                "expect_table_columns_to_match_ordered_list"
            }
            Self::ExpectColumnValuesToNotBeNull { .. } => "expect_column_values_to_not_be_null",
            Self::ExpectColumnMinToBeBetween { .. } => "expect_column_min_to_be_between",
            Self::ExpectColumnMaxToBeBetween { .. } => "expect_column_max_to_be_between",
            Self::ExpectColumnMeanToBeBetween { .. } => "expect_column_mean_to_be_between",
            Self::ExpectColumnMedianToBeBetween { .. } => "expect_column_median_to_be_between",
            Self::ExpectColumnValueLengthsToBeBetween { .. } => {
                "expect_column_value_lengths_to_be_between"
            }
            Self::ExpectColumnDistinctValuesToBeInSet { .. } => {
                "expect_column_distinct_values_to_be_in_set"
            }
        }
    }

    /// Column the rule applies to; `None` for table-level rules.
    pub fn column(&self) -> Option<&str> {
        match self {
            Self::ExpectTableRowCountToBeBetween { .. }
            | Self::ExpectTableColumnsToMatchOrderedList { .. } => None,
            Self::ExpectColumnValuesToNotBeNull { column, .. }
            | Self::ExpectColumnMinToBeBetween { column, .. }
            | Self::ExpectColumnMaxToBeBetween { column, .. }
            | Self::ExpectColumnMeanToBeBetween { column, .. }
            | Self::ExpectColumnMedianToBeBetween { column, .. }
            | Self::ExpectColumnValueLengthsToBeBetween { column, .. }
            | Self::ExpectColumnDistinctValuesToBeInSet { column, .. } => Some(column),
        }
    }

    /// Plain-English rendering used by Data Docs.
    pub fn describe(&self) -> String {
        match self {
            Self::ExpectTableRowCountToBeBetween {
                min_value,
                max_value,
            } => format!(
                "Must have between {} and {} rows.",
                min_value, max_value
            ),
            Self::ExpectTableColumnsToMatchOrderedList { column_list } => format!(
                "Must have these columns in this order: {}",
                column_list.join(", ")
            ),
            Self::ExpectColumnValuesToNotBeNull { mostly, .. } => match mostly {
                Some(m) => format!(
                    "values must not be null, at least {}% of the time.",
                    format_percent(*m)
                ),
                None => "values must never be null.".to_string(),
            },
            Self::ExpectColumnMinToBeBetween {
                min_value,
                max_value,
                ..
            } => range_sentence("minimum value", *min_value, *max_value),
            Self::ExpectColumnMaxToBeBetween {
                min_value,
                max_value,
                ..
            } => range_sentence("maximum value", *min_value, *max_value),
            Self::ExpectColumnMeanToBeBetween {
                min_value,
                max_value,
                ..
            } => range_sentence("mean", *min_value, *max_value),
            Self::ExpectColumnMedianToBeBetween {
                min_value,
                max_value,
                ..
            } => range_sentence("median", *min_value, *max_value),
            Self::ExpectColumnValueLengthsToBeBetween {
                min_value,
                max_value,
                ..
            } => format!(
                "values must be between {} and {} characters long.",
                min_value, max_value
            ),
            Self::ExpectColumnDistinctValuesToBeInSet { value_set, .. } => format!(
                "distinct values must belong to this set: {}.",
                value_set.join(" ")
            ),
        }
    }
}

fn range_sentence(what: &str, min: f64, max: f64) -> String {
    if (min - max).abs() < f64::EPSILON {
        format!("{} must be exactly {}.", what, format_number(min))
    } else {
        format!(
            "{} must be between {} and {}.",
            what,
            format_number(min),
            format_number(max)
        )
    }
}

pub(crate) fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        let rounded = format!("{:.4}", value);
        rounded
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    }
}

fn format_percent(ratio: f64) -> String {
    format_number(ratio * 100.0)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn test_serialises_with_type_and_kwargs() -> Result<()> {
        let exp = Expectation::ExpectColumnValuesToNotBeNull {
            column: "Age".into(),
            mostly: Some(0.57),
        };
        let json = serde_json::to_value(&exp)?;
        assert_eq!(
            json,
            serde_json::json!({
                "expectation_type": "expect_column_values_to_not_be_null",
                "kwargs": {"column": "Age", "mostly": 0.57}
            })
        );
        assert_eq!(json["expectation_type"], exp.expectation_type());
        Ok(())
    }

    #[test]
    fn test_mostly_is_omitted_when_absent() -> Result<()> {
        let exp = Expectation::ExpectColumnValuesToNotBeNull {
            column: "Name".into(),
            mostly: None,
        };
        let json = serde_json::to_string(&exp)?;
        assert!(!json.contains("mostly"));
        let back: Expectation = serde_json::from_str(&json)?;
        assert_eq!(back, exp);
        Ok(())
    }

    #[test]
    fn test_column_accessor() {
        let table = Expectation::ExpectTableRowCountToBeBetween {
            min_value: 1,
            max_value: 2,
        };
        assert_eq!(table.column(), None);

        let col = Expectation::ExpectColumnDistinctValuesToBeInSet {
            column: "Sex".into(),
            value_set: vec!["female".into(), "male".into()],
        };
        assert_eq!(col.column(), Some("Sex"));
    }

    #[test]
    fn test_describe_reads_naturally() {
        let exp = Expectation::ExpectColumnMeanToBeBetween {
            column: "Age".into(),
            min_value: 30.3975,
            max_value: 30.3975,
        };
        assert_eq!(exp.describe(), "mean must be exactly 30.3975.");

        let exp = Expectation::ExpectColumnValuesToNotBeNull {
            column: "Age".into(),
            mostly: Some(0.85),
        };
        assert_eq!(
            exp.describe(),
            "values must not be null, at least 85% of the time."
        );
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(1.0 / 3.0), "0.3333");
    }
}
