// gx-core/src/domain/profiling/mod.rs
//
// Pure rules of the sample suite profiler: which columns to look at, and
// which expectations to write from the observed statistics. The SQL side
// lives in application::profiler.

use serde::Serialize;

use crate::domain::expectations::Expectation;

pub const PROFILER_NAME: &str = "SampleSuiteProfiler";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColumnKind {
    Numeric,
    Text,
    Other,
}

impl ColumnKind {
    /// Classifies a declared SQL type (SQLite affinity rules, DuckDB type names).
    pub fn from_declared_type(declared: &str) -> Self {
        let upper = declared.to_ascii_uppercase();
        if upper.contains("INTERVAL") {
            return Self::Other;
        }
        if ["CHAR", "CLOB", "TEXT", "STRING", "UUID"]
            .iter()
            .any(|t| upper.contains(t))
        {
            return Self::Text;
        }
        if ["INT", "REAL", "FLOA", "DOUB", "NUMERIC", "DECIMAL"]
            .iter()
            .any(|t| upper.contains(t))
        {
            return Self::Numeric;
        }
        Self::Other
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Cardinality {
    /// Only nulls.
    Empty,
    /// At most `FEW_MAX_DISTINCT` distinct values.
    Few,
    /// Every non-null value is distinct.
    Unique,
    Many,
}

impl Cardinality {
    pub const FEW_MAX_DISTINCT: u64 = 10;

    pub fn classify(non_null: u64, distinct: u64) -> Self {
        if non_null == 0 {
            Self::Empty
        } else if distinct <= Self::FEW_MAX_DISTINCT {
            Self::Few
        } else if distinct == non_null {
            Self::Unique
        } else {
            Self::Many
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub name: String,
    pub kind: ColumnKind,
    pub cardinality: Cardinality,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    Numeric,
    Text,
    Categorical,
}

/// Picks "a couple of columns": the first numeric column with many values,
/// the first text column with many values and the first two low-cardinality
/// columns. Returned in table order as `(index, role)`.
pub fn choose_columns(columns: &[ColumnSummary]) -> Vec<(usize, ColumnRole)> {
    let mut numeric = None;
    let mut text = None;
    let mut categorical = Vec::new();

    for (idx, col) in columns.iter().enumerate() {
        match (col.cardinality, col.kind) {
            (Cardinality::Empty, _) => {}
            (Cardinality::Few, _) => {
                if categorical.len() < 2 {
                    categorical.push(idx);
                }
            }
            (_, ColumnKind::Numeric) => {
                numeric.get_or_insert(idx);
            }
            (_, ColumnKind::Text) => {
                text.get_or_insert(idx);
            }
            (_, ColumnKind::Other) => {}
        }
    }

    let mut chosen: Vec<(usize, ColumnRole)> = categorical
        .into_iter()
        .map(|i| (i, ColumnRole::Categorical))
        .collect();
    if let Some(i) = numeric {
        chosen.push((i, ColumnRole::Numeric));
    }
    if let Some(i) = text {
        chosen.push((i, ColumnRole::Text));
    }
    chosen.sort_by_key(|(i, _)| *i);
    chosen
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableStats {
    pub row_count: u64,
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnStats {
    Numeric {
        column: String,
        null_count: u64,
        min: Option<f64>,
        max: Option<f64>,
        mean: Option<f64>,
        median: Option<f64>,
    },
    Text {
        column: String,
        null_count: u64,
        min_length: Option<u64>,
        max_length: Option<u64>,
    },
    Categorical {
        column: String,
        null_count: u64,
        values: Vec<String>,
    },
}

/// Turns observed statistics into the sample suite's expectations:
/// table rules first, then each profiled column in the given order.
pub fn build_sample_expectations(table: &TableStats, columns: &[ColumnStats]) -> Vec<Expectation> {
    let n = table.row_count;
    let mut expectations = vec![
        Expectation::ExpectTableRowCountToBeBetween {
            min_value: n * 9 / 10,
            max_value: (n * 11).div_ceil(10),
        },
        Expectation::ExpectTableColumnsToMatchOrderedList {
            column_list: table.columns.clone(),
        },
    ];

    for stats in columns {
        match stats {
            ColumnStats::Numeric {
                column,
                null_count,
                min,
                max,
                mean,
                median,
            } => {
                expectations.push(not_null(column, n, *null_count));
                let pinned: [(Option<f64>, fn(String, f64) -> Expectation); 4] = [
                    (*min, |c, v| Expectation::ExpectColumnMinToBeBetween {
                        column: c,
                        min_value: v,
                        max_value: v,
                    }),
                    (*max, |c, v| Expectation::ExpectColumnMaxToBeBetween {
                        column: c,
                        min_value: v,
                        max_value: v,
                    }),
                    (*mean, |c, v| Expectation::ExpectColumnMeanToBeBetween {
                        column: c,
                        min_value: v,
                        max_value: v,
                    }),
                    (*median, |c, v| Expectation::ExpectColumnMedianToBeBetween {
                        column: c,
                        min_value: v,
                        max_value: v,
                    }),
                ];
                for (value, make) in pinned {
                    if let Some(v) = value {
                        expectations.push(make(column.clone(), v));
                    }
                }
            }
            ColumnStats::Text {
                column,
                null_count,
                min_length,
                max_length,
            } => {
                expectations.push(not_null(column, n, *null_count));
                if let (Some(lo), Some(hi)) = (min_length, max_length) {
                    expectations.push(Expectation::ExpectColumnValueLengthsToBeBetween {
                        column: column.clone(),
                        min_value: *lo,
                        max_value: *hi,
                    });
                }
            }
            ColumnStats::Categorical {
                column,
                null_count,
                values,
            } => {
                expectations.push(not_null(column, n, *null_count));
                expectations.push(Expectation::ExpectColumnDistinctValuesToBeInSet {
                    column: column.clone(),
                    value_set: values.clone(),
                });
            }
        }
    }

    expectations
}

fn not_null(column: &str, row_count: u64, null_count: u64) -> Expectation {
    let mostly = if null_count == 0 || row_count == 0 {
        None
    } else {
        let ratio = (row_count - null_count) as f64 / row_count as f64;
        Some((ratio * 100.0).floor() / 100.0)
    };
    Expectation::ExpectColumnValuesToNotBeNull {
        column: column.to_string(),
        mostly,
    }
}
