//! Result table schema: which columns to read and how to split rows

use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Which measurement a result table holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    /// Approximation deviation from the lower bound (lower is better)
    Epsilon,
    /// Algorithm runtime in seconds
    RuntimeSeconds,
}

impl MetricKind {
    /// Conventional column name for this metric.
    #[must_use]
    pub const fn default_column(self) -> &'static str {
        match self {
            Self::Epsilon => "epsilon",
            Self::RuntimeSeconds => "time_sec",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Epsilon => "epsilon",
            Self::RuntimeSeconds => "runtime (s)",
        })
    }
}

/// Expected layout of a delimited result table.
///
/// Column names are matched case-insensitively after trimming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    metric: MetricKind,
    algorithm_column: String,
    input_size_column: String,
    universe_column: Option<String>,
    metric_column: String,
    delimiter: char,
}

impl TableSchema {
    /// Schema with conventional column names (`alg`, `m`, `n`, metric default) and `,` delimiter.
    #[must_use]
    pub fn new(metric: MetricKind) -> Self {
        Self {
            metric,
            algorithm_column: "alg".to_string(),
            input_size_column: "m".to_string(),
            universe_column: Some("n".to_string()),
            metric_column: metric.default_column().to_string(),
            delimiter: ',',
        }
    }

    /// Set the algorithm label column.
    #[must_use]
    pub fn algorithm_column(mut self, name: impl Into<String>) -> Self {
        self.algorithm_column = normalize(&name.into());
        self
    }

    /// Set the input size column.
    #[must_use]
    pub fn input_size_column(mut self, name: impl Into<String>) -> Self {
        self.input_size_column = normalize(&name.into());
        self
    }

    /// Set the optional universe column. An empty name disables it.
    #[must_use]
    pub fn universe_column(mut self, name: impl Into<String>) -> Self {
        let name = normalize(&name.into());
        self.universe_column = (!name.is_empty()).then_some(name);
        self
    }

    /// Set the metric column.
    #[must_use]
    pub fn metric_column(mut self, name: impl Into<String>) -> Self {
        self.metric_column = normalize(&name.into());
        self
    }

    /// Set the field delimiter.
    #[must_use]
    pub const fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Metric kind of tables read with this schema.
    #[must_use]
    pub const fn metric(&self) -> MetricKind {
        self.metric
    }

    /// Field delimiter.
    #[must_use]
    pub const fn field_delimiter(&self) -> char {
        self.delimiter
    }

    /// Name of the metric column.
    #[must_use]
    pub fn metric_column_name(&self) -> &str {
        &self.metric_column
    }

    /// Locate the schema columns in a header row.
    pub(crate) fn locate(&self, header: &str) -> HeaderIndex {
        let names: Vec<String> = header.split(self.delimiter).map(normalize).collect();
        let find = |wanted: &str| names.iter().position(|n| n == wanted);
        HeaderIndex {
            algorithm: find(&self.algorithm_column),
            input_size: find(&self.input_size_column),
            universe: self.universe_column.as_deref().and_then(find),
            metric: find(&self.metric_column),
        }
    }

    /// Names of required columns missing from a located header.
    pub(crate) fn missing(&self, index: &HeaderIndex) -> Vec<&str> {
        [
            (index.algorithm, self.algorithm_column.as_str()),
            (index.input_size, self.input_size_column.as_str()),
            (index.metric, self.metric_column.as_str()),
        ]
        .into_iter()
        .filter_map(|(position, name)| position.is_none().then_some(name))
        .collect()
    }
}

/// Column positions found in a header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct HeaderIndex {
    pub algorithm: Option<usize>,
    pub input_size: Option<usize>,
    pub universe: Option<usize>,
    pub metric: Option<usize>,
}

fn normalize(name: &str) -> String {
    unquote(name).to_lowercase()
}

/// Trim a field and drop one pair of surrounding double quotes.
pub(crate) fn unquote(field: &str) -> &str {
    let field = field.trim();
    field
        .strip_prefix('"')
        .and_then(|f| f.strip_suffix('"'))
        .map_or(field, str::trim)
}

/// Arrow schema of the in-memory result table.
#[must_use]
pub fn arrow_schema(metric: MetricKind) -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new(ALGORITHM_FIELD, DataType::Utf8, false),
        Field::new(INPUT_SIZE_FIELD, DataType::UInt64, false),
        Field::new(UNIVERSE_FIELD, DataType::UInt64, true),
        Field::new(metric.default_column(), DataType::Float64, false),
    ]))
}

/// Arrow field name of the algorithm column
pub const ALGORITHM_FIELD: &str = "alg";
/// Arrow field name of the input size column
pub const INPUT_SIZE_FIELD: &str = "m";
/// Arrow field name of the universe column
pub const UNIVERSE_FIELD: &str = "n";
