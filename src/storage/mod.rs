//! Result table storage (Arrow columnar format)
//!
//! Experiment result tables are small delimited text files with a header row.
//! Loading is tolerant: each field and header name is trimmed and loses one
//! pair of surrounding double quotes, blank lines are ignored, and a row that
//! cannot be read (bad UTF-8 included) is dropped on its own. Only failing to
//! open or read the file is an error.
//!
//! Loaded rows are kept as a single Arrow `RecordBatch`:
//!
//! ```text
//! alg: Utf8 | m: UInt64 | n: UInt64 (nullable) | epsilon|time_sec: Float64
//! ```
//!
//! ## Example
//!
//! ```rust
//! use packstat::storage::{MetricKind, ResultTable, TableSchema};
//!
//! let text = "alg, m, epsilon\nNFDH, 500, 0.12\nFFDH, 500, 0.08\nFFDH, x, 0.1\n";
//! let table = ResultTable::from_reader(text.as_bytes(), &TableSchema::new(MetricKind::Epsilon))?;
//! assert_eq!(table.len(), 2);
//! assert_eq!(table.dropped_rows(), 1);
//! # Ok::<(), packstat::Error>(())
//! ```

mod schema;

pub use schema::{
    arrow_schema, MetricKind, TableSchema, ALGORITHM_FIELD, INPUT_SIZE_FIELD, UNIVERSE_FIELD,
};

use crate::lines::raw_lines;
use crate::{Error, Result};
use arrow::array::{Array, Float64Array, StringArray, UInt64Array};
use arrow::record_batch::RecordBatch;
use schema::{unquote, HeaderIndex};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// One row of a result table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    /// Algorithm label
    pub algorithm: String,
    /// Input size (number of tasks)
    pub input_size: u64,
    /// Resource universe size, when the table records it
    pub universe: Option<u64>,
    /// Metric value (epsilon or runtime in seconds)
    pub metric: f64,
}

impl ResultRecord {
    /// Create a record without a universe size.
    #[must_use]
    pub fn new(algorithm: impl Into<String>, input_size: u64, metric: f64) -> Self {
        Self {
            algorithm: algorithm.into(),
            input_size,
            universe: None,
            metric,
        }
    }

    /// Attach a universe size.
    #[must_use]
    pub const fn with_universe(mut self, universe: u64) -> Self {
        self.universe = Some(universe);
        self
    }
}

/// A loaded result table.
#[derive(Debug, Clone)]
pub struct ResultTable {
    metric: MetricKind,
    batch: RecordBatch,
    source: Option<PathBuf>,
    dropped_rows: usize,
}

impl ResultTable {
    /// Load a table from a file.
    ///
    /// # Errors
    ///
    /// Returns `TableUnreadable` if the file cannot be opened or read.
    pub fn load<P: AsRef<Path>>(path: P, schema: &TableSchema) -> Result<Self> {
        let path = path.as_ref();
        let unreadable = |source| Error::TableUnreadable {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(unreadable)?;
        let mut table = Self::from_reader(BufReader::new(file), schema).map_err(|e| match e {
            Error::Io(source) => unreadable(source),
            other => other,
        })?;
        table.source = Some(path.to_path_buf());

        tracing::info!(
            path = %path.display(),
            metric = %table.metric,
            rows = table.len(),
            dropped = table.dropped_rows,
            "loaded result table"
        );
        Ok(table)
    }

    /// Read a table from any buffered reader.
    ///
    /// # Errors
    ///
    /// Returns `Io` if reading fails. Rows that are not valid UTF-8 are
    /// dropped like any other malformed row.
    pub fn from_reader<R: BufRead>(reader: R, schema: &TableSchema) -> Result<Self> {
        let mut lines = raw_lines(reader);
        let mut header = None;
        for line in lines.by_ref() {
            let line = line?.unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned());
            if !line.trim().is_empty() {
                header = Some(line);
                break;
            }
        }
        let Some(header) = header else {
            return Self::from_records(schema.metric(), Vec::new());
        };

        let index = schema.locate(&header);
        let missing = schema.missing(&index);
        if !missing.is_empty() {
            tracing::warn!(?missing, "result table header lacks required columns; rows will be dropped");
        }

        let mut records = Vec::new();
        let mut dropped_rows = 0;
        for (number, line) in lines.enumerate() {
            let Ok(line) = line? else {
                tracing::debug!(row = number + 1, "dropped result row that is not valid UTF-8");
                dropped_rows += 1;
                continue;
            };
            if line.trim().is_empty() {
                continue;
            }
            match parse_row(&line, schema.field_delimiter(), &index) {
                Some(record) => records.push(record),
                None => {
                    tracing::debug!(row = number + 1, "dropped malformed result row");
                    dropped_rows += 1;
                }
            }
        }

        let mut table = Self::from_records(schema.metric(), records)?;
        table.dropped_rows = dropped_rows;
        Ok(table)
    }

    /// Build a table from records.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if a record has an empty algorithm label or a
    /// negative or non-finite metric, and `Arrow` if the batch cannot be
    /// assembled.
    pub fn from_records(metric: MetricKind, records: Vec<ResultRecord>) -> Result<Self> {
        if let Some(bad) = records
            .iter()
            .find(|r| r.algorithm.is_empty() || !valid_metric(r.metric))
        {
            return Err(Error::InvalidInput(format!(
                "invalid result record: algorithm '{}', {metric} {}",
                bad.algorithm, bad.metric
            )));
        }

        let algorithms = StringArray::from_iter_values(records.iter().map(|r| r.algorithm.as_str()));
        let sizes = UInt64Array::from_iter_values(records.iter().map(|r| r.input_size));
        let universes: UInt64Array = records.iter().map(|r| r.universe).collect();
        let metrics = Float64Array::from_iter_values(records.iter().map(|r| r.metric));

        let batch = RecordBatch::try_new(
            arrow_schema(metric),
            vec![
                Arc::new(algorithms),
                Arc::new(sizes),
                Arc::new(universes),
                Arc::new(metrics),
            ],
        )?;

        Ok(Self {
            metric,
            batch,
            source: None,
            dropped_rows: 0,
        })
    }

    /// Wrap an existing Arrow batch.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the batch does not have the result-table layout.
    pub fn try_from_batch(batch: RecordBatch) -> Result<Self> {
        let metric = match batch.schema().fields().get(3).map(|f| f.name().as_str()) {
            Some(name) if name == MetricKind::Epsilon.default_column() => MetricKind::Epsilon,
            Some(name) if name == MetricKind::RuntimeSeconds.default_column() => {
                MetricKind::RuntimeSeconds
            }
            other => {
                return Err(Error::StorageError(format!(
                    "Unknown metric column {other:?}"
                )))
            }
        };
        let expected = arrow_schema(metric);
        if batch.schema() != expected {
            return Err(Error::StorageError(format!(
                "Schema mismatch: expected {:?}, got {:?}",
                expected,
                batch.schema()
            )));
        }
        Ok(Self {
            metric,
            batch,
            source: None,
            dropped_rows: 0,
        })
    }

    /// Metric held by this table.
    #[must_use]
    pub const fn metric(&self) -> MetricKind {
        self.metric
    }

    /// File the table was loaded from, if any.
    #[must_use]
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Number of rows dropped while loading.
    #[must_use]
    pub const fn dropped_rows(&self) -> usize {
        self.dropped_rows
    }

    /// Number of rows kept.
    #[must_use]
    pub fn len(&self) -> usize {
        self.batch.num_rows()
    }

    /// Whether no rows were kept.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.batch.num_rows() == 0
    }

    /// Underlying Arrow batch.
    #[must_use]
    pub const fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    /// All rows, in file order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if a column has an unexpected type.
    pub fn records(&self) -> Result<Vec<ResultRecord>> {
        let columns = self.columns()?;
        Ok((0..self.len()).map(|row| columns.record(row)).collect())
    }

    /// Metric values of one algorithm, in file order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if a column has an unexpected type.
    pub fn values_for(&self, algorithm: &str) -> Result<Vec<f64>> {
        let columns = self.columns()?;
        Ok((0..self.len())
            .filter(|&row| columns.algorithm.value(row) == algorithm)
            .map(|row| columns.metric.value(row))
            .collect())
    }

    /// Distinct algorithm labels in first-encountered order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if a column has an unexpected type.
    pub fn algorithms(&self) -> Result<Vec<String>> {
        let columns = self.columns()?;
        let mut labels: Vec<String> = Vec::new();
        for row in 0..self.len() {
            let label = columns.algorithm.value(row);
            if !labels.iter().any(|l| l == label) {
                labels.push(label.to_string());
            }
        }
        Ok(labels)
    }

    fn columns(&self) -> Result<Columns<'_>> {
        fn column<'a, T: 'static>(batch: &'a RecordBatch, index: usize, name: &str) -> Result<&'a T> {
            batch
                .column(index)
                .as_any()
                .downcast_ref::<T>()
                .ok_or_else(|| Error::StorageError(format!("Column '{name}' has an unexpected type")))
        }

        Ok(Columns {
            algorithm: column(&self.batch, 0, ALGORITHM_FIELD)?,
            input_size: column(&self.batch, 1, INPUT_SIZE_FIELD)?,
            universe: column(&self.batch, 2, UNIVERSE_FIELD)?,
            metric: column(&self.batch, 3, self.metric.default_column())?,
        })
    }
}

/// Typed views of the batch columns.
struct Columns<'a> {
    algorithm: &'a StringArray,
    input_size: &'a UInt64Array,
    universe: &'a UInt64Array,
    metric: &'a Float64Array,
}

impl Columns<'_> {
    fn record(&self, row: usize) -> ResultRecord {
        ResultRecord {
            algorithm: self.algorithm.value(row).to_string(),
            input_size: self.input_size.value(row),
            universe: self
                .universe
                .is_valid(row)
                .then(|| self.universe.value(row)),
            metric: self.metric.value(row),
        }
    }
}

/// Metrics are non-negative finite numbers (epsilon and seconds alike).
fn valid_metric(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

/// Parse one data row, or `None` if it must be dropped.
fn parse_row(line: &str, delimiter: char, index: &HeaderIndex) -> Option<ResultRecord> {
    let fields: Vec<&str> = line.split(delimiter).map(unquote).collect();
    let field = |position: Option<usize>| position.and_then(|p| fields.get(p).copied());

    let algorithm = field(index.algorithm).filter(|a| !a.is_empty())?;
    let input_size = field(index.input_size)?.parse::<u64>().ok()?;
    let metric = field(index.metric)?
        .parse::<f64>()
        .ok()
        .filter(|&v| valid_metric(v))?;
    let universe = match field(index.universe) {
        None | Some("") => None,
        Some(text) => Some(text.parse::<u64>().ok()?),
    };

    Some(ResultRecord {
        algorithm: algorithm.to_string(),
        input_size,
        universe,
        metric,
    })
}
