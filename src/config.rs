//! Analysis configuration
//!
//! Every file-layout convention of the experiment tooling (results and plots
//! directories, well-known table names, column names) lives here and is passed
//! into the pipeline explicitly, so it can run against any directory.
//!
//! ## Example
//!
//! ```rust
//! use packstat::config::AnalysisConfig;
//!
//! let config = AnalysisConfig::builder()
//!     .results_dir("/tmp/run-42/results")
//!     .runtime_universes(vec![1024])
//!     .build()
//!     .unwrap();
//! assert_eq!(config.runtime_table_path(1024).file_name().unwrap(), "time_n1024.csv");
//! ```

use crate::storage::{MetricKind, TableSchema};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Placeholder substituted with the universe size in runtime table names
pub const UNIVERSE_PLACEHOLDER: &str = "{n}";

/// Column names of the result tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    /// Algorithm label column
    pub algorithm: String,
    /// Input size (task count) column
    pub input_size: String,
    /// Optional resource universe column
    pub universe: String,
    /// Deviation metric column
    pub epsilon: String,
    /// Runtime column (seconds)
    pub runtime: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            algorithm: "alg".to_string(),
            input_size: "m".to_string(),
            universe: "n".to_string(),
            epsilon: "epsilon".to_string(),
            runtime: "time_sec".to_string(),
        }
    }
}

/// Configuration of one analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Directory holding result tables
    pub results_dir: PathBuf,
    /// Directory receiving rendered figures
    pub plots_dir: PathBuf,
    /// Mandatory epsilon table of the uniform-random sweep
    pub epsilon_table: String,
    /// Optional epsilon table of the workload-derived sweep
    pub workload_table: String,
    /// Runtime table name pattern, `{n}` is replaced by the universe size
    pub runtime_table_pattern: String,
    /// Universe sizes with runtime tables
    pub runtime_universes: Vec<u64>,
    /// Universe size of the uniform sweep
    pub primary_universe: u64,
    /// Compared algorithm labels, in report order
    pub algorithms: [String; 2],
    /// Column names
    pub columns: ColumnNames,
    /// Field delimiter of result tables
    pub delimiter: char,
    /// Also report a comparison pooled over both epsilon tables
    pub pool_workloads: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            results_dir: PathBuf::from("results"),
            plots_dir: PathBuf::from("plots"),
            epsilon_table: "epsilon_n1024.csv".to_string(),
            workload_table: "epsilon_workload.csv".to_string(),
            runtime_table_pattern: "time_n{n}.csv".to_string(),
            runtime_universes: vec![1024, 4096],
            primary_universe: 1024,
            algorithms: ["NFDH".to_string(), "FFDH".to_string()],
            columns: ColumnNames::default(),
            delimiter: ',',
            pool_workloads: false,
        }
    }
}

impl AnalysisConfig {
    /// Create a builder starting from the defaults.
    #[must_use]
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder::default()
    }

    /// Load a configuration from a JSON file. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be read, `Json` if it is not valid
    /// JSON for this schema, and `Config` if validation fails.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        tracing::debug!(path = %path.as_ref().display(), "loaded analysis config");
        Ok(config)
    }

    /// Check the configuration for values the pipeline cannot work with.
    ///
    /// # Errors
    ///
    /// Returns `Config` describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        if !self.runtime_table_pattern.contains(UNIVERSE_PLACEHOLDER) {
            return Err(Error::Config(format!(
                "runtime_table_pattern '{}' must contain {UNIVERSE_PLACEHOLDER}",
                self.runtime_table_pattern
            )));
        }
        let [first, second] = &self.algorithms;
        if first.trim().is_empty() || second.trim().is_empty() {
            return Err(Error::Config("algorithm labels must not be empty".to_string()));
        }
        if first.trim() == second.trim() {
            return Err(Error::Config(format!(
                "the two compared algorithms must differ (both are '{first}')"
            )));
        }
        if self.delimiter.is_whitespace() {
            return Err(Error::Config(
                "result table delimiter must not be whitespace".to_string(),
            ));
        }
        Ok(())
    }

    /// Path of the mandatory epsilon table.
    #[must_use]
    pub fn epsilon_table_path(&self) -> PathBuf {
        self.results_dir.join(&self.epsilon_table)
    }

    /// Path of the optional workload epsilon table.
    #[must_use]
    pub fn workload_table_path(&self) -> PathBuf {
        self.results_dir.join(&self.workload_table)
    }

    /// Path of the runtime table for universe size `n`.
    #[must_use]
    pub fn runtime_table_path(&self, n: u64) -> PathBuf {
        self.results_dir.join(
            self.runtime_table_pattern
                .replace(UNIVERSE_PLACEHOLDER, &n.to_string()),
        )
    }

    /// Table schema for the given metric, using the configured column names.
    #[must_use]
    pub fn schema(&self, metric: MetricKind) -> TableSchema {
        let metric_column = match metric {
            MetricKind::Epsilon => &self.columns.epsilon,
            MetricKind::RuntimeSeconds => &self.columns.runtime,
        };
        TableSchema::new(metric)
            .algorithm_column(&self.columns.algorithm)
            .input_size_column(&self.columns.input_size)
            .universe_column(&self.columns.universe)
            .metric_column(metric_column)
            .delimiter(self.delimiter)
    }
}

/// Builder for `AnalysisConfig`.
#[derive(Debug, Default)]
pub struct AnalysisConfigBuilder {
    config: AnalysisConfig,
}

impl AnalysisConfigBuilder {
    /// Set the results directory.
    #[must_use]
    pub fn results_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.results_dir = dir.into();
        self
    }

    /// Set the plots directory.
    #[must_use]
    pub fn plots_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.plots_dir = dir.into();
        self
    }

    /// Set the mandatory epsilon table file name.
    #[must_use]
    pub fn epsilon_table(mut self, name: impl Into<String>) -> Self {
        self.config.epsilon_table = name.into();
        self
    }

    /// Set the optional workload epsilon table file name.
    #[must_use]
    pub fn workload_table(mut self, name: impl Into<String>) -> Self {
        self.config.workload_table = name.into();
        self
    }

    /// Set the runtime table name pattern (must contain `{n}`).
    #[must_use]
    pub fn runtime_table_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.config.runtime_table_pattern = pattern.into();
        self
    }

    /// Set the universe sizes that have runtime tables.
    #[must_use]
    pub fn runtime_universes(mut self, universes: Vec<u64>) -> Self {
        self.config.runtime_universes = universes;
        self
    }

    /// Set the universe size of the uniform sweep.
    #[must_use]
    pub const fn primary_universe(mut self, n: u64) -> Self {
        self.config.primary_universe = n;
        self
    }

    /// Set the compared algorithm labels.
    #[must_use]
    pub fn algorithms(mut self, first: impl Into<String>, second: impl Into<String>) -> Self {
        self.config.algorithms = [first.into(), second.into()];
        self
    }

    /// Set the column names.
    #[must_use]
    pub fn columns(mut self, columns: ColumnNames) -> Self {
        self.config.columns = columns;
        self
    }

    /// Set the field delimiter.
    #[must_use]
    pub const fn delimiter(mut self, delimiter: char) -> Self {
        self.config.delimiter = delimiter;
        self
    }

    /// Also report a comparison pooled over both epsilon tables.
    #[must_use]
    pub const fn pool_workloads(mut self, pool: bool) -> Self {
        self.config.pool_workloads = pool;
        self
    }

    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `Config` if validation fails.
    pub fn build(self) -> Result<AnalysisConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
