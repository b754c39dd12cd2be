//! End-to-end analysis of an experiment results directory
//!
//! Reads the well-known result tables named by [`AnalysisConfig`]:
//!
//! | Table | Required | Produces |
//! |-------|----------|----------|
//! | epsilon table (uniform sweep) | yes | primary comparison, `epsilon_vs_m` figure |
//! | workload epsilon table | no | workload comparison (independent of the primary one) |
//! | runtime table per universe size | no | `time_vs_m` figure |
//!
//! A missing mandatory table stops the analysis; missing optional tables only
//! skip their part of the report.

use crate::config::AnalysisConfig;
use crate::series::{Figure, Series, SeriesRenderer};
use crate::stats::{group_series, runtime_series, QualityComparison, QualityEngine};
use crate::storage::{MetricKind, ResultTable};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::path::Path;

/// What the user has to do when the mandatory table is missing
pub const MISSING_TABLE_REMEDIATION: &str =
    "Run the experiment driver first (e.g. ./run_experiments.sh) to produce it.";

/// A titled quality comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonSection {
    /// Section heading
    pub title: String,
    /// The comparison
    pub comparison: QualityComparison,
}

impl fmt::Display for ComparisonSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", self.comparison)
    }
}

/// Runtime series of one resource universe size.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuntimeSweep {
    /// Universe size (`n`)
    pub universe: u64,
    /// One series per algorithm
    pub series: Vec<Series>,
}

/// Everything one analysis run computed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    /// When the report was produced
    pub generated_at: DateTime<Utc>,
    /// Uniform-random sweep comparison
    pub primary: ComparisonSection,
    /// Workload-derived sweep comparison, if that table exists
    pub workload: Option<ComparisonSection>,
    /// Both epsilon tables pooled, if requested and available
    pub pooled: Option<ComparisonSection>,
    /// Runtime series per universe size that had a table
    pub runtime: Vec<RuntimeSweep>,
    /// Epsilon versus input size, from the uniform sweep
    pub epsilon_series: Vec<Series>,
}

impl AnalysisReport {
    /// Figures for the renderer. Figures without data are left out.
    #[must_use]
    pub fn figures(&self) -> Vec<Figure> {
        let time = Figure::new("time_vs_m", "Runtime versus number of tasks")
            .axes("m (tasks)", "time, s")
            .with_series(self.runtime.iter().flat_map(|s| s.series.iter().cloned()));
        let epsilon = Figure::new("epsilon_vs_m", "Deviation from the lower bound")
            .axes("m (tasks)", "epsilon")
            .with_series(self.epsilon_series.iter().cloned());

        [time, epsilon]
            .into_iter()
            .filter(|figure| !figure.is_empty())
            .collect()
    }
}

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(60);
        writeln!(f, "{rule}")?;
        write!(f, "{}", self.primary)?;
        writeln!(f, "{rule}")?;
        for section in [&self.workload, &self.pooled].into_iter().flatten() {
            writeln!(f)?;
            write!(f, "{section}")?;
        }

        if !self.runtime.is_empty() {
            writeln!(f)?;
            writeln!(f, "Runtime")?;
            for sweep in &self.runtime {
                for series in &sweep.series {
                    let points = series.points();
                    if let (Some(first), Some(last)) = (points.first(), points.last()) {
                        writeln!(
                            f,
                            "  {}: {} points, m = {}..{}, time = {:.6}..{:.6} s",
                            series.label(),
                            points.len(),
                            first.x,
                            last.x,
                            first.y,
                            last.y
                        )?;
                    }
                }
            }
        }
        Ok(())
    }
}

/// Runs the analysis described by a configuration.
#[derive(Debug, Clone)]
pub struct Analyzer {
    config: AnalysisConfig,
    engine: QualityEngine,
}

impl Analyzer {
    /// Create an analyzer.
    #[must_use]
    pub fn new(config: AnalysisConfig) -> Self {
        let [first, second] = config.algorithms.clone();
        Self {
            config,
            engine: QualityEngine::new(first, second),
        }
    }

    /// Configuration in use.
    #[must_use]
    pub const fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Run the analysis.
    ///
    /// # Errors
    ///
    /// Returns `MissingTable` if the mandatory epsilon table does not exist,
    /// and `TableUnreadable` if an existing table cannot be read.
    pub fn run(&self) -> Result<AnalysisReport> {
        let epsilon_schema = self.config.schema(MetricKind::Epsilon);

        let primary_path = self.config.epsilon_table_path();
        if !primary_path.exists() {
            return Err(Error::MissingTable {
                path: primary_path,
                remediation: MISSING_TABLE_REMEDIATION.to_string(),
            });
        }
        let primary_table = ResultTable::load(&primary_path, &epsilon_schema)?;
        let primary = ComparisonSection {
            title: format!(
                "Quality comparison: uniform random sweep, n={}",
                self.config.primary_universe
            ),
            comparison: self.engine.compare(&primary_table)?,
        };

        let workload_table = self.load_optional(&self.config.workload_table_path(), MetricKind::Epsilon)?;
        let workload = workload_table
            .as_ref()
            .map(|table| {
                Ok::<_, Error>(ComparisonSection {
                    title: "Quality comparison: workload-derived sweep".to_string(),
                    comparison: self.engine.compare(table)?,
                })
            })
            .transpose()?;

        let pooled = match (&workload_table, self.config.pool_workloads) {
            (Some(table), true) => Some(ComparisonSection {
                title: "Quality comparison: uniform and workload sweeps pooled".to_string(),
                comparison: self.engine.compare_pooled(&[&primary_table, table])?,
            }),
            _ => None,
        };

        let mut runtime = Vec::new();
        for &universe in &self.config.runtime_universes {
            let path = self.config.runtime_table_path(universe);
            if let Some(table) = self.load_optional(&path, MetricKind::RuntimeSeconds)? {
                runtime.push(RuntimeSweep {
                    universe,
                    series: runtime_series(&table, universe)?,
                });
            }
        }

        let mut epsilon_series = group_series(&primary_table, None)?;
        epsilon_series.retain(|series| self.config.algorithms.iter().any(|a| a == series.label()));

        tracing::info!(
            workload = workload.is_some(),
            runtime_sweeps = runtime.len(),
            "analysis complete"
        );
        Ok(AnalysisReport {
            generated_at: Utc::now(),
            primary,
            workload,
            pooled,
            runtime,
            epsilon_series,
        })
    }

    /// Hand every figure of a report to a renderer.
    ///
    /// # Returns
    ///
    /// Number of figures rendered.
    ///
    /// # Errors
    ///
    /// Returns the first renderer error.
    pub fn render(&self, report: &AnalysisReport, renderer: &mut dyn SeriesRenderer) -> Result<usize> {
        let figures = report.figures();
        for figure in &figures {
            renderer.render(figure)?;
        }
        Ok(figures.len())
    }

    fn load_optional(&self, path: &Path, metric: MetricKind) -> Result<Option<ResultTable>> {
        if !path.exists() {
            tracing::warn!(path = %path.display(), "optional result table not found, skipping");
            return Ok(None);
        }
        ResultTable::load(path, &self.config.schema(metric)).map(Some)
    }
}
