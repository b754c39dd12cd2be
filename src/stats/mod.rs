//! Quality statistics engine
//!
//! Answers "which algorithm schedules closer to the lower bound" over a family
//! of experiment runs: per algorithm, mean and population standard deviation
//! of the deviation metric `epsilon`, then a verdict on the two means.
//!
//! Lower `epsilon` is better. An algorithm without records never gets a
//! numeric summary; the verdict reports insufficient data instead.
//!
//! ## Example
//!
//! ```rust
//! use packstat::stats::{QualityEngine, Verdict};
//! use packstat::storage::{MetricKind, ResultRecord, ResultTable};
//!
//! let table = ResultTable::from_records(
//!     MetricKind::Epsilon,
//!     vec![
//!         ResultRecord::new("NFDH", 500, 0.08),
//!         ResultRecord::new("FFDH", 500, 0.05),
//!     ],
//! )?;
//! let comparison = QualityEngine::new("NFDH", "FFDH").compare(&table)?;
//! assert!(matches!(comparison.verdict(), Verdict::MoreAccurate { winner, .. } if winner == "FFDH"));
//! # Ok::<(), packstat::Error>(())
//! ```

mod series;

pub use series::{group_series, runtime_series};

use crate::storage::{MetricKind, ResultTable};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Mean, population standard deviation and count of a non-empty sample set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    mean: f64,
    std_dev: f64,
    count: usize,
}

impl Summary {
    /// Summarize values, or `None` for an empty slice.
    ///
    /// The standard deviation divides by `n`: the experiment set is the whole
    /// population under study.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        Some(Self {
            mean,
            std_dev: variance.sqrt(),
            count: values.len(),
        })
    }

    /// Arithmetic mean.
    #[must_use]
    pub const fn mean(&self) -> f64 {
        self.mean
    }

    /// Population standard deviation.
    #[must_use]
    pub const fn std_dev(&self) -> f64 {
        self.std_dev
    }

    /// Number of samples.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }
}

/// Statistics of one algorithm; `summary` is `None` when it had no records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlgorithmStats {
    label: String,
    summary: Option<Summary>,
}

impl AlgorithmStats {
    /// Algorithm label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Summary, absent for insufficient data.
    #[must_use]
    pub const fn summary(&self) -> Option<&Summary> {
        self.summary.as_ref()
    }
}

impl fmt::Display for AlgorithmStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.summary {
            Some(s) => write!(
                f,
                "{}:  E(eps) = {:.6},  sigma(eps) = {:.6}  ({} runs)",
                self.label, s.mean, s.std_dev, s.count
            ),
            None => write!(f, "{}:  insufficient data (no records)", self.label),
        }
    }
}

/// Outcome of comparing two algorithms' mean deviation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Verdict {
    /// One algorithm has a strictly lower mean
    MoreAccurate {
        /// Label of the algorithm with the lower mean
        winner: String,
        /// How much lower its mean is
        margin: f64,
    },
    /// Both means are exactly equal
    Tie {
        /// The shared mean
        mean: f64,
    },
    /// At least one algorithm had no records
    InsufficientData {
        /// Labels without records
        missing: Vec<String>,
    },
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MoreAccurate { winner, margin } => write!(
                f,
                "{winner} produced more accurate schedules (lower E(eps) by {margin:.6})"
            ),
            Self::Tie { mean } => write!(f, "tie: both algorithms have E(eps) = {mean:.6}"),
            Self::InsufficientData { missing } => {
                write!(f, "insufficient data: no records for {}", missing.join(", "))
            }
        }
    }
}

/// Side-by-side statistics of two algorithms plus the verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityComparison {
    first: AlgorithmStats,
    second: AlgorithmStats,
    verdict: Verdict,
}

impl QualityComparison {
    /// Statistics of the first algorithm.
    #[must_use]
    pub const fn first(&self) -> &AlgorithmStats {
        &self.first
    }

    /// Statistics of the second algorithm.
    #[must_use]
    pub const fn second(&self) -> &AlgorithmStats {
        &self.second
    }

    /// The verdict.
    #[must_use]
    pub const fn verdict(&self) -> &Verdict {
        &self.verdict
    }
}

impl fmt::Display for QualityComparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  {}", self.first)?;
        writeln!(f, "  {}", self.second)?;
        write!(f, "  Verdict: {}", self.verdict)
    }
}

/// Compares the deviation metric of a fixed pair of algorithms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualityEngine {
    first: String,
    second: String,
}

impl QualityEngine {
    /// Create an engine for the pair, in report order.
    #[must_use]
    pub fn new(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self {
            first: first.into(),
            second: second.into(),
        }
    }

    /// Compare the pair on one epsilon table.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the table does not hold epsilon values.
    pub fn compare(&self, table: &ResultTable) -> Result<QualityComparison> {
        self.compare_pooled(&[table])
    }

    /// Compare the pair on the union of several epsilon tables.
    ///
    /// Tables are only pooled when handed in together; separate calls are
    /// independent comparisons.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if any table does not hold epsilon values.
    pub fn compare_pooled(&self, tables: &[&ResultTable]) -> Result<QualityComparison> {
        let mut first = Vec::new();
        let mut second = Vec::new();
        for table in tables {
            if table.metric() != MetricKind::Epsilon {
                return Err(Error::InvalidInput(format!(
                    "quality comparison needs an epsilon table, got a {} table",
                    table.metric()
                )));
            }
            first.extend(table.values_for(&self.first)?);
            second.extend(table.values_for(&self.second)?);
        }

        let first = AlgorithmStats {
            label: self.first.clone(),
            summary: Summary::from_values(&first),
        };
        let second = AlgorithmStats {
            label: self.second.clone(),
            summary: Summary::from_values(&second),
        };
        let verdict = verdict(&first, &second);
        tracing::debug!(%verdict, "quality comparison");

        Ok(QualityComparison {
            first,
            second,
            verdict,
        })
    }
}

fn verdict(first: &AlgorithmStats, second: &AlgorithmStats) -> Verdict {
    let (a, b) = match (&first.summary, &second.summary) {
        (Some(a), Some(b)) => (a.mean, b.mean),
        _ => {
            let missing = [first, second]
                .into_iter()
                .filter(|s| s.summary.is_none())
                .map(|s| s.label.clone())
                .collect();
            return Verdict::InsufficientData { missing };
        }
    };

    if a < b {
        Verdict::MoreAccurate {
            winner: first.label.clone(),
            margin: b - a,
        }
    } else if b < a {
        Verdict::MoreAccurate {
            winner: second.label.clone(),
            margin: a - b,
        }
    } else {
        Verdict::Tie { mean: a }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::ResultRecord;

    fn table(rows: &[(&str, f64)]) -> ResultTable {
        let records = rows
            .iter()
            .enumerate()
            .map(|(i, (alg, eps))| ResultRecord::new(*alg, 500 * (i as u64 + 1), *eps))
            .collect();
        ResultTable::from_records(MetricKind::Epsilon, records).unwrap()
    }

    #[test]
    fn test_summary_population_std_dev() {
        let s = Summary::from_values(&[0.10, 0.20, 0.30]).unwrap();
        assert!((s.mean() - 0.2).abs() < 1e-12);
        let expected = ((0.01 + 0.0 + 0.01) / 3.0_f64).sqrt();
        assert!((s.std_dev() - expected).abs() < 1e-12);
        assert!((s.std_dev() - 0.0816).abs() < 1e-4);
        assert_eq!(s.count(), 3);
    }

    #[test]
    fn test_summary_empty_is_none() {
        assert!(Summary::from_values(&[]).is_none());
    }

    #[test]
    fn test_single_value_has_zero_spread() {
        let s = Summary::from_values(&[0.42]).unwrap();
        assert!((s.std_dev() - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_verdict_follows_lower_mean() {
        let engine = QualityEngine::new("A", "B");
        let c = engine.compare(&table(&[("A", 0.05), ("B", 0.08)])).unwrap();
        assert!(matches!(c.verdict(), Verdict::MoreAccurate { winner, .. } if winner == "A"));

        let c = engine.compare(&table(&[("A", 0.08), ("B", 0.05)])).unwrap();
        assert!(matches!(c.verdict(), Verdict::MoreAccurate { winner, .. } if winner == "B"));
    }

    #[test]
    fn test_exact_tie_reported() {
        let c = QualityEngine::new("A", "B")
            .compare(&table(&[("A", 0.1), ("B", 0.1)]))
            .unwrap();
        assert_eq!(c.verdict(), &Verdict::Tie { mean: 0.1 });
    }

    #[test]
    fn test_insufficient_data() {
        let c = QualityEngine::new("A", "B")
            .compare(&table(&[("A", 0.1), ("C", 0.2)]))
            .unwrap();
        assert!(c.second().summary().is_none());
        assert_eq!(
            c.verdict(),
            &Verdict::InsufficientData {
                missing: vec!["B".to_string()]
            }
        );
        assert!(c.to_string().contains("B:  insufficient data"));
    }

    #[test]
    fn test_rejects_runtime_table() {
        let runtime = ResultTable::from_records(
            MetricKind::RuntimeSeconds,
            vec![ResultRecord::new("A", 1, 0.5)],
        )
        .unwrap();
        assert!(matches!(
            QualityEngine::new("A", "B").compare(&runtime),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_pooled_differs_from_independent() {
        let engine = QualityEngine::new("A", "B");
        let uniform = table(&[("A", 0.1), ("B", 0.3)]);
        let workload = table(&[("A", 0.5), ("B", 0.1)]);

        let pooled = engine.compare_pooled(&[&uniform, &workload]).unwrap();
        assert_eq!(pooled.first().summary().unwrap().count(), 2);
        assert!((pooled.first().summary().unwrap().mean() - 0.3).abs() < 1e-12);

        let alone = engine.compare(&uniform).unwrap();
        assert_eq!(alone.first().summary().unwrap().count(), 1);
    }
}
