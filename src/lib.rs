//! # packstat: Workload Ingestion and Quality Statistics for Level-Packing Experiments
//!
//! **Version**: 0.1.0
//!
//! packstat is the post-processing layer of strip-packing scheduler
//! experiments. It turns workload traces into canonical task streams for the
//! experiment driver, and turns the driver's result tables into statistics
//! that answer "which heuristic schedules closer to the lower bound".
//!
//! ## Design Principles (Toyota Way Aligned)
//!
//! - **Poka-Yoke safety**: Malformed lines and rows are dropped, never fatal
//! - **Jidoka**: Empty statistics groups are reported, never computed as `0/0`
//! - **Genchi Genbutsu**: Seeded generation makes every experiment repeatable
//!
//! ## Pipeline
//!
//! ```text
//! trace/log ──> trace::TraceParser ──> task::Task stream ──> (external scheduler)
//! results/*.csv ──> storage::ResultTable ──> stats::QualityEngine ──> verdict
//!                                        └─> stats::group_series ──> series::SeriesRenderer
//! ```
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use packstat::analysis::Analyzer;
//! use packstat::config::AnalysisConfig;
//!
//! let config = AnalysisConfig::builder().results_dir("results").build()?;
//! let report = Analyzer::new(config).run()?;
//! println!("{report}");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod analysis;
pub mod config;
pub mod error;
pub mod generator;
mod lines;
pub mod series;
pub mod stats;
pub mod storage;
pub mod task;
pub mod trace;

pub use error::{Error, Result};
pub use task::Task;
