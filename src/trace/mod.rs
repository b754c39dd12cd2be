//! Workload trace ingestion
//!
//! Converts workload logs into canonical [`Task`]s. Two tolerant formats are
//! tried in order, first success wins:
//!
//! 1. SWF-like records (`run_time` at field 3, `num_procs` at field 4)
//! 2. Simplified `duration num_procs` lines
//!
//! Most real input fails (1) and is picked up by (2). Durations are clamped to
//! the cap only after a format accepted the line.
//!
//! ## Example
//!
//! ```rust
//! use packstat::trace::TraceParser;
//!
//! let parser = TraceParser::new();
//! let task = parser.parse_line("1 0 12 3600 64 -1").unwrap();
//! assert_eq!((task.resource_width(), task.duration()), (64, 100));
//!
//! assert!(parser.parse_line("; comment").is_none());
//! ```

mod formats;

pub use formats::{ColumnOrder, SwfFormat, TaskCandidate, TraceFormat, TwoColumnFormat};

use crate::lines::raw_lines;
use crate::task::{Task, MAX_DURATION};
use crate::{Error, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Comment marker for trace files
const COMMENT_PREFIX: char = ';';

/// What happened to a single trace line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    /// Blank line or comment
    Skipped,
    /// A format accepted the line
    Accepted {
        /// The capped task
        task: Task,
        /// Name of the format that accepted it
        format: &'static str,
    },
    /// No format accepted the line
    Rejected,
}

/// Ordered list of trace formats plus the duration cap.
pub struct TraceParser {
    formats: Vec<Box<dyn TraceFormat>>,
    duration_cap: u32,
}

impl Default for TraceParser {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TraceParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TraceParser")
            .field("formats", &self.format_names())
            .field("duration_cap", &self.duration_cap)
            .finish()
    }
}

impl TraceParser {
    /// Workload-log parser: SWF first, then `duration num_procs`, cap 100.
    #[must_use]
    pub fn new() -> Self {
        Self::with_formats(vec![
            Box::new(SwfFormat),
            Box::new(TwoColumnFormat::new(ColumnOrder::DurationFirst)),
        ])
    }

    /// Task-stream parser: `resource_width duration` only, cap 100.
    #[must_use]
    pub fn task_stream() -> Self {
        Self::with_formats(vec![Box::new(TwoColumnFormat::new(ColumnOrder::WidthFirst))])
    }

    /// Parser over a custom ordered list of formats.
    #[must_use]
    pub fn with_formats(formats: Vec<Box<dyn TraceFormat>>) -> Self {
        Self {
            formats,
            duration_cap: MAX_DURATION,
        }
    }

    /// Replace the duration cap.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if `cap` is zero.
    pub fn with_duration_cap(mut self, cap: u32) -> Result<Self> {
        if cap == 0 {
            return Err(Error::InvalidInput(
                "duration cap must be at least 1".to_string(),
            ));
        }
        self.duration_cap = cap;
        Ok(self)
    }

    /// Current duration cap.
    #[must_use]
    pub const fn duration_cap(&self) -> u32 {
        self.duration_cap
    }

    /// Names of the formats in the order they are tried.
    #[must_use]
    pub fn format_names(&self) -> Vec<&'static str> {
        self.formats.iter().map(|f| f.name()).collect()
    }

    /// Classify one line of a trace.
    #[must_use]
    pub fn classify(&self, line: &str) -> LineOutcome {
        let line = line.trim();
        if line.is_empty() || line.starts_with(COMMENT_PREFIX) {
            return LineOutcome::Skipped;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        self.formats
            .iter()
            .find_map(|format| {
                format.parse(&fields).map(|candidate| LineOutcome::Accepted {
                    task: self.cap(candidate),
                    format: format.name(),
                })
            })
            .unwrap_or(LineOutcome::Rejected)
    }

    /// Parse one line into a task, or `None` if it is a comment or malformed.
    #[must_use]
    pub fn parse_line(&self, line: &str) -> Option<Task> {
        match self.classify(line) {
            LineOutcome::Accepted { task, .. } => Some(task),
            LineOutcome::Skipped | LineOutcome::Rejected => None,
        }
    }

    /// Convert a whole trace.
    ///
    /// Stops after `max_count` accepted tasks. `Some(0)` means no limit.
    ///
    /// # Errors
    ///
    /// Returns `Io` if reading fails and `NoValidTasks` if no line was accepted.
    /// A line that is not valid UTF-8 is rejected like any malformed line.
    pub fn convert<R: BufRead>(&self, reader: R, max_count: Option<usize>) -> Result<Conversion> {
        let limit = max_count.filter(|&m| m > 0);
        let mut conversion = Conversion::default();

        for (index, line) in raw_lines(reader).enumerate() {
            let outcome = line?.map_or(LineOutcome::Rejected, |line| self.classify(&line));
            match outcome {
                LineOutcome::Skipped => conversion.skipped += 1,
                LineOutcome::Rejected => {
                    tracing::debug!(line = index + 1, "rejected trace line");
                    conversion.rejected += 1;
                }
                LineOutcome::Accepted { task, format } => {
                    conversion.record(task, format);
                    if limit.is_some_and(|m| conversion.tasks.len() >= m) {
                        break;
                    }
                }
            }
        }

        if conversion.tasks.is_empty() {
            return Err(Error::NoValidTasks {
                rejected: conversion.rejected,
            });
        }

        tracing::info!(
            accepted = conversion.tasks.len(),
            rejected = conversion.rejected,
            skipped = conversion.skipped,
            "trace converted"
        );
        Ok(conversion)
    }

    /// Convert a trace file.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be opened or read, and `NoValidTasks`
    /// if no line was accepted.
    pub fn convert_file<P: AsRef<Path>>(&self, path: P, max_count: Option<usize>) -> Result<Conversion> {
        let file = File::open(path.as_ref())?;
        self.convert(BufReader::new(file), max_count)
    }

    fn cap(&self, candidate: TaskCandidate) -> Task {
        // min() with a u32 cap always fits in u32
        let duration = u32::try_from(candidate.duration.min(u64::from(self.duration_cap)))
            .unwrap_or(self.duration_cap);
        Task::from_parts(candidate.resource_width, duration)
    }
}

/// Parse one line with the default workload formats and the given cap.
///
/// A zero cap is treated as the default cap.
#[must_use]
pub fn parse_trace_line(line: &str, cap: u32) -> Option<Task> {
    let parser = TraceParser::new();
    let parser = parser.with_duration_cap(cap).unwrap_or_default();
    parser.parse_line(line)
}

/// Outcome of converting a whole trace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conversion {
    tasks: Vec<Task>,
    rejected: usize,
    skipped: usize,
    accepted_by: Vec<(&'static str, usize)>,
}

impl Conversion {
    fn record(&mut self, task: Task, format: &'static str) {
        self.tasks.push(task);
        match self.accepted_by.iter_mut().find(|(name, _)| *name == format) {
            Some((_, count)) => *count += 1,
            None => self.accepted_by.push((format, 1)),
        }
    }

    /// Accepted tasks in input order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Consume the conversion, keeping only the tasks.
    #[must_use]
    pub fn into_tasks(self) -> Vec<Task> {
        self.tasks
    }

    /// Number of rejected lines.
    #[must_use]
    pub const fn rejected(&self) -> usize {
        self.rejected
    }

    /// Number of blank and comment lines.
    #[must_use]
    pub const fn skipped(&self) -> usize {
        self.skipped
    }

    /// How many lines each format accepted, in first-use order.
    #[must_use]
    pub fn accepted_by(&self) -> &[(&'static str, usize)] {
        &self.accepted_by
    }
}
