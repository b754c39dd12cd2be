//! Trace line formats
//!
//! Each format is one interpretation of a whitespace-split line. Formats never
//! fail loudly: a line that does not fit yields `None` and the parser moves on
//! to the next format.

use serde::{Deserialize, Serialize};
use std::num::IntErrorKind;

/// An accepted but not yet capped `(resource_width, duration)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskCandidate {
    /// Parallel resource units (processors) requested
    pub resource_width: u32,
    /// Uncapped duration (run time)
    pub duration: u64,
}

/// One interpretation of a trace line.
pub trait TraceFormat: Send + Sync {
    /// Short name used in conversion statistics and logs.
    fn name(&self) -> &'static str;

    /// Interpret the whitespace-separated fields of a line.
    fn parse(&self, fields: &[&str]) -> Option<TaskCandidate>;
}

/// Parse a strictly positive integer field.
///
/// Positive integers beyond `u64::MAX` saturate; they are still valid and the
/// cap applies to them like to any other duration.
fn positive(field: &str) -> Option<u64> {
    match field.parse::<u64>() {
        Ok(value) => (value > 0).then_some(value),
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => Some(u64::MAX),
        Err(_) => None,
    }
}

/// Validate and narrow a `(width, duration)` pair.
fn candidate(resource_width: u64, duration: u64) -> Option<TaskCandidate> {
    Some(TaskCandidate {
        resource_width: u32::try_from(resource_width).ok()?,
        duration,
    })
}

/// Standard Workload Format record.
///
/// Needs at least five fields; `run_time` is field 3 and `num_procs` field 4.
/// All other fields are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct SwfFormat;

impl SwfFormat {
    /// Minimum number of fields in an SWF record
    pub const MIN_FIELDS: usize = 5;
    const RUN_TIME: usize = 3;
    const NUM_PROCS: usize = 4;
}

impl TraceFormat for SwfFormat {
    fn name(&self) -> &'static str {
        "swf"
    }

    fn parse(&self, fields: &[&str]) -> Option<TaskCandidate> {
        if fields.len() < Self::MIN_FIELDS {
            return None;
        }
        let run_time = positive(fields[Self::RUN_TIME])?;
        let num_procs = positive(fields[Self::NUM_PROCS])?;
        candidate(num_procs, run_time)
    }
}

/// Which of the first two columns holds the duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnOrder {
    /// `duration num_procs` (simplified workload logs)
    #[default]
    DurationFirst,
    /// `resource_width duration` (task streams)
    WidthFirst,
}

/// Simplified two-column record; extra columns are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct TwoColumnFormat {
    order: ColumnOrder,
}

impl TwoColumnFormat {
    /// Create a two-column format with the given column order.
    #[must_use]
    pub const fn new(order: ColumnOrder) -> Self {
        Self { order }
    }

    /// Column order this format reads.
    #[must_use]
    pub const fn order(&self) -> ColumnOrder {
        self.order
    }
}

impl TraceFormat for TwoColumnFormat {
    fn name(&self) -> &'static str {
        match self.order {
            ColumnOrder::DurationFirst => "two-column",
            ColumnOrder::WidthFirst => "task-stream",
        }
    }

    fn parse(&self, fields: &[&str]) -> Option<TaskCandidate> {
        if fields.len() < 2 {
            return None;
        }
        let first = positive(fields[0])?;
        let second = positive(fields[1])?;
        match self.order {
            ColumnOrder::DurationFirst => candidate(second, first),
            ColumnOrder::WidthFirst => candidate(first, second),
        }
    }
}
