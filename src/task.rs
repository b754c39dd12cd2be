//! Canonical task representation and the task-stream text format
//!
//! A task stream is one task per line, `<resource_width> <duration>`,
//! whitespace separated, no header, newline terminated. It is the hand-off
//! format to the external scheduler.

use crate::trace::TraceParser;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{BufRead, Write};

/// Upper bound on task duration (time units). Longer durations are clamped.
pub const MAX_DURATION: u32 = 100;

/// A schedulable unit: how many parallel resource units it occupies and for how long.
///
/// Both fields are at least 1. Tasks are immutable once created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Task {
    resource_width: u32,
    duration: u32,
}

impl Task {
    /// Create a task.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if either value is zero.
    pub fn new(resource_width: u32, duration: u32) -> Result<Self> {
        if resource_width == 0 || duration == 0 {
            return Err(Error::InvalidInput(format!(
                "task needs resource_width >= 1 and duration >= 1 (got {resource_width} x {duration})"
            )));
        }
        Ok(Self {
            resource_width,
            duration,
        })
    }

    /// Build a task from already-validated non-zero parts.
    pub(crate) const fn from_parts(resource_width: u32, duration: u32) -> Self {
        Self {
            resource_width,
            duration,
        }
    }

    /// Number of parallel resource units the task requires.
    #[must_use]
    pub const fn resource_width(&self) -> u32 {
        self.resource_width
    }

    /// Task duration in time units.
    #[must_use]
    pub const fn duration(&self) -> u32 {
        self.duration
    }

    /// Area of the task (`resource_width * duration`).
    #[must_use]
    pub const fn area(&self) -> u64 {
        self.resource_width as u64 * self.duration as u64
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.resource_width, self.duration)
    }
}

/// Write tasks in task-stream format.
///
/// # Returns
///
/// Number of tasks written.
///
/// # Errors
///
/// Returns error if the writer fails.
pub fn write_task_stream<W, I>(mut writer: W, tasks: I) -> Result<usize>
where
    W: Write,
    I: IntoIterator<Item = Task>,
{
    let mut written = 0;
    for task in tasks {
        writeln!(writer, "{task}")?;
        written += 1;
    }
    writer.flush()?;
    Ok(written)
}

/// Read a task stream back into tasks.
///
/// Lines are interpreted width-first (the order [`write_task_stream`] emits).
/// Lines that do not form a valid task are skipped, as in trace conversion.
///
/// # Errors
///
/// Returns error if the reader fails.
pub fn read_task_stream<R: BufRead>(reader: R) -> Result<Vec<Task>> {
    let parser = TraceParser::task_stream();
    let mut tasks = Vec::new();
    for line in reader.lines() {
        if let Some(task) = parser.parse_line(&line?) {
            tasks.push(task);
        }
    }
    Ok(tasks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_rejects_zero() {
        assert!(Task::new(0, 5).is_err());
        assert!(Task::new(5, 0).is_err());
        assert!(Task::new(1, 1).is_ok());
    }

    #[test]
    fn test_task_display_is_width_first() {
        let task = Task::new(64, 17).unwrap();
        assert_eq!(task.to_string(), "64 17");
        assert_eq!(task.area(), 64 * 17);
    }

    #[test]
    fn test_write_then_read_stream() {
        let tasks = vec![Task::new(3, 7).unwrap(), Task::new(1024, 100).unwrap()];
        let mut buf = Vec::new();
        let written = write_task_stream(&mut buf, tasks.clone()).unwrap();
        assert_eq!(written, 2);
        assert_eq!(String::from_utf8(buf.clone()).unwrap(), "3 7\n1024 100\n");

        let back = read_task_stream(buf.as_slice()).unwrap();
        assert_eq!(back, tasks);
    }
}
