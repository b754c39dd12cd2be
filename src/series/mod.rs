//! Point series and the renderer boundary
//!
//! The statistics engine produces per-algorithm `(x, y)` series. Turning them
//! into pictures is the job of an external renderer behind [`SeriesRenderer`];
//! the crate ships [`JsonFigureWriter`], which writes each figure as JSON so a
//! plotting tool of choice can pick it up.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Largest x value still drawn on a linear axis
pub const LOG_SCALE_THRESHOLD: f64 = 1_000_000.0;

/// One point of a series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal value (input size)
    pub x: f64,
    /// Vertical value (metric)
    pub y: f64,
}

/// Labelled ordered sequence of points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    label: String,
    points: Vec<Point>,
}

impl Series {
    /// Create a series.
    #[must_use]
    pub fn new(label: impl Into<String>, points: Vec<Point>) -> Self {
        Self {
            label: label.into(),
            points,
        }
    }

    /// Display label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Points in order.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Whether the series has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Largest x value, if any.
    #[must_use]
    pub fn max_x(&self) -> Option<f64> {
        self.points.iter().map(|p| p.x).reduce(f64::max)
    }
}

/// Horizontal axis scale hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisScale {
    /// Linear axis
    Linear,
    /// Logarithmic axis
    Log,
}

/// A chart: several series on shared axes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    /// File stem used by renderers
    pub name: String,
    /// Chart title
    pub title: String,
    /// Horizontal axis label
    pub x_label: String,
    /// Vertical axis label
    pub y_label: String,
    /// Series drawn on the chart
    pub series: Vec<Series>,
}

impl Figure {
    /// Create an empty figure.
    #[must_use]
    pub fn new(name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            x_label: String::new(),
            y_label: String::new(),
            series: Vec::new(),
        }
    }

    /// Set axis labels.
    #[must_use]
    pub fn axes(mut self, x_label: impl Into<String>, y_label: impl Into<String>) -> Self {
        self.x_label = x_label.into();
        self.y_label = y_label.into();
        self
    }

    /// Add series, skipping empty ones.
    #[must_use]
    pub fn with_series(mut self, series: impl IntoIterator<Item = Series>) -> Self {
        self.series.extend(series.into_iter().filter(|s| !s.is_empty()));
        self
    }

    /// Whether there is nothing to draw.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Logarithmic once the largest x exceeds [`LOG_SCALE_THRESHOLD`].
    #[must_use]
    pub fn x_scale(&self) -> AxisScale {
        let max_x = self.series.iter().filter_map(Series::max_x).reduce(f64::max);
        match max_x {
            Some(x) if x > LOG_SCALE_THRESHOLD => AxisScale::Log,
            _ => AxisScale::Linear,
        }
    }
}

/// Consumer of computed figures.
pub trait SeriesRenderer {
    /// Render one figure.
    ///
    /// # Errors
    ///
    /// Returns error if the figure cannot be emitted.
    fn render(&mut self, figure: &Figure) -> Result<()>;
}

/// Writes each figure to `<dir>/<name>.json`.
#[derive(Debug, Clone)]
pub struct JsonFigureWriter {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

/// On-disk shape of a figure: the figure plus its scale hint.
#[derive(Serialize)]
struct FigureDocument<'a> {
    #[serde(flatten)]
    figure: &'a Figure,
    x_scale: AxisScale,
}

impl JsonFigureWriter {
    /// Writer targeting `dir` (created on first render).
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: Vec::new(),
        }
    }

    /// Output directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Files written so far.
    #[must_use]
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl SeriesRenderer for JsonFigureWriter {
    fn render(&mut self, figure: &Figure) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(format!("{}.json", figure.name));
        let document = FigureDocument {
            figure,
            x_scale: figure.x_scale(),
        };
        serde_json::to_writer_pretty(BufWriter::new(File::create(&path)?), &document)?;
        tracing::info!(path = %path.display(), series = figure.series.len(), "figure written");
        self.written.push(path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(label: &str, xs: &[f64]) -> Series {
        Series::new(label, xs.iter().map(|&x| Point { x, y: 1.0 }).collect())
    }

    #[test]
    fn test_scale_switches_above_threshold() {
        let small = Figure::new("f", "t").with_series([line("a", &[10.0, 1_000_000.0])]);
        assert_eq!(small.x_scale(), AxisScale::Linear);

        let large = Figure::new("f", "t").with_series([line("a", &[10.0]), line("b", &[2e6])]);
        assert_eq!(large.x_scale(), AxisScale::Log);
    }

    #[test]
    fn test_empty_series_skipped() {
        let figure = Figure::new("f", "t").with_series([line("a", &[]), line("b", &[1.0])]);
        assert_eq!(figure.series.len(), 1);
        assert_eq!(Figure::new("f", "t").x_scale(), AxisScale::Linear);
    }

    #[test]
    fn test_json_writer_emits_scale() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = JsonFigureWriter::new(dir.path().join("plots"));
        let figure = Figure::new("epsilon_vs_m", "eps")
            .axes("m", "eps")
            .with_series([line("NFDH", &[500.0])]);
        writer.render(&figure).unwrap();

        let text = std::fs::read_to_string(&writer.written()[0]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["x_scale"], "linear");
        assert_eq!(value["series"][0]["label"], "NFDH");
        assert_eq!(value["name"], "epsilon_vs_m");
    }
}
