//! Grouping result tables into per-algorithm point series

use crate::series::{Point, Series};
use crate::storage::{MetricKind, ResultTable};
use crate::{Error, Result};
use rustc_hash::FxHashMap;

/// Group a table into one series per algorithm, in first-encountered order.
///
/// Points are `(input_size, metric)` sorted ascending by input size; rows
/// with equal input size keep file order. With `universe` set, rows whose
/// universe column holds a different value are left out (rows without a
/// universe value are kept).
///
/// # Errors
///
/// Returns `StorageError` if the table columns have unexpected types.
#[allow(clippy::cast_precision_loss)]
pub fn group_series(table: &ResultTable, universe: Option<u64>) -> Result<Vec<Series>> {
    let mut slots: FxHashMap<String, usize> = FxHashMap::default();
    let mut groups: Vec<(String, Vec<(u64, f64)>)> = Vec::new();

    for record in table.records()? {
        if let (Some(wanted), Some(actual)) = (universe, record.universe) {
            if wanted != actual {
                continue;
            }
        }
        let slot = *slots.entry(record.algorithm.clone()).or_insert_with(|| {
            groups.push((record.algorithm.clone(), Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push((record.input_size, record.metric));
    }

    Ok(groups
        .into_iter()
        .map(|(label, mut points)| {
            points.sort_by_key(|&(size, _)| size);
            let points = points
                .into_iter()
                .map(|(size, y)| Point { x: size as f64, y })
                .collect();
            Series::new(label, points)
        })
        .collect())
}

/// Runtime-versus-input-size series for one resource universe size.
///
/// Series are labelled `"<alg>, n=<universe>"`. No curve fitting is done.
///
/// # Errors
///
/// Returns `InvalidInput` if the table is not a runtime table.
pub fn runtime_series(table: &ResultTable, universe: u64) -> Result<Vec<Series>> {
    if table.metric() != MetricKind::RuntimeSeconds {
        return Err(Error::InvalidInput(format!(
            "runtime series need a runtime table, got a {} table",
            table.metric()
        )));
    }
    Ok(group_series(table, Some(universe))?
        .into_iter()
        .map(|s| Series::new(format!("{}, n={universe}", s.label()), s.points().to_vec()))
        .collect())
}
