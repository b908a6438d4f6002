//! Parameter grid definitions and batch generation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use tg_types::{config_error, StopCondition, TrainingData, TuneError};

/// A single named parameter axis: a finite ordered list of candidate values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridAxis {
    pub name: String,
    pub values: Vec<f64>,
}

/// The full grid: an ordered list of parameter axes.
///
/// Enumeration is row-major in declaration order — the first-declared axis
/// is the outermost loop, each subsequent axis nested inside, within-axis
/// value order preserved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterGrid {
    pub axes: Vec<GridAxis>,
}

impl ParameterGrid {
    pub fn new() -> Self {
        Self { axes: Vec::new() }
    }

    pub fn axis(mut self, name: impl Into<String>, values: Vec<f64>) -> Self {
        self.axes.push(GridAxis {
            name: name.into(),
            values,
        });
        self
    }

    /// Total number of configurations (product of axis sizes). Zero if any
    /// axis is empty.
    pub fn len(&self) -> usize {
        if self.axes.is_empty() {
            return 0;
        }
        self.axes.iter().map(|a| a.values.len()).product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Opt-in validation for callers that want malformed grids rejected
    /// before generation. Generation itself does not validate: an empty axis
    /// simply yields a zero-configuration batch.
    pub fn validate(&self) -> Result<(), TuneError> {
        let mut seen = std::collections::HashSet::new();
        for axis in &self.axes {
            if axis.values.is_empty() {
                return Err(config_error!("axis {} has no values", axis.name));
            }
            if !seen.insert(axis.name.as_str()) {
                return Err(config_error!("duplicate axis name {}", axis.name));
            }
        }
        Ok(())
    }

    /// Enumerate the cross-product as ordered (name, value) rows.
    fn enumerate(&self) -> Vec<Vec<(&str, f64)>> {
        if self.axes.is_empty() {
            return Vec::new();
        }
        let mut rows: Vec<Vec<(&str, f64)>> = vec![Vec::new()];
        for axis in &self.axes {
            let mut next = Vec::with_capacity(rows.len() * axis.values.len());
            for row in &rows {
                for &value in &axis.values {
                    let mut combo = row.clone();
                    combo.push((axis.name.as_str(), value));
                    next.push(combo);
                }
            }
            rows = next;
        }
        rows
    }
}

impl Default for ParameterGrid {
    fn default() -> Self {
        Self::new()
    }
}

/// The closed set of sweep strategies: one grid pass, or the same grid swept
/// a fixed number of times as successive batches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SweepPlan {
    /// A single batch covering the grid once.
    Grid,
    /// The grid swept `batches` times, one full pass per batch.
    BatchedGrid { batches: usize },
}

impl SweepPlan {
    pub fn max_batches(&self) -> usize {
        match self {
            Self::Grid => 1,
            Self::BatchedGrid { batches } => *batches,
        }
    }
}

impl Default for SweepPlan {
    /// Demonstration default: three batches.
    fn default() -> Self {
        Self::BatchedGrid { batches: 3 }
    }
}

/// Compact parameter rendering for descriptions. Small magnitudes use
/// scientific notation (0.0001 -> "1E-4"), everything else plain `Display`.
fn format_value(v: f64) -> String {
    if v != 0.0 && v.abs() < 0.01 {
        format!("{v:.0E}")
    } else {
        format!("{v}")
    }
}

/// Produce one batch of training data: the full cross-product of the grid,
/// each configuration labelled with the batch index and its parameter
/// values, carrying the caller-supplied stop conditions.
pub fn generate_batch(
    grid: &ParameterGrid,
    batch_index: usize,
    stop_conditions: &[StopCondition],
) -> Vec<TrainingData> {
    grid.enumerate()
        .into_iter()
        .map(|row| {
            let mut descr = format!("#{batch_index}");
            let mut hyper = HashMap::with_capacity(row.len());
            for (name, value) in row {
                descr.push_str(&format!("_{name}_{}", format_value(value)));
                hyper.insert(name.to_string(), value);
            }
            TrainingData::new(hyper, descr, stop_conditions.to_vec())
        })
        .collect()
}
