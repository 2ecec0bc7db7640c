//! Local-minimum detection for contour labeling.
//!
//! Sea-level-pressure charts mark every low-pressure center with an "L"
//! label. This module finds the anchor points for those labels: grid
//! locations where a scalar field has a local minimum, detected with a
//! three-stage finite-difference search.
//!
//! 1. Scan for longitude-direction stationary points: cells where the
//!    forward difference of the field with respect to longitude is within
//!    `epsilon` of zero.
//! 2. Confirm each candidate against the latitude direction with the same
//!    forward-difference test.
//! 3. Keep candidates that are strictly lower than both row neighbors
//!    `step` cells away.
//!
//! Candidates whose neighbor lookups would leave the grid are dropped
//! without error, so minima within `step` rows of a pole are never
//! reported. An empty result is a valid outcome.

use tracing::debug;

use crate::field::ScalarField;

/// Tuning parameters for the minimum search.
#[derive(Debug, Clone, PartialEq)]
pub struct MinimaSearch {
    /// Tolerance for treating a discrete derivative as zero.
    pub epsilon: f64,
    /// Row offset used to confirm a candidate is a strict minimum.
    pub step: usize,
    /// Also require the candidate to be strictly lower than its `step`
    /// column neighbors, not just its row neighbors.
    pub strict: bool,
    /// Restrict the column scan of row `i` to columns `0..i`, matching the
    /// scan order of the reference chart. The full scan is almost always
    /// what you want; this exists only to reproduce the original figure.
    pub triangular_scan: bool,
}

impl Default for MinimaSearch {
    fn default() -> Self {
        Self {
            epsilon: 0.02,
            step: 2,
            strict: false,
            triangular_scan: false,
        }
    }
}

impl MinimaSearch {
    /// A search with the given zero tolerance and neighbor offset.
    pub fn new(epsilon: f64, step: usize) -> Self {
        Self {
            epsilon,
            step,
            ..Self::default()
        }
    }

    /// Enable the stricter two-axis minimum confirmation.
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }
}

/// A detected local minimum, identified by its grid indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridMinimum {
    /// Row (latitude) index into the field.
    pub row: usize,
    /// Column (longitude) index into the field.
    pub col: usize,
}

impl GridMinimum {
    /// The `(-row, col - 180)` coordinate pair used by the original SLP
    /// chart, which assumed a one-cell-per-degree grid with its longitude
    /// origin 180 cells from the prime meridian. Prefer the physical
    /// coordinates from the field itself for new charts.
    pub fn legacy_plot_coord(&self) -> (f64, f64) {
        (-(self.row as f64), self.col as f64 - 180.0)
    }
}

/// Find the local minima of a scalar field.
///
/// Returns the confirmed minima in row-major scan order. Duplicates are not
/// removed: adjacent cells can both pass the screen when the field is flat
/// near a low. Never fails; a field with no minima yields an empty vector.
pub fn find_local_minima(field: &ScalarField, search: &MinimaSearch) -> Vec<GridMinimum> {
    let h = field.height();
    let w = field.width();
    let mut candidates = Vec::new();

    // Stage 1: longitude-direction stationary points. The derivative at
    // (i, j) is the forward difference toward column j+1.
    for i in 0..h {
        let col_end = if search.triangular_scan {
            i.min(w.saturating_sub(1))
        } else {
            w.saturating_sub(1)
        };
        for j in 0..col_end {
            let dlon = field.lon(j + 1) - field.lon(j);
            if dlon == 0.0 {
                continue;
            }
            let dfdlon = (field.get(i, j + 1) - field.get(i, j)) as f64 / dlon;
            if dfdlon.abs() <= search.epsilon {
                candidates.push((i, j));
            }
        }
    }

    // Stage 2: latitude-direction confirmation with a forward difference.
    // Candidates on the last row have no forward neighbor and are dropped.
    let mut stationary = Vec::new();
    for &(i, j) in &candidates {
        if i + 1 >= h {
            continue;
        }
        let dlat = field.lat(i + 1) - field.lat(i);
        if dlat == 0.0 {
            continue;
        }
        let dfdlat = (field.get(i + 1, j) - field.get(i, j)) as f64 / dlat;
        if dfdlat.abs() <= search.epsilon {
            stationary.push((i, j));
        }
    }

    // Stage 3: strict-minimum confirmation against the step-offset
    // neighbors. Lookups that would leave the grid drop the candidate.
    let mut minima = Vec::new();
    for &(i, j) in &stationary {
        if i < search.step || i + search.step >= h {
            continue;
        }
        let center = field.get(i, j);
        if !(field.get(i + search.step, j) > center && field.get(i - search.step, j) > center) {
            continue;
        }
        if search.strict {
            if j < search.step || j + search.step >= w {
                continue;
            }
            if !(field.get(i, j + search.step) > center && field.get(i, j - search.step) > center)
            {
                continue;
            }
        }
        minima.push(GridMinimum { row: i, col: j });
    }

    debug!(
        candidates = candidates.len(),
        stationary = stationary.len(),
        minima = minima.len(),
        epsilon = search.epsilon,
        step = search.step,
        "Local-minimum search complete"
    );

    minima
}
