//! Associated Legendre functions on the grid latitudes.
//!
//! This module provides:
//! - [`Recurrence`]: the normalized three-term recurrence with extended-range seeds
//! - [`LegendreTable`]: precomputed columns for the northern latitudes
//! - the column source used by the transform kernels, backed either by the
//!   table or by the recurrence run on demand
//! - polar cut-offs: per order, the first latitude pair that is not negligible

mod recurrence;
mod source;
mod table;

pub use recurrence::Recurrence;
pub use table::LegendreTable;

pub(crate) use source::{ColumnScratch, LegendreSource, OnTheFly};

use crate::grid::Grid;
use crate::types::{OrderIndex, PairIndex};

/// First latitude pair (from the poles) where order `im` has any value of
/// magnitude at least `threshold`; `nlat_2` when none does.
///
/// A non-positive threshold disables the cut-off.
pub(crate) fn polar_first_pairs(recurrence: &Recurrence, grid: &Grid, threshold: f64) -> Vec<usize> {
    let truncation = recurrence.truncation();
    let n_orders = truncation.n_orders();
    if threshold <= 0.0 {
        return vec![0; n_orders];
    }

    let otf = OnTheFly::new(recurrence, grid);
    let mut col = ColumnScratch::default();
    col.ensure(truncation.lmax());
    let exceeds = |v: &f64| v.abs() >= threshold;

    OrderIndex::range(0..n_orders)
        .map(|im| {
            PairIndex::range(0..grid.nlat_2())
                .position(|pair| {
                    if otf.scalar(im, pair, &mut col).iter().any(exceeds) {
                        return true;
                    }
                    let (dtheta, msin) = otf.vector(im, pair, &mut col);
                    dtheta.iter().chain(msin).any(exceeds)
                })
                .unwrap_or(grid.nlat_2())
        })
        .collect()
}
