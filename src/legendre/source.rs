//! Where the kernels get their Legendre columns from.

use super::{LegendreTable, Recurrence};
use crate::grid::Grid;
use crate::types::{OrderIndex, PairIndex};

/// Per-worker buffers for columns computed on the fly.
#[derive(Clone, Debug, Default)]
pub(crate) struct ColumnScratch {
    y: Vec<f64>,
    work: Vec<f64>,
    dtheta: Vec<f64>,
    msin: Vec<f64>,
}

impl ColumnScratch {
    /// Grow the buffers to hold a column of degree up to `lmax`.
    pub(crate) fn ensure(&mut self, lmax: usize) {
        let len = lmax + 2;
        if self.work.len() < len {
            self.y.resize(len, 0.0);
            self.work.resize(len, 0.0);
            self.dtheta.resize(len, 0.0);
            self.msin.resize(len, 0.0);
        }
    }
}

/// Supplier of Legendre columns at the northern row of a latitude pair.
pub(crate) trait LegendreSource: Sync {
    /// y_lm for l = m..=lmax.
    fn scalar<'a>(&'a self, im: OrderIndex, pair: PairIndex, col: &'a mut ColumnScratch)
        -> &'a [f64];

    /// (dy_lm/dθ, m y_lm / sin θ) for l = m..=lmax.
    fn vector<'a>(
        &'a self,
        im: OrderIndex,
        pair: PairIndex,
        col: &'a mut ColumnScratch,
    ) -> (&'a [f64], &'a [f64]);
}

impl LegendreSource for LegendreTable {
    #[inline]
    fn scalar<'a>(&'a self, im: OrderIndex, pair: PairIndex, _: &'a mut ColumnScratch) -> &'a [f64] {
        LegendreTable::scalar(self, im, pair)
    }

    #[inline]
    fn vector<'a>(
        &'a self,
        im: OrderIndex,
        pair: PairIndex,
        _: &'a mut ColumnScratch,
    ) -> (&'a [f64], &'a [f64]) {
        (self.dtheta(im, pair), self.msin(im, pair))
    }
}

/// Columns recomputed for every request.
pub(crate) struct OnTheFly<'c> {
    recurrence: &'c Recurrence,
    grid: &'c Grid,
}

impl<'c> OnTheFly<'c> {
    pub(crate) fn new(recurrence: &'c Recurrence, grid: &'c Grid) -> Self {
        Self { recurrence, grid }
    }

    #[inline]
    fn point(&self, pair: PairIndex) -> (f64, f64) {
        let i = pair.north();
        (self.grid.cos_theta()[i], self.grid.sin_theta()[i])
    }
}

impl LegendreSource for OnTheFly<'_> {
    fn scalar<'a>(&'a self, im: OrderIndex, pair: PairIndex, col: &'a mut ColumnScratch) -> &'a [f64] {
        let n = self.recurrence.truncation().n_degrees(im);
        let (x, s) = self.point(pair);
        self.recurrence.scalar_column(im, x, s, &mut col.y[..n]);
        &col.y[..n]
    }

    fn vector<'a>(
        &'a self,
        im: OrderIndex,
        pair: PairIndex,
        col: &'a mut ColumnScratch,
    ) -> (&'a [f64], &'a [f64]) {
        let n = self.recurrence.truncation().n_degrees(im);
        let (x, s) = self.point(pair);
        self.recurrence.vector_column(
            im,
            x,
            s,
            &mut col.work[..n + 1],
            &mut col.dtheta[..n],
            &mut col.msin[..n],
        );
        let col: &'a ColumnScratch = col;
        (&col.dtheta[..n], &col.msin[..n])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigBuilder;

    #[test]
    fn test_on_the_fly_matches_table_bitwise() {
        let config = ConfigBuilder::new(12).build().unwrap();
        let table = LegendreTable::new(&config);
        let otf = OnTheFly::new(config.recurrence(), config.grid());
        let mut col = ColumnScratch::default();
        col.ensure(config.lmax());

        for im in OrderIndex::range(0..config.truncation().n_orders()) {
            for pair in PairIndex::range(0..config.nlat_2()) {
                let expected = table.scalar(im, pair).to_vec();
                assert_eq!(otf.scalar(im, pair, &mut col), &expected[..]);

                let (dt, ms) = (table.dtheta(im, pair).to_vec(), table.msin(im, pair).to_vec());
                let (a, b) = otf.vector(im, pair, &mut col);
                assert_eq!(a, &dt[..]);
                assert_eq!(b, &ms[..]);
            }
        }
    }
}
