//! Precomputed Legendre values on the northern half of a grid.

use crate::config::{Normalization, TransformConfig};
use crate::error::ConfigError;
use crate::grid::GridKind;
use crate::types::{OrderIndex, PairIndex, Truncation};

/// Legendre values y, dy/dθ and m y/sin θ at every northern latitude.
///
/// Values for each order are stored as `[pair][l - m]`, orders one after
/// another; the southern rows reuse them through the parity y(-x) = (-1)^{l-m} y(x).
#[derive(Clone, Debug)]
pub struct LegendreTable {
    truncation: Truncation,
    nlat_2: usize,
    grid: GridKind,
    nlat: usize,
    normalization: Normalization,
    condon_shortley: bool,
    scalar: Vec<f64>,
    dtheta: Vec<f64>,
    msin: Vec<f64>,
}

impl LegendreTable {
    /// Evaluate the table for a configuration.
    #[tracing::instrument(level = "debug", skip_all, fields(lmax = config.lmax(), nlat = config.nlat()))]
    pub fn new(config: &TransformConfig) -> Self {
        let recurrence = config.recurrence();
        let grid = config.grid();
        let truncation = *config.truncation();
        let nlat_2 = grid.nlat_2();
        let len = nlat_2 * truncation.nlm();
        let mut scalar = Vec::with_capacity(len);
        let mut dtheta = Vec::with_capacity(len);
        let mut msin = Vec::with_capacity(len);
        let mut work = vec![0.0; truncation.lmax() + 2];

        for im in OrderIndex::range(0..truncation.n_orders()) {
            let n = truncation.n_degrees(im);
            for i in 0..nlat_2 {
                let (x, s) = (grid.cos_theta()[i], grid.sin_theta()[i]);
                let start = scalar.len();
                scalar.resize(start + n, 0.0);
                dtheta.resize(start + n, 0.0);
                msin.resize(start + n, 0.0);
                recurrence.scalar_column(im, x, s, &mut scalar[start..]);
                recurrence.vector_column(
                    im,
                    x,
                    s,
                    &mut work[..n + 1],
                    &mut dtheta[start..],
                    &mut msin[start..],
                );
            }
        }

        tracing::debug!(
            values = scalar.len(),
            bytes = scalar.len() * 3 * std::mem::size_of::<f64>(),
            "Legendre table built"
        );
        Self {
            truncation,
            nlat_2,
            grid: config.grid_kind(),
            nlat: config.nlat(),
            normalization: config.normalization(),
            condon_shortley: config.condon_shortley(),
            scalar,
            dtheta,
            msin,
        }
    }

    /// Check that the table was built for a configuration with the same
    /// truncation, latitudes and normalization as `config`.
    pub fn check(&self, config: &TransformConfig) -> Result<(), ConfigError> {
        let differs = if self.truncation != *config.truncation() {
            Some("truncation")
        } else if self.grid != config.grid_kind() || self.nlat != config.nlat() {
            Some("latitude grid")
        } else if self.normalization != config.normalization()
            || self.condon_shortley != config.condon_shortley()
        {
            Some("normalization")
        } else {
            None
        };
        match differs {
            Some(field) => Err(ConfigError::TableMismatch(field)),
            None => Ok(()),
        }
    }

    /// Truncation the table covers.
    pub fn truncation(&self) -> &Truncation {
        &self.truncation
    }

    /// Number of latitude pairs the table covers.
    pub fn nlat_2(&self) -> usize {
        self.nlat_2
    }

    /// Number of stored values per quantity.
    pub fn len(&self) -> usize {
        self.scalar.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scalar.is_empty()
    }

    #[inline]
    fn range(&self, im: OrderIndex, pair: PairIndex) -> std::ops::Range<usize> {
        let n = self.truncation.n_degrees(im);
        let start = self.nlat_2 * self.truncation.mode_offset(im) + pair.get() * n;
        start..start + n
    }

    /// y_lm for l = m..=lmax at the northern row of `pair`.
    #[inline]
    pub fn scalar(&self, im: OrderIndex, pair: PairIndex) -> &[f64] {
        &self.scalar[self.range(im, pair)]
    }

    /// dy_lm/dθ for l = m..=lmax at the northern row of `pair`.
    #[inline]
    pub fn dtheta(&self, im: OrderIndex, pair: PairIndex) -> &[f64] {
        &self.dtheta[self.range(im, pair)]
    }

    /// m y_lm / sin θ for l = m..=lmax at the northern row of `pair`.
    #[inline]
    pub fn msin(&self, im: OrderIndex, pair: PairIndex) -> &[f64] {
        &self.msin[self.range(im, pair)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigBuilder;

    #[test]
    fn test_table_matches_recurrence() {
        let config = ConfigBuilder::new(9).with_mmax(4).with_mres(2).build().unwrap();
        let table = LegendreTable::new(&config);
        let t = config.truncation();
        assert_eq!(table.len(), config.nlat_2() * t.nlm());

        let mut col = vec![0.0; 10];
        for im in OrderIndex::range(0..t.n_orders()) {
            let n = t.n_degrees(im);
            for pair in PairIndex::range(0..config.nlat_2()) {
                let i = pair.north();
                config.recurrence().scalar_column(
                    im,
                    config.cos_theta()[i],
                    config.sin_theta()[i],
                    &mut col[..n],
                );
                assert_eq!(table.scalar(im, pair), &col[..n]);
                assert_eq!(table.dtheta(im, pair).len(), n);
            }
        }
    }

    #[test]
    fn test_check_against_config() {
        let config = ConfigBuilder::new(9).build().unwrap();
        let table = LegendreTable::new(&config);
        assert_eq!(table.check(&config), Ok(()));
        assert_eq!(table.nlat_2(), config.nlat_2());

        let other = ConfigBuilder::new(8).build().unwrap();
        assert_eq!(table.check(&other), Err(ConfigError::TableMismatch("truncation")));
        let other = ConfigBuilder::new(9).with_grid_size(12, 32).build().unwrap();
        assert_eq!(table.check(&other), Err(ConfigError::TableMismatch("latitude grid")));
        let other = ConfigBuilder::new(9)
            .with_normalization(Normalization::Schmidt)
            .build()
            .unwrap();
        assert_eq!(table.check(&other), Err(ConfigError::TableMismatch("normalization")));
        let other = ConfigBuilder::new(9).with_condon_shortley(false).build().unwrap();
        assert!(table.check(&other).is_err());
    }
}
