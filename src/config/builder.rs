//! Plain transform parameters and the fluent builder around them.

use super::{LegendreMode, Normalization, SpectralLayout, TransformConfig};
use crate::error::ConfigError;
use crate::grid::GridKind;

/// Every user-facing choice that defines a transform.
///
/// `nlat = 0` or `nphi = 0` request automatic sizing for products of
/// `nl_order` fields (1 = linear transforms only).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ShtParams {
    pub lmax: usize,
    pub mmax: usize,
    pub mres: usize,
    pub nlat: usize,
    pub nphi: usize,
    pub grid: GridKind,
    pub normalization: Normalization,
    /// Include the (-1)^m Condon-Shortley phase.
    pub condon_shortley: bool,
    pub mode: LegendreMode,
    pub layout: SpectralLayout,
    /// Skip polar latitudes where every |y_lm| is below this value; 0 disables.
    pub polar_threshold: f64,
    pub nl_order: usize,
}

impl Default for ShtParams {
    fn default() -> Self {
        Self::new(0)
    }
}

impl ShtParams {
    /// Triangular truncation at `lmax` on an automatically sized Gauss grid.
    pub fn new(lmax: usize) -> Self {
        Self {
            lmax,
            mmax: lmax,
            mres: 1,
            nlat: 0,
            nphi: 0,
            grid: GridKind::Gauss,
            normalization: Normalization::Orthonormal,
            condon_shortley: true,
            mode: LegendreMode::Precomputed,
            layout: SpectralLayout::MMajor,
            polar_threshold: 0.0,
            nl_order: 1,
        }
    }
}

/// Fluent builder for [`TransformConfig`].
///
/// # Example
///
/// ```
/// use sht_rs::{ConfigBuilder, GridKind, Normalization};
///
/// let config = ConfigBuilder::new(15)
///     .with_grid(GridKind::Regular)
///     .with_normalization(Normalization::Schmidt)
///     .build()
///     .unwrap();
/// assert!(config.nlat() >= 31);
/// ```
#[derive(Clone, Debug)]
pub struct ConfigBuilder {
    params: ShtParams,
}

impl ConfigBuilder {
    /// Start from a triangular truncation at `lmax`.
    pub fn new(lmax: usize) -> Self {
        Self {
            params: ShtParams::new(lmax),
        }
    }

    /// Start from existing parameters.
    pub fn from_params(params: ShtParams) -> Self {
        Self { params }
    }

    /// Set the largest order index.
    pub fn with_mmax(mut self, mmax: usize) -> Self {
        self.params.mmax = mmax;
        self
    }

    /// Set the order stride (orders are multiples of `mres`).
    pub fn with_mres(mut self, mres: usize) -> Self {
        self.params.mres = mres;
        self
    }

    /// Set the grid size; zero in either dimension means automatic.
    pub fn with_grid_size(mut self, nlat: usize, nphi: usize) -> Self {
        self.params.nlat = nlat;
        self.params.nphi = nphi;
        self
    }

    /// Set the latitude sampling.
    pub fn with_grid(mut self, grid: GridKind) -> Self {
        self.params.grid = grid;
        self
    }

    /// Set the harmonic normalization.
    pub fn with_normalization(mut self, normalization: Normalization) -> Self {
        self.params.normalization = normalization;
        self
    }

    /// Include or drop the Condon-Shortley phase.
    pub fn with_condon_shortley(mut self, enable: bool) -> Self {
        self.params.condon_shortley = enable;
        self
    }

    /// Choose between a precomputed table and on-the-fly recurrence.
    pub fn with_mode(mut self, mode: LegendreMode) -> Self {
        self.params.mode = mode;
        self
    }

    /// Set the ordering of spectral buffers.
    pub fn with_layout(mut self, layout: SpectralLayout) -> Self {
        self.params.layout = layout;
        self
    }

    /// Enable polar optimization with the given threshold.
    ///
    /// Values around 1e-10 change results at that level and skip many
    /// near-polar rows at high orders.
    pub fn with_polar_threshold(mut self, threshold: f64) -> Self {
        self.params.polar_threshold = threshold;
        self
    }

    /// Size automatic grids for products of `nl_order` fields.
    pub fn with_nl_order(mut self, nl_order: usize) -> Self {
        self.params.nl_order = nl_order;
        self
    }

    /// Parameters collected so far.
    pub fn params(&self) -> &ShtParams {
        &self.params
    }

    /// Validate and build the configuration.
    pub fn build(self) -> Result<TransformConfig, ConfigError> {
        TransformConfig::from_params(self.params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = ShtParams::new(12);
        assert_eq!(params.mmax, 12);
        assert_eq!(params.mres, 1);
        assert!(params.condon_shortley);
        assert_eq!(params.grid, GridKind::Gauss);
        assert_eq!(ShtParams::default().lmax, 0);
    }

    #[test]
    fn test_builder_sets_fields() {
        let builder = ConfigBuilder::new(20)
            .with_mmax(5)
            .with_mres(4)
            .with_grid_size(32, 48)
            .with_mode(LegendreMode::OnTheFly)
            .with_layout(SpectralLayout::LMajor)
            .with_condon_shortley(false)
            .with_polar_threshold(1e-12)
            .with_nl_order(2);
        let p = builder.params();
        assert_eq!((p.mmax, p.mres, p.nlat, p.nphi), (5, 4, 32, 48));
        assert_eq!(p.mode, LegendreMode::OnTheFly);
        assert_eq!(p.layout, SpectralLayout::LMajor);
        assert!(!p.condon_shortley);
        assert_eq!(p.nl_order, 2);
    }
}
