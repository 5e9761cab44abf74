//! Transform configuration: truncation, grid, normalization and FFT plans.
//!
//! A [`TransformConfig`] is validated once and is immutable afterwards. The
//! transform engine shares it read-only, so any number of configurations can
//! coexist and transforms against one of them may run concurrently.

mod builder;
mod options;

pub use builder::{ConfigBuilder, ShtParams};
pub use options::{LegendreMode, Normalization, SpectralLayout};

use std::f64::consts::PI;

use crate::error::{ConfigError, Result};
use crate::fourier::LongitudinalFft;
use crate::grid::{auto_nlat, auto_nphi, fft_friendly_length, Grid, GridKind};
use crate::legendre::{polar_first_pairs, Recurrence};
use crate::types::{OrderIndex, PairIndex, Truncation};

/// Validated, immutable transform configuration.
#[derive(Clone, Debug)]
pub struct TransformConfig {
    params: ShtParams,
    truncation: Truncation,
    grid: Grid,
    fft: LongitudinalFft,
    recurrence: Recurrence,
    /// 1 / c_l² per degree.
    inv_norm: Vec<f64>,
    /// First latitude pair processed for each order.
    first_pair: Vec<usize>,
    /// Start of each degree in l-major layout (length lmax + 2).
    lmajor_offsets: Vec<usize>,
}

impl TransformConfig {
    /// Start a [`ConfigBuilder`] for a triangular truncation at `lmax`.
    pub fn builder(lmax: usize) -> ConfigBuilder {
        ConfigBuilder::new(lmax)
    }

    /// Validate parameters and precompute everything the transforms share.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(lmax = params.lmax, mmax = params.mmax, mres = params.mres, grid = %params.grid)
    )]
    pub fn from_params(mut params: ShtParams) -> std::result::Result<Self, ConfigError> {
        let truncation = Truncation::new(params.lmax, params.mmax, params.mres)?;
        if params.nl_order == 0 {
            return Err(ConfigError::InvalidNonLinearOrder(params.nl_order));
        }
        let threshold = params.polar_threshold;
        if !threshold.is_finite() || !(0.0..1.0).contains(&threshold) {
            return Err(ConfigError::InvalidPolarThreshold(threshold));
        }

        if params.nlat == 0 {
            params.nlat = auto_nlat(params.grid, params.lmax, params.nl_order)
                .ok_or(ConfigError::SizeOverflow("latitude count"))?;
            tracing::debug!(nlat = params.nlat, "selected latitude count");
        }
        if params.nphi == 0 {
            params.nphi = auto_nphi(params.mmax, params.mres, params.nl_order)
                .ok_or(ConfigError::SizeOverflow("longitude count"))?;
            tracing::debug!(nphi = params.nphi, "selected longitude count");
        }

        let (nphi, mres) = (params.nphi, params.mres);
        if nphi % mres != 0 {
            return Err(ConfigError::StrideMismatch { nphi, mres });
        }
        let required = truncation
            .max_order()
            .checked_mul(2)
            .and_then(|n| n.checked_add(1))
            .ok_or(ConfigError::SizeOverflow("longitude count"))?;
        if nphi < required {
            return Err(ConfigError::TooFewLongitudes { nphi, required });
        }
        let period = nphi / mres;
        if fft_friendly_length(period) != period {
            tracing::warn!(
                nphi,
                period,
                "longitude period has prime factors above 5, FFTs will be slow"
            );
        }

        params
            .nlat
            .checked_mul(nphi)
            .ok_or(ConfigError::SizeOverflow("grid size"))?;
        let grid = Grid::new(params.grid, params.nlat, nphi, params.lmax)?;
        let fft = LongitudinalFft::new(nphi, &truncation);
        let recurrence = Recurrence::new(&truncation, params.normalization, params.condon_shortley);
        let first_pair = polar_first_pairs(&recurrence, &grid, threshold);

        let inv_norm = (0..=params.lmax)
            .map(|l| 1.0 / params.normalization.norm_squared(l))
            .collect();

        let mut lmajor_offsets = Vec::with_capacity(params.lmax + 2);
        let mut offset = 0;
        for l in 0..=params.lmax {
            lmajor_offsets.push(offset);
            offset += truncation.orders_at_degree(l);
        }
        lmajor_offsets.push(offset);

        let skipped: usize = first_pair.iter().sum();
        tracing::debug!(
            nlat = grid.nlat(),
            nphi,
            nlm = truncation.nlm(),
            truncation = %truncation,
            polar_pairs_skipped = skipped,
            "transform configuration ready"
        );

        Ok(Self {
            params,
            truncation,
            grid,
            fft,
            recurrence,
            inv_norm,
            first_pair,
            lmajor_offsets,
        })
    }

    /// Resolved parameters (automatic sizes filled in).
    pub fn params(&self) -> &ShtParams {
        &self.params
    }

    /// Spectral truncation (lmax, mmax, mres).
    pub fn truncation(&self) -> &Truncation {
        &self.truncation
    }

    /// Spatial grid with its quadrature.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Maximum degree.
    #[inline]
    pub fn lmax(&self) -> usize {
        self.truncation.lmax()
    }

    /// Maximum order index; the largest order is `mmax * mres`.
    #[inline]
    pub fn mmax(&self) -> usize {
        self.truncation.mmax()
    }

    /// Order stride.
    #[inline]
    pub fn mres(&self) -> usize {
        self.truncation.mres()
    }

    /// Number of latitude rows.
    #[inline]
    pub fn nlat(&self) -> usize {
        self.grid.nlat()
    }

    /// Number of latitude pairs.
    #[inline]
    pub fn nlat_2(&self) -> usize {
        self.grid.nlat_2()
    }

    /// Number of longitudes per row.
    #[inline]
    pub fn nphi(&self) -> usize {
        self.grid.nphi()
    }

    /// Number of spectral coefficients.
    #[inline]
    pub fn nlm(&self) -> usize {
        self.truncation.nlm()
    }

    /// Number of grid values.
    #[inline]
    pub fn nspat(&self) -> usize {
        self.grid.nspat()
    }

    /// Latitude sampling.
    pub fn grid_kind(&self) -> GridKind {
        self.params.grid
    }

    /// Harmonic normalization.
    pub fn normalization(&self) -> Normalization {
        self.params.normalization
    }

    /// Whether the (-1)^m Condon-Shortley phase is applied.
    pub fn condon_shortley(&self) -> bool {
        self.params.condon_shortley
    }

    /// How Legendre values are obtained.
    pub fn mode(&self) -> LegendreMode {
        self.params.mode
    }

    /// Ordering of coefficients in spectral buffers.
    pub fn layout(&self) -> SpectralLayout {
        self.params.layout
    }

    /// Magnitude below which polar Legendre values are skipped (0 = off).
    pub fn polar_threshold(&self) -> f64 {
        self.params.polar_threshold
    }

    /// cos θ of every latitude row, north to south.
    pub fn cos_theta(&self) -> &[f64] {
        self.grid.cos_theta()
    }

    /// sin θ of every latitude row.
    pub fn sin_theta(&self) -> &[f64] {
        self.grid.sin_theta()
    }

    /// Latitude quadrature weights (sum to 2).
    pub fn weights(&self) -> &[f64] {
        self.grid.weights()
    }

    /// Value of Y_00, the constant harmonic.
    pub fn y00(&self) -> f64 {
        self.params.normalization.scale(0) / (4.0 * PI).sqrt()
    }

    /// Squared norm c_l² of degree `l`.
    pub fn norm_squared(&self, l: usize) -> f64 {
        self.params.normalization.norm_squared(l)
    }

    /// Position of coefficient (l, m) in spectral buffers, if represented.
    ///
    /// ```
    /// use sht_rs::{ConfigBuilder, SpectralLayout};
    ///
    /// let config = ConfigBuilder::new(3).build().unwrap();
    /// assert_eq!(config.lm_index(2, 1), Some(5));
    /// assert_eq!(config.lm_index(1, 2), None);
    ///
    /// let config = ConfigBuilder::new(3).with_layout(SpectralLayout::LMajor).build().unwrap();
    /// assert_eq!(config.lm_index(2, 1), Some(4));
    /// ```
    pub fn lm_index(&self, l: usize, m: usize) -> Option<usize> {
        if !self.truncation.contains(l, m) {
            return None;
        }
        let im = OrderIndex::new(m / self.mres());
        Some(self.layout_index(im, l - m))
    }

    /// Degree of the coefficient stored at `index`.
    pub fn degree_of(&self, index: usize) -> Option<usize> {
        self.locate(index).map(|(l, _)| l)
    }

    /// Order of the coefficient stored at `index`.
    pub fn order_of(&self, index: usize) -> Option<usize> {
        self.locate(index).map(|(_, m)| m)
    }

    /// Map a buffer position back to (l, m).
    fn locate(&self, index: usize) -> Option<(usize, usize)> {
        if index >= self.nlm() {
            return None;
        }
        match self.params.layout {
            SpectralLayout::MMajor => {
                // Last order whose block starts at or before `index`.
                let n_orders = self.truncation.n_orders();
                let k = (0..n_orders)
                    .take_while(|&k| self.truncation.mode_offset(OrderIndex::new(k)) <= index)
                    .count()
                    - 1;
                let im = OrderIndex::new(k);
                let m = self.truncation.order(im);
                Some((m + index - self.truncation.mode_offset(im), m))
            }
            SpectralLayout::LMajor => {
                let l = self.lmajor_offsets.partition_point(|&o| o <= index) - 1;
                let m = (index - self.lmajor_offsets[l]) * self.mres();
                Some((l, m))
            }
        }
    }

    /// Caller-layout position of the coefficient (m + k, m) of order index `im`.
    #[inline]
    pub(crate) fn layout_index(&self, im: OrderIndex, k: usize) -> usize {
        match self.params.layout {
            SpectralLayout::MMajor => self.truncation.mode_offset(im) + k,
            SpectralLayout::LMajor => {
                self.lmajor_offsets[self.truncation.order(im) + k] + im.get()
            }
        }
    }

    #[inline]
    pub(crate) fn inv_norm(&self) -> &[f64] {
        &self.inv_norm
    }

    /// First latitude pair where order `im` is not negligible.
    #[inline]
    pub fn first_pair(&self, im: OrderIndex) -> PairIndex {
        PairIndex::new(self.first_pair[im])
    }

    pub(crate) fn fft(&self) -> &LongitudinalFft {
        &self.fft
    }

    pub(crate) fn recurrence(&self) -> &Recurrence {
        &self.recurrence
    }
}

/// Build a transform configuration from positional arguments.
///
/// `nlat = 0` or `nphi = 0` select the smallest admissible grid.
///
/// ```
/// use sht_rs::{init, GridKind, Normalization};
///
/// let config = init(10, 10, 1, 0, 0, GridKind::Gauss, Normalization::Orthonormal).unwrap();
/// assert_eq!(config.nlm(), 66);
/// assert!(init(10, 6, 2, 0, 0, GridKind::Gauss, Normalization::Orthonormal).is_err());
/// ```
pub fn init(
    lmax: usize,
    mmax: usize,
    mres: usize,
    nlat: usize,
    nphi: usize,
    grid: GridKind,
    normalization: Normalization,
) -> Result<TransformConfig> {
    let params = ShtParams {
        mmax,
        mres,
        nlat,
        nphi,
        grid,
        normalization,
        ..ShtParams::new(lmax)
    };
    Ok(TransformConfig::from_params(params)?)
}
