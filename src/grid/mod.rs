//! Spatial grid: latitude quadrature plus uniform longitudes.
//!
//! Latitude rows are stored from the north pole southward. Every grid kind
//! is mirror-symmetric, so rows `i` and `nlat - 1 - i` form a pair that the
//! transforms process together.

mod sizing;

pub use sizing::{auto_nlat, auto_nphi, fft_friendly_length};

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::polynomial::{clenshaw_curtis, fejer, gauss_legendre, QuadratureRule};
use crate::types::PairIndex;

/// Latitude sampling.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GridKind {
    /// Gauss-Legendre latitudes; exact analysis with `nlat > lmax`.
    #[default]
    Gauss,
    /// Equispaced latitudes excluding the poles, Fejér weights.
    Regular,
    /// Equispaced latitudes including both poles, Clenshaw-Curtis weights.
    RegularPoles,
}

impl GridKind {
    /// Smallest `nlat` giving exact analysis up to degree `lmax`.
    pub fn min_nlat(self, lmax: usize) -> usize {
        match self {
            GridKind::Gauss => lmax + 1,
            GridKind::Regular => 2 * lmax + 1,
            GridKind::RegularPoles => (2 * lmax + 1).max(2),
        }
    }

    /// Whether the rows include θ = 0 and θ = π.
    pub fn includes_poles(self) -> bool {
        matches!(self, GridKind::RegularPoles)
    }

    pub(crate) fn name(self) -> &'static str {
        match self {
            GridKind::Gauss => "gauss",
            GridKind::Regular => "regular",
            GridKind::RegularPoles => "regular-poles",
        }
    }
}

impl fmt::Display for GridKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GridKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gauss" | "gauss-legendre" => Ok(GridKind::Gauss),
            "regular" | "equiangular" => Ok(GridKind::Regular),
            "regular-poles" | "poles" => Ok(GridKind::RegularPoles),
            _ => Err(ConfigError::UnsupportedGrid(s.to_string())),
        }
    }
}

/// Latitude/longitude grid with quadrature weights.
#[derive(Clone, Debug)]
pub struct Grid {
    kind: GridKind,
    nlat: usize,
    nphi: usize,
    rule: QuadratureRule,
    /// 2π w_i per latitude pair; halved for a self-paired equator row.
    pair_weights: Vec<f64>,
}

impl Grid {
    /// Build a grid, checking `nlat` against the exactness bound for `lmax`.
    pub fn new(kind: GridKind, nlat: usize, nphi: usize, lmax: usize) -> Result<Self, ConfigError> {
        let required = kind.min_nlat(lmax);
        if nlat < required {
            return Err(ConfigError::TooFewLatitudes {
                nlat,
                lmax,
                required,
                grid: kind.name(),
            });
        }

        let rule = match kind {
            GridKind::Gauss => gauss_legendre(nlat),
            GridKind::Regular => fejer(nlat),
            GridKind::RegularPoles => clenshaw_curtis(nlat),
        };

        let nlat_2 = (nlat + 1) / 2;
        let pair_weights = (0..nlat_2)
            .map(|i| {
                let w = 2.0 * PI * rule.weights[i];
                if i == nlat - 1 - i {
                    0.5 * w
                } else {
                    w
                }
            })
            .collect();

        Ok(Self {
            kind,
            nlat,
            nphi,
            rule,
            pair_weights,
        })
    }

    /// Grid kind.
    #[inline]
    pub fn kind(&self) -> GridKind {
        self.kind
    }

    /// Number of latitude rows.
    #[inline]
    pub fn nlat(&self) -> usize {
        self.nlat
    }

    /// Number of latitude pairs, `(nlat + 1) / 2`.
    #[inline]
    pub fn nlat_2(&self) -> usize {
        (self.nlat + 1) / 2
    }

    /// Number of longitudes.
    #[inline]
    pub fn nphi(&self) -> usize {
        self.nphi
    }

    /// Number of real values in a spatial field.
    #[inline]
    pub fn nspat(&self) -> usize {
        self.nlat * self.nphi
    }

    /// cos θ for every row.
    #[inline]
    pub fn cos_theta(&self) -> &[f64] {
        &self.rule.cos_theta
    }

    /// sin θ for every row.
    #[inline]
    pub fn sin_theta(&self) -> &[f64] {
        &self.rule.sin_theta
    }

    /// Quadrature weights over x = cos θ (sum to 2).
    #[inline]
    pub fn weights(&self) -> &[f64] {
        &self.rule.weights
    }

    /// Colatitude of row `i`.
    pub fn colatitude(&self, i: usize) -> f64 {
        self.rule.cos_theta[i].acos()
    }

    /// Longitude of column `j`.
    pub fn longitude(&self, j: usize) -> f64 {
        2.0 * PI * j as f64 / self.nphi as f64
    }

    /// Weight used by the analysis kernel for a latitude pair.
    #[inline]
    pub fn pair_weight(&self, pair: PairIndex) -> f64 {
        self.pair_weights[pair]
    }

    /// Whether this pair is the equator row paired with itself.
    #[inline]
    pub fn is_self_paired(&self, pair: PairIndex) -> bool {
        pair.north() == pair.south(self.nlat)
    }

    /// Integrate a field over the sphere with the grid quadrature.
    pub fn integrate(&self, field: &[f64]) -> f64 {
        let dphi = 2.0 * PI / self.nphi as f64;
        field
            .chunks(self.nphi)
            .zip(&self.rule.weights)
            .map(|(row, &w)| w * dphi * row.iter().sum::<f64>())
            .sum()
    }
}
