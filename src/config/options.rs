//! Enumerated transform options.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Normalization of the spherical harmonics.
///
/// Every convention is characterised by c_l with 2π ∫ y_lm(x)² dx = c_l².
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Normalization {
    /// Unit norm over the sphere.
    #[default]
    Orthonormal,
    /// Schmidt semi-normalized, norm 4π/(2l+1).
    Schmidt,
    /// 4π-normalized, norm 4π.
    FourPi,
}

impl Normalization {
    /// Scale factor c_l relative to the orthonormal harmonics.
    #[inline]
    pub fn scale(self, l: usize) -> f64 {
        match self {
            Normalization::Orthonormal => 1.0,
            Normalization::Schmidt => (4.0 * PI / (2 * l + 1) as f64).sqrt(),
            Normalization::FourPi => (4.0 * PI).sqrt(),
        }
    }

    /// Squared norm c_l² of a degree-l harmonic over the sphere.
    #[inline]
    pub fn norm_squared(self, l: usize) -> f64 {
        match self {
            Normalization::Orthonormal => 1.0,
            Normalization::Schmidt => 4.0 * PI / (2 * l + 1) as f64,
            Normalization::FourPi => 4.0 * PI,
        }
    }
}

impl fmt::Display for Normalization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Normalization::Orthonormal => "orthonormal",
            Normalization::Schmidt => "schmidt",
            Normalization::FourPi => "4pi",
        })
    }
}

impl FromStr for Normalization {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "orthonormal" | "ortho" => Ok(Normalization::Orthonormal),
            "schmidt" => Ok(Normalization::Schmidt),
            "4pi" | "fourpi" | "four-pi" => Ok(Normalization::FourPi),
            _ => Err(ConfigError::UnsupportedNormalization(s.to_string())),
        }
    }
}

/// How associated Legendre values are obtained during a transform.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LegendreMode {
    /// Build a [`LegendreTable`](crate::legendre::LegendreTable) once and read it.
    #[default]
    Precomputed,
    /// Recompute each column inside the transform; no table memory.
    OnTheFly,
}

impl fmt::Display for LegendreMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LegendreMode::Precomputed => "precomputed",
            LegendreMode::OnTheFly => "on-the-fly",
        })
    }
}

impl FromStr for LegendreMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "precomputed" | "table" => Ok(LegendreMode::Precomputed),
            "on-the-fly" | "onthefly" | "otf" => Ok(LegendreMode::OnTheFly),
            _ => Err(ConfigError::UnsupportedMode(s.to_string())),
        }
    }
}

/// Ordering of spectral coefficients in caller buffers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpectralLayout {
    /// All degrees of order 0, then all degrees of order mres, ...
    #[default]
    MMajor,
    /// All admissible orders of degree 0, then of degree 1, ...
    LMajor,
}

impl fmt::Display for SpectralLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SpectralLayout::MMajor => "m-major",
            SpectralLayout::LMajor => "l-major",
        })
    }
}

impl FromStr for SpectralLayout {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "m-major" | "mmajor" => Ok(SpectralLayout::MMajor),
            "l-major" | "lmajor" => Ok(SpectralLayout::LMajor),
            _ => Err(ConfigError::UnsupportedLayout(s.to_string())),
        }
    }
}
