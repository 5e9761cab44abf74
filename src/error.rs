//! Error types for configuration and transform calls.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ShtError>;

/// Why a transform configuration could not be built.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// The order stride must be at least one.
    #[error("mres must be >= 1, got {0}")]
    ZeroStride(usize),

    /// The largest order exceeds the largest degree.
    #[error("mmax*mres = {max_order} exceeds lmax = {lmax}")]
    OrderExceedsDegree { max_order: usize, lmax: usize },

    /// Too few latitudes for the truncation and grid kind.
    #[error("nlat = {nlat} is too small for {grid} grid with lmax = {lmax} (need >= {required})")]
    TooFewLatitudes {
        nlat: usize,
        lmax: usize,
        required: usize,
        grid: &'static str,
    },

    /// Too few longitudes to resolve the largest order (aliasing).
    #[error("nphi = {nphi} violates the Nyquist bound (need >= {required})")]
    TooFewLongitudes { nphi: usize, required: usize },

    /// The longitude count must cover whole periods of 2π/mres.
    #[error("nphi = {nphi} is not a multiple of mres = {mres}")]
    StrideMismatch { nphi: usize, mres: usize },

    /// Unknown grid kind name.
    #[error("unsupported grid kind: {0}")]
    UnsupportedGrid(String),

    /// Unknown normalization name.
    #[error("unsupported normalization: {0}")]
    UnsupportedNormalization(String),

    /// Unknown Legendre evaluation mode name.
    #[error("unsupported Legendre mode: {0}")]
    UnsupportedMode(String),

    /// Unknown spectral layout name.
    #[error("unsupported spectral layout: {0}")]
    UnsupportedLayout(String),

    /// Polar optimization threshold outside [0, 1).
    #[error("polar threshold must be finite and in [0, 1), got {0}")]
    InvalidPolarThreshold(f64),

    /// A shared Legendre table was built for a different configuration.
    #[error("Legendre table does not match the configuration: {0} differs")]
    TableMismatch(&'static str),

    /// Sizes derived from the truncation do not fit in `usize`.
    #[error("{0} overflows for this truncation")]
    SizeOverflow(&'static str),

    /// The non-linear order used for automatic grid sizing must be positive.
    #[error("non-linear order must be >= 1, got {0}")]
    InvalidNonLinearOrder(usize),
}

/// Errors returned by configuration and transform entry points.
#[derive(Debug, Error)]
pub enum ShtError {
    /// Invalid transform configuration.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A caller buffer does not match the sizes implied by the configuration.
    #[error("dimension mismatch for {buffer}: expected {expected}, got {actual}")]
    Dimension {
        buffer: &'static str,
        expected: usize,
        actual: usize,
    },

    /// The requested order is not part of the truncation.
    #[error("order m = {m} is not represented (largest order {max_order}, stride {mres})")]
    Order {
        m: usize,
        max_order: usize,
        mres: usize,
    },

    /// The dedicated worker pool could not be created.
    #[error("thread pool error: {0}")]
    ThreadPool(String),
}

impl ShtError {
    /// Shorthand for a [`ShtError::Dimension`] error.
    pub(crate) fn dimension(buffer: &'static str, expected: usize, actual: usize) -> Self {
        Self::Dimension {
            buffer,
            expected,
            actual,
        }
    }
}

/// Check that a buffer has exactly the expected length.
pub(crate) fn check_len(buffer: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(ShtError::dimension(buffer, expected, actual))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_converts() {
        let err: ShtError = ConfigError::ZeroStride(0).into();
        assert!(matches!(err, ShtError::Config(ConfigError::ZeroStride(0))));
        assert!(err.to_string().contains("mres"));
    }

    #[test]
    fn test_check_len() {
        assert!(check_len("grid", 12, 12).is_ok());
        match check_len("grid", 12, 11) {
            Err(ShtError::Dimension {
                buffer,
                expected,
                actual,
            }) => {
                assert_eq!(buffer, "grid");
                assert_eq!(expected, 12);
                assert_eq!(actual, 11);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
