//! # sht-rs
//!
//! Spherical harmonic transforms for numerical simulations on the sphere.
//!
//! This crate provides the building blocks of a transform engine:
//! - Latitude quadrature (Gauss-Legendre, Fejér, Clenshaw-Curtis)
//! - Validated, immutable transform configurations
//! - Normalized associated Legendre functions via a stable recurrence
//! - Longitudinal real FFTs with order stride
//! - Scalar and spheroidal/toroidal vector transforms, batched and threaded
//! - Spectral-space utilities (energy, Laplacian, point evaluation)
//!
//! ```
//! use sht_rs::{init, scalar_forward, scalar_inverse, GridKind, Normalization, Sht};
//!
//! let config = init(16, 16, 1, 0, 0, GridKind::Gauss, Normalization::Orthonormal).unwrap();
//! let sht = Sht::new(config).unwrap();
//!
//! let grid = vec![1.0; sht.config().nspat()];
//! let spectral = scalar_forward(&sht, &grid).unwrap();
//! let back = scalar_inverse(&sht, &spectral).unwrap();
//! assert!(back.iter().all(|&v| (v - 1.0).abs() < 1e-12));
//! ```

pub mod config;
pub mod error;
pub mod fourier;
pub mod grid;
mod kernel;
pub mod legendre;
pub mod parallel;
pub mod polynomial;
pub mod spectral;
pub mod transform;
pub mod types;

pub use rustfft::num_complex::Complex64;

// Configuration
pub use config::{
    init, ConfigBuilder, LegendreMode, Normalization, ShtParams, SpectralLayout, TransformConfig,
};
pub use error::{ConfigError, Result, ShtError};
pub use grid::{fft_friendly_length, Grid, GridKind};

// Legendre functions
pub use legendre::{LegendreTable, Recurrence};

// Transforms
pub use transform::{
    legendre_table, qst_forward, qst_inverse, scalar_forward, scalar_inverse, spheroidal_inverse,
    toroidal_inverse, vector_forward, vector_inverse, Sht, Workspace,
};
