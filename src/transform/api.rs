//! Free-function entry points mirroring the [`Sht`] methods.

use std::sync::Arc;

use rustfft::num_complex::Complex64;

use super::Sht;
use crate::config::TransformConfig;
use crate::error::Result;
use crate::legendre::LegendreTable;

/// Precompute the Legendre table of a configuration.
///
/// Pass the result to [`Sht::with_table`] to share it between engines.
pub fn legendre_table(config: &TransformConfig) -> Arc<LegendreTable> {
    Arc::new(LegendreTable::new(config))
}

/// Spectral coefficients of a real grid field.
pub fn scalar_forward(sht: &Sht, grid: &[f64]) -> Result<Vec<Complex64>> {
    sht.scalar_forward(grid)
}

/// Real grid field of a set of spectral coefficients.
pub fn scalar_inverse(sht: &Sht, spectral: &[Complex64]) -> Result<Vec<f64>> {
    sht.scalar_inverse(spectral)
}

/// Spheroidal and toroidal coefficients of (v_θ, v_φ).
pub fn vector_forward(sht: &Sht, u: &[f64], v: &[f64]) -> Result<(Vec<Complex64>, Vec<Complex64>)> {
    sht.vector_forward(u, v)
}

/// (v_θ, v_φ) of spheroidal and toroidal coefficients.
pub fn vector_inverse(
    sht: &Sht,
    spheroidal: &[Complex64],
    toroidal: &[Complex64],
) -> Result<(Vec<f64>, Vec<f64>)> {
    sht.vector_inverse(spheroidal, toroidal)
}

/// Surface gradient (v_θ, v_φ) of a spheroidal potential.
pub fn spheroidal_inverse(sht: &Sht, spheroidal: &[Complex64]) -> Result<(Vec<f64>, Vec<f64>)> {
    sht.spheroidal_inverse(spheroidal)
}

/// (v_θ, v_φ) of a toroidal potential.
pub fn toroidal_inverse(sht: &Sht, toroidal: &[Complex64]) -> Result<(Vec<f64>, Vec<f64>)> {
    sht.toroidal_inverse(toroidal)
}

/// Q, S and T coefficients of (v_r, v_θ, v_φ).
pub fn qst_forward(
    sht: &Sht,
    vr: &[f64],
    vt: &[f64],
    vp: &[f64],
) -> Result<(Vec<Complex64>, Vec<Complex64>, Vec<Complex64>)> {
    sht.qst_forward(vr, vt, vp)
}

/// (v_r, v_θ, v_φ) of Q, S and T coefficients.
pub fn qst_inverse(
    sht: &Sht,
    q: &[Complex64],
    s: &[Complex64],
    t: &[Complex64],
) -> Result<(Vec<f64>, Vec<f64>, Vec<f64>)> {
    sht.qst_inverse(q, s, t)
}
