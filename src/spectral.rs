//! Operations performed directly on spectral coefficients.
//!
//! Every function takes the configuration the coefficients were produced
//! with, so the buffer layout and normalization are known.

use std::f64::consts::PI;

use rustfft::num_complex::Complex64;

use crate::config::TransformConfig;
use crate::error::{check_len, Result};
use crate::types::OrderIndex;

/// Visit every coefficient as (l, m, value) in blocked order.
fn for_each_coefficient(config: &TransformConfig, spectral: &[Complex64], mut f: impl FnMut(usize, usize, Complex64)) {
    let t = config.truncation();
    for im in OrderIndex::range(0..t.n_orders()) {
        let m = t.order(im);
        for k in 0..t.n_degrees(im) {
            f(m + k, m, spectral[config.layout_index(im, k)]);
        }
    }
}

/// Contribution of one coefficient to ∫ f² dΩ for the real field it encodes.
#[inline]
fn coefficient_energy(config: &TransformConfig, l: usize, m: usize, q: Complex64) -> f64 {
    let power = if m == 0 { q.re * q.re } else { 2.0 * q.norm_sqr() };
    config.norm_squared(l) * power
}

/// ∫ f² dΩ of the real field described by `spectral`.
///
/// Equals `grid.integrate(f²)` for any band-limited field (Parseval).
pub fn energy(config: &TransformConfig, spectral: &[Complex64]) -> Result<f64> {
    check_len("spectral", config.nlm(), spectral.len())?;
    let mut total = 0.0;
    for_each_coefficient(config, spectral, |l, m, q| {
        total += coefficient_energy(config, l, m, q);
    });
    Ok(total)
}

/// Energy per degree l = 0..=lmax.
pub fn energy_spectrum(config: &TransformConfig, spectral: &[Complex64]) -> Result<Vec<f64>> {
    check_len("spectral", config.nlm(), spectral.len())?;
    let mut spectrum = vec![0.0; config.lmax() + 1];
    for_each_coefficient(config, spectral, |l, m, q| {
        spectrum[l] += coefficient_energy(config, l, m, q);
    });
    Ok(spectrum)
}

/// Apply the surface Laplacian in place: Q_lm ← −l(l+1) Q_lm.
pub fn laplacian(config: &TransformConfig, spectral: &mut [Complex64]) -> Result<()> {
    check_len("spectral", config.nlm(), spectral.len())?;
    scale_by_degree(config, spectral, |l| -((l * (l + 1)) as f64));
    Ok(())
}

/// Invert the surface Laplacian in place. The mean (l = 0) is set to zero.
pub fn inverse_laplacian(config: &TransformConfig, spectral: &mut [Complex64]) -> Result<()> {
    check_len("spectral", config.nlm(), spectral.len())?;
    scale_by_degree(config, spectral, |l| {
        if l == 0 {
            0.0
        } else {
            -1.0 / (l * (l + 1)) as f64
        }
    });
    Ok(())
}

fn scale_by_degree(config: &TransformConfig, spectral: &mut [Complex64], factor: impl Fn(usize) -> f64) {
    let t = config.truncation();
    for im in OrderIndex::range(0..t.n_orders()) {
        let m = t.order(im);
        for k in 0..t.n_degrees(im) {
            spectral[config.layout_index(im, k)] *= factor(m + k);
        }
    }
}

/// Value of the field at colatitude `theta` and longitude `phi` (radians).
///
/// Runs the Legendre recurrence at `cos theta`, so any point can be
/// sampled, not only grid nodes. A `theta` outside [0, π] is first mapped
/// to the same point on the sphere, (2π - θ, φ + π) after reduction mod 2π.
pub fn evaluate(config: &TransformConfig, spectral: &[Complex64], theta: f64, phi: f64) -> Result<f64> {
    check_len("spectral", config.nlm(), spectral.len())?;
    let t = config.truncation();
    let recurrence = config.recurrence();
    let (theta, phi) = match theta.rem_euclid(2.0 * PI) {
        reduced if reduced > PI => (2.0 * PI - reduced, phi + PI),
        reduced => (reduced, phi),
    };
    let (s, x) = theta.sin_cos();
    let s = s.max(0.0);
    let mut column = vec![0.0; config.lmax() + 1];

    let mut value = 0.0;
    for im in OrderIndex::range(0..t.n_orders()) {
        let n = t.n_degrees(im);
        let m = t.order(im);
        let y = &mut column[..n];
        recurrence.scalar_column(im, x, s, y);

        let mut sum = Complex64::new(0.0, 0.0);
        for (k, &y) in y.iter().enumerate() {
            sum += spectral[config.layout_index(im, k)] * y;
        }
        value += if m == 0 {
            sum.re
        } else {
            2.0 * (sum * Complex64::from_polar(1.0, m as f64 * phi)).re
        };
    }
    Ok(value)
}
