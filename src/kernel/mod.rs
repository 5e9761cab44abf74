//! Combiner kernels joining Legendre columns and Fourier modes.
//!
//! Buffer layouts (`nm = mmax + 1` modes per row, `nch` fields per call):
//!
//! - forward Fourier modes: `[ch][row][nm]`
//! - inverse Fourier modes: `[pair][ch][hemisphere][nm]`, north then south
//! - spectral blocks: `[im][ch][l - m]`
//!
//! Both directions use the equatorial symmetry of the grid. With
//! p = (-1)^{l-m}, y(-x) = p y(x), so the north and south rows of a pair
//! contribute through their sum (p = +1) or difference (p = -1).

pub(crate) mod scalar;
pub(crate) mod vector;

use rustfft::num_complex::Complex64;

pub(crate) const ZERO: Complex64 = Complex64::new(0.0, 0.0);

/// Offset of the modes of (`pair`, `ch`, hemisphere) in an inverse buffer.
#[inline]
pub(crate) fn pair_mode_offset(pair: usize, ch: usize, south: bool, nch: usize, nm: usize) -> usize {
    ((pair * nch + ch) * 2 + south as usize) * nm
}

/// `z * i`.
#[inline]
pub(crate) fn mul_i(z: Complex64) -> Complex64 {
    Complex64::new(-z.im, z.re)
}
