//! Longitudinal transform: real latitude rows to Fourier modes and back.
//!
//! A row of `nphi` reals is periodic with period `nphi / mres` in the index
//! when only orders that are multiples of `mres` are present, so both
//! directions work on one period of length `n = nphi / mres`:
//!
//! ```text
//! forward:  F_k = (1/nphi) Σ_j f_j e^{-2πi k j / n},   k = 0..=mmax   (f folded onto one period)
//! inverse:  f_j = Σ_{k<n} B_k e^{+2πi k j / n},        B_{n-k} = conj(B_k)
//! ```
//!
//! Two real rows are transformed together as `a + i b` in a single complex FFT.

use std::fmt;
use std::sync::Arc;

use rustfft::num_complex::Complex64;
use rustfft::{Fft, FftPlanner};

use crate::types::Truncation;

/// FFT plans and sizes for one configuration.
#[derive(Clone)]
pub struct LongitudinalFft {
    nphi: usize,
    mres: usize,
    n_modes: usize,
    forward: Arc<dyn Fft<f64>>,
    inverse: Arc<dyn Fft<f64>>,
}

impl fmt::Debug for LongitudinalFft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LongitudinalFft")
            .field("nphi", &self.nphi)
            .field("period", &self.period())
            .field("n_modes", &self.n_modes)
            .finish()
    }
}

impl LongitudinalFft {
    /// Plan transforms for rows of `nphi` points.
    ///
    /// `nphi` must be a multiple of `mres` and exceed `2 * mmax`, which the
    /// configuration builder guarantees.
    pub fn new(nphi: usize, truncation: &Truncation) -> Self {
        let mres = truncation.mres();
        let period = nphi / mres;
        let mut planner = FftPlanner::<f64>::new();
        Self {
            nphi,
            mres,
            n_modes: truncation.n_orders(),
            forward: planner.plan_fft_forward(period),
            inverse: planner.plan_fft_inverse(period),
        }
    }

    /// Row length.
    #[inline]
    pub fn nphi(&self) -> usize {
        self.nphi
    }

    /// Length of one longitudinal period.
    #[inline]
    pub fn period(&self) -> usize {
        self.nphi / self.mres
    }

    /// Fourier modes kept per row (`mmax + 1`).
    #[inline]
    pub fn n_modes(&self) -> usize {
        self.n_modes
    }

    /// Scratch length needed by both directions.
    pub fn scratch_len(&self) -> usize {
        self.forward
            .get_inplace_scratch_len()
            .max(self.inverse.get_inplace_scratch_len())
    }

    /// Transform one or two rows into their Fourier modes.
    ///
    /// `buf` holds one period and `scratch` at least [`scratch_len`](Self::scratch_len)
    /// values. Without a second row the imaginary lane is zero and `modes_b`
    /// is ignored.
    pub fn forward(
        &self,
        row_a: &[f64],
        row_b: Option<&[f64]>,
        modes_a: &mut [Complex64],
        modes_b: Option<&mut [Complex64]>,
        buf: &mut [Complex64],
        scratch: &mut [Complex64],
    ) {
        let n = self.period();
        let buf = &mut buf[..n];
        buf.fill(Complex64::new(0.0, 0.0));
        for chunk in row_a.chunks_exact(n) {
            for (z, &v) in buf.iter_mut().zip(chunk) {
                z.re += v;
            }
        }
        if let Some(row_b) = row_b {
            for chunk in row_b.chunks_exact(n) {
                for (z, &v) in buf.iter_mut().zip(chunk) {
                    z.im += v;
                }
            }
        }

        self.forward.process_with_scratch(buf, scratch);

        let norm = 1.0 / self.nphi as f64;
        match modes_b {
            Some(modes_b) => {
                for k in 0..self.n_modes {
                    let z = buf[k];
                    let zc = buf[(n - k) % n].conj();
                    modes_a[k] = (z + zc) * (0.5 * norm);
                    // (z - zc) / 2i
                    let d = (z - zc) * (0.5 * norm);
                    modes_b[k] = Complex64::new(d.im, -d.re);
                }
                modes_b[0].im = 0.0;
            }
            None => {
                for k in 0..self.n_modes {
                    modes_a[k] = buf[k] * norm;
                }
            }
        }
        modes_a[0].im = 0.0;
    }

    /// Synthesise one or two rows from their Fourier modes.
    ///
    /// The imaginary part of mode 0 is ignored; modes above `mmax` are zero.
    pub fn inverse(
        &self,
        modes_a: &[Complex64],
        modes_b: Option<&[Complex64]>,
        row_a: &mut [f64],
        row_b: Option<&mut [f64]>,
        buf: &mut [Complex64],
        scratch: &mut [Complex64],
    ) {
        let n = self.period();
        let buf = &mut buf[..n];
        buf.fill(Complex64::new(0.0, 0.0));

        let i = Complex64::new(0.0, 1.0);
        let zero = Complex64::new(0.0, 0.0);
        buf[0] = Complex64::new(modes_a[0].re, modes_b.map_or(0.0, |b| b[0].re));
        for k in 1..self.n_modes {
            let a = modes_a[k];
            let b = modes_b.map_or(zero, |b| b[k]);
            buf[k] = a + i * b;
            buf[n - k] = a.conj() + i * b.conj();
        }

        self.inverse.process_with_scratch(buf, scratch);

        for chunk in row_a.chunks_exact_mut(n) {
            for (v, z) in chunk.iter_mut().zip(buf.iter()) {
                *v = z.re;
            }
        }
        if let Some(row_b) = row_b {
            for chunk in row_b.chunks_exact_mut(n) {
                for (v, z) in chunk.iter_mut().zip(buf.iter()) {
                    *v = z.im;
                }
            }
        }
    }
}
