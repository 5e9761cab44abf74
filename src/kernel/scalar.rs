//! Scalar analysis and synthesis.

use std::ops::Range;

use rustfft::num_complex::Complex64;

use super::{pair_mode_offset, ZERO};
use crate::config::TransformConfig;
use crate::legendre::{ColumnScratch, LegendreSource};
use crate::types::{OrderIndex, PairIndex};

/// Add `even * y_k` to even k and `odd * y_k` to odd k.
#[inline]
pub(super) fn accumulate_by_parity(acc: &mut [Complex64], y: &[f64], even: Complex64, odd: Complex64) {
    for (q, y) in acc.chunks_mut(2).zip(y.chunks(2)) {
        q[0] += even * y[0];
        if let (Some(q1), Some(&y1)) = (q.get_mut(1), y.get(1)) {
            *q1 += odd * y1;
        }
    }
}

/// Σ q_k y_k split into even and odd k.
#[inline]
pub(super) fn sum_by_parity(q: &[Complex64], y: &[f64], real_only: bool) -> (Complex64, Complex64) {
    let (mut even, mut odd) = (ZERO, ZERO);
    for (q, y) in q.chunks(2).zip(y.chunks(2)) {
        let q0 = if real_only { Complex64::new(q[0].re, 0.0) } else { q[0] };
        even += q0 * y[0];
        if let (Some(&q1), Some(&y1)) = (q.get(1), y.get(1)) {
            let q1 = if real_only { Complex64::new(q1.re, 0.0) } else { q1 };
            odd += q1 * y1;
        }
    }
    (even, odd)
}

/// Forward Legendre stage for a range of orders.
///
/// `modes` holds `nch` fields of Fourier modes; `out` is the spectral block
/// slice starting at the first order of `orders`.
pub(crate) fn analyse_orders<S: LegendreSource>(
    config: &TransformConfig,
    source: &S,
    orders: Range<usize>,
    modes: &[Complex64],
    nch: usize,
    out: &mut [Complex64],
    col: &mut ColumnScratch,
) {
    let t = config.truncation();
    let grid = config.grid();
    let nlat = grid.nlat();
    let nm = t.n_orders();
    let base = nch * t.mode_offset(OrderIndex::new(orders.start));

    for im in OrderIndex::range(orders) {
        let n = t.n_degrees(im);
        let start = nch * t.mode_offset(im) - base;
        let block = &mut out[start..start + nch * n];
        block.fill(ZERO);

        for pair in PairIndex::range(config.first_pair(im).get()..grid.nlat_2()) {
            let w = grid.pair_weight(pair);
            let y = source.scalar(im, pair, col);
            let (north, south) = (pair.north() * nm, pair.south(nlat) * nm);
            for (ch, acc) in block.chunks_exact_mut(n).enumerate() {
                let rows = &modes[ch * nlat * nm..];
                let f_n = rows[north + im.get()];
                let f_s = rows[south + im.get()];
                accumulate_by_parity(acc, y, (f_n + f_s) * w, (f_n - f_s) * w);
            }
        }

        let inv_norm = &config.inv_norm()[t.order(im)..];
        for acc in block.chunks_exact_mut(n) {
            for (q, &s) in acc.iter_mut().zip(inv_norm) {
                *q *= s;
            }
        }
    }
}

/// Inverse Legendre stage for a range of latitude pairs.
///
/// `spectral` holds all spectral blocks; `out` is the inverse mode buffer
/// slice starting at the first pair of `pairs`.
pub(crate) fn synthesise_pairs<S: LegendreSource>(
    config: &TransformConfig,
    source: &S,
    pairs: Range<usize>,
    spectral: &[Complex64],
    nch: usize,
    out: &mut [Complex64],
    col: &mut ColumnScratch,
) {
    let t = config.truncation();
    let nm = t.n_orders();
    let first = pairs.start;

    for pair in PairIndex::range(pairs) {
        let local = pair.get() - first;
        let buf = &mut out[pair_mode_offset(local, 0, false, nch, nm)..][..2 * nch * nm];
        buf.fill(ZERO);

        for im in OrderIndex::range(0..nm) {
            if config.first_pair(im) > pair {
                continue;
            }
            let n = t.n_degrees(im);
            let y = source.scalar(im, pair, col);
            let start = nch * t.mode_offset(im);
            for ch in 0..nch {
                let q = &spectral[start + ch * n..start + (ch + 1) * n];
                let (even, odd) = sum_by_parity(q, y, im.get() == 0);
                buf[pair_mode_offset(0, ch, false, nch, nm) + im.get()] = even + odd;
                buf[pair_mode_offset(0, ch, true, nch, nm) + im.get()] = even - odd;
            }
        }
    }
}

/// Legendre analysis of the latitude profile of a single order.
///
/// `profile` holds the order's Fourier coefficient at every row, north to
/// south; `out` receives Q_lm for l = m..=lmax.
pub(crate) fn analyse_profile<S: LegendreSource>(
    config: &TransformConfig,
    source: &S,
    im: OrderIndex,
    profile: &[Complex64],
    out: &mut [Complex64],
    col: &mut ColumnScratch,
) {
    let grid = config.grid();
    let nlat = grid.nlat();
    out.fill(ZERO);
    for pair in PairIndex::range(config.first_pair(im).get()..grid.nlat_2()) {
        let w = grid.pair_weight(pair);
        let y = source.scalar(im, pair, col);
        let (f_n, f_s) = (profile[pair.north()], profile[pair.south(nlat)]);
        accumulate_by_parity(out, y, (f_n + f_s) * w, (f_n - f_s) * w);
    }
    let inv_norm = &config.inv_norm()[config.truncation().order(im)..];
    for (q, &s) in out.iter_mut().zip(inv_norm) {
        *q *= s;
    }
}

/// Latitude profile Σ_l Q_lm y_lm of a single order at every row.
pub(crate) fn synthesise_profile<S: LegendreSource>(
    config: &TransformConfig,
    source: &S,
    im: OrderIndex,
    spectral: &[Complex64],
    out: &mut [Complex64],
    col: &mut ColumnScratch,
) {
    let grid = config.grid();
    let nlat = grid.nlat();
    out.fill(ZERO);
    for pair in PairIndex::range(config.first_pair(im).get()..grid.nlat_2()) {
        let y = source.scalar(im, pair, col);
        let (even, odd) = sum_by_parity(spectral, y, false);
        out[pair.north()] = even + odd;
        out[pair.south(nlat)] = even - odd;
    }
}
