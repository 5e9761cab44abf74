//! Spheroidal/toroidal analysis and synthesis of tangent vector fields.
//!
//! With u = v_θ and v = v_φ,
//!
//! ```text
//! v_θ = ∂S/∂θ + (1/sin θ) ∂T/∂φ
//! v_φ = (1/sin θ) ∂S/∂φ - ∂T/∂θ
//! ```
//!
//! Per order, using D = dy/dθ and M = m y / sin θ:
//!
//! ```text
//! VT = Σ_l (D S_l + i M T_l)             S_l = K_l Σ w (D VT - i M VP)
//! VP = Σ_l (i M S_l - D T_l)             T_l = K_l Σ w (-i M VT - D VP)
//! ```
//!
//! with K_l = 1 / (l(l+1) c_l²). D has the parity opposite to y, M the same.
//!
//! [`VectorParts`] fixes the channels of a pass. The tangent pair (VT, VP)
//! and (S, T) always occupy two consecutive channels; a radial scalar
//! component, when present, comes first and goes through the scalar
//! recurrence in the same sweep over latitude pairs.

use std::ops::Range;

use rustfft::num_complex::Complex64;

use super::scalar::{accumulate_by_parity, sum_by_parity};
use super::{mul_i, pair_mode_offset, ZERO};
use crate::config::TransformConfig;
use crate::legendre::{ColumnScratch, LegendreSource};
use crate::types::{OrderIndex, PairIndex};

/// Components carried by a vector pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum VectorParts {
    /// Spheroidal and toroidal: spectral [S, T], grid [VT, VP].
    Tangent,
    /// Spheroidal only (gradient synthesis): spectral [S], grid [VT, VP].
    Spheroidal,
    /// Toroidal only: spectral [T], grid [VT, VP].
    Toroidal,
    /// Radial scalar plus tangent: spectral [Q, S, T], grid [VR, VT, VP].
    Radial,
}

impl VectorParts {
    /// Spectral channels per order block.
    pub(crate) fn spectral_channels(self) -> usize {
        match self {
            VectorParts::Tangent => 2,
            VectorParts::Spheroidal | VectorParts::Toroidal => 1,
            VectorParts::Radial => 3,
        }
    }

    /// Grid fields.
    pub(crate) fn grid_channels(self) -> usize {
        match self {
            VectorParts::Radial => 3,
            _ => 2,
        }
    }

    /// Channel of VT, and of S in a full spectral block.
    fn first_tangent(self) -> usize {
        match self {
            VectorParts::Radial => 1,
            _ => 0,
        }
    }
}

/// Symmetric and antisymmetric parts of (VT, VP) for one order at one
/// latitude pair, as `[vt_sym, vt_anti, vp_sym, vp_anti]`.
fn sum_tangent(
    spheroidal: Option<&[Complex64]>,
    toroidal: Option<&[Complex64]>,
    dtheta: &[f64],
    msin: &[f64],
    real_only: bool,
) -> [Complex64; 4] {
    let coeff = |q: &[Complex64], k: usize| {
        if real_only {
            Complex64::new(q[k].re, 0.0)
        } else {
            q[k]
        }
    };
    let (mut vt_sym, mut vt_anti, mut vp_sym, mut vp_anti) = (ZERO, ZERO, ZERO, ZERO);
    for k in 0..dtheta.len() {
        let odd = k % 2 == 1;
        if let Some(s) = spheroidal {
            let sk = coeff(s, k);
            let d_s = sk * dtheta[k];
            let im_s = mul_i(sk * msin[k]);
            if odd {
                vt_sym += d_s;
                vp_anti += im_s;
            } else {
                vt_anti += d_s;
                vp_sym += im_s;
            }
        }
        if let Some(t) = toroidal {
            let tk = coeff(t, k);
            let d_t = tk * dtheta[k];
            let im_t = mul_i(tk * msin[k]);
            if odd {
                vt_anti += im_t;
                vp_sym -= d_t;
            } else {
                vt_sym += im_t;
                vp_anti -= d_t;
            }
        }
    }
    [vt_sym, vt_anti, vp_sym, vp_anti]
}

/// Forward Legendre stage of a vector pass for a range of orders.
///
/// Only [`VectorParts::Tangent`] and [`VectorParts::Radial`] are analysed.
pub(crate) fn analyse_orders<S: LegendreSource>(
    config: &TransformConfig,
    source: &S,
    parts: VectorParts,
    orders: Range<usize>,
    modes: &[Complex64],
    out: &mut [Complex64],
    col: &mut ColumnScratch,
) {
    debug_assert!(matches!(parts, VectorParts::Tangent | VectorParts::Radial));
    let t = config.truncation();
    let grid = config.grid();
    let nlat = grid.nlat();
    let nm = t.n_orders();
    let nch = parts.spectral_channels();
    let first = parts.first_tangent();
    let radial = first > 0;
    let field = |ch: usize| &modes[ch * nlat * nm..(ch + 1) * nlat * nm];
    let (vr_modes, vt_modes, vp_modes) = (field(0), field(first), field(first + 1));
    let base = nch * t.mode_offset(OrderIndex::new(orders.start));
    let inv_norm = config.inv_norm();

    for im in OrderIndex::range(orders) {
        let n = t.n_degrees(im);
        let m = t.order(im);
        let start = nch * t.mode_offset(im) - base;
        let block = &mut out[start..start + nch * n];
        block.fill(ZERO);
        let (q_acc, tangent) = block.split_at_mut(first * n);
        let (s_acc, t_acc) = tangent.split_at_mut(n);

        for pair in PairIndex::range(config.first_pair(im).get()..grid.nlat_2()) {
            let w = grid.pair_weight(pair);
            let north = pair.north() * nm + im.get();
            let south = pair.south(nlat) * nm + im.get();

            if radial {
                let y = source.scalar(im, pair, col);
                let (f_n, f_s) = (vr_modes[north], vr_modes[south]);
                accumulate_by_parity(q_acc, y, (f_n + f_s) * w, (f_n - f_s) * w);
            }

            let (dtheta, msin) = source.vector(im, pair, col);
            let (vt_n, vt_s) = (vt_modes[north], vt_modes[south]);
            let (vp_n, vp_s) = (vp_modes[north], vp_modes[south]);
            let vt_sym = (vt_n + vt_s) * w;
            let vt_anti = (vt_n - vt_s) * w;
            let vp_sym = (vp_n + vp_s) * w;
            let vp_anti = (vp_n - vp_s) * w;

            for k in 0..n {
                // D flips sign across the equator for even l - m, M for odd.
                let (d_vt, m_vp, m_vt, d_vp) = if k % 2 == 0 {
                    (vt_anti, vp_sym, vt_sym, vp_anti)
                } else {
                    (vt_sym, vp_anti, vt_anti, vp_sym)
                };
                s_acc[k] += d_vt * dtheta[k] - mul_i(m_vp * msin[k]);
                t_acc[k] += -mul_i(m_vt * msin[k]) - d_vp * dtheta[k];
            }
        }

        for (q, &s) in q_acc.iter_mut().zip(&inv_norm[m..]) {
            *q *= s;
        }
        for k in 0..n {
            let l = m + k;
            let factor = if l == 0 {
                0.0
            } else {
                inv_norm[l] / (l * (l + 1)) as f64
            };
            s_acc[k] *= factor;
            t_acc[k] *= factor;
        }
    }
}

/// Inverse Legendre stage of a vector pass for a range of latitude pairs.
pub(crate) fn synthesise_pairs<S: LegendreSource>(
    config: &TransformConfig,
    source: &S,
    parts: VectorParts,
    pairs: Range<usize>,
    spectral: &[Complex64],
    out: &mut [Complex64],
    col: &mut ColumnScratch,
) {
    let t = config.truncation();
    let nm = t.n_orders();
    let n_in = parts.spectral_channels();
    let n_out = parts.grid_channels();
    let first = parts.first_tangent();
    let first_pair = pairs.start;

    for pair in PairIndex::range(pairs) {
        let local = pair.get() - first_pair;
        let buf = &mut out[pair_mode_offset(local, 0, false, n_out, nm)..][..2 * n_out * nm];
        buf.fill(ZERO);

        for im in OrderIndex::range(0..nm) {
            if config.first_pair(im) > pair {
                continue;
            }
            let i = im.get();
            let n = t.n_degrees(im);
            let block = &spectral[n_in * t.mode_offset(im)..][..n_in * n];
            let real_only = i == 0;

            let (s, tor) = match parts {
                VectorParts::Tangent => (Some(&block[..n]), Some(&block[n..])),
                VectorParts::Spheroidal => (Some(block), None),
                VectorParts::Toroidal => (None, Some(block)),
                VectorParts::Radial => {
                    let y = source.scalar(im, pair, col);
                    let (even, odd) = sum_by_parity(&block[..n], y, real_only);
                    buf[pair_mode_offset(0, 0, false, n_out, nm) + i] = even + odd;
                    buf[pair_mode_offset(0, 0, true, n_out, nm) + i] = even - odd;
                    (Some(&block[n..2 * n]), Some(&block[2 * n..]))
                }
            };

            let (dtheta, msin) = source.vector(im, pair, col);
            let [vt_sym, vt_anti, vp_sym, vp_anti] = sum_tangent(s, tor, dtheta, msin, real_only);
            buf[pair_mode_offset(0, first, false, n_out, nm) + i] = vt_sym + vt_anti;
            buf[pair_mode_offset(0, first, true, n_out, nm) + i] = vt_sym - vt_anti;
            buf[pair_mode_offset(0, first + 1, false, n_out, nm) + i] = vp_sym + vp_anti;
            buf[pair_mode_offset(0, first + 1, true, n_out, nm) + i] = vp_sym - vp_anti;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_counts() {
        assert_eq!(VectorParts::Tangent.spectral_channels(), 2);
        assert_eq!(VectorParts::Spheroidal.spectral_channels(), 1);
        assert_eq!(VectorParts::Toroidal.grid_channels(), 2);
        assert_eq!(VectorParts::Radial.spectral_channels(), 3);
        assert_eq!(VectorParts::Radial.first_tangent(), 1);
    }

    #[test]
    fn test_single_part_sums_add_up() {
        let s = [Complex64::new(0.3, -0.2), Complex64::new(1.1, 0.4), Complex64::new(-0.7, 0.9)];
        let t = [Complex64::new(-0.5, 0.1), Complex64::new(0.2, 0.6), Complex64::new(0.8, -1.3)];
        let dtheta = [0.9, -0.4, 1.7];
        let msin = [0.5, 1.2, -0.3];

        let both = sum_tangent(Some(&s), Some(&t), &dtheta, &msin, false);
        let only_s = sum_tangent(Some(&s), None, &dtheta, &msin, false);
        let only_t = sum_tangent(None, Some(&t), &dtheta, &msin, false);
        for j in 0..4 {
            assert!((both[j] - (only_s[j] + only_t[j])).norm() < 1e-15);
        }

        // m = 0 drops imaginary parts.
        let real = sum_tangent(Some(&s), None, &dtheta, &msin, true);
        let s_re: Vec<Complex64> = s.iter().map(|q| Complex64::new(q.re, 0.0)).collect();
        assert_eq!(real, sum_tangent(Some(&s_re), None, &dtheta, &msin, false));
    }
}
