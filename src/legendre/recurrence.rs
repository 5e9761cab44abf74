//! Three-term recurrence for normalized associated Legendre functions.
//!
//! For order m the orthonormal functions satisfy
//!
//! ```text
//! y_mm     = N_m (-1)^m sin^m θ,       N_m = sqrt((2m+1)!! / (4π (2m)!!))
//! y_lm     = a_lm x y_{l-1,m} + b_lm y_{l-2,m}
//! a_lm     = sqrt((4l² - 1) / (l² - m²))
//! b_lm     = -sqrt((2l+1)/(2l-3) · ((l-1)² - m²)/(l² - m²))
//! ```
//!
//! The coefficients are multiplied by c_l/c_{l-1} and c_l/c_{l-2} so that the
//! recurrence directly produces the requested normalization.
//!
//! sin^m θ underflows for large m near the poles, so the seed is carried as a
//! mantissa and a power of [`SCALE`]. Values whose power is still negative
//! when they are emitted are below 1e-135 and are reported as zero.

use std::f64::consts::PI;

use crate::config::Normalization;
use crate::types::{OrderIndex, Truncation};

/// Extended-range scale factor (2^450).
const SCALE: f64 = 2.9073548971824275622e135;
const INV_SCALE: f64 = 1.0 / SCALE;

/// `s^n` as `(mantissa, exponent)` with value `mantissa * SCALE^exponent`.
///
/// The exponent is never positive and the mantissa stays representable.
pub(crate) fn sin_power(s: f64, n: usize) -> (f64, i32) {
    if n == 0 {
        return (1.0, 0);
    }
    if s == 0.0 {
        return (0.0, 0);
    }

    let mut value = 1.0;
    let mut exp = 0;
    let mut base = s;
    let mut base_exp = 0;
    let mut n = n;
    loop {
        if n & 1 == 1 {
            value *= base;
            exp += base_exp;
            if value < INV_SCALE {
                value *= SCALE;
                exp -= 1;
            }
        }
        n >>= 1;
        if n == 0 {
            break;
        }
        base *= base;
        base_exp *= 2;
        if base < INV_SCALE {
            base *= SCALE;
            base_exp -= 1;
        }
    }
    (value, exp)
}

/// Precomputed recurrence coefficients for every order of a truncation.
#[derive(Clone, Debug)]
pub struct Recurrence {
    truncation: Truncation,
    /// c_m N_m, with the Condon-Shortley sign when enabled.
    seeds: Vec<f64>,
    /// [a, b] for k = l - m in 0..=n_degrees; one extra degree for y/sin θ.
    ab: Vec<[f64; 2]>,
    /// [l ε_{l+1} c_l/c_{l+1}, (l+1) ε_l c_l/c_{l-1}] for k in 0..n_degrees.
    dtheta: Vec<[f64; 2]>,
}

impl Recurrence {
    /// Coefficients for all orders of `truncation`.
    pub fn new(truncation: &Truncation, normalization: Normalization, condon_shortley: bool) -> Self {
        let n_orders = truncation.n_orders();
        let mut seeds = Vec::with_capacity(n_orders);
        let mut ab = Vec::with_capacity(truncation.nlm() + n_orders);
        let mut dtheta = Vec::with_capacity(truncation.nlm());
        let c = |l: usize| normalization.scale(l);

        // N_m by the running product N_k = N_{k-1} sqrt((2k+1)/(2k)).
        let mut n_m = 1.0 / (4.0 * PI).sqrt();
        let mut current = 0;

        for im in OrderIndex::range(0..n_orders) {
            let m = truncation.order(im);
            while current < m {
                current += 1;
                let k = current as f64;
                n_m *= ((2.0 * k + 1.0) / (2.0 * k)).sqrt();
            }
            let sign = if condon_shortley && m % 2 == 1 { -1.0 } else { 1.0 };
            seeds.push(sign * c(m) * n_m);

            let mf = m as f64;
            let n = truncation.n_degrees(im);
            ab.push([0.0, 0.0]);
            for k in 1..=n {
                let l = m + k;
                let lf = l as f64;
                let denom = lf * lf - mf * mf;
                let a = ((4.0 * lf * lf - 1.0) / denom).sqrt() * c(l) / c(l - 1);
                let b = if k >= 2 {
                    let lm1 = lf - 1.0;
                    -((2.0 * lf + 1.0) / (2.0 * lf - 3.0) * (lm1 * lm1 - mf * mf) / denom).sqrt()
                        * c(l)
                        / c(l - 2)
                } else {
                    0.0
                };
                ab.push([a, b]);
            }

            let eps = |l: usize| {
                if l == 0 {
                    0.0
                } else {
                    let lf = l as f64;
                    ((lf * lf - mf * mf) / (4.0 * lf * lf - 1.0)).sqrt()
                }
            };
            for k in 0..n {
                let l = m + k;
                let lf = l as f64;
                let up = lf * eps(l + 1) * c(l) / c(l + 1);
                let down = if l == 0 {
                    0.0
                } else {
                    (lf + 1.0) * eps(l) * c(l) / c(l - 1)
                };
                dtheta.push([up, down]);
            }
        }

        Self {
            truncation: *truncation,
            seeds,
            ab,
            dtheta,
        }
    }

    /// Truncation the coefficients were built for.
    pub fn truncation(&self) -> &Truncation {
        &self.truncation
    }

    #[inline]
    fn ab_for(&self, im: OrderIndex) -> &[[f64; 2]] {
        let start = self.truncation.mode_offset(im) + im.get();
        &self.ab[start..start + self.truncation.n_degrees(im) + 1]
    }

    /// Run the recurrence from the seed `seed * s^power` and fill `out`.
    fn run(&self, im: OrderIndex, x: f64, s: f64, power: usize, out: &mut [f64]) {
        let ab = self.ab_for(im);
        let (mantissa, mut exp) = sin_power(s, power);
        let mut y_prev = 0.0;
        let mut y = mantissa * self.seeds[im];

        for (k, slot) in out.iter_mut().enumerate() {
            if k > 0 {
                let [a, b] = ab[k];
                let next = a * x * y + b * y_prev;
                y_prev = y;
                y = next;
                if exp < 0 && y.abs() > 1.0 {
                    y *= INV_SCALE;
                    y_prev *= INV_SCALE;
                    exp += 1;
                }
            }
            *slot = if exp < 0 { 0.0 } else { y };
        }
    }

    /// y_lm(x) for l = m..=lmax of order index `im`.
    ///
    /// `out` must hold exactly `n_degrees(im)` values.
    pub fn scalar_column(&self, im: OrderIndex, x: f64, s: f64, out: &mut [f64]) {
        debug_assert_eq!(out.len(), self.truncation.n_degrees(im));
        let m = self.truncation.order(im);
        self.run(im, x, s, m, out);
    }

    /// dy_lm/dθ and m y_lm / sin θ for l = m..=lmax of order index `im`.
    ///
    /// `work` needs `n_degrees(im) + 1` values; `dtheta` and `msin` need
    /// `n_degrees(im)`. Neither quantity divides by sin θ, so both are finite
    /// at the poles.
    pub fn vector_column(
        &self,
        im: OrderIndex,
        x: f64,
        s: f64,
        work: &mut [f64],
        dtheta: &mut [f64],
        msin: &mut [f64],
    ) {
        let n = self.truncation.n_degrees(im);
        debug_assert_eq!(work.len(), n + 1);
        let m = self.truncation.order(im);

        if m == 0 {
            // y' from the differentiated recurrence, then dy/dθ = -sin θ y'.
            let ab = self.ab_for(im);
            let y = &mut work[..n];
            self.run(im, x, s, 0, y);
            let (mut d_prev, mut d) = (0.0, 0.0);
            for k in 0..n {
                if k > 0 {
                    let [a, b] = ab[k];
                    let next = a * (y[k - 1] + x * d) + b * d_prev;
                    d_prev = d;
                    d = next;
                }
                dtheta[k] = -s * d;
                msin[k] = 0.0;
            }
            return;
        }

        // y/sin θ follows the same recurrence from N_m sin^{m-1} θ.
        self.run(im, x, s, m - 1, work);
        let start = self.truncation.mode_offset(im);
        let coeffs = &self.dtheta[start..start + n];
        let mf = m as f64;
        for k in 0..n {
            let [up, down] = coeffs[k];
            let below = if k > 0 { work[k - 1] } else { 0.0 };
            dtheta[k] = up * work[k + 1] - down * below;
            msin[k] = mf * work[k];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polynomial::gauss_legendre;

    fn column(rec: &Recurrence, im: usize, theta: f64) -> Vec<f64> {
        let im = OrderIndex::new(im);
        let mut out = vec![0.0; rec.truncation().n_degrees(im)];
        rec.scalar_column(im, theta.cos(), theta.sin(), &mut out);
        out
    }

    #[test]
    fn test_sin_power_matches_powi() {
        for &s in &[0.3, 0.9, 1.0, 1e-3] {
            for n in 0..40 {
                let (v, e) = sin_power(s, n);
                let expected = s.powi(n as i32);
                let value = v * SCALE.powi(e);
                assert!((value - expected).abs() <= 1e-13 * expected, "s={}, n={}", s, n);
            }
        }
        assert_eq!(sin_power(0.0, 0), (1.0, 0));
        assert_eq!(sin_power(0.0, 5).0, 0.0);
    }

    #[test]
    fn test_sin_power_extended_range() {
        let (v, e) = sin_power(1e-3, 200);
        assert!(e < 0);
        assert!(v > 0.0 && v.is_finite());
        // log10(v) + e*log10(SCALE) = -600
        let log = v.log10() + e as f64 * SCALE.log10();
        assert!((log + 600.0).abs() < 1e-9);
    }

    #[test]
    fn test_low_degree_closed_forms() {
        let rec = Recurrence::new(&Truncation::triangular(3), Normalization::Orthonormal, true);
        let theta: f64 = 0.7;
        let (x, s) = (theta.cos(), theta.sin());
        let k = 1.0 / (4.0 * PI).sqrt();

        let y0 = column(&rec, 0, theta);
        assert!((y0[0] - k).abs() < 1e-15);
        assert!((y0[1] - 3.0_f64.sqrt() * k * x).abs() < 1e-15);
        assert!((y0[2] - 5.0_f64.sqrt() * k * 0.5 * (3.0 * x * x - 1.0)).abs() < 1e-15);

        let y1 = column(&rec, 1, theta);
        assert!((y1[0] + (3.0 / (8.0 * PI)).sqrt() * s).abs() < 1e-15);
        assert!((y1[1] + (15.0 / (8.0 * PI)).sqrt() * s * x).abs() < 1e-15);

        let y2 = column(&rec, 2, theta);
        assert!((y2[0] - 0.25 * (15.0 / (2.0 * PI)).sqrt() * s * s).abs() < 1e-15);
    }

    #[test]
    fn test_condon_shortley_sign() {
        let t = Truncation::triangular(4);
        let with = Recurrence::new(&t, Normalization::Orthonormal, true);
        let without = Recurrence::new(&t, Normalization::Orthonormal, false);
        for im in 0..=4 {
            let a = column(&with, im, 1.1);
            let b = column(&without, im, 1.1);
            let sign = if im % 2 == 1 { -1.0 } else { 1.0 };
            for (x, y) in a.iter().zip(&b) {
                assert_eq!(*x, sign * y);
            }
        }
    }

    #[test]
    fn test_normalization_integrals() {
        let lmax = 12;
        let t = Truncation::triangular(lmax);
        let rule = gauss_legendre(lmax + 1);
        for norm in [
            Normalization::Orthonormal,
            Normalization::Schmidt,
            Normalization::FourPi,
        ] {
            let rec = Recurrence::new(&t, norm, true);
            for im in OrderIndex::range(0..lmax + 1) {
                let n = t.n_degrees(im);
                let mut integral = vec![0.0; n];
                let mut col = vec![0.0; n];
                for i in 0..rule.len() {
                    rec.scalar_column(im, rule.cos_theta[i], rule.sin_theta[i], &mut col);
                    for k in 0..n {
                        integral[k] += 2.0 * PI * rule.weights[i] * col[k] * col[k];
                    }
                }
                let m = t.order(im);
                for k in 0..n {
                    let expected = norm.norm_squared(m + k);
                    assert!(
                        (integral[k] - expected).abs() < 1e-12 * expected,
                        "{} l={} m={}: {}",
                        norm,
                        m + k,
                        m,
                        integral[k]
                    );
                }
            }
        }
    }

    #[test]
    fn test_high_order_near_pole_is_finite() {
        let lmax = 1200;
        let rec = Recurrence::new(&Truncation::triangular(lmax), Normalization::Orthonormal, true);
        let theta: f64 = 0.01;
        for im in [600, 1000, 1200] {
            let col = column(&rec, im, theta);
            assert!(col.iter().all(|v| v.is_finite()));
            // sin^m θ ≈ 1e-1200: far below anything representable.
            assert!(col.iter().all(|v| v.abs() < 1e-100));
        }
        // Moderate orders survive the rescaling and stay accurate near the equator.
        let col = column(&rec, 600, PI / 2.0);
        assert!(col.iter().any(|v| v.abs() > 1e-3));
        assert!(col.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_vector_column_matches_finite_difference() {
        let lmax = 10;
        let t = Truncation::triangular(lmax);
        let rec = Recurrence::new(&t, Normalization::Schmidt, true);
        let theta: f64 = 0.9;
        let h = 1e-6;
        for im in OrderIndex::range(0..lmax + 1) {
            let n = t.n_degrees(im);
            let mut work = vec![0.0; n + 1];
            let mut dth = vec![0.0; n];
            let mut msin = vec![0.0; n];
            rec.vector_column(im, theta.cos(), theta.sin(), &mut work, &mut dth, &mut msin);

            let plus = column(&rec, im.get(), theta + h);
            let minus = column(&rec, im.get(), theta - h);
            let here = column(&rec, im.get(), theta);
            let m = t.order(im) as f64;
            for k in 0..n {
                let fd = (plus[k] - minus[k]) / (2.0 * h);
                assert!((fd - dth[k]).abs() < 1e-7, "m={} k={}: {} vs {}", m, k, fd, dth[k]);
                assert!((msin[k] - m * here[k] / theta.sin()).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_vector_column_at_pole() {
        let t = Truncation::triangular(6);
        let rec = Recurrence::new(&t, Normalization::Orthonormal, true);
        for im in OrderIndex::range(0..7) {
            let n = t.n_degrees(im);
            let mut work = vec![0.0; n + 1];
            let mut dth = vec![0.0; n];
            let mut msin = vec![0.0; n];
            rec.vector_column(im, 1.0, 0.0, &mut work, &mut dth, &mut msin);
            assert!(dth.iter().chain(&msin).all(|v| v.is_finite()));
            if im.get() == 1 {
                // Only m = 1 is non-zero at the pole.
                assert!(msin[0].abs() > 0.1);
                assert!((dth[0] - msin[0]).abs() < 1e-14);
            } else {
                assert!(msin.iter().all(|&v| v == 0.0));
            }
        }
    }
}
