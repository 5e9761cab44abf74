//! Latitude quadrature rules on x = cos θ ∈ [-1, 1].
//!
//! All rules return nodes ordered from the north pole (x near +1) to the
//! south pole, mirror-symmetric about the equator, with weights summing to 2.
//! Only the northern half is computed; the southern half is its exact mirror
//! so that latitude pairs (θ, π - θ) have x values of exactly opposite sign.

use std::f64::consts::PI;

use super::legendre::legendre_and_derivative;

/// Nodes and weights of a latitude quadrature rule.
#[derive(Clone, Debug)]
pub struct QuadratureRule {
    /// cos θ_i, decreasing.
    pub cos_theta: Vec<f64>,
    /// sin θ_i, non-negative.
    pub sin_theta: Vec<f64>,
    /// Quadrature weights over x, summing to 2.
    pub weights: Vec<f64>,
}

impl QuadratureRule {
    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Whether the rule has no nodes.
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Build a full rule from its northern half.
    ///
    /// `half` yields `(x, sin θ, w)` for `i < (n + 1) / 2`. For odd `n` the
    /// last entry is the equator and is forced to x = 0 exactly.
    fn mirrored(n: usize, half: impl Fn(usize) -> (f64, f64, f64)) -> Self {
        let mut cos_theta = vec![0.0; n];
        let mut sin_theta = vec![0.0; n];
        let mut weights = vec![0.0; n];

        for i in 0..(n + 1) / 2 {
            let (x, s, w) = half(i);
            let j = n - 1 - i;
            if i == j {
                cos_theta[i] = 0.0;
                sin_theta[i] = 1.0;
                weights[i] = w;
            } else {
                cos_theta[i] = x;
                cos_theta[j] = -x;
                sin_theta[i] = s;
                sin_theta[j] = s;
                weights[i] = w;
                weights[j] = w;
            }
        }

        Self {
            cos_theta,
            sin_theta,
            weights,
        }
    }
}

/// Gauss-Legendre rule with `n` nodes (exact for polynomials of degree 2n-1).
///
/// The nodes are the roots of P_n, found by Newton iteration from the
/// asymptotic guess x_i ≈ cos(π (i + 3/4) / (n + 1/2)).
pub fn gauss_legendre(n: usize) -> QuadratureRule {
    QuadratureRule::mirrored(n, |i| {
        let mut x = (PI * (i as f64 + 0.75) / (n as f64 + 0.5)).cos();
        let mut dp = 1.0;

        for _ in 0..100 {
            let (p, d) = legendre_and_derivative(n, x);
            dp = d;
            let dx = p / d;
            x -= dx;
            if dx.abs() <= 1e-16 * x.abs().max(1.0) {
                dp = legendre_and_derivative(n, x).1;
                break;
            }
        }

        let s2 = (1.0 - x) * (1.0 + x);
        let w = 2.0 / (s2 * dp * dp);
        (x, s2.sqrt(), w)
    })
}

/// Equispaced rule θ_i = (i + 1/2) π / n with Fejér's first-rule weights
/// (exact for polynomials of degree n-1). The poles are excluded.
pub fn fejer(n: usize) -> QuadratureRule {
    let nf = n as f64;
    QuadratureRule::mirrored(n, |i| {
        let theta = PI * (i as f64 + 0.5) / nf;
        let mut sum = 0.0;
        for k in 1..=n / 2 {
            let kf = k as f64;
            sum += (2.0 * kf * theta).cos() / (4.0 * kf * kf - 1.0);
        }
        let w = 2.0 / nf * (1.0 - 2.0 * sum);
        (theta.cos(), theta.sin(), w)
    })
}

/// Equispaced rule θ_i = i π / (n - 1) including both poles, with
/// Clenshaw-Curtis weights (exact for polynomials of degree n-1).
///
/// Requires `n >= 2`.
pub fn clenshaw_curtis(n: usize) -> QuadratureRule {
    let intervals = n - 1;
    let nf = intervals as f64;
    QuadratureRule::mirrored(n, |i| {
        let theta = PI * i as f64 / nf;
        let mut sum = 0.0;
        for k in 1..=intervals / 2 {
            let kf = k as f64;
            let b = if 2 * k == intervals { 1.0 } else { 2.0 };
            sum += b * (2.0 * kf * theta).cos() / (4.0 * kf * kf - 1.0);
        }
        let c = if i == 0 || i == intervals { 1.0 } else { 2.0 };
        let w = c / nf * (1.0 - sum);
        let (x, s) = if i == 0 { (1.0, 0.0) } else { (theta.cos(), theta.sin()) };
        (x, s, w)
    })
}
