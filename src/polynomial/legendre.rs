//! Legendre polynomial evaluation.
//!
//! Legendre polynomials P_n(x) are orthogonal on [-1, 1] with weight 1:
//! ∫_{-1}^{1} P_m(x) P_n(x) dx = 2/(2n+1) δ_{mn}
//!
//! They are only needed here to place the Gauss-Legendre latitudes; the
//! associated functions used by the transforms live in [`crate::legendre`].

/// Evaluate P_n(x) and P_{n-1}(x) with the three-term recurrence.
///
/// (k+1) P_{k+1}(x) = (2k+1) x P_k(x) - k P_{k-1}(x)
///
/// For `n = 0` the second value is 0.
pub fn legendre_pair(n: usize, x: f64) -> (f64, f64) {
    if n == 0 {
        return (1.0, 0.0);
    }

    let mut p_prev = 1.0; // P_{k-1}
    let mut p_curr = x; // P_k

    for k in 1..n {
        let kf = k as f64;
        let p_next = ((2.0 * kf + 1.0) * x * p_curr - kf * p_prev) / (kf + 1.0);
        p_prev = p_curr;
        p_curr = p_next;
    }

    (p_curr, p_prev)
}

/// Evaluate P_n(x).
pub fn legendre(n: usize, x: f64) -> f64 {
    legendre_pair(n, x).0
}

/// Evaluate P_n(x) and P'_n(x) for |x| < 1.
///
/// Uses (x² - 1) P'_n(x) = n (x P_n(x) - P_{n-1}(x)). The endpoints are
/// handled with the closed forms P'_n(±1) = (±1)^{n+1} n(n+1)/2.
pub fn legendre_and_derivative(n: usize, x: f64) -> (f64, f64) {
    let (p_n, p_nm1) = legendre_pair(n, x);
    let nf = n as f64;

    let dp_n = if n == 0 {
        0.0
    } else if x == 1.0 {
        nf * (nf + 1.0) / 2.0
    } else if x == -1.0 {
        let sign = if n % 2 == 0 { -1.0 } else { 1.0 };
        sign * nf * (nf + 1.0) / 2.0
    } else {
        nf * (x * p_n - p_nm1) / (x * x - 1.0)
    };

    (p_n, dp_n)
}
