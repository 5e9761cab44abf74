//! Shared helpers for the integration tests.

#![allow(dead_code)]

use sht_rs::{Complex64, TransformConfig};

/// Install a test-friendly subscriber once; `RUST_LOG` selects the level.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Deterministic pseudo-random spectrum in [-0.5, 0.5), m = 0 kept real.
pub fn random_spectrum(config: &TransformConfig, seed: u64) -> Vec<Complex64> {
    let mut state = seed ^ 0x9e37_79b9_7f4a_7c15;
    let mut next = move || {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((state >> 11) as f64 / (1u64 << 53) as f64) - 0.5
    };
    (0..config.nlm())
        .map(|i| {
            let (re, im) = (next(), next());
            if config.order_of(i) == Some(0) {
                Complex64::new(re, 0.0)
            } else {
                Complex64::new(re, im)
            }
        })
        .collect()
}

/// Largest |a_i - b_i|.
pub fn max_diff(a: &[Complex64], b: &[Complex64]) -> f64 {
    assert_eq!(a.len(), b.len());
    a.iter().zip(b).map(|(x, y)| (x - y).norm()).fold(0.0, f64::max)
}

/// Largest |a_i - b_i| for real buffers.
pub fn max_diff_real(a: &[f64], b: &[f64]) -> f64 {
    assert_eq!(a.len(), b.len());
    a.iter().zip(b).map(|(x, y)| (x - y).abs()).fold(0.0, f64::max)
}

/// Sample `f(theta, phi)` on the grid of `config`.
pub fn sample(config: &TransformConfig, f: impl Fn(f64, f64) -> f64) -> Vec<f64> {
    let grid = config.grid();
    let mut out = Vec::with_capacity(config.nspat());
    for i in 0..config.nlat() {
        let theta = grid.colatitude(i);
        for j in 0..config.nphi() {
            out.push(f(theta, grid.longitude(j)));
        }
    }
    out
}
