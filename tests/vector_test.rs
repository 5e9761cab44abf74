//! Spheroidal/toroidal vector transforms.
//!
//! Fields are (u, v) = (v_θ, v_φ) with
//! v_θ = ∂S/∂θ + (1/sin θ) ∂T/∂φ and v_φ = (1/sin θ) ∂S/∂φ − ∂T/∂θ.

mod common;

use common::{init_tracing, max_diff, max_diff_real, random_spectrum, sample};
use sht_rs::{
    qst_forward, qst_inverse, spheroidal_inverse, vector_forward, vector_inverse, Complex64,
    ConfigBuilder, GridKind, LegendreMode, Sht, ShtError, SpectralLayout, Workspace,
};
use std::f64::consts::PI;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);

/// Random potentials with the (meaningless) degree-0 terms cleared.
fn potentials(sht: &Sht, seed: u64) -> (Vec<Complex64>, Vec<Complex64>) {
    let config = sht.config();
    let i00 = config.lm_index(0, 0).unwrap();
    let mut s = random_spectrum(config, seed);
    let mut t = random_spectrum(config, seed + 1);
    s[i00] = ZERO;
    t[i00] = ZERO;
    (s, t)
}

#[test]
fn test_vector_round_trip() {
    init_tracing();
    for grid in [GridKind::Gauss, GridKind::Regular, GridKind::RegularPoles] {
        for layout in [SpectralLayout::MMajor, SpectralLayout::LMajor] {
            let config = ConfigBuilder::new(23)
                .with_grid(grid)
                .with_layout(layout)
                .build()
                .unwrap();
            let sht = Sht::new(config).unwrap();
            let (s, t) = potentials(&sht, 3);
            let (u, v) = vector_inverse(&sht, &s, &t).unwrap();
            let (s2, t2) = vector_forward(&sht, &u, &v).unwrap();
            let err = max_diff(&s, &s2).max(max_diff(&t, &t2));
            assert!(err < 1e-10, "{} grid, {} layout: error {:.3e}", grid, layout, err);
        }
    }
}

#[test]
fn test_vector_round_trip_stride_and_mode() {
    for mode in [LegendreMode::Precomputed, LegendreMode::OnTheFly] {
        let config = ConfigBuilder::new(30)
            .with_mmax(7)
            .with_mres(4)
            .with_mode(mode)
            .build()
            .unwrap();
        let sht = Sht::with_threads(config, 2).unwrap();
        let (s, t) = potentials(&sht, 8);
        let (u, v) = sht.vector_inverse(&s, &t).unwrap();
        let (s2, t2) = sht.vector_forward(&u, &v).unwrap();
        assert!(max_diff(&s, &s2) < 1e-10, "{}", mode);
        assert!(max_diff(&t, &t2) < 1e-10, "{}", mode);
    }
}

#[test]
fn test_solid_body_rotation() {
    // u = 0, v = sin θ is the toroidal field T = sqrt(4π/3) Y_10.
    let config = ConfigBuilder::new(12).build().unwrap();
    let sht = Sht::new(config).unwrap();
    let config = sht.config();
    let u = vec![0.0; config.nspat()];
    let v = sample(config, |theta, _| theta.sin());
    let (s, t) = sht.vector_forward(&u, &v).unwrap();

    let i10 = config.lm_index(1, 0).unwrap();
    assert!((t[i10].re - (4.0 * PI / 3.0).sqrt()).abs() < 1e-12, "T_10 = {}", t[i10]);
    assert!(s.iter().all(|c| c.norm() < 1e-13));
    assert!(t
        .iter()
        .enumerate()
        .all(|(i, c)| i == i10 || c.norm() < 1e-13));
}

#[test]
fn test_gradient_of_y10() {
    // S = cos θ gives u = −sin θ, v = 0.
    let config = ConfigBuilder::new(5).with_grid(GridKind::RegularPoles).build().unwrap();
    let sht = Sht::new(config).unwrap();
    let config = sht.config();
    let mut s = vec![ZERO; config.nlm()];
    s[config.lm_index(1, 0).unwrap()] = Complex64::new((4.0 * PI / 3.0).sqrt(), 0.0);
    let t = vec![ZERO; config.nlm()];

    let (u, v) = sht.vector_inverse(&s, &t).unwrap();
    let expected_u = sample(config, |theta, _| -theta.sin());
    assert!(max_diff_real(&u, &expected_u) < 1e-13);
    assert!(v.iter().all(|x| x.abs() < 1e-14));
}

#[test]
fn test_sectoral_potential_at_poles() {
    // S = sin θ cos φ gives u = cos θ cos φ, v = −sin φ, finite at both poles.
    let config = ConfigBuilder::new(4).with_grid(GridKind::RegularPoles).build().unwrap();
    let sht = Sht::new(config).unwrap();
    let config = sht.config();
    assert_eq!(config.cos_theta()[0], 1.0);

    let mut s = vec![ZERO; config.nlm()];
    s[config.lm_index(1, 1).unwrap()] = Complex64::new(-(2.0 * PI / 3.0).sqrt(), 0.0);
    let t = vec![ZERO; config.nlm()];
    let (u, v) = sht.vector_inverse(&s, &t).unwrap();

    let expected_u = sample(config, |theta, phi| theta.cos() * phi.cos());
    let expected_v = sample(config, |_, phi| -phi.sin());
    assert!(max_diff_real(&u, &expected_u) < 1e-13);
    assert!(max_diff_real(&v, &expected_v) < 1e-13);
    assert!(u.iter().chain(&v).all(|x| x.is_finite()));

    // And back again.
    let (s2, t2) = sht.vector_forward(&u, &v).unwrap();
    assert!(max_diff(&s, &s2) < 1e-12);
    assert!(max_diff(&t, &t2) < 1e-12);
}

#[test]
fn test_toroidal_sectoral_field() {
    // T = sin θ cos φ gives u = −sin φ, v = −cos θ cos φ.
    let config = ConfigBuilder::new(6).build().unwrap();
    let sht = Sht::new(config).unwrap();
    let config = sht.config();
    let u = sample(config, |_, phi| -phi.sin());
    let v = sample(config, |theta, phi| -theta.cos() * phi.cos());
    let (s, t) = sht.vector_forward(&u, &v).unwrap();

    let i11 = config.lm_index(1, 1).unwrap();
    let expected = -(2.0 * PI / 3.0).sqrt();
    assert!((t[i11].re - expected).abs() < 1e-12, "T_11 = {}", t[i11]);
    assert!(t[i11].im.abs() < 1e-13);
    assert!(s.iter().all(|c| c.norm() < 1e-13));
}

#[test]
fn test_vector_high_degree_near_poles() {
    // High orders near the poles exercise the extended-range seeds.
    let config = ConfigBuilder::new(200).with_mode(LegendreMode::OnTheFly).build().unwrap();
    let sht = Sht::new(config).unwrap();
    let (s, t) = potentials(&sht, 12);
    let (u, v) = sht.vector_inverse(&s, &t).unwrap();
    assert!(u.iter().chain(&v).all(|x| x.is_finite()));
    let (s2, t2) = sht.vector_forward(&u, &v).unwrap();
    assert!(max_diff(&s, &s2) < 1e-9);
    assert!(max_diff(&t, &t2) < 1e-9);
}

#[test]
fn test_gradient_and_toroidal_synthesis_match_vector() {
    for mode in [LegendreMode::Precomputed, LegendreMode::OnTheFly] {
        let config = ConfigBuilder::new(21).with_mmax(9).with_mres(2).with_mode(mode).build().unwrap();
        let sht = Sht::with_threads(config, 3).unwrap();
        let (s, t) = potentials(&sht, 40);
        let zero = vec![ZERO; s.len()];

        let (gu, gv) = sht.spheroidal_inverse(&s).unwrap();
        let (u, v) = sht.vector_inverse(&s, &zero).unwrap();
        assert!(max_diff_real(&gu, &u) < 1e-14, "{}", mode);
        assert!(max_diff_real(&gv, &v) < 1e-14, "{}", mode);

        let mut ws = Workspace::new();
        let (mut tu, mut tv) = (vec![0.0; u.len()], vec![0.0; v.len()]);
        sht.toroidal_inverse_into(&t, &mut tu, &mut tv, &mut ws).unwrap();
        let (u, v) = sht.vector_inverse(&zero, &t).unwrap();
        assert!(max_diff_real(&tu, &u) < 1e-14, "{}", mode);
        assert!(max_diff_real(&tv, &v) < 1e-14, "{}", mode);

        // Analysis recovers each potential on its own.
        let (s2, t2) = sht.vector_forward(&gu, &gv).unwrap();
        assert!(max_diff(&s, &s2) < 1e-10);
        assert!(t2.iter().all(|c| c.norm() < 1e-10));
    }
}

#[test]
fn test_gradient_of_sectoral_harmonic() {
    // ∇(sin θ cos φ) = (cos θ cos φ, −sin φ).
    let config = ConfigBuilder::new(6).with_grid(GridKind::Regular).build().unwrap();
    let sht = Sht::new(config).unwrap();
    let config = sht.config();
    let mut s = vec![ZERO; config.nlm()];
    s[config.lm_index(1, 1).unwrap()] = Complex64::new(-(2.0 * PI / 3.0).sqrt(), 0.0);

    let (u, v) = spheroidal_inverse(&sht, &s).unwrap();
    let expected_u = sample(config, |theta, phi| theta.cos() * phi.cos());
    let expected_v = sample(config, |_, phi| -phi.sin());
    assert!(max_diff_real(&u, &expected_u) < 1e-13);
    assert!(max_diff_real(&v, &expected_v) < 1e-13);
}

#[test]
fn test_qst_matches_separate_transforms() {
    for grid in [GridKind::Gauss, GridKind::RegularPoles] {
        for layout in [SpectralLayout::MMajor, SpectralLayout::LMajor] {
            let config = ConfigBuilder::new(19)
                .with_grid(grid)
                .with_layout(layout)
                .build()
                .unwrap();
            let sht = Sht::with_threads(config, 2).unwrap();
            let q = random_spectrum(sht.config(), 50);
            let (s, t) = potentials(&sht, 51);

            let (vr, vt, vp) = qst_inverse(&sht, &q, &s, &t).unwrap();
            let f = sht.scalar_inverse(&q).unwrap();
            let (u, v) = sht.vector_inverse(&s, &t).unwrap();
            assert!(max_diff_real(&vr, &f) < 1e-14, "{} {}", grid, layout);
            assert!(max_diff_real(&vt, &u) < 1e-14, "{} {}", grid, layout);
            assert!(max_diff_real(&vp, &v) < 1e-14, "{} {}", grid, layout);

            let (q2, s2, t2) = qst_forward(&sht, &vr, &vt, &vp).unwrap();
            let err = max_diff(&q, &q2).max(max_diff(&s, &s2)).max(max_diff(&t, &t2));
            assert!(err < 1e-10, "{} grid, {} layout: error {:.3e}", grid, layout, err);

            let (s3, t3) = sht.vector_forward(&vt, &vp).unwrap();
            assert!(max_diff(&s2, &s3) < 1e-14 && max_diff(&t2, &t3) < 1e-14);
        }
    }
}

#[test]
fn test_qst_into_with_stride_and_threads() {
    let config = ConfigBuilder::new(24)
        .with_mmax(6)
        .with_mres(3)
        .with_mode(LegendreMode::OnTheFly)
        .build()
        .unwrap();
    let one = Sht::with_threads(config, 1).unwrap();
    let mut many = one.clone();
    many.set_threads(5).unwrap();
    let q = random_spectrum(one.config(), 60);
    let (s, t) = potentials(&one, 61);
    let (nspat, nlm) = (one.config().nspat(), one.config().nlm());

    let mut ws = Workspace::new();
    let mut grids = vec![vec![0.0; nspat]; 3];
    let [vr, vt, vp] = &mut grids[..] else { unreachable!() };
    many.qst_inverse_into(&q, &s, &t, vr, vt, vp, &mut ws).unwrap();
    let reference = one.qst_inverse(&q, &s, &t).unwrap();
    assert_eq!((vr.clone(), vt.clone(), vp.clone()), reference);

    let mut out = vec![vec![ZERO; nlm]; 3];
    let [q2, s2, t2] = &mut out[..] else { unreachable!() };
    many.qst_forward_into(vr, vt, vp, q2, s2, t2, &mut ws).unwrap();
    assert!(max_diff(&q, q2) < 1e-10);
    assert!(max_diff(&s, s2) < 1e-10);
    assert!(max_diff(&t, t2) < 1e-10);

    // A bad radial buffer fails before anything is written.
    let before = grids.clone();
    let [vr, vt, vp] = &mut grids[..] else { unreachable!() };
    let err = many
        .qst_inverse_into(&q[1..], &s, &t, vr, vt, vp, &mut ws)
        .unwrap_err();
    assert!(matches!(err, ShtError::Dimension { buffer: "radial", .. }));
    assert_eq!(grids, before);
}
