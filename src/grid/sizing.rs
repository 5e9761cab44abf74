//! Automatic grid sizing.

use super::GridKind;

/// Smallest integer `>= n` whose only prime factors are 2, 3 and 5.
///
/// ```
/// use sht_rs::grid::fft_friendly_length;
///
/// assert_eq!(fft_friendly_length(7), 8);
/// assert_eq!(fft_friendly_length(61), 64);
/// assert_eq!(fft_friendly_length(91), 96);
/// ```
pub fn fft_friendly_length(n: usize) -> usize {
    let mut candidate = n.max(1);
    while !is_smooth(candidate) {
        candidate += 1;
    }
    candidate
}

pub(crate) fn is_smooth(mut n: usize) -> bool {
    if n == 0 {
        return false;
    }
    for p in [2, 3, 5] {
        while n % p == 0 {
            n /= p;
        }
    }
    n == 1
}

/// Smallest latitude count resolving products of `nl_order` fields of degree `lmax`.
///
/// Gauss grids are rounded up to an even count so that no row sits on the
/// equator. `None` when the count does not fit in `usize`.
pub fn auto_nlat(kind: GridKind, lmax: usize, nl_order: usize) -> Option<usize> {
    let span = nl_order.checked_add(1)?.checked_mul(lmax)?;
    match kind {
        GridKind::Gauss => {
            let n = span / 2 + 1;
            n.checked_add(n % 2)
        }
        GridKind::Regular => span.checked_add(1),
        GridKind::RegularPoles => span.checked_add(1).map(|n| n.max(2)),
    }
}

/// Smallest FFT-friendly longitude count for the largest order `mmax * mres`.
///
/// The result is a multiple of `mres`; its period `nphi / mres` is 2·3·5-smooth.
/// `None` when the count does not fit in `usize`.
pub fn auto_nphi(mmax: usize, mres: usize, nl_order: usize) -> Option<usize> {
    let period = nl_order.checked_add(1)?.checked_mul(mmax)?.checked_add(1)?;
    mres.checked_mul(fft_friendly_length(period))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smooth_numbers() {
        let smooth: Vec<usize> = (1..=20).filter(|&n| is_smooth(n)).collect();
        assert_eq!(smooth, vec![1, 2, 3, 4, 5, 6, 8, 9, 10, 12, 15, 16, 18, 20]);
        assert!(!is_smooth(0));
        assert_eq!(fft_friendly_length(0), 1);
    }

    #[test]
    fn test_auto_nlat_meets_minimum() {
        for kind in [GridKind::Gauss, GridKind::Regular, GridKind::RegularPoles] {
            for lmax in 0..40 {
                let nlat = auto_nlat(kind, lmax, 1).unwrap();
                assert!(nlat >= kind.min_nlat(lmax), "{} lmax={}", kind, lmax);
            }
        }
        assert_eq!(auto_nlat(GridKind::Gauss, 31, 1).map(|n| n % 2), Some(0));
        assert_eq!(auto_nlat(GridKind::Gauss, 31, 2), Some(48));
        assert_eq!(auto_nlat(GridKind::Regular, 10, usize::MAX), None);
    }

    #[test]
    fn test_auto_nphi_respects_stride() {
        for mres in 1..5 {
            for mmax in 0..20 {
                let nphi = auto_nphi(mmax, mres, 1).unwrap();
                assert_eq!(nphi % mres, 0);
                assert!(nphi >= 2 * mmax * mres + 1);
                assert!(is_smooth(nphi / mres));
            }
        }
        assert_eq!(auto_nphi(usize::MAX / 4, 1, 4), None);
    }
}
