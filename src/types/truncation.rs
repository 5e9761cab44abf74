//! Spectral truncation (which (l, m) pairs are represented).

use std::fmt;

use super::OrderIndex;
use crate::error::ConfigError;

/// Triangular spectral truncation with an order stride.
///
/// Represents degrees `0..=lmax` and orders `m = k * mres` for
/// `k = 0..=mmax`, each order holding the degrees `m..=lmax`.
///
/// # Example
///
/// ```
/// use sht_rs::types::Truncation;
///
/// let t = Truncation::new(10, 5, 2).unwrap();
/// assert_eq!(t.max_order(), 10);
/// assert_eq!(t.n_orders(), 6);
/// // (11 + 9 + 7 + 5 + 3 + 1) coefficients
/// assert_eq!(t.nlm(), 36);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Truncation {
    lmax: usize,
    mmax: usize,
    mres: usize,
}

impl Truncation {
    /// Validate and create a truncation.
    pub fn new(lmax: usize, mmax: usize, mres: usize) -> Result<Self, ConfigError> {
        if mres == 0 {
            return Err(ConfigError::ZeroStride(mres));
        }
        match mmax.checked_mul(mres) {
            Some(max_order) if max_order <= lmax => {}
            max_order => {
                return Err(ConfigError::OrderExceedsDegree {
                    max_order: max_order.unwrap_or(usize::MAX),
                    lmax,
                })
            }
        }
        // Offset arithmetic reaches 2 (lmax + 1)(lmax + 2).
        lmax.checked_add(2)
            .and_then(|n| n.checked_mul(lmax + 1))
            .and_then(|n| n.checked_mul(2))
            .ok_or(ConfigError::SizeOverflow("coefficient count"))?;
        Ok(Self { lmax, mmax, mres })
    }

    /// Full triangular truncation `mmax = lmax`, `mres = 1`.
    pub fn triangular(lmax: usize) -> Self {
        Self {
            lmax,
            mmax: lmax,
            mres: 1,
        }
    }

    /// Maximum degree.
    #[inline]
    pub fn lmax(&self) -> usize {
        self.lmax
    }

    /// Maximum order index (the largest order is `mmax * mres`).
    #[inline]
    pub fn mmax(&self) -> usize {
        self.mmax
    }

    /// Order stride.
    #[inline]
    pub fn mres(&self) -> usize {
        self.mres
    }

    /// Largest represented order.
    #[inline]
    pub fn max_order(&self) -> usize {
        self.mmax * self.mres
    }

    /// Number of admissible orders.
    #[inline]
    pub fn n_orders(&self) -> usize {
        self.mmax + 1
    }

    /// Order `m` for an order index.
    #[inline]
    pub fn order(&self, im: OrderIndex) -> usize {
        im.get() * self.mres
    }

    /// Number of degrees `m..=lmax` held by order index `im`.
    #[inline]
    pub fn n_degrees(&self, im: OrderIndex) -> usize {
        self.lmax - self.order(im) + 1
    }

    /// Offset of the first coefficient of order index `im` in m-major layout.
    #[inline]
    pub fn mode_offset(&self, im: OrderIndex) -> usize {
        let k = im.get();
        // sum_{j<k} (lmax - j*mres + 1)
        (k * (2 * (self.lmax + 1) - (k.saturating_sub(1)) * self.mres)) / 2
    }

    /// Total number of spectral coefficients.
    #[inline]
    pub fn nlm(&self) -> usize {
        self.mode_offset(OrderIndex::new(self.n_orders()))
    }

    /// Number of orders `m <= l` represented for degree `l`.
    #[inline]
    pub fn orders_at_degree(&self, l: usize) -> usize {
        (l / self.mres).min(self.mmax) + 1
    }

    /// Whether `(l, m)` is represented by this truncation.
    #[inline]
    pub fn contains(&self, l: usize, m: usize) -> bool {
        l <= self.lmax && m <= l && m % self.mres == 0 && m / self.mres <= self.mmax
    }
}

impl fmt::Display for Truncation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.mres == 1 && self.mmax == self.lmax {
            write!(f, "T{}", self.lmax)
        } else {
            write!(f, "L{}M{}x{}", self.lmax, self.mmax, self.mres)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triangular_counts() {
        for lmax in 0..8 {
            let t = Truncation::triangular(lmax);
            assert_eq!(t.nlm(), (lmax + 1) * (lmax + 2) / 2);
        }
    }

    #[test]
    fn test_mode_offsets_are_cumulative() {
        let t = Truncation::new(12, 4, 3).unwrap();
        let mut expected = 0;
        for k in 0..t.n_orders() {
            let im = OrderIndex::new(k);
            assert_eq!(t.mode_offset(im), expected, "offset of {}", im);
            expected += t.n_degrees(im);
        }
        assert_eq!(t.nlm(), expected);
    }

    #[test]
    fn test_rejects_bad_truncations() {
        assert_eq!(Truncation::new(5, 1, 0), Err(ConfigError::ZeroStride(0)));
        assert!(matches!(
            Truncation::new(5, 3, 2),
            Err(ConfigError::OrderExceedsDegree { max_order: 6, lmax: 5 })
        ));
    }

    #[test]
    fn test_rejects_overflowing_truncations() {
        assert_eq!(
            Truncation::new(10, usize::MAX / 2, 3),
            Err(ConfigError::OrderExceedsDegree { max_order: usize::MAX, lmax: 10 })
        );
        assert_eq!(
            Truncation::new(usize::MAX - 1, 0, 1),
            Err(ConfigError::SizeOverflow("coefficient count"))
        );
        assert!(Truncation::new(1 << 20, 1 << 19, 2).is_ok());
    }

    #[test]
    fn test_contains() {
        let t = Truncation::new(10, 3, 2).unwrap();
        assert!(t.contains(4, 4));
        assert!(!t.contains(4, 3));
        assert!(!t.contains(10, 8));
        assert!(!t.contains(3, 4));
        assert_eq!(t.orders_at_degree(0), 1);
        assert_eq!(t.orders_at_degree(5), 3);
        assert_eq!(t.orders_at_degree(10), 4);
    }

    #[test]
    fn test_display() {
        assert_eq!(Truncation::triangular(31).to_string(), "T31");
        assert_eq!(Truncation::new(20, 5, 4).unwrap().to_string(), "L20M5x4");
    }
}
