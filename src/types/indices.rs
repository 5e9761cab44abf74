//! Index newtypes for the two loop axes of the combiner kernel.
//!
//! An [`OrderIndex`] counts admissible orders (order `m = index * mres`), a
//! [`PairIndex`] counts latitude pairs from the north pole toward the
//! equator. Keeping them apart stops the forward and inverse loops from
//! being mixed up.

use std::fmt;
use std::ops::Range;

macro_rules! define_index {
    (
        $(#[$meta:meta])*
        $name:ident, $display_prefix:literal
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr(transparent)]
        pub struct $name(usize);

        impl $name {
            /// Wrap a raw index.
            #[inline]
            pub const fn new(index: usize) -> Self {
                Self(index)
            }

            /// Raw index value.
            #[inline]
            pub const fn get(self) -> usize {
                self.0
            }

            /// Iterate over the indices of a raw range.
            pub fn range(range: Range<usize>) -> impl ExactSizeIterator<Item = $name> {
                range.map($name)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $display_prefix, self.0)
            }
        }

        impl From<usize> for $name {
            #[inline]
            fn from(index: usize) -> Self {
                Self(index)
            }
        }

        impl From<$name> for usize {
            #[inline]
            fn from(idx: $name) -> usize {
                idx.0
            }
        }

        impl<T> std::ops::Index<$name> for [T] {
            type Output = T;
            #[inline]
            fn index(&self, idx: $name) -> &T {
                &self[idx.0]
            }
        }

        impl<T> std::ops::Index<$name> for Vec<T> {
            type Output = T;
            #[inline]
            fn index(&self, idx: $name) -> &T {
                &self[idx.0]
            }
        }
    };
}

define_index!(
    /// Index of an admissible order; the order itself is `index * mres`.
    ///
    /// # Example
    ///
    /// ```
    /// use sht_rs::types::OrderIndex;
    ///
    /// let im = OrderIndex::new(3);
    /// assert_eq!(im.get(), 3);
    /// ```
    OrderIndex,
    "M"
);

define_index!(
    /// Index of a latitude pair `(i, nlat - 1 - i)`, counted from the poles.
    ///
    /// For odd `nlat` the last pair is the equator row paired with itself.
    ///
    /// # Example
    ///
    /// ```
    /// use sht_rs::types::PairIndex;
    ///
    /// let pair = PairIndex::new(0);
    /// assert_eq!(pair.to_string(), "P0");
    /// ```
    PairIndex,
    "P"
);

impl PairIndex {
    /// Row index of the northern member of the pair.
    #[inline]
    pub const fn north(self) -> usize {
        self.0
    }

    /// Row index of the southern member of the pair.
    #[inline]
    pub const fn south(self, nlat: usize) -> usize {
        nlat - 1 - self.0
    }
}
