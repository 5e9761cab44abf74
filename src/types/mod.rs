//! Strongly-typed indices and the spectral truncation.
//!
//! # Example
//!
//! ```
//! use sht_rs::types::{OrderIndex, Truncation};
//!
//! let t = Truncation::new(8, 4, 2).unwrap();
//! assert_eq!(t.order(OrderIndex::new(3)), 6);
//! assert_eq!(t.n_degrees(OrderIndex::new(3)), 3);
//! ```

mod indices;
mod truncation;

pub use indices::{OrderIndex, PairIndex};
pub use truncation::Truncation;
