//! Legendre polynomials and latitude quadrature rules.
//!
//! This module provides:
//! - 1D Legendre polynomials and their derivatives
//! - Gauss-Legendre nodes and weights (Newton-refined roots of P_n)
//! - Equispaced Fejér and Clenshaw-Curtis rules for regular grids

mod legendre;
mod nodes;

pub use legendre::{legendre, legendre_and_derivative, legendre_pair};
pub use nodes::{clenshaw_curtis, fejer, gauss_legendre, QuadratureRule};
