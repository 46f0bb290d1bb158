//! # ql-math
//!
//! Mathematical utilities for the finite-difference framework: the `Array`
//! newtype (over nalgebra), the `SampledCurve` grid/value container, and the
//! normal distribution (via statrs).

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// One-dimensional real arrays.
pub mod array;

/// Floating-point comparison utilities.
pub mod comparison;

/// Probability distributions.
pub mod distributions;

/// Functions sampled on a price grid.
pub mod sampled_curve;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use array::Array;
pub use comparison::{close, close_enough};
pub use distributions::{normal_cdf, normal_pdf};
pub use sampled_curve::{bounded_log_grid, SampledCurve};
