//! Probability distributions.
//!
//! Only the standard normal is needed by the pricing framework (closed-form
//! reference values for the control variate); it delegates to `statrs`.

pub mod normal;

pub use normal::{normal_cdf, normal_pdf};
