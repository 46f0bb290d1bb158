//! # ql-processes
//!
//! The Black-Scholes diffusion consumed by the finite-difference engines.
//!
//! Engines see the market only through the [`BlackScholesProcess`] trait:
//! spot, Black variance, the two discount curves, and the conversion from
//! calendar dates to year fractions. Everything else (zero rates, forward
//! rates, local volatility) is derived from those by provided methods.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod black_scholes_process;

pub use black_scholes_process::{BlackScholesProcess, FlatBlackScholesProcess};
