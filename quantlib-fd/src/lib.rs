//! # quantlib-fd
//!
//! Finite-difference pricing of options on a Black-Scholes underlying, in
//! the style of [QuantLib](https://www.quantlib.org/)'s FD vanilla engines.
//!
//! This crate is a **façade** that re-exports all public items from the
//! underlying workspace crates. Application code should depend on this
//! crate rather than the individual `ql-*` crates.
//!
//! ## Quick start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use quantlib_fd::instruments::{Exercise, OptionType, PricingEngine, VanillaOption};
//! use quantlib_fd::pricingengines::{FdAmericanEngine, FdSettings};
//! use quantlib_fd::processes::FlatBlackScholesProcess;
//! use std::sync::Arc;
//!
//! # fn main() -> quantlib_fd::core::Result<()> {
//! let today = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
//! let expiry = NaiveDate::from_ymd_opt(2026, 1, 2).unwrap();
//! let process = Arc::new(FlatBlackScholesProcess::new(today, 100.0, 0.05, 0.0, 0.2)?);
//!
//! let put = VanillaOption::european(OptionType::Put, 100.0, expiry);
//! let mut args = put.arguments();
//! args.exercise = Exercise::american(today, expiry)?;
//!
//! let engine = FdAmericanEngine::new(process, FdSettings::new(100, 101));
//! let results = engine.calculate(&args)?;
//! assert!(results.value > 5.5 && results.value < 6.5);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Core types, aliases, and error definitions.
pub use ql_core as core;

/// Arrays, sampled curves and normal distribution helpers.
pub use ql_math as math;

/// The Black-Scholes process interface and a flat-market implementation.
pub use ql_processes as processes;

/// Payoffs, exercises, dividends and option arguments.
pub use ql_instruments as instruments;

/// Finite-difference building blocks: grids, operators, boundary
/// conditions, time stepping and step conditions.
pub use ql_methods as methods;

/// Closed-form and finite-difference pricing engines.
pub use ql_pricingengines as pricingengines;
