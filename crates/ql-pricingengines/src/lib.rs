//! # ql-pricingengines
//!
//! Pricing engines for vanilla options on a Black-Scholes underlying:
//! finite-difference engines built on `ql-methods`, plus the closed-form
//! engines they use as references and control variates.
//!
//! ## Engines
//!
//! - [`FdEuropeanEngine`]: Crank-Nicolson rollback of a European payoff
//! - [`FdAmericanEngine`]: American exercise, corrected by the Black value as control variate
//! - [`FdShoutEngine`]: Shout options, same control-variate scheme
//! - [`FdBermudanEngine`]: Exercise on a discrete set of dates
//! - [`FdDividendEngine`]: European/American options with discrete cash dividends
//! - [`AnalyticEuropeanEngine`]: Black-Scholes-Merton closed form for European options
//! - [`BaroneAdesiWhaleyEngine`]: Quadratic approximation for American options
//!
//! The finite-difference engines share [`FdSettings`] and build a fresh
//! [`FdVanillaContext`] per call, so a single engine can price from several
//! threads at once.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod analytic_european_engine;
pub mod barone_adesi_whaley_engine;
pub mod black_calculator;
pub mod fd_bermudan_engine;
pub mod fd_dividend_engine;
pub mod fd_european_engine;
pub mod fd_multi_period_engine;
pub mod fd_step_condition_engine;
pub mod fd_vanilla_engine;

pub use analytic_european_engine::{black_calculator, black_scholes_theta, AnalyticEuropeanEngine};
pub use barone_adesi_whaley_engine::{barone_adesi_whaley, BaroneAdesiWhaleyEngine};
pub use black_calculator::BlackCalculator;
pub use fd_bermudan_engine::FdBermudanEngine;
pub use fd_dividend_engine::{DividendAdjustment, FdDividendEngine};
pub use fd_european_engine::FdEuropeanEngine;
pub use fd_multi_period_engine::{FdMultiPeriodEngine, MultiPeriodEvents, MultiPeriodLattice};
pub use fd_step_condition_engine::{
    ExerciseCondition, FdAmericanEngine, FdShoutEngine, FdStepConditionEngine, CONSTRAINED_VALUE, CONTROL_VALUE,
};
pub use fd_vanilla_engine::{FdSettings, FdVanillaContext};
