//! # ql-instruments
//!
//! Single-asset options: payoffs, exercise schedules, discrete dividends,
//! the arguments handed to pricing engines and the results they return.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod dividend;
pub mod exercise;
pub mod instrument;
pub mod option;
pub mod payoff;

pub use dividend::Dividend;
pub use exercise::{Exercise, ExerciseType};
pub use instrument::{OptionResults, PricingEngine};
pub use option::{DividendVanillaOptionArguments, VanillaOption, VanillaOptionArguments};
pub use payoff::{
    AssetOrNothingPayoff, CashOrNothingPayoff, OptionType, Payoff, PayoffType, PlainVanillaPayoff,
    StrikedPayoff,
};
