//! Vanilla options and the arguments sent to their engines.

use crate::dividend::Dividend;
use crate::exercise::Exercise;
use crate::instrument::{OptionResults, PricingEngine};
use crate::payoff::{OptionType, PlainVanillaPayoff, StrikedPayoff};
use chrono::NaiveDate;
use ql_core::{errors::Result, Real};
use std::sync::Arc;

// ────────────────────────────────────────────────────────────────────────────
// Engine arguments
// ────────────────────────────────────────────────────────────────────────────

/// Arguments needed for pricing a one-asset option.
#[derive(Debug, Clone)]
pub struct VanillaOptionArguments {
    /// The payoff.
    pub payoff: Arc<dyn StrikedPayoff>,
    /// The exercise terms.
    pub exercise: Exercise,
}

/// Arguments for a one-asset option on a stock paying discrete dividends.
#[derive(Debug, Clone)]
pub struct DividendVanillaOptionArguments {
    /// The payoff.
    pub payoff: Arc<dyn StrikedPayoff>,
    /// The exercise terms.
    pub exercise: Exercise,
    /// Dividends, in payment order.
    pub dividends: Vec<Dividend>,
}

impl DividendVanillaOptionArguments {
    /// Arguments with the dividends sorted by date.
    pub fn new(payoff: Arc<dyn StrikedPayoff>, exercise: Exercise, mut dividends: Vec<Dividend>) -> Self {
        dividends.sort_by_key(|d| d.date);
        Self {
            payoff,
            exercise,
            dividends,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// VanillaOption
// ────────────────────────────────────────────────────────────────────────────

/// A plain option on a single underlying asset.
#[derive(Debug, Clone)]
pub struct VanillaOption {
    payoff: Arc<dyn StrikedPayoff>,
    exercise: Exercise,
}

impl VanillaOption {
    /// Create a new vanilla option.
    pub fn new(payoff: Arc<dyn StrikedPayoff>, exercise: Exercise) -> Self {
        Self { payoff, exercise }
    }

    /// Convenience: a European call/put.
    pub fn european(option_type: OptionType, strike: Real, expiry: NaiveDate) -> Self {
        Self {
            payoff: Arc::new(PlainVanillaPayoff::new(option_type, strike)),
            exercise: Exercise::european(expiry),
        }
    }

    /// The strike price.
    pub fn strike(&self) -> Real {
        self.payoff.strike()
    }

    /// The option type (call/put).
    pub fn option_type(&self) -> OptionType {
        self.payoff.option_type()
    }

    /// The payoff.
    pub fn payoff(&self) -> &dyn StrikedPayoff {
        &*self.payoff
    }

    /// The exercise.
    pub fn exercise(&self) -> &Exercise {
        &self.exercise
    }

    /// Arguments for a pricing engine.
    pub fn arguments(&self) -> VanillaOptionArguments {
        VanillaOptionArguments {
            payoff: Arc::clone(&self.payoff),
            exercise: self.exercise.clone(),
        }
    }

    /// Arguments for a dividend engine.
    pub fn dividend_arguments(&self, dividends: Vec<Dividend>) -> DividendVanillaOptionArguments {
        DividendVanillaOptionArguments::new(Arc::clone(&self.payoff), self.exercise.clone(), dividends)
    }

    /// Price this option using the given engine.
    pub fn price(&self, engine: &dyn PricingEngine<VanillaOptionArguments>) -> Result<OptionResults> {
        engine.calculate(&self.arguments())
    }
}
