//! Pricing engine trait and option results.

use ql_core::{errors::Result, Real};
use std::collections::HashMap;

/// Results of pricing a single-asset option.
///
/// Greeks are with respect to the spot; theta is per year.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptionResults {
    /// Present value.
    pub value: Real,
    /// `∂V/∂S`.
    pub delta: Real,
    /// `∂²V/∂S²`.
    pub gamma: Real,
    /// `∂V/∂t`.
    pub theta: Real,
    /// Additional named results (e.g. `"controlValue"`).
    pub additional_results: HashMap<String, Real>,
}

impl OptionResults {
    /// Results with value and greeks and no additional entries.
    pub fn new(value: Real, delta: Real, gamma: Real, theta: Real) -> Self {
        Self {
            value,
            delta,
            gamma,
            theta,
            additional_results: HashMap::new(),
        }
    }

    /// Add a named result.
    pub fn with_result(mut self, key: impl Into<String>, value: Real) -> Self {
        self.additional_results.insert(key.into(), value);
        self
    }

    /// Look up a named result.
    pub fn result(&self, key: &str) -> Option<Real> {
        self.additional_results.get(key).copied()
    }
}

/// A pricing engine for instruments described by `Args`.
///
/// Engines are immutable; every call to `calculate` builds its own working
/// state, so one engine may serve concurrent callers.
pub trait PricingEngine<Args>: std::fmt::Debug + Send + Sync {
    /// Price the instrument described by `args`.
    fn calculate(&self, args: &Args) -> Result<OptionResults>;
}
