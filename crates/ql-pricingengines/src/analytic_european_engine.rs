//! Analytic European option engine (Black-Scholes-Merton).
//!
//! Prices European striked payoffs with the closed-form Black formula and
//! returns value, delta, gamma and theta.

use crate::black_calculator::BlackCalculator;
use ql_core::{ensure, errors::Result, Real};
use ql_instruments::{OptionResults, PricingEngine, StrikedPayoff, VanillaOptionArguments};
use ql_processes::BlackScholesProcess;
use std::sync::Arc;

/// Analytic pricing engine for European options.
///
/// $$C = S e^{-qT} N(d_1) - K e^{-rT} N(d_2)$$
/// $$P = K e^{-rT} N(-d_2) - S e^{-qT} N(-d_1)$$
#[derive(Debug, Clone)]
pub struct AnalyticEuropeanEngine {
    process: Arc<dyn BlackScholesProcess>,
}

impl AnalyticEuropeanEngine {
    /// Create a new engine with the given Black-Scholes process.
    pub fn new(process: Arc<dyn BlackScholesProcess>) -> Self {
        Self { process }
    }
}

/// The Black calculator for `payoff` expiring at `t` under `process`:
/// forward `S·Dq(t)/Dr(t)`, standard deviation `√variance(t, K)`, discount
/// `Dr(t)`.
pub fn black_calculator(process: &dyn BlackScholesProcess, payoff: &dyn StrikedPayoff, t: Real) -> BlackCalculator {
    let dr = process.risk_free_discount(t);
    let dq = process.dividend_discount(t);
    let forward = process.spot() * dq / dr;
    let std_dev = process.black_variance(t, payoff.strike()).max(0.0).sqrt();
    BlackCalculator::new(payoff, forward, std_dev, dr)
}

/// `∂V/∂t` from the Black-Scholes PDE: `r·V − (r−q)·S·Δ − ½σ²S²·Γ`,
/// with rates and volatility taken at the valuation date.
pub fn black_scholes_theta(process: &dyn BlackScholesProcess, value: Real, delta: Real, gamma: Real) -> Real {
    let spot = process.spot();
    let r = process.risk_free_rate(0.0);
    let q = process.dividend_yield(0.0);
    let vol = process.black_volatility(0.0, spot);
    r * value - (r - q) * spot * delta - 0.5 * vol * vol * spot * spot * gamma
}

impl PricingEngine<VanillaOptionArguments> for AnalyticEuropeanEngine {
    fn calculate(&self, args: &VanillaOptionArguments) -> Result<OptionResults> {
        ensure!(
            args.exercise.is_european(),
            "analytic engine needs a European exercise, got {}",
            args.exercise
        );
        let t = self.process.time_from_valuation(args.exercise.last_date());
        ensure!(t >= 0.0, "option expired {} years ago", -t);

        let spot = self.process.spot();
        let black = black_calculator(self.process.as_ref(), args.payoff.as_ref(), t);
        let (value, delta, gamma) = (black.value(), black.delta(spot), black.gamma(spot));
        let theta = black_scholes_theta(self.process.as_ref(), value, delta, gamma);
        Ok(OptionResults::new(value, delta, gamma, theta))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use chrono::NaiveDate;
    use ql_instruments::{Exercise, OptionType, PlainVanillaPayoff};
    use ql_processes::FlatBlackScholesProcess;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn engine() -> AnalyticEuropeanEngine {
        let process = FlatBlackScholesProcess::new(date(2025, 1, 15), 100.0, 0.05, 0.0, 0.20).unwrap();
        AnalyticEuropeanEngine::new(Arc::new(process))
    }

    fn args(option_type: OptionType, strike: Real, exercise: Exercise) -> VanillaOptionArguments {
        VanillaOptionArguments {
            payoff: Arc::new(PlainVanillaPayoff::new(option_type, strike)),
            exercise,
        }
    }

    #[test]
    fn engine_with_process() {
        let result = engine()
            .calculate(&args(OptionType::Call, 100.0, Exercise::european(date(2026, 1, 15))))
            .unwrap();
        assert_abs_diff_eq!(result.value, 10.4506, epsilon = 1e-3);
        assert!(result.delta > 0.5 && result.delta < 0.8, "delta = {}", result.delta);
        assert!(result.gamma > 0.0, "gamma = {}", result.gamma);
        // Closed-form call theta: −Sσn(d1)/(2√T) − rK e^{−rT} N(d2)
        assert_abs_diff_eq!(result.theta, -6.414, epsilon = 1e-2);
    }

    #[test]
    fn rejects_other_exercises() {
        let ex = Exercise::american(date(2025, 1, 15), date(2026, 1, 15)).unwrap();
        assert!(engine().calculate(&args(OptionType::Put, 100.0, ex)).is_err());
        let expired = Exercise::european(date(2024, 1, 15));
        assert!(engine().calculate(&args(OptionType::Put, 100.0, expired)).is_err());
    }
}
