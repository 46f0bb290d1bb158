//! Barone-Adesi-Whaley American option approximation.
//!
//! The early-exercise premium is approximated by `A·(S/S*)^q` where `S*`
//! is the critical price, found by Newton iteration on the smooth-pasting
//! condition. Used as a fast reference for American values.

use crate::black_calculator::BlackCalculator;
use ql_core::{ensure, errors::Result, Real};
use ql_instruments::{OptionResults, OptionType, PlainVanillaPayoff, PricingEngine, VanillaOptionArguments};
use ql_math::{normal_cdf, normal_pdf};
use ql_processes::BlackScholesProcess;
use std::sync::Arc;

/// Barone-Adesi-Whaley American option pricing engine.
///
/// Only the value is approximated; greeks are reported as zero.
#[derive(Debug, Clone)]
pub struct BaroneAdesiWhaleyEngine {
    process: Arc<dyn BlackScholesProcess>,
}

impl BaroneAdesiWhaleyEngine {
    /// Create a new engine with the given Black-Scholes process.
    pub fn new(process: Arc<dyn BlackScholesProcess>) -> Self {
        Self { process }
    }
}

/// Flat-market European value and spot delta.
fn european(option_type: OptionType, spot: Real, strike: Real, r: Real, q: Real, sigma: Real, t: Real) -> (Real, Real) {
    let dr = (-r * t).exp();
    let forward = spot * (-q * t).exp() / dr;
    let black = BlackCalculator::new(&PlainVanillaPayoff::new(option_type, strike), forward, sigma * t.sqrt(), dr);
    (black.value(), black.delta(spot))
}

fn d1(s: Real, k: Real, r: Real, q: Real, sigma: Real, t: Real) -> Real {
    ((s / k).ln() + (r - q + 0.5 * sigma * sigma) * t) / (sigma * t.sqrt())
}

/// Barone-Adesi-Whaley American option price.
pub fn barone_adesi_whaley(
    option_type: OptionType,
    spot: Real,
    strike: Real,
    r: Real,
    q: Real,
    sigma: Real,
    t: Real,
) -> Real {
    let phi = option_type.sign();
    if t <= 0.0 || sigma <= 0.0 {
        return (phi * (spot - strike)).max(0.0).max(european(option_type, spot, strike, r, q, sigma, t.max(0.0)).0);
    }
    let (value, _) = european(option_type, spot, strike, r, q, sigma, t);

    // Early exercise is never optimal for a call without dividends or a put
    // without interest.
    let never_early = match option_type {
        OptionType::Call => q <= 0.0,
        OptionType::Put => r <= 0.0,
    };
    if never_early {
        return value;
    }

    let sigma2 = sigma * sigma;
    let m = 2.0 * r / sigma2;
    let n = 2.0 * (r - q) / sigma2;
    let big_k = 1.0 - (-r * t).exp();
    if big_k.abs() < 1e-15 {
        return value;
    }
    let q_phi = 0.5 * (-(n - 1.0) + phi * ((n - 1.0) * (n - 1.0) + 4.0 * m / big_k).sqrt());
    if option_type == OptionType::Call && q_phi <= 1.0 {
        return value;
    }

    let s_star = critical_price(option_type, strike, r, q, sigma, t, q_phi);
    if phi * (spot - s_star) >= 0.0 {
        phi * (spot - strike)
    } else {
        let a = phi * (s_star / q_phi) * (1.0 - (-q * t).exp() * normal_cdf(phi * d1(s_star, strike, r, q, sigma, t)));
        value + a * (spot / s_star).powf(q_phi)
    }
}

/// Newton iteration for the critical price `S*` solving
/// `φ(S − K) = V(S) + φ(S/q)(1 − e^{−qT}N(φd₁(S)))`.
fn critical_price(option_type: OptionType, strike: Real, r: Real, q: Real, sigma: Real, t: Real, q_phi: Real) -> Real {
    let phi = option_type.sign();
    let sst = sigma * t.sqrt();
    let eq = (-q * t).exp();

    // Seed from the perpetual critical price.
    let n = 2.0 * (r - q) / (sigma * sigma);
    let m = 2.0 * r / (sigma * sigma);
    let q_inf = 0.5 * (-(n - 1.0) + phi * ((n - 1.0) * (n - 1.0) + 4.0 * m).sqrt());
    let s_inf = strike / (1.0 - 1.0 / q_inf);
    let mut si = match option_type {
        OptionType::Call => {
            let h = -((r - q) * t + 2.0 * sst) * strike / (s_inf - strike);
            strike + (s_inf - strike) * (1.0 - h.exp())
        }
        OptionType::Put => {
            let h = ((r - q) * t - 2.0 * sst) * strike / (strike - s_inf);
            s_inf + (strike - s_inf) * h.exp()
        }
    };

    for _ in 0..200 {
        let (value, delta) = european(option_type, si, strike, r, q, sigma, t);
        let d = d1(si, strike, r, q, sigma, t);
        let tail = 1.0 - eq * normal_cdf(phi * d);
        let g = phi * (si - strike) - value - phi * (si / q_phi) * tail;
        if g.abs() < 1e-8 * strike {
            break;
        }
        let dg = phi - delta - phi * tail / q_phi + eq * normal_pdf(d) / (q_phi * sst);
        if dg.abs() < 1e-15 {
            break;
        }
        si -= g / dg;
        si = match option_type {
            OptionType::Call => si.max(strike * 1.0001),
            OptionType::Put => si.clamp(strike * 1e-6, strike * 0.9999),
        };
    }
    si
}

impl PricingEngine<VanillaOptionArguments> for BaroneAdesiWhaleyEngine {
    fn calculate(&self, args: &VanillaOptionArguments) -> Result<OptionResults> {
        ensure!(
            args.exercise.is_american(),
            "Barone-Adesi-Whaley engine needs an American exercise, got {}",
            args.exercise
        );
        let strike = args.payoff.strike();
        let t = self.process.time_from_valuation(args.exercise.last_date());
        ensure!(t >= 0.0, "option expired {} years ago", -t);
        let p = &self.process;
        let price = barone_adesi_whaley(
            args.payoff.option_type(),
            p.spot(),
            strike,
            p.risk_free_rate(t),
            p.dividend_yield(t),
            p.black_volatility(t, strike),
            t,
        );
        Ok(OptionResults::new(price, 0.0, 0.0, 0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn american_call_geq_european() {
        let american = barone_adesi_whaley(OptionType::Call, 100.0, 100.0, 0.05, 0.02, 0.25, 1.0);
        let (european, _) = european(OptionType::Call, 100.0, 100.0, 0.05, 0.02, 0.25, 1.0);
        assert!(american >= european - 1e-10, "american={american}, european={european}");
    }

    #[test]
    fn american_put_premium() {
        let american = barone_adesi_whaley(OptionType::Put, 100.0, 100.0, 0.05, 0.0, 0.25, 1.0);
        let (european, _) = european(OptionType::Put, 100.0, 100.0, 0.05, 0.0, 0.25, 1.0);
        assert!(american > european, "american={american}, european={european}");
        assert!(american - european < 1.0, "american={american}, european={european}");
    }

    #[test]
    fn deep_itm_put_is_exercised() {
        let price = barone_adesi_whaley(OptionType::Put, 50.0, 100.0, 0.10, 0.0, 0.25, 1.0);
        assert!((price - 50.0).abs() < 1e-10, "price={price}");
    }

    #[test]
    fn call_without_dividends_is_european() {
        let american = barone_adesi_whaley(OptionType::Call, 100.0, 100.0, 0.05, 0.0, 0.20, 1.0);
        let (european, _) = european(OptionType::Call, 100.0, 100.0, 0.05, 0.0, 0.20, 1.0);
        assert_eq!(american, european);
    }

    #[test]
    fn put_on_a_future_carries_a_small_premium() {
        // b = r − q = 0: the European put is the Black put on the forward.
        let price = barone_adesi_whaley(OptionType::Put, 100.0, 100.0, 0.08, 0.08, 0.20, 0.25);
        let (european, _) = european(OptionType::Put, 100.0, 100.0, 0.08, 0.08, 0.20, 0.25);
        assert!(price >= european && price - european < 0.1, "price={price}, european={european}");
    }
}
