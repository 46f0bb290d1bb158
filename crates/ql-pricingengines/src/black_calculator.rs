//! Black formula for striked payoffs.
//!
//! Values a payoff on the forward `F` with total standard deviation
//! `σ√T` and discount `D` as `D·(F·α(d₁) + X·β(d₂))`, where `(α, β, X)`
//! depend on the payoff family. Greeks with respect to the spot follow from
//! `F = S·Dq/Dr`, i.e. `∂F/∂S = F/S`.

use ql_core::{DiscountFactor, Real};
use ql_instruments::{PayoffType, StrikedPayoff};
use ql_math::{normal_cdf, normal_pdf};

/// Closed-form Black value and spot greeks of a striked payoff.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlackCalculator {
    forward: Real,
    std_dev: Real,
    discount: DiscountFactor,
    d1: Real,
    d2: Real,
    // F·α + X·β and its derivatives in d₁ / d₂
    alpha: Real,
    d_alpha: Real,
    dd_alpha: Real,
    x: Real,
    beta: Real,
    d_beta: Real,
    dd_beta: Real,
}

impl BlackCalculator {
    /// Calculator for `payoff` on `forward` with standard deviation
    /// `std_dev` and discount factor `discount`.
    pub fn new(payoff: &dyn StrikedPayoff, forward: Real, std_dev: Real, discount: DiscountFactor) -> Self {
        let strike = payoff.strike();
        let phi = payoff.option_type().sign();

        let (d1, d2, n_d1, n_d2) = if std_dev > 0.0 {
            let d1 = (forward / strike).ln() / std_dev + 0.5 * std_dev;
            let d2 = d1 - std_dev;
            (d1, d2, normal_pdf(d1), normal_pdf(d2))
        } else {
            // Degenerate distribution: the forward is certain.
            let d = if forward > strike {
                Real::INFINITY
            } else {
                Real::NEG_INFINITY
            };
            (d, d, 0.0, 0.0)
        };
        let cum = |d: Real| normal_cdf(phi * d);

        let (alpha, d_alpha, dd_alpha, x, beta, d_beta, dd_beta) = match payoff.payoff_type() {
            PayoffType::PlainVanilla => (
                phi * cum(d1),
                n_d1,
                -d1 * n_d1,
                strike,
                -phi * cum(d2),
                -n_d2,
                d2 * n_d2,
            ),
            PayoffType::CashOrNothing(cash) => {
                (0.0, 0.0, 0.0, cash, cum(d2), phi * n_d2, -phi * d2 * n_d2)
            }
            PayoffType::AssetOrNothing => {
                (cum(d1), phi * n_d1, -phi * d1 * n_d1, 0.0, 0.0, 0.0, 0.0)
            }
        };

        Self {
            forward,
            std_dev,
            discount,
            d1,
            d2,
            alpha,
            d_alpha: finite_or_zero(d_alpha),
            dd_alpha: finite_or_zero(dd_alpha),
            x,
            beta,
            d_beta: finite_or_zero(d_beta),
            dd_beta: finite_or_zero(dd_beta),
        }
    }

    /// Present value.
    pub fn value(&self) -> Real {
        self.discount * (self.forward * self.alpha + self.x * self.beta)
    }

    /// `∂V/∂F`.
    pub fn delta_forward(&self) -> Real {
        if self.std_dev <= 0.0 {
            return self.discount * self.alpha;
        }
        let f = self.forward;
        self.discount * (self.alpha + (self.d_alpha + self.x * self.d_beta / f) / self.std_dev)
    }

    /// `∂V/∂S` for the given spot.
    pub fn delta(&self, spot: Real) -> Real {
        self.delta_forward() * self.forward / spot
    }

    /// `∂²V/∂S²` for the given spot.
    pub fn gamma(&self, spot: Real) -> Real {
        if self.std_dev <= 0.0 {
            return 0.0;
        }
        let (f, sd, x) = (self.forward, self.std_dev, self.x);
        let gamma_forward = self.discount
            * (self.d_alpha / (f * sd)
                + (self.dd_alpha / (f * sd) + x * self.dd_beta / (f * f * sd) - x * self.d_beta / (f * f))
                    / sd);
        gamma_forward * (f / spot) * (f / spot)
    }

    /// `d₁`.
    pub fn d1(&self) -> Real {
        self.d1
    }

    /// `d₂`.
    pub fn d2(&self) -> Real {
        self.d2
    }
}

fn finite_or_zero(x: Real) -> Real {
    if x.is_finite() {
        x
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;
    use ql_instruments::{AssetOrNothingPayoff, CashOrNothingPayoff, OptionType, PlainVanillaPayoff};

    const S: Real = 100.0;
    const R: Real = 0.05;
    const Q: Real = 0.02;
    const VOL: Real = 0.25;
    const T: Real = 0.75;

    fn calc(payoff: &dyn StrikedPayoff, spot: Real) -> BlackCalculator {
        let (dr, dq) = ((-R * T).exp(), (-Q * T).exp());
        BlackCalculator::new(payoff, spot * dq / dr, VOL * T.sqrt(), dr)
    }

    #[test]
    fn atm_call_value() {
        // S=100, K=100, r=5%, q=0, σ=20%, T=1 ≈ 10.4506
        let payoff = PlainVanillaPayoff::new(OptionType::Call, 100.0);
        let dr = (-0.05f64).exp();
        let c = BlackCalculator::new(&payoff, 100.0 / dr, 0.2, dr);
        assert_abs_diff_eq!(c.value(), 10.4506, epsilon = 1e-4);
        assert!(c.delta(100.0) > 0.5 && c.delta(100.0) < 0.8);
    }

    #[test]
    fn put_call_parity() {
        let call = calc(&PlainVanillaPayoff::new(OptionType::Call, 105.0), S);
        let put = calc(&PlainVanillaPayoff::new(OptionType::Put, 105.0), S);
        let parity = S * (-Q * T).exp() - 105.0 * (-R * T).exp();
        assert_abs_diff_eq!(call.value() - put.value(), parity, epsilon = 1e-10);
        assert_abs_diff_eq!(call.delta(S) - put.delta(S), (-Q * T).exp(), epsilon = 1e-10);
        assert_abs_diff_eq!(call.gamma(S), put.gamma(S), epsilon = 1e-12);
    }

    #[test]
    fn binaries_decompose_the_vanilla() {
        // call = asset-or-nothing − K · cash-or-nothing(1)
        let k = 95.0;
        let vanilla = calc(&PlainVanillaPayoff::new(OptionType::Call, k), S);
        let asset = calc(&AssetOrNothingPayoff::new(OptionType::Call, k), S);
        let cash = calc(&CashOrNothingPayoff::new(OptionType::Call, k, 1.0), S);
        assert_abs_diff_eq!(vanilla.value(), asset.value() - k * cash.value(), epsilon = 1e-10);
        assert_abs_diff_eq!(vanilla.delta(S), asset.delta(S) - k * cash.delta(S), epsilon = 1e-10);
        assert_abs_diff_eq!(vanilla.gamma(S), asset.gamma(S) - k * cash.gamma(S), epsilon = 1e-10);
    }

    #[test]
    fn greeks_match_finite_differences() {
        let payoffs: Vec<Box<dyn StrikedPayoff>> = vec![
            Box::new(PlainVanillaPayoff::new(OptionType::Put, 110.0)),
            Box::new(CashOrNothingPayoff::new(OptionType::Call, 90.0, 10.0)),
            Box::new(AssetOrNothingPayoff::new(OptionType::Put, 100.0)),
        ];
        let h = 1e-3;
        for p in &payoffs {
            let (down, mid, up) = (calc(p.as_ref(), S - h), calc(p.as_ref(), S), calc(p.as_ref(), S + h));
            let delta = (up.value() - down.value()) / (2.0 * h);
            let gamma = (up.value() - 2.0 * mid.value() + down.value()) / (h * h);
            assert_abs_diff_eq!(mid.delta(S), delta, epsilon = 1e-6);
            assert_abs_diff_eq!(mid.gamma(S), gamma, epsilon = 1e-4);
        }
    }

    #[test]
    fn zero_volatility_is_discounted_intrinsic() {
        let payoff = PlainVanillaPayoff::new(OptionType::Call, 95.0);
        let dr = (-0.05f64).exp();
        let c = BlackCalculator::new(&payoff, 100.0 / dr, 0.0, dr);
        assert_abs_diff_eq!(c.value(), 100.0 - 95.0 * dr, epsilon = 1e-12);
        assert_abs_diff_eq!(c.delta(100.0), 1.0, epsilon = 1e-12);
        assert_eq!(c.gamma(100.0), 0.0);
    }

    proptest! {
        #[test]
        fn parity_holds_for_any_market(
            forward in 20.0f64..300.0,
            strike in 20.0f64..300.0,
            std_dev in 0.0f64..1.5,
            discount in 0.3f64..1.0,
        ) {
            let call = BlackCalculator::new(&PlainVanillaPayoff::new(OptionType::Call, strike), forward, std_dev, discount);
            let put = BlackCalculator::new(&PlainVanillaPayoff::new(OptionType::Put, strike), forward, std_dev, discount);
            let parity = discount * (forward - strike);
            prop_assert!((call.value() - put.value() - parity).abs() < 1e-9 * forward.max(strike));
            prop_assert!(call.value() >= -1e-12 && put.value() >= -1e-12);
        }
    }
}
