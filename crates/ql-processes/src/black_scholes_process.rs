//! Generalized Black-Scholes process.
//!
//! `dS/S = (r(t) − q(t)) dt + σ(t, S) dW`
//!
//! The trait exposes the market the way a pricing engine consumes it: the
//! variance accumulated to a horizon, and discount factors for the riskless
//! and dividend curves. Rates and volatilities are derived quantities.

use chrono::NaiveDate;
use ql_core::{ensure, errors::Result, DiscountFactor, Rate, Real, Time, Volatility};
use std::fmt;

/// Bump used for numerical rates and variances near `t = 0`.
const DT: Time = 1.0e-4;

/// A generalized Black-Scholes-Merton process.
///
/// Implementors must be shareable across threads; engines only ever read
/// from them.
pub trait BlackScholesProcess: fmt::Debug + Send + Sync {
    /// Spot value of the underlying.
    fn spot(&self) -> Real;

    /// Black variance `σ²(t, K)·t` to time `t` at `strike`.
    fn black_variance(&self, t: Time, strike: Real) -> Real;

    /// Riskless discount factor to time `t`.
    fn risk_free_discount(&self, t: Time) -> DiscountFactor;

    /// Dividend discount factor to time `t`.
    fn dividend_discount(&self, t: Time) -> DiscountFactor;

    /// Year fraction from the valuation date to `date`.
    fn time_from_valuation(&self, date: NaiveDate) -> Time;

    /// Black volatility to time `t` at `strike`.
    fn black_volatility(&self, t: Time, strike: Real) -> Volatility {
        let t = t.max(DT);
        (self.black_variance(t, strike) / t).sqrt()
    }

    /// Continuously-compounded riskless zero rate to `t`.
    fn risk_free_rate(&self, t: Time) -> Rate {
        zero_rate(|s| self.risk_free_discount(s), t)
    }

    /// Continuously-compounded dividend zero yield to `t`.
    fn dividend_yield(&self, t: Time) -> Rate {
        zero_rate(|s| self.dividend_discount(s), t)
    }

    /// Instantaneous riskless forward rate at `t`.
    fn forward_rate(&self, t: Time) -> Rate {
        forward_rate(|s| self.risk_free_discount(s), t)
    }

    /// Instantaneous forward dividend yield at `t`.
    fn forward_dividend_yield(&self, t: Time) -> Rate {
        forward_rate(|s| self.dividend_discount(s), t)
    }

    /// Local volatility at `(t, S)`.
    ///
    /// The default takes the forward variance of the Black surface at
    /// strike `S`, which is exact for surfaces without smile.
    fn local_volatility(&self, t: Time, underlying: Real) -> Volatility {
        let t1 = (t - 0.5 * DT).max(0.0);
        let t2 = t1 + DT;
        let forward_variance =
            (self.black_variance(t2, underlying) - self.black_variance(t1, underlying)) / DT;
        forward_variance.max(0.0).sqrt()
    }
}

fn zero_rate(discount: impl Fn(Time) -> DiscountFactor, t: Time) -> Rate {
    let t = t.max(DT);
    -discount(t).ln() / t
}

fn forward_rate(discount: impl Fn(Time) -> DiscountFactor, t: Time) -> Rate {
    let t1 = (t - 0.5 * DT).max(0.0);
    let t2 = t1 + DT;
    (discount(t1).ln() - discount(t2).ln()) / DT
}

// ── Flat market ──────────────────────────────────────────────────────────────

/// A Black-Scholes-Merton process with flat rate, dividend yield and
/// volatility. Times are Actual/365 (Fixed) from the valuation date.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatBlackScholesProcess {
    valuation_date: NaiveDate,
    spot: Real,
    rate: Rate,
    dividend_yield: Rate,
    volatility: Volatility,
}

impl FlatBlackScholesProcess {
    /// Create a flat process.
    ///
    /// # Errors
    /// Fails if `spot` is not strictly positive or `volatility` is negative.
    pub fn new(
        valuation_date: NaiveDate,
        spot: Real,
        rate: Rate,
        dividend_yield: Rate,
        volatility: Volatility,
    ) -> Result<Self> {
        ensure!(
            spot > 0.0 && spot.is_finite(),
            "spot must be positive, got {spot}"
        );
        ensure!(
            volatility >= 0.0,
            "volatility must be non-negative, got {volatility}"
        );
        Ok(Self {
            valuation_date,
            spot,
            rate,
            dividend_yield,
            volatility,
        })
    }

    /// The valuation date.
    pub fn valuation_date(&self) -> NaiveDate {
        self.valuation_date
    }

    /// The same market with a different spot.
    pub fn with_spot(&self, spot: Real) -> Result<Self> {
        Self::new(
            self.valuation_date,
            spot,
            self.rate,
            self.dividend_yield,
            self.volatility,
        )
    }
}

impl BlackScholesProcess for FlatBlackScholesProcess {
    fn spot(&self) -> Real {
        self.spot
    }

    fn black_variance(&self, t: Time, _strike: Real) -> Real {
        self.volatility * self.volatility * t
    }

    fn risk_free_discount(&self, t: Time) -> DiscountFactor {
        (-self.rate * t).exp()
    }

    fn dividend_discount(&self, t: Time) -> DiscountFactor {
        (-self.dividend_yield * t).exp()
    }

    fn time_from_valuation(&self, date: NaiveDate) -> Time {
        (date - self.valuation_date).num_days() as Time / 365.0
    }

    fn black_volatility(&self, _t: Time, _strike: Real) -> Volatility {
        self.volatility
    }

    fn risk_free_rate(&self, _t: Time) -> Rate {
        self.rate
    }

    fn dividend_yield(&self, _t: Time) -> Rate {
        self.dividend_yield
    }

    fn forward_rate(&self, _t: Time) -> Rate {
        self.rate
    }

    fn forward_dividend_yield(&self, _t: Time) -> Rate {
        self.dividend_yield
    }

    fn local_volatility(&self, _t: Time, _underlying: Real) -> Volatility {
        self.volatility
    }
}
