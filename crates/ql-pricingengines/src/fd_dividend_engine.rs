//! Finite-difference engine for options on stocks paying discrete cash
//! dividends.
//!
//! The grid is laid out around the spot net of dividends. Rolling back
//! across a dividend date moves the grid so that values just before the
//! payment are read at the cum-dividend stock price:
//!
//! - [`DividendAdjustment::Scale`] (Merton 73) multiplies the grid by
//!   `1 + PV/center`, where `PV` is the dividend carried back to the
//!   valuation date at the stock's growth rate;
//! - [`DividendAdjustment::Shift`] adds the cash amount to the grid.

use crate::fd_multi_period_engine::{FdMultiPeriodEngine, MultiPeriodEvents, MultiPeriodLattice};
use crate::fd_vanilla_engine::{FdSettings, FdVanillaContext};
use ql_core::{ensure, errors::Result, Error, Real, Time};
use ql_instruments::{DividendVanillaOptionArguments, ExerciseType, OptionResults, PricingEngine};
use ql_methods::StepCondition;
use ql_processes::BlackScholesProcess;
use std::sync::Arc;

/// How the grid follows the stock across a dividend payment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DividendAdjustment {
    /// Proportional rescaling by the dividend's present value.
    #[default]
    Scale,
    /// Translation by the cash amount.
    Shift,
}

/// Finite-difference engine for European and American options with
/// discrete dividends.
#[derive(Debug, Clone)]
pub struct FdDividendEngine {
    scheduler: FdMultiPeriodEngine,
    adjustment: DividendAdjustment,
}

impl FdDividendEngine {
    /// Engine with the default (scaling) adjustment.
    pub fn new(process: Arc<dyn BlackScholesProcess>, settings: FdSettings) -> Self {
        Self {
            scheduler: FdMultiPeriodEngine::new(process, settings),
            adjustment: DividendAdjustment::default(),
        }
    }

    /// Set the grid adjustment.
    pub fn with_adjustment(mut self, adjustment: DividendAdjustment) -> Self {
        self.adjustment = adjustment;
        self
    }

    /// The grid adjustment.
    pub fn adjustment(&self) -> DividendAdjustment {
        self.adjustment
    }
}

struct DividendSchedule {
    times: Vec<Time>,
    amounts: Vec<Real>,
    present_values: Vec<Real>,
    center: Real,
    adjustment: DividendAdjustment,
    american: bool,
}

impl MultiPeriodEvents for DividendSchedule {
    fn times(&self) -> &[Time] {
        &self.times
    }

    fn step_condition(&self, ctx: &FdVanillaContext) -> StepCondition {
        if self.american {
            StepCondition::american(ctx.intrinsic().values().clone())
        } else {
            StepCondition::Null
        }
    }

    fn set_grid_limits(&self, ctx: &mut FdVanillaContext) -> Result<()> {
        ctx.set_grid_limits(self.center, ctx.residual_time())?;
        ctx.ensure_strike_in_grid()
    }

    fn apply(&self, index: usize, lattice: &mut MultiPeriodLattice) -> Result<()> {
        match self.adjustment {
            DividendAdjustment::Scale => {
                let factor = 1.0 + self.present_values[index] / lattice.context.limits().center();
                lattice.context.scale_grid(factor);
                lattice.prices.scale_grid(factor);
            }
            DividendAdjustment::Shift => {
                let amount = self.amounts[index];
                lattice.context.shift_grid(amount);
                lattice.prices.shift_grid(amount);
            }
        }
        lattice.context.resample_intrinsic();
        lattice.reinitialize(self.times[index])
    }
}

impl PricingEngine<DividendVanillaOptionArguments> for FdDividendEngine {
    fn calculate(&self, args: &DividendVanillaOptionArguments) -> Result<OptionResults> {
        let american = match args.exercise.exercise_type() {
            ExerciseType::European => false,
            ExerciseType::American => true,
            ExerciseType::Bermudan => {
                return Err(Error::Configuration(
                    "dividend engine cannot price Bermudan exercise".into(),
                ))
            }
        };
        let process = self.scheduler.process();
        let residual = process.time_from_valuation(args.exercise.last_date());

        let mut times = Vec::with_capacity(args.dividends.len());
        let mut amounts = Vec::with_capacity(args.dividends.len());
        let mut present_values = Vec::with_capacity(args.dividends.len());
        for dividend in &args.dividends {
            let t = process.time_from_valuation(dividend.date);
            if !(0.0..=residual).contains(&t) {
                continue;
            }
            times.push(t);
            amounts.push(dividend.amount);
            present_values.push(dividend.amount * process.risk_free_discount(t) / process.dividend_discount(t));
        }

        let paid: Real = match self.adjustment {
            DividendAdjustment::Scale => present_values.iter().sum(),
            DividendAdjustment::Shift => amounts.iter().sum(),
        };
        let center = process.spot() - paid;
        ensure!(
            center > 0.0,
            "dividends of {paid} exceed the spot {}",
            process.spot()
        );

        let schedule = DividendSchedule {
            times,
            amounts,
            present_values,
            center,
            adjustment: self.adjustment,
            american,
        };
        self.scheduler.calculate(&args.payoff, &args.exercise, &schedule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FdAmericanEngine, FdEuropeanEngine};
    use chrono::NaiveDate;
    use ql_instruments::{Dividend, Exercise, OptionType, PlainVanillaPayoff, VanillaOptionArguments};
    use ql_processes::FlatBlackScholesProcess;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn process() -> Arc<dyn BlackScholesProcess> {
        Arc::new(FlatBlackScholesProcess::new(date(2025, 1, 2), 100.0, 0.05, 0.0, 0.25).unwrap())
    }

    fn args(option_type: OptionType, exercise: Exercise, dividends: Vec<Dividend>) -> DividendVanillaOptionArguments {
        DividendVanillaOptionArguments::new(
            Arc::new(PlainVanillaPayoff::new(option_type, 100.0)),
            exercise,
            dividends,
        )
    }

    #[test]
    fn without_dividends_matches_the_european_engine() {
        let settings = FdSettings::new(100, 101);
        let expiry = Exercise::european(date(2026, 1, 2));
        let with = FdDividendEngine::new(process(), settings)
            .calculate(&args(OptionType::Call, expiry.clone(), Vec::new()))
            .unwrap();
        let plain = FdEuropeanEngine::new(process(), settings)
            .calculate(&VanillaOptionArguments {
                payoff: Arc::new(PlainVanillaPayoff::new(OptionType::Call, 100.0)),
                exercise: expiry,
            })
            .unwrap();
        assert!((with.value - plain.value).abs() < 5e-3, "{} vs {}", with.value, plain.value);
    }

    #[test]
    fn a_dividend_cheapens_calls_and_lifts_puts() {
        let settings = FdSettings::new(100, 201);
        let expiry = Exercise::european(date(2026, 1, 2));
        let dividend = vec![Dividend::new(date(2025, 7, 2), 3.0)];
        for adjustment in [DividendAdjustment::Scale, DividendAdjustment::Shift] {
            let engine = FdDividendEngine::new(process(), settings).with_adjustment(adjustment);
            let call = engine.calculate(&args(OptionType::Call, expiry.clone(), Vec::new())).unwrap();
            let call_div = engine
                .calculate(&args(OptionType::Call, expiry.clone(), dividend.clone()))
                .unwrap();
            let put = engine.calculate(&args(OptionType::Put, expiry.clone(), Vec::new())).unwrap();
            let put_div = engine
                .calculate(&args(OptionType::Put, expiry.clone(), dividend.clone()))
                .unwrap();
            assert!(call_div.value < call.value - 1.0, "{adjustment:?}: {} vs {}", call_div.value, call.value);
            assert!(put_div.value > put.value + 0.5, "{adjustment:?}: {} vs {}", put_div.value, put.value);
        }
    }

    #[test]
    fn american_call_without_dividends_is_european() {
        let settings = FdSettings::new(100, 201);
        let american = Exercise::american(date(2025, 1, 2), date(2026, 1, 2)).unwrap();
        let with_dividend_engine = FdDividendEngine::new(process(), settings)
            .calculate(&args(OptionType::Call, american.clone(), Vec::new()))
            .unwrap();
        let european = FdDividendEngine::new(process(), settings)
            .calculate(&args(OptionType::Call, Exercise::european(date(2026, 1, 2)), Vec::new()))
            .unwrap();
        assert!(
            (with_dividend_engine.value - european.value).abs() < 1e-2,
            "{} vs {}",
            with_dividend_engine.value,
            european.value
        );
        let control_variate = FdAmericanEngine::new(process(), settings)
            .calculate(&VanillaOptionArguments {
                payoff: Arc::new(PlainVanillaPayoff::new(OptionType::Call, 100.0)),
                exercise: american,
            })
            .unwrap();
        assert!((with_dividend_engine.value - control_variate.value).abs() < 2e-2);
    }

    #[test]
    fn rejects_bermudan_exercise_and_oversized_dividends() {
        let engine = FdDividendEngine::new(process(), FdSettings::default());
        let bermudan = Exercise::bermudan(vec![date(2025, 6, 2), date(2026, 1, 2)]).unwrap();
        let err = engine.calculate(&args(OptionType::Put, bermudan, Vec::new())).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)), "{err}");

        let huge = vec![Dividend::new(date(2025, 7, 2), 150.0)];
        let err = engine
            .calculate(&args(OptionType::Put, Exercise::european(date(2026, 1, 2)), huge))
            .unwrap_err();
        assert!(matches!(err, Error::Precondition(_)), "{err}");
    }

    #[test]
    fn dividends_after_expiry_are_ignored() {
        let engine = FdDividendEngine::new(process(), FdSettings::new(50, 101));
        let expiry = Exercise::european(date(2026, 1, 2));
        let none = engine.calculate(&args(OptionType::Put, expiry.clone(), Vec::new())).unwrap();
        let late = engine
            .calculate(&args(OptionType::Put, expiry, vec![Dividend::new(date(2027, 1, 2), 5.0)]))
            .unwrap();
        assert_eq!(none.value, late.value);
    }
}
