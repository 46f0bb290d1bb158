//! Finite-difference rollback interrupted by discrete events.
//!
//! Events (Bermudan exercise dates, cash dividends) split the life of the
//! option into periods. The lattice is rolled back period by period; at each
//! event time the scheduler hands the whole [`MultiPeriodLattice`] to the
//! event callback, which may floor the prices, move the grid or rebuild the
//! model before rollback resumes.

use crate::fd_vanilla_engine::{FdSettings, FdVanillaContext};
use ql_core::{ensure, errors::Result, Time};
use ql_instruments::{Exercise, OptionResults, StrikedPayoff};
use ql_math::{close, SampledCurve};
use ql_methods::{FiniteDifferenceModel, StepCondition};
use ql_processes::BlackScholesProcess;
use std::sync::Arc;
use tracing::debug;

/// Relative tolerance, as a fraction of the residual time, for events at the
/// valuation date or at expiry.
const EVENT_TIME_TOLERANCE: Time = 1e-6;

/// Everything an event callback may touch.
#[derive(Debug, Clone)]
pub struct MultiPeriodLattice {
    /// Grid limits, intrinsic values and factories.
    pub context: FdVanillaContext,
    /// Current option values on the grid.
    pub prices: SampledCurve,
    /// The rollback model built for the current grid.
    pub model: FiniteDifferenceModel,
    /// Condition applied after every sub-step.
    pub condition: StepCondition,
}

impl MultiPeriodLattice {
    /// Roll the prices back from `from` to `to` in `steps` sub-steps.
    pub fn rollback(&mut self, from: Time, to: Time, steps: usize) -> Result<()> {
        self.model
            .rollback_single(self.prices.values_mut(), from, to, steps, &self.condition)
    }

    /// Rebuild operator, boundary conditions and model from the context's
    /// current grid, re-arm the step condition on its intrinsic values and
    /// enforce it at `t`.
    pub fn reinitialize(&mut self, t: Time) -> Result<()> {
        self.model = self.context.model()?;
        self.condition = self
            .condition
            .rearmed(self.context.intrinsic().values().clone());
        self.condition.apply_to(self.prices.values_mut(), t)
    }
}

/// The discrete events of a multi-period pricing problem.
pub trait MultiPeriodEvents {
    /// Event times in years from the valuation date, strictly increasing.
    fn times(&self) -> &[Time];

    /// Condition enforced between events.
    fn step_condition(&self, _ctx: &FdVanillaContext) -> StepCondition {
        StepCondition::Null
    }

    /// Place the grid before the intrinsic values are sampled.
    fn set_grid_limits(&self, ctx: &mut FdVanillaContext) -> Result<()> {
        ctx.set_default_grid_limits()
    }

    /// Handle event `index` at `times()[index]`.
    fn apply(&self, index: usize, lattice: &mut MultiPeriodLattice) -> Result<()>;
}

/// Drives a [`MultiPeriodLattice`] through a set of [`MultiPeriodEvents`].
#[derive(Debug, Clone)]
pub struct FdMultiPeriodEngine {
    process: Arc<dyn BlackScholesProcess>,
    settings: FdSettings,
}

impl FdMultiPeriodEngine {
    /// Scheduler with `settings.time_steps` steps per period.
    pub fn new(process: Arc<dyn BlackScholesProcess>, settings: FdSettings) -> Self {
        Self { process, settings }
    }

    /// The process.
    pub fn process(&self) -> &Arc<dyn BlackScholesProcess> {
        &self.process
    }

    /// The settings.
    pub fn settings(&self) -> &FdSettings {
        &self.settings
    }

    /// A fresh context for `payoff` exercised per `exercise`.
    pub fn context(&self, payoff: &Arc<dyn StrikedPayoff>, exercise: &Exercise) -> Result<FdVanillaContext> {
        FdVanillaContext::new(
            Arc::clone(&self.process),
            Arc::clone(payoff),
            exercise,
            self.settings,
        )
    }

    /// Price `payoff` with `events` interrupting the rollback.
    pub fn calculate(
        &self,
        payoff: &Arc<dyn StrikedPayoff>,
        exercise: &Exercise,
        events: &dyn MultiPeriodEvents,
    ) -> Result<OptionResults> {
        let lattice = self.rollback(events, self.context(payoff, exercise)?)?;
        lattice.context.results_from(&lattice.prices)
    }

    /// Roll the payoff back from expiry to the valuation date, stopping at
    /// every event.
    ///
    /// # Errors
    /// Fails if the event times are negative, not strictly increasing or
    /// beyond expiry, and propagates errors from the model and the events.
    pub fn rollback(&self, events: &dyn MultiPeriodEvents, mut context: FdVanillaContext) -> Result<MultiPeriodLattice> {
        let residual = context.residual_time();
        let times = events.times();
        let n = times.len();
        let tol = EVENT_TIME_TOLERANCE * residual;

        if let Some(&first) = times.first() {
            ensure!(first >= 0.0, "first event time {first} is negative");
        }
        for pair in times.windows(2) {
            ensure!(
                pair[0] < pair[1],
                "event times must be strictly increasing: {} is followed by {}",
                pair[0],
                pair[1]
            );
        }
        if let Some(&last) = times.last() {
            ensure!(
                last <= residual + tol,
                "event time {last} is beyond expiry {residual}"
            );
        }

        let last_is_expiry = times.last().is_some_and(|&t| close(t, residual, tol));
        // A lone event at both ends counts as the expiry event.
        let first_is_zero = times.first().is_some_and(|&t| close(t, 0.0, tol)) && !(n == 1 && last_is_expiry);
        let first_non_zero = if first_is_zero {
            times.get(1).copied().unwrap_or(residual)
        } else {
            times.first().copied().unwrap_or(residual)
        };

        let steps = self.settings.time_steps;
        let mut dt = residual / (steps * (n + 1)) as Time;
        if dt >= first_non_zero {
            dt = first_non_zero / 2.0;
        }

        events.set_grid_limits(&mut context)?;
        context.initialize_initial_condition();
        let model = context.model()?;
        let condition = events.step_condition(&context);
        let prices = context.intrinsic().clone();
        let mut lattice = MultiPeriodLattice {
            context,
            prices,
            model,
            condition,
        };

        if last_is_expiry {
            debug!(index = n - 1, time = residual, "event at expiry");
            events.apply(n - 1, &mut lattice)?;
        }

        let interior_end = if last_is_expiry { n - 1 } else { n };
        let mut begin = residual;
        for j in (usize::from(first_is_zero)..interior_end).rev() {
            let t = times[j];
            debug!(from = begin, to = t, steps, "period rollback");
            lattice.rollback(begin, t, steps)?;
            debug!(index = j, time = t, "event");
            events.apply(j, &mut lattice)?;
            begin = t;
        }

        debug!(from = begin, to = dt, steps, "period rollback");
        lattice.rollback(begin, dt, steps)?;
        lattice.rollback(dt, 0.0, 1)?;

        if first_is_zero {
            debug!(index = 0, time = times[0], "event at valuation date");
            events.apply(0, &mut lattice)?;
        }
        Ok(lattice)
    }
}
