//! Finite-difference engine for Bermudan options.

use crate::fd_multi_period_engine::{FdMultiPeriodEngine, MultiPeriodEvents, MultiPeriodLattice};
use crate::fd_vanilla_engine::FdSettings;
use ql_core::{errors::Result, Error, Time};
use ql_instruments::{OptionResults, PricingEngine, VanillaOptionArguments};
use ql_processes::BlackScholesProcess;
use std::sync::Arc;

/// Exercise is allowed only on the listed dates: at each one the prices are
/// floored at the intrinsic value.
#[derive(Debug, Clone)]
pub struct FdBermudanEngine {
    scheduler: FdMultiPeriodEngine,
}

impl FdBermudanEngine {
    /// Engine with `settings.time_steps` steps between exercise dates.
    pub fn new(process: Arc<dyn BlackScholesProcess>, settings: FdSettings) -> Self {
        Self {
            scheduler: FdMultiPeriodEngine::new(process, settings),
        }
    }
}

struct ExerciseDates(Vec<Time>);

impl MultiPeriodEvents for ExerciseDates {
    fn times(&self) -> &[Time] {
        &self.0
    }

    fn apply(&self, _index: usize, lattice: &mut MultiPeriodLattice) -> Result<()> {
        lattice
            .prices
            .values_mut()
            .floor_with(lattice.context.intrinsic().values());
        Ok(())
    }
}

impl PricingEngine<VanillaOptionArguments> for FdBermudanEngine {
    fn calculate(&self, args: &VanillaOptionArguments) -> Result<OptionResults> {
        if !(args.exercise.is_bermudan() || args.exercise.is_european()) {
            return Err(Error::Configuration(format!(
                "Bermudan engine cannot price {} exercise",
                args.exercise
            )));
        }
        let process = self.scheduler.process();
        let times = args
            .exercise
            .dates()
            .iter()
            .map(|&d| process.time_from_valuation(d))
            .collect();
        self.scheduler
            .calculate(&args.payoff, &args.exercise, &ExerciseDates(times))
    }
}
