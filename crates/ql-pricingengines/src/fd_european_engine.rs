//! Finite-difference engine for European options.

use crate::fd_vanilla_engine::{FdSettings, FdVanillaContext};
use ql_core::{errors::Result, Error};
use ql_instruments::{OptionResults, PricingEngine, VanillaOptionArguments};
use ql_methods::StepCondition;
use ql_processes::BlackScholesProcess;
use std::sync::Arc;

/// Rolls the payoff back from expiry to today with no step condition.
#[derive(Debug, Clone)]
pub struct FdEuropeanEngine {
    process: Arc<dyn BlackScholesProcess>,
    settings: FdSettings,
}

impl FdEuropeanEngine {
    /// Engine with the given settings.
    pub fn new(process: Arc<dyn BlackScholesProcess>, settings: FdSettings) -> Self {
        Self { process, settings }
    }
}

impl PricingEngine<VanillaOptionArguments> for FdEuropeanEngine {
    fn calculate(&self, args: &VanillaOptionArguments) -> Result<OptionResults> {
        if !args.exercise.is_european() {
            return Err(Error::Configuration(format!(
                "finite-difference European engine cannot price {} exercise",
                args.exercise
            )));
        }
        let mut ctx = FdVanillaContext::new(
            Arc::clone(&self.process),
            Arc::clone(&args.payoff),
            &args.exercise,
            self.settings,
        )?;
        ctx.set_default_grid_limits()?;
        ctx.initialize_initial_condition();

        let mut model = ctx.model()?;
        let mut prices = ctx.intrinsic().values().clone();
        model.rollback_single(
            &mut prices,
            ctx.residual_time(),
            0.0,
            self.settings.time_steps,
            &StepCondition::Null,
        )?;
        ctx.results_from(&ctx.curve_with(prices)?)
    }
}
