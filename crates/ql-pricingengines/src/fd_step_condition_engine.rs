//! Finite-difference engines with a step condition and a control variate.
//!
//! Two lattices share one discretization and one sequence of sub-steps:
//! the constrained lattice carries the early-exercise condition, the free
//! lattice carries none. Their difference isolates the early-exercise
//! premium, which is added to the closed-form European value:
//!
//! `V = V_fd(constrained) − V_fd(free) + V_black`
//!
//! and likewise for delta and gamma.

use crate::analytic_european_engine::black_calculator;
use crate::fd_vanilla_engine::{FdSettings, FdVanillaContext};
use ql_core::{errors::Result, Error};
use ql_instruments::{OptionResults, PricingEngine, VanillaOptionArguments};
use ql_methods::{FiniteDifferenceModel, StepCondition};
use ql_processes::BlackScholesProcess;
use std::sync::Arc;

/// Key of the free-lattice value in [`OptionResults::additional_results`].
pub const CONTROL_VALUE: &str = "controlValue";
/// Key of the constrained-lattice value in
/// [`OptionResults::additional_results`].
pub const CONSTRAINED_VALUE: &str = "constrainedValue";

/// Which early-exercise condition the constrained lattice enforces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExerciseCondition {
    /// Immediate exercise for the intrinsic value.
    American,
    /// Lock in the intrinsic value, paid at expiry.
    Shout,
}

impl ExerciseCondition {
    fn arm(self, ctx: &FdVanillaContext) -> StepCondition {
        let intrinsic = ctx.intrinsic().values().clone();
        match self {
            Self::American => StepCondition::american(intrinsic),
            Self::Shout => {
                let t = ctx.residual_time();
                StepCondition::shout(intrinsic, t, ctx.process().risk_free_rate(t))
            }
        }
    }
}

/// Control-variate finite-difference engine for a step condition.
#[derive(Debug, Clone)]
pub struct FdStepConditionEngine {
    process: Arc<dyn BlackScholesProcess>,
    settings: FdSettings,
    condition: ExerciseCondition,
}

impl FdStepConditionEngine {
    /// Engine enforcing `condition`.
    pub fn new(process: Arc<dyn BlackScholesProcess>, settings: FdSettings, condition: ExerciseCondition) -> Self {
        Self {
            process,
            settings,
            condition,
        }
    }

    /// The enforced condition.
    pub fn condition(&self) -> ExerciseCondition {
        self.condition
    }
}

impl PricingEngine<VanillaOptionArguments> for FdStepConditionEngine {
    fn calculate(&self, args: &VanillaOptionArguments) -> Result<OptionResults> {
        if !args.exercise.is_american() {
            return Err(Error::Configuration(format!(
                "{:?} condition needs an American exercise, got {}",
                self.condition, args.exercise
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

        let operator = ctx.operator()?;
        let bcs = ctx.boundary_conditions();
        let mut model = FiniteDifferenceModel::parallel(
            vec![(operator.clone(), bcs), (operator, bcs)],
            self.settings.scheme,
        )?;
        let conditions = [self.condition.arm(&ctx), StepCondition::Null];
        let initial = ctx.intrinsic().values().clone();
        let mut arrays = [initial.clone(), initial];
        model.rollback(
            &mut arrays,
            ctx.residual_time(),
            0.0,
            self.settings.time_steps,
            &conditions,
        )?;

        let [constrained, free] = arrays;
        let constrained = ctx.results_from(&ctx.curve_with(constrained)?)?;
        let free = ctx.results_from(&ctx.curve_with(free)?)?;

        let spot = self.process.spot();
        let black = black_calculator(self.process.as_ref(), ctx.payoff(), ctx.residual_time());
        let value = constrained.value - free.value + black.value();
        let delta = constrained.delta - free.delta + black.delta(spot);
        let gamma = constrained.gamma - free.gamma + black.gamma(spot);

        Ok(OptionResults::new(value, delta, gamma, ctx.theta(value, delta, gamma))
            .with_result(CONTROL_VALUE, free.value)
            .with_result(CONSTRAINED_VALUE, constrained.value))
    }
}

/// American options priced with the control-variate FD engine.
#[derive(Debug, Clone)]
pub struct FdAmericanEngine(FdStepConditionEngine);

impl FdAmericanEngine {
    /// Engine with the given settings.
    pub fn new(process: Arc<dyn BlackScholesProcess>, settings: FdSettings) -> Self {
        Self(FdStepConditionEngine::new(process, settings, ExerciseCondition::American))
    }
}

impl PricingEngine<VanillaOptionArguments> for FdAmericanEngine {
    fn calculate(&self, args: &VanillaOptionArguments) -> Result<OptionResults> {
        self.0.calculate(args)
    }
}

/// Shout options priced with the control-variate FD engine.
#[derive(Debug, Clone)]
pub struct FdShoutEngine(FdStepConditionEngine);

impl FdShoutEngine {
    /// Engine with the given settings.
    pub fn new(process: Arc<dyn BlackScholesProcess>, settings: FdSettings) -> Self {
        Self(FdStepConditionEngine::new(process, settings, ExerciseCondition::Shout))
    }
}

impl PricingEngine<VanillaOptionArguments> for FdShoutEngine {
    fn calculate(&self, args: &VanillaOptionArguments) -> Result<OptionResults> {
        self.0.calculate(args)
    }
}
