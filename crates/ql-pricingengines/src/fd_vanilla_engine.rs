//! Shared set-up of the finite-difference vanilla engines.
//!
//! Every pricing call builds a fresh [`FdVanillaContext`]: grid limits, the
//! intrinsic-value curve, and factories for the spatial operator, boundary
//! conditions and rollback model. Engines themselves hold only the process
//! and their [`FdSettings`].

use crate::analytic_european_engine::black_scholes_theta;
use ql_core::{ensure, errors::Result, Real, Time};
use ql_instruments::{Exercise, OptionResults, StrikedPayoff};
use ql_math::SampledCurve;
use ql_methods::{
    neumann_pair, safe_grid_points, BoundaryConditionPair, BsmOperator, FdmScheme,
    FiniteDifferenceModel, GridLimits, TransformedGrid,
};
use ql_processes::BlackScholesProcess;
use std::sync::Arc;
use tracing::debug;

// ── Settings ─────────────────────────────────────────────────────────────────

/// Discretization settings of a finite-difference engine.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FdSettings {
    /// Time steps (per period, for the multi-period engines).
    pub time_steps: usize,
    /// Requested grid points; long maturities may raise it.
    pub grid_points: usize,
    /// Regenerate the operator from local coefficients at every step.
    pub time_dependent: bool,
    /// Time-stepping scheme.
    pub scheme: FdmScheme,
}

impl Default for FdSettings {
    fn default() -> Self {
        Self {
            time_steps: 100,
            grid_points: 100,
            time_dependent: false,
            scheme: FdmScheme::CrankNicolson,
        }
    }
}

impl FdSettings {
    /// Default settings with the given steps and points.
    pub fn new(time_steps: usize, grid_points: usize) -> Self {
        Self {
            time_steps,
            grid_points,
            ..Self::default()
        }
    }

    /// Set the number of time steps.
    pub fn with_time_steps(mut self, time_steps: usize) -> Self {
        self.time_steps = time_steps;
        self
    }

    /// Set the number of grid points.
    pub fn with_grid_points(mut self, grid_points: usize) -> Self {
        self.grid_points = grid_points;
        self
    }

    /// Switch time-dependent operators on or off.
    pub fn with_time_dependent(mut self, time_dependent: bool) -> Self {
        self.time_dependent = time_dependent;
        self
    }

    /// Set the time-stepping scheme.
    pub fn with_scheme(mut self, scheme: FdmScheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Check the settings.
    ///
    /// # Errors
    /// Fails on zero time steps or zero grid points.
    pub fn validate(&self) -> Result<()> {
        ensure!(self.time_steps > 0, "time steps must be positive");
        ensure!(self.grid_points > 0, "grid points must be positive");
        Ok(())
    }
}

// ── Per-call context ─────────────────────────────────────────────────────────

/// Working state of one finite-difference pricing call.
#[derive(Debug, Clone)]
pub struct FdVanillaContext {
    process: Arc<dyn BlackScholesProcess>,
    payoff: Arc<dyn StrikedPayoff>,
    settings: FdSettings,
    residual_time: Time,
    limits: GridLimits,
    intrinsic: SampledCurve,
}

impl FdVanillaContext {
    /// Context for `payoff` exercised per `exercise`, with grid limits
    /// centred on the spot (not yet widened around the strike) and no grid
    /// until [`initialize_initial_condition`](Self::initialize_initial_condition).
    ///
    /// # Errors
    /// Fails on invalid settings or an expired option.
    pub fn new(
        process: Arc<dyn BlackScholesProcess>,
        payoff: Arc<dyn StrikedPayoff>,
        exercise: &Exercise,
        settings: FdSettings,
    ) -> Result<Self> {
        settings.validate()?;
        let residual_time = process.time_from_valuation(exercise.last_date());
        ensure!(
            residual_time >= 0.0,
            "negative residual time {residual_time}: option expired before the valuation date"
        );
        let spot = process.spot();
        let limits = GridLimits::new(spot, process.black_variance(residual_time, spot))?;
        Ok(Self {
            process,
            payoff,
            settings,
            residual_time,
            limits,
            intrinsic: SampledCurve::new(0),
        })
    }

    /// The process.
    pub fn process(&self) -> &Arc<dyn BlackScholesProcess> {
        &self.process
    }

    /// The payoff.
    pub fn payoff(&self) -> &dyn StrikedPayoff {
        self.payoff.as_ref()
    }

    /// The settings.
    pub fn settings(&self) -> &FdSettings {
        &self.settings
    }

    /// Time from valuation to the last exercise date.
    pub fn residual_time(&self) -> Time {
        self.residual_time
    }

    /// Current grid limits.
    pub fn limits(&self) -> &GridLimits {
        &self.limits
    }

    /// Intrinsic values on the current grid.
    pub fn intrinsic(&self) -> &SampledCurve {
        &self.intrinsic
    }

    /// Number of grid points in use.
    pub fn grid_points(&self) -> usize {
        self.intrinsic.size()
    }

    /// Centre the grid limits on `center` for a horizon `t`.
    pub fn set_grid_limits(&mut self, center: Real, t: Time) -> Result<()> {
        let variance = self.process.black_variance(t, center);
        self.limits = GridLimits::new(center, variance)?;
        Ok(())
    }

    /// Widen the limits so the strike lies safely inside the grid.
    pub fn ensure_strike_in_grid(&mut self) -> Result<()> {
        self.limits.ensure_strike_in_grid(self.payoff.strike())
    }

    /// Limits centred on the spot over the residual time, widened around the
    /// strike.
    pub fn set_default_grid_limits(&mut self) -> Result<()> {
        let spot = self.process.spot();
        self.set_grid_limits(spot, self.residual_time)?;
        self.ensure_strike_in_grid()
    }

    /// Lay out the log grid between the limits and sample the payoff on it.
    pub fn initialize_initial_condition(&mut self) {
        let points = safe_grid_points(self.settings.grid_points, self.residual_time);
        self.intrinsic = SampledCurve::from_grid(self.limits.log_grid(points));
        self.resample_intrinsic();
        debug!(
            s_min = self.limits.s_min(),
            s_max = self.limits.s_max(),
            center = self.limits.center(),
            points,
            residual_time = self.residual_time,
            "finite-difference grid"
        );
    }

    /// Re-sample the payoff on the current grid.
    pub fn resample_intrinsic(&mut self) {
        let payoff = Arc::clone(&self.payoff);
        self.intrinsic.sample(|s| payoff.value(s));
    }

    /// Multiply the limits and the intrinsic grid by `factor`.
    pub fn scale_grid(&mut self, factor: Real) {
        self.limits.scale(factor);
        self.intrinsic.scale_grid(factor);
    }

    /// Add `delta` to the limits and the intrinsic grid.
    pub fn shift_grid(&mut self, delta: Real) {
        self.limits.shift(delta);
        self.intrinsic.shift_grid(delta);
    }

    /// The spatial operator on the current grid.
    pub fn operator(&self) -> Result<BsmOperator> {
        let grid = TransformedGrid::new(self.intrinsic.grid())?;
        Ok(if self.settings.time_dependent {
            BsmOperator::time_dependent(grid, Arc::clone(&self.process), self.residual_time)
        } else {
            BsmOperator::constant(grid, self.process.as_ref(), self.residual_time, self.limits.center())
        })
    }

    /// Neumann conditions matching the intrinsic edge slopes.
    pub fn boundary_conditions(&self) -> BoundaryConditionPair {
        neumann_pair(self.intrinsic.values())
    }

    /// A single-lattice model on the current grid.
    pub fn model(&self) -> Result<FiniteDifferenceModel> {
        Ok(FiniteDifferenceModel::new(
            self.operator()?,
            self.boundary_conditions(),
            self.settings.scheme,
        ))
    }

    /// Theta from the Black-Scholes identity.
    pub fn theta(&self, value: Real, delta: Real, gamma: Real) -> Real {
        black_scholes_theta(self.process.as_ref(), value, delta, gamma)
    }

    /// Value, delta, gamma and theta read off a rolled-back price curve.
    pub fn results_from(&self, prices: &SampledCurve) -> Result<OptionResults> {
        let value = prices.value_at_center();
        let delta = prices.first_derivative_at_center()?;
        let gamma = prices.second_derivative_at_center()?;
        Ok(OptionResults::new(value, delta, gamma, self.theta(value, delta, gamma)))
    }

    /// A price curve on the current grid holding `values`.
    pub fn curve_with(&self, values: ql_math::Array) -> Result<SampledCurve> {
        let mut curve = SampledCurve::from_grid(self.intrinsic.grid().clone());
        curve.set_values(values)?;
        Ok(curve)
    }
}
