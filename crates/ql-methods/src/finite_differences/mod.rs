//! Finite-difference machinery for the Black-Scholes PDE.
//!
//! # Overview
//!
//! * [`grid`]: grid limits around a centre, strike safety zone, point floor
//! * [`TridiagonalOperator`]: banded operator with a Thomas-algorithm solver
//! * [`BsmOperator`]: the PDE discretized on a log-transformed grid
//! * [`BoundaryCondition`]: Neumann / Dirichlet edge constraints
//! * [`MixedScheme`]: theta-scheme evolver (explicit, implicit, Crank-Nicolson)
//! * [`FiniteDifferenceModel`]: rollback of one or more lattices in lock-step
//! * [`StepCondition`]: per-step early-exercise constraints

pub mod boundary_condition;
pub mod bsm_operator;
pub mod fd_model;
pub mod grid;
pub mod mixed_scheme;
pub mod step_condition;
pub mod tridiagonal_operator;

pub use boundary_condition::{neumann_pair, BoundaryCondition, BoundaryConditionPair, BoundarySide};
pub use bsm_operator::{BsmOperator, TransformedGrid};
pub use fd_model::FiniteDifferenceModel;
pub use grid::{safe_grid_points, GridLimits, SAFETY_ZONE_FACTOR};
pub use mixed_scheme::MixedScheme;
pub use step_condition::StepCondition;
pub use tridiagonal_operator::TridiagonalOperator;

use ql_core::Real;

// ─── FDM scheme selection ─────────────────────────────────────────────────────

/// Finite difference time-stepping scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FdmScheme {
    /// Explicit: conditionally stable, first order in time.
    Explicit,
    /// Fully implicit: unconditionally stable, first order in time.
    Implicit,
    /// Crank-Nicolson: half explicit, half implicit; second order in time.
    #[default]
    CrankNicolson,
}

impl FdmScheme {
    /// Weight of the implicit part.
    pub fn theta(self) -> Real {
        match self {
            FdmScheme::Explicit => 0.0,
            FdmScheme::Implicit => 1.0,
            FdmScheme::CrankNicolson => 0.5,
        }
    }
}
