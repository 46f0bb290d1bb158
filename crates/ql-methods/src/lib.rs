//! # ql-methods
//!
//! Numerical methods for option pricing: the finite-difference grids,
//! operators, boundary conditions, time-stepping schemes and step
//! conditions the FD engines are assembled from.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Finite difference methods: grids, operators, rollback models.
pub mod finite_differences;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use finite_differences::{
    neumann_pair, safe_grid_points, BoundaryCondition, BoundaryConditionPair, BoundarySide,
    BsmOperator, FdmScheme, FiniteDifferenceModel, GridLimits, MixedScheme, StepCondition,
    TransformedGrid, TridiagonalOperator,
};
