//! Rollback of one or more lattices through time.
//!
//! All lattices in a model advance over the identical sequence of sub-step
//! times; each keeps its own operator and boundary conditions and gets its
//! own step condition, applied right after its operator update.

use super::boundary_condition::BoundaryConditionPair;
use super::bsm_operator::BsmOperator;
use super::mixed_scheme::MixedScheme;
use super::step_condition::StepCondition;
use super::FdmScheme;
use ql_core::{ensure, errors::Result, Time};
use ql_math::{close_enough, Array};
use tracing::trace;

/// A finite-difference model over `K ≥ 1` lattices.
#[derive(Debug, Clone)]
pub struct FiniteDifferenceModel {
    evolvers: Vec<MixedScheme>,
}

impl FiniteDifferenceModel {
    /// A single-lattice model.
    pub fn new(operator: BsmOperator, bcs: BoundaryConditionPair, scheme: FdmScheme) -> Self {
        Self {
            evolvers: vec![MixedScheme::new(operator, bcs, scheme)],
        }
    }

    /// A model advancing several lattices in lock-step.
    ///
    /// # Errors
    /// Fails if no lattice is given or the lattices differ in size.
    pub fn parallel(
        lattices: Vec<(BsmOperator, BoundaryConditionPair)>,
        scheme: FdmScheme,
    ) -> Result<Self> {
        ensure!(!lattices.is_empty(), "a model needs at least one lattice");
        let n = lattices[0].0.size();
        ensure!(
            lattices.iter().all(|(op, _)| op.size() == n),
            "all lattices must share the grid size {n}"
        );
        Ok(Self {
            evolvers: lattices
                .into_iter()
                .map(|(op, bcs)| MixedScheme::new(op, bcs, scheme))
                .collect(),
        })
    }

    /// Number of grid nodes.
    pub fn size(&self) -> usize {
        self.evolvers[0].size()
    }

    /// Roll every array back from `from` to `to` in `steps` equal sub-steps,
    /// applying `conditions[k]` to `arrays[k]` after each one.
    ///
    /// `steps == 0` or `from == to` (to a few ulps) leaves the arrays untouched.
    ///
    /// # Errors
    /// Fails if the numbers of arrays, lattices and conditions differ, if an
    /// array does not match the grid, or if `to > from`.
    pub fn rollback(
        &mut self,
        arrays: &mut [Array],
        from: Time,
        to: Time,
        steps: usize,
        conditions: &[StepCondition],
    ) -> Result<()> {
        let k = self.evolvers.len();
        ensure!(
            arrays.len() == k,
            "{} arrays given for {k} lattices",
            arrays.len()
        );
        ensure!(
            conditions.len() == k,
            "{} step conditions given for {k} lattices",
            conditions.len()
        );
        let n = self.size();
        ensure!(
            arrays.iter().all(|a| a.size() == n),
            "arrays must match the grid size {n}"
        );
        ensure!(to <= from, "cannot roll back from {from} to a later time {to}");
        if steps == 0 || close_enough(from, to, 4) {
            return Ok(());
        }

        trace!(from, to, steps, lattices = k, "rollback");
        let dt = (from - to) / steps as Time;
        for evolver in &mut self.evolvers {
            evolver.set_step(dt);
        }
        let mut now = from;
        for i in 0..steps {
            let next = if i + 1 == steps {
                to
            } else {
                from - (i + 1) as Time * dt
            };
            for ((evolver, a), condition) in
                self.evolvers.iter_mut().zip(arrays.iter_mut()).zip(conditions)
            {
                evolver.step(a, now)?;
                condition.apply_to(a, next)?;
            }
            now = next;
        }
        Ok(())
    }

    /// Single-array rollback; the model must hold exactly one lattice.
    pub fn rollback_single(
        &mut self,
        a: &mut Array,
        from: Time,
        to: Time,
        steps: usize,
        condition: &StepCondition,
    ) -> Result<()> {
        self.rollback(
            std::slice::from_mut(a),
            from,
            to,
            steps,
            std::slice::from_ref(condition),
        )
    }
}
