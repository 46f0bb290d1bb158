//! Theta-scheme time stepping.
//!
//! One backward step from `t` to `t − dt`:
//!
//! ```text
//! u* = (I − (1−θ)·dt·L(t)) · u          explicit part, then edge fix-up
//! (I + θ·dt·L(t−dt)) · u' = u*          implicit part, edges in the system
//! ```

use super::boundary_condition::BoundaryConditionPair;
use super::bsm_operator::BsmOperator;
use super::tridiagonal_operator::TridiagonalOperator;
use super::FdmScheme;
use ql_core::{errors::Result, Real, Time};
use ql_math::Array;

/// A theta-scheme evolver for one lattice.
#[derive(Debug, Clone)]
pub struct MixedScheme {
    operator: BsmOperator,
    bcs: BoundaryConditionPair,
    theta: Real,
    dt: Time,
    explicit_part: TridiagonalOperator,
    implicit_part: TridiagonalOperator,
}

impl MixedScheme {
    /// An evolver for `operator` with the given boundaries and scheme.
    pub fn new(operator: BsmOperator, bcs: BoundaryConditionPair, scheme: FdmScheme) -> Self {
        let n = operator.size();
        Self {
            operator,
            bcs,
            theta: scheme.theta(),
            dt: 0.0,
            explicit_part: TridiagonalOperator::identity(n),
            implicit_part: TridiagonalOperator::identity(n),
        }
    }

    /// Set the step size; constant operators are composed once here.
    pub fn set_step(&mut self, dt: Time) {
        self.dt = dt;
        if !self.operator.is_time_dependent() {
            self.compose_explicit();
            self.compose_implicit();
        }
    }

    fn compose_explicit(&mut self) {
        self.explicit_part = self.operator.matrix().identity_plus(-(1.0 - self.theta) * self.dt);
    }

    fn compose_implicit(&mut self) {
        self.implicit_part = self.operator.matrix().identity_plus(self.theta * self.dt);
    }

    /// Advance `a` one step backward from `t`.
    pub fn step(&mut self, a: &mut Array, t: Time) -> Result<()> {
        if self.theta != 1.0 {
            if self.operator.is_time_dependent() {
                self.operator.set_time(t);
                self.compose_explicit();
            }
            for bc in self.bcs.iter() {
                bc.apply_before_applying(&mut self.explicit_part);
            }
            *a = self.explicit_part.apply_to(a)?;
            for bc in self.bcs.iter() {
                bc.apply_after_applying(a);
            }
        }
        if self.theta != 0.0 {
            if self.operator.is_time_dependent() {
                self.operator.set_time(t - self.dt);
                self.compose_implicit();
            }
            for bc in self.bcs.iter() {
                bc.apply_before_solving(&mut self.implicit_part, a);
            }
            *a = self.implicit_part.solve_for(a)?;
            for bc in self.bcs.iter() {
                bc.apply_after_solving(a);
            }
        }
        Ok(())
    }

    /// The spatial operator.
    pub fn operator(&self) -> &BsmOperator {
        &self.operator
    }

    /// The boundary conditions.
    pub fn boundary_conditions(&self) -> &BoundaryConditionPair {
        &self.bcs
    }

    /// Number of grid nodes.
    pub fn size(&self) -> usize {
        self.operator.size()
    }
}

#[cfg(test)]
mod tests {
    use super::super::boundary_condition::neumann_pair;
    use super::super::bsm_operator::TransformedGrid;
    use super::*;
    use approx::assert_abs_diff_eq;
    use ql_math::bounded_log_grid;

    fn scheme(kind: FdmScheme) -> MixedScheme {
        let grid = TransformedGrid::new(&bounded_log_grid(50.0, 200.0, 40)).unwrap();
        let op = BsmOperator::with_constant_coefficients(grid, 0.2, 0.05, 0.0);
        let bcs = neumann_pair(&Array::from_element(41, 1.0));
        MixedScheme::new(op, bcs, kind)
    }

    #[test]
    fn constant_is_discounted() {
        // A flat payoff with zero-slope edges only picks up e^{−r·dt}.
        for kind in [FdmScheme::Explicit, FdmScheme::Implicit, FdmScheme::CrankNicolson] {
            let mut s = scheme(kind);
            s.set_step(0.01);
            let mut a = Array::from_element(41, 1.0);
            for k in 0..100 {
                s.step(&mut a, 1.0 - k as Real * 0.01).unwrap();
            }
            assert_abs_diff_eq!(a[20], (-0.05f64).exp(), epsilon = 1e-3);
            assert_abs_diff_eq!(a[0], a[1], epsilon = 1e-12);
        }
    }

    #[test]
    fn size_mismatch_is_an_error() {
        let mut s = scheme(FdmScheme::CrankNicolson);
        s.set_step(0.01);
        assert!(s.step(&mut Array::zeros(7), 1.0).is_err());
    }
}
