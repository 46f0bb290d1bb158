//! Edge constraints for the finite-difference lattice.
//!
//! A boundary condition hooks into both halves of a theta-scheme step: it
//! rewrites the edge row of the explicit operator and fixes the edge value
//! after the product, then rewrites the edge row and right-hand side of the
//! implicit system before the solve.

use super::tridiagonal_operator::TridiagonalOperator;
use ql_core::Real;
use ql_math::Array;

/// Which edge of the grid a condition constrains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundarySide {
    /// The lowest price node.
    Lower,
    /// The highest price node.
    Upper,
}

/// A boundary condition on one edge of the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoundaryCondition {
    /// Fixed difference between the edge node and its neighbour:
    /// `u₁ − u₀ = value` (lower) or `u_{n−1} − u_{n−2} = value` (upper).
    Neumann {
        /// Constrained edge.
        side: BoundarySide,
        /// Prescribed difference.
        value: Real,
    },
    /// Fixed value at the edge node.
    Dirichlet {
        /// Constrained edge.
        side: BoundarySide,
        /// Prescribed value.
        value: Real,
    },
}

impl BoundaryCondition {
    /// A Neumann condition.
    pub fn neumann(side: BoundarySide, value: Real) -> Self {
        Self::Neumann { side, value }
    }

    /// A Dirichlet condition.
    pub fn dirichlet(side: BoundarySide, value: Real) -> Self {
        Self::Dirichlet { side, value }
    }

    /// The constrained edge.
    pub fn side(&self) -> BoundarySide {
        match *self {
            Self::Neumann { side, .. } | Self::Dirichlet { side, .. } => side,
        }
    }

    /// The prescribed value.
    pub fn value(&self) -> Real {
        match *self {
            Self::Neumann { value, .. } | Self::Dirichlet { value, .. } => value,
        }
    }

    fn set_edge_row(&self, op: &mut TridiagonalOperator) {
        match *self {
            Self::Neumann { side: BoundarySide::Lower, .. } => op.set_first_row(-1.0, 1.0),
            Self::Neumann { side: BoundarySide::Upper, .. } => op.set_last_row(-1.0, 1.0),
            Self::Dirichlet { side: BoundarySide::Lower, .. } => op.set_first_row(1.0, 0.0),
            Self::Dirichlet { side: BoundarySide::Upper, .. } => op.set_last_row(0.0, 1.0),
        }
    }

    /// Prepare the explicit operator before it is applied.
    pub fn apply_before_applying(&self, op: &mut TridiagonalOperator) {
        self.set_edge_row(op);
    }

    /// Fix up the edge value after the explicit operator was applied.
    pub fn apply_after_applying(&self, u: &mut Array) {
        let n = u.size();
        match *self {
            Self::Neumann { side: BoundarySide::Lower, value } => u[0] = u[1] - value,
            Self::Neumann { side: BoundarySide::Upper, value } => u[n - 1] = u[n - 2] + value,
            Self::Dirichlet { side: BoundarySide::Lower, value } => u[0] = value,
            Self::Dirichlet { side: BoundarySide::Upper, value } => u[n - 1] = value,
        }
    }

    /// Prepare the implicit system before it is solved.
    pub fn apply_before_solving(&self, op: &mut TridiagonalOperator, rhs: &mut Array) {
        self.set_edge_row(op);
        let edge = match self.side() {
            BoundarySide::Lower => 0,
            BoundarySide::Upper => rhs.size() - 1,
        };
        rhs[edge] = self.value();
    }

    /// Fix up the solution after the implicit solve. The edge rows already
    /// enforce both kinds of condition, so this is a no-op.
    pub fn apply_after_solving(&self, _u: &mut Array) {}
}

/// A lower/upper pair of boundary conditions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryConditionPair {
    /// Lower-edge condition.
    pub lower: BoundaryCondition,
    /// Upper-edge condition.
    pub upper: BoundaryCondition,
}

impl BoundaryConditionPair {
    /// Both conditions, lower first.
    pub fn iter(&self) -> impl Iterator<Item = &BoundaryCondition> {
        [&self.lower, &self.upper].into_iter()
    }
}

/// Neumann conditions matching the edge slopes of `values`.
///
/// # Panics
/// Panics if `values` has fewer than two elements.
pub fn neumann_pair(values: &Array) -> BoundaryConditionPair {
    let n = values.size();
    BoundaryConditionPair {
        lower: BoundaryCondition::neumann(BoundarySide::Lower, values[1] - values[0]),
        upper: BoundaryCondition::neumann(BoundarySide::Upper, values[n - 1] - values[n - 2]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neumann_values_from_edges() {
        let put = Array::from_slice(&[40.0, 30.0, 20.0, 10.0, 0.0, 0.0]);
        let bcs = neumann_pair(&put);
        assert_eq!(bcs.lower.value(), -10.0);
        assert_eq!(bcs.upper.value(), 0.0);
        assert_eq!(bcs.lower.side(), BoundarySide::Lower);
        assert_eq!(bcs.iter().count(), 2);
    }

    #[test]
    fn log_symmetric_payoff_has_opposite_edge_slopes() {
        let grid = ql_math::bounded_log_grid(50.0, 200.0, 10);
        let values = grid.map(|s| (s / 100.0).ln().abs());
        let bcs = neumann_pair(&values);
        assert!(bcs.lower.value() < 0.0);
        assert!((bcs.lower.value() + bcs.upper.value()).abs() < 1e-12);
    }

    #[test]
    fn neumann_fix_up_after_applying() {
        let mut u = Array::from_slice(&[0.0, 5.0, 6.0, 0.0]);
        BoundaryCondition::neumann(BoundarySide::Lower, 2.0).apply_after_applying(&mut u);
        BoundaryCondition::neumann(BoundarySide::Upper, 1.5).apply_after_applying(&mut u);
        assert_eq!(u.as_slice(), &[3.0, 5.0, 6.0, 7.5]);
    }

    #[test]
    fn neumann_rows_are_mirror_images() {
        let mut op = TridiagonalOperator::new(4);
        let mut rhs = Array::zeros(4);
        BoundaryCondition::neumann(BoundarySide::Lower, 1.0).apply_before_solving(&mut op, &mut rhs);
        BoundaryCondition::neumann(BoundarySide::Upper, -1.0).apply_before_solving(&mut op, &mut rhs);
        assert_eq!((op.diag[0], op.upper[0]), (-1.0, 1.0));
        assert_eq!((op.lower[3], op.diag[3]), (-1.0, 1.0));
        assert_eq!((rhs[0], rhs[3]), (1.0, -1.0));
    }

    #[test]
    fn solved_system_honours_both_kinds() {
        // Identity interior with a Neumann lower edge and a Dirichlet upper edge.
        let mut op = TridiagonalOperator::identity(4);
        let mut rhs = Array::from_slice(&[0.0, 2.0, 3.0, 0.0]);
        BoundaryCondition::neumann(BoundarySide::Lower, 0.5).apply_before_solving(&mut op, &mut rhs);
        BoundaryCondition::dirichlet(BoundarySide::Upper, 9.0).apply_before_solving(&mut op, &mut rhs);
        let u = op.solve_for(&rhs).unwrap();
        assert!((u[1] - u[0] - 0.5).abs() < 1e-12);
        assert!((u[3] - 9.0).abs() < 1e-12);
    }
}
