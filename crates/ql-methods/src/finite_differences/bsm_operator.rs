//! Black-Scholes spatial operator on a log-transformed price grid.
//!
//! In `x = ln S` the backward pricing PDE reads
//!
//! `∂V/∂t + ½σ²·∂²V/∂x² + ν·∂V/∂x − r·V = 0`,  `ν = r − q − ½σ²`,
//!
//! and the operator assembled here is `L = −(½σ²∂xx + ν∂x − r)`, so that
//! `∂V/∂t = L·V` and a backward step of size `dt` is `(I + dt·L)⁻¹`.

use super::tridiagonal_operator::TridiagonalOperator;
use ql_core::{ensure, errors::Result, Rate, Real, Time};
use ql_math::Array;
use ql_processes::BlackScholesProcess;
use std::sync::Arc;

/// A price grid together with its logarithm and the log spacings.
///
/// Handles non-uniform grids, which appear once a dividend shift has moved
/// the nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformedGrid {
    grid: Array,
    log_grid: Array,
    dxm: Vec<Real>,
    dxp: Vec<Real>,
    dx: Vec<Real>,
}

impl TransformedGrid {
    /// Transform a strictly increasing, positive price grid.
    ///
    /// # Errors
    /// Fails on fewer than three nodes, non-positive nodes or a grid that
    /// is not strictly increasing.
    pub fn new(grid: &Array) -> Result<Self> {
        let n = grid.size();
        ensure!(n >= 3, "a grid needs at least 3 points, got {n}");
        ensure!(grid.first() > 0.0, "grid must be positive, got {}", grid.first());
        ensure!(grid.is_strictly_increasing(), "grid must be strictly increasing");

        let log_grid = grid.map(Real::ln);
        let mut dxm = vec![0.0; n];
        let mut dxp = vec![0.0; n];
        let mut dx = vec![0.0; n];
        for i in 1..n - 1 {
            dxm[i] = log_grid[i] - log_grid[i - 1];
            dxp[i] = log_grid[i + 1] - log_grid[i];
            dx[i] = dxm[i] + dxp[i];
        }
        Ok(Self {
            grid: grid.clone(),
            log_grid,
            dxm,
            dxp,
            dx,
        })
    }

    /// Number of nodes.
    pub fn size(&self) -> usize {
        self.grid.size()
    }

    /// Price nodes.
    pub fn grid(&self) -> &Array {
        &self.grid
    }

    /// Log-price nodes.
    pub fn log_grid(&self) -> &Array {
        &self.log_grid
    }

    /// `x_i − x_{i−1}`.
    pub fn dxm(&self, i: usize) -> Real {
        self.dxm[i]
    }

    /// `x_{i+1} − x_i`.
    pub fn dxp(&self, i: usize) -> Real {
        self.dxp[i]
    }

    /// `x_{i+1} − x_{i−1}`.
    pub fn dx(&self, i: usize) -> Real {
        self.dx[i]
    }
}

/// Tridiagonal row `(pd, pm, pu)` for node `i` of `grid`.
fn row(grid: &TransformedGrid, i: usize, sigma2: Real, nu: Real, r: Rate) -> (Real, Real, Real) {
    let (dxm, dxp, dx) = (grid.dxm(i), grid.dxp(i), grid.dx(i));
    let pd = -(sigma2 / dxm - nu) / dx;
    let pu = -(sigma2 / dxp + nu) / dx;
    let pm = sigma2 / (dxm * dxp) + r;
    (pd, pm, pu)
}

#[derive(Debug, Clone)]
enum Coefficients {
    Constant,
    TimeDependent {
        process: Arc<dyn BlackScholesProcess>,
        time: Option<Time>,
    },
}

/// The discretized Black-Scholes operator over a grid.
///
/// Edge rows are left empty; boundary conditions fill them in.
#[derive(Debug, Clone)]
pub struct BsmOperator {
    grid: TransformedGrid,
    coefficients: Coefficients,
    op: TridiagonalOperator,
}

impl BsmOperator {
    /// Operator with constant coefficients `σ²`, `r`, `q`.
    pub fn with_constant_coefficients(grid: TransformedGrid, sigma: Real, r: Rate, q: Rate) -> Self {
        let sigma2 = sigma * sigma;
        let nu = r - q - 0.5 * sigma2;
        let n = grid.size();
        let mut op = TridiagonalOperator::new(n);
        for i in 1..n - 1 {
            let (pd, pm, pu) = row(&grid, i, sigma2, nu, r);
            op.set_mid_row(i, pd, pm, pu);
        }
        Self {
            grid,
            coefficients: Coefficients::Constant,
            op,
        }
    }

    /// Constant-coefficient operator for a process, using the quantities
    /// averaged over `[0, residual_time]`: the Black volatility at the grid
    /// centre and the zero rates to expiry.
    pub fn constant(
        grid: TransformedGrid,
        process: &dyn BlackScholesProcess,
        residual_time: Time,
        center: Real,
    ) -> Self {
        let sigma = process.black_volatility(residual_time, center);
        let r = process.risk_free_rate(residual_time);
        let q = process.dividend_yield(residual_time);
        Self::with_constant_coefficients(grid, sigma, r, q)
    }

    /// Operator whose coefficients follow the process' local volatility and
    /// forward rates. It is regenerated by every [`set_time`](Self::set_time).
    pub fn time_dependent(
        grid: TransformedGrid,
        process: Arc<dyn BlackScholesProcess>,
        residual_time: Time,
    ) -> Self {
        let n = grid.size();
        let mut operator = Self {
            grid,
            coefficients: Coefficients::TimeDependent {
                process,
                time: None,
            },
            op: TridiagonalOperator::new(n),
        };
        operator.set_time(residual_time);
        operator
    }

    /// `true` if [`set_time`](Self::set_time) changes the coefficients.
    pub fn is_time_dependent(&self) -> bool {
        matches!(self.coefficients, Coefficients::TimeDependent { .. })
    }

    /// Regenerate the operator at time `t` (no-op with constant
    /// coefficients).
    pub fn set_time(&mut self, t: Time) {
        let Coefficients::TimeDependent { process, time } = &mut self.coefficients else {
            return;
        };
        if *time == Some(t) {
            return;
        }
        *time = Some(t);
        let r = process.forward_rate(t);
        let q = process.forward_dividend_yield(t);
        let n = self.grid.size();
        for i in 1..n - 1 {
            let sigma = process.local_volatility(t, self.grid.grid()[i]);
            let sigma2 = sigma * sigma;
            let (pd, pm, pu) = row(&self.grid, i, sigma2, r - q - 0.5 * sigma2, r);
            self.op.set_mid_row(i, pd, pm, pu);
        }
    }

    /// The current tridiagonal matrix.
    pub fn matrix(&self) -> &TridiagonalOperator {
        &self.op
    }

    /// The grid the operator lives on.
    pub fn grid(&self) -> &TransformedGrid {
        &self.grid
    }

    /// Number of nodes.
    pub fn size(&self) -> usize {
        self.grid.size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use chrono::NaiveDate;
    use ql_math::bounded_log_grid;
    use ql_processes::FlatBlackScholesProcess;

    fn log_grid(n: usize) -> TransformedGrid {
        TransformedGrid::new(&bounded_log_grid(50.0, 200.0, n - 1)).unwrap()
    }

    #[test]
    fn transformed_grid_spacings() {
        let g = log_grid(5);
        let step = (4.0f64).ln() / 4.0;
        assert_abs_diff_eq!(g.dxm(2), step, epsilon = 1e-12);
        assert_abs_diff_eq!(g.dxp(2), step, epsilon = 1e-12);
        assert_abs_diff_eq!(g.dx(2), 2.0 * step, epsilon = 1e-12);
        assert!(TransformedGrid::new(&Array::from_slice(&[1.0, 2.0])).is_err());
        assert!(TransformedGrid::new(&Array::from_slice(&[1.0, 3.0, 2.0])).is_err());
    }

    #[test]
    fn operator_annihilates_the_forward() {
        // V = S·e^{-q·τ} solves the PDE, so L·S = q·S on interior nodes.
        let g = log_grid(21);
        let (r, q) = (0.05, 0.02);
        let op = BsmOperator::with_constant_coefficients(g.clone(), 0.3, r, q);
        let lv = op.matrix().apply_to(g.grid()).unwrap();
        for i in 1..20 {
            assert_abs_diff_eq!(lv[i], q * g.grid()[i], epsilon = 1e-2 * g.grid()[i]);
        }
    }

    #[test]
    fn constants_are_killed_by_the_diffusion() {
        // L·1 = r on interior rows.
        let g = log_grid(11);
        let op = BsmOperator::with_constant_coefficients(g, 0.25, 0.04, 0.01);
        let lv = op.matrix().apply_to(&Array::from_element(11, 1.0)).unwrap();
        for i in 1..10 {
            assert_abs_diff_eq!(lv[i], 0.04, epsilon = 1e-12);
        }
    }

    #[test]
    fn zero_drift_rows_are_symmetric() {
        // ν = 0 and r = 0: pure diffusion on a uniform log grid.
        let g = log_grid(9);
        let sigma: Real = 0.2;
        let r = 0.0;
        let q = -0.5 * sigma * sigma;
        let op = BsmOperator::with_constant_coefficients(g, sigma, r, q);
        for i in 1..8 {
            assert_abs_diff_eq!(op.matrix().lower[i], op.matrix().upper[i], epsilon = 1e-12);
        }
    }

    #[test]
    fn time_dependent_matches_constant_for_flat_market() {
        let process: Arc<dyn BlackScholesProcess> = Arc::new(
            FlatBlackScholesProcess::new(NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(), 100.0, 0.05, 0.02, 0.2)
                .unwrap(),
        );
        let g = log_grid(11);
        let constant = BsmOperator::constant(g.clone(), process.as_ref(), 1.0, 100.0);
        let mut moving = BsmOperator::time_dependent(g, Arc::clone(&process), 1.0);
        assert!(moving.is_time_dependent());
        assert!(!constant.is_time_dependent());
        moving.set_time(0.3);
        for i in 1..10 {
            assert_abs_diff_eq!(moving.matrix().diag[i], constant.matrix().diag[i], epsilon = 1e-9);
            assert_abs_diff_eq!(moving.matrix().lower[i], constant.matrix().lower[i], epsilon = 1e-9);
        }
    }
}
