//! `SampledCurve`: a function sampled on a price grid.
//!
//! The finite-difference engines keep both the intrinsic values and the
//! rolled-back prices in a sampled curve: a strictly increasing grid of
//! underlying levels and a parallel array of values. Grid transformations
//! (scaling, shifting) move the nodes while keeping the values attached to
//! them, which is how discrete dividends are folded into the lattice.

use crate::array::Array;
use ql_core::{ensure, errors::Result, Real};

/// A log-spaced grid of `steps + 1` points from `x_min` to `x_max`.
///
/// `x_i = exp(ln x_min + i·(ln x_max − ln x_min)/steps)`; the end points are
/// pinned exactly.
pub fn bounded_log_grid(x_min: Real, x_max: Real, steps: usize) -> Array {
    let (lo, hi) = (x_min.ln(), x_max.ln());
    let dx = (hi - lo) / steps.max(1) as Real;
    let mut grid = Array::from_fn(steps + 1, |i| (lo + i as Real * dx).exp());
    grid[0] = x_min;
    if steps > 0 {
        grid[steps] = x_max;
    }
    grid
}

/// Values sampled on a grid of underlying levels.
#[derive(Debug, Clone, PartialEq)]
pub struct SampledCurve {
    grid: Array,
    values: Array,
}

impl SampledCurve {
    /// A curve of `size` points with zero grid and values.
    pub fn new(size: usize) -> Self {
        Self {
            grid: Array::zeros(size),
            values: Array::zeros(size),
        }
    }

    /// A curve on `grid` with zero values.
    pub fn from_grid(grid: Array) -> Self {
        let n = grid.size();
        Self {
            grid,
            values: Array::zeros(n),
        }
    }

    /// Number of grid points.
    pub fn size(&self) -> usize {
        self.grid.size()
    }

    /// The grid.
    pub fn grid(&self) -> &Array {
        &self.grid
    }

    /// The values.
    pub fn values(&self) -> &Array {
        &self.values
    }

    /// Mutable access to the values.
    pub fn values_mut(&mut self) -> &mut Array {
        &mut self.values
    }

    /// Replace the values.
    ///
    /// # Errors
    /// Fails if `values` does not match the grid size.
    pub fn set_values(&mut self, values: Array) -> Result<()> {
        ensure!(
            values.size() == self.size(),
            "value array size {} does not match grid size {}",
            values.size(),
            self.size()
        );
        self.values = values;
        Ok(())
    }

    /// Value at point `i`.
    pub fn value(&self, i: usize) -> Real {
        self.values[i]
    }

    /// Replace the grid by a log-spaced grid between `min` and `max`.
    pub fn set_log_grid(&mut self, min: Real, max: Real) {
        self.grid = bounded_log_grid(min, max, self.size() - 1);
    }

    /// Set `values[i] = f(grid[i])`.
    pub fn sample<F: Fn(Real) -> Real>(&mut self, f: F) {
        for i in 0..self.size() {
            self.values[i] = f(self.grid[i]);
        }
    }

    /// Multiply every grid point by `factor`.
    pub fn scale_grid(&mut self, factor: Real) {
        self.grid.apply(|s| s * factor);
    }

    /// Add `shift` to every grid point.
    pub fn shift_grid(&mut self, shift: Real) {
        self.grid.apply(|s| s + shift);
    }

    /// Value at the grid centre.
    ///
    /// For an even number of points this is the average of the two central
    /// values.
    pub fn value_at_center(&self) -> Real {
        let n = self.size();
        let mid = n / 2;
        if n % 2 == 1 {
            self.values[mid]
        } else {
            0.5 * (self.values[mid] + self.values[mid - 1])
        }
    }

    /// First derivative of the values with respect to the grid, at the centre.
    ///
    /// # Errors
    /// Fails for fewer than 3 points.
    pub fn first_derivative_at_center(&self) -> Result<Real> {
        let n = self.size();
        ensure!(n >= 3, "the size of the curve must be at least 3, got {n}");
        let (g, v) = (&self.grid, &self.values);
        let mid = n / 2;
        if n % 2 == 1 {
            Ok((v[mid + 1] - v[mid - 1]) / (g[mid + 1] - g[mid - 1]))
        } else {
            Ok((v[mid] - v[mid - 1]) / (g[mid] - g[mid - 1]))
        }
    }

    /// Second derivative of the values with respect to the grid, at the
    /// centre.
    ///
    /// # Errors
    /// Fails for fewer than 4 points.
    pub fn second_derivative_at_center(&self) -> Result<Real> {
        let n = self.size();
        ensure!(n >= 4, "the size of the curve must be at least 4, got {n}");
        let (g, v) = (&self.grid, &self.values);
        let mid = n / 2;
        if n % 2 == 1 {
            let delta_plus = (v[mid + 1] - v[mid]) / (g[mid + 1] - g[mid]);
            let delta_minus = (v[mid] - v[mid - 1]) / (g[mid] - g[mid - 1]);
            let ds = 0.5 * (g[mid + 1] - g[mid - 1]);
            Ok((delta_plus - delta_minus) / ds)
        } else {
            let delta_plus = (v[mid + 1] - v[mid - 1]) / (g[mid + 1] - g[mid - 1]);
            let delta_minus = (v[mid] - v[mid - 2]) / (g[mid] - g[mid - 2]);
            Ok((delta_plus - delta_minus) / (g[mid] - g[mid - 1]))
        }
    }
}
