//! Tridiagonal operator with a Thomas-algorithm solver.

use ql_core::{ensure, errors::Result, fail, Real};
use ql_math::Array;

/// A tridiagonal matrix operator.
///
/// Stores the lower, diagonal, and upper bands. Used for 1-D finite
/// difference discretisations of second-order PDEs.
#[derive(Debug, Clone, PartialEq)]
pub struct TridiagonalOperator {
    /// Lower diagonal (index 0 unused, starts from row 1).
    pub lower: Vec<Real>,
    /// Main diagonal.
    pub diag: Vec<Real>,
    /// Upper diagonal (last index unused, ends at row n−2).
    pub upper: Vec<Real>,
}

impl TridiagonalOperator {
    /// Create a zero tridiagonal operator of size `n`.
    pub fn new(n: usize) -> Self {
        Self {
            lower: vec![0.0; n],
            diag: vec![0.0; n],
            upper: vec![0.0; n],
        }
    }

    /// The identity of size `n`.
    pub fn identity(n: usize) -> Self {
        let mut op = Self::new(n);
        op.diag.iter_mut().for_each(|d| *d = 1.0);
        op
    }

    /// Size (number of rows/columns).
    pub fn size(&self) -> usize {
        self.diag.len()
    }

    /// Set row 0 to `(diag, upper)`.
    pub fn set_first_row(&mut self, diag: Real, upper: Real) {
        self.diag[0] = diag;
        self.upper[0] = upper;
    }

    /// Set interior row `i` to `(lower, diag, upper)`.
    pub fn set_mid_row(&mut self, i: usize, lower: Real, diag: Real, upper: Real) {
        self.lower[i] = lower;
        self.diag[i] = diag;
        self.upper[i] = upper;
    }

    /// Set row `n − 1` to `(lower, diag)`.
    pub fn set_last_row(&mut self, lower: Real, diag: Real) {
        let n = self.size();
        self.lower[n - 1] = lower;
        self.diag[n - 1] = diag;
    }

    /// `I + factor · A`.
    pub fn identity_plus(&self, factor: Real) -> Self {
        let mut op = self.clone();
        op.scale(factor);
        op.add_identity(1.0);
        op
    }

    /// Apply the operator: `y = A · x`.
    ///
    /// # Errors
    /// Fails if `x` does not match the operator size.
    pub fn apply_to(&self, x: &Array) -> Result<Array> {
        let n = self.size();
        ensure!(
            x.size() == n,
            "array of size {} does not match operator of size {n}",
            x.size()
        );
        if n == 1 {
            return Ok(Array::from_element(1, self.diag[0] * x[0]));
        }
        let mut y = Array::zeros(n);
        y[0] = self.diag[0] * x[0] + self.upper[0] * x[1];
        for i in 1..n - 1 {
            y[i] = self.lower[i] * x[i - 1] + self.diag[i] * x[i] + self.upper[i] * x[i + 1];
        }
        y[n - 1] = self.lower[n - 1] * x[n - 2] + self.diag[n - 1] * x[n - 1];
        Ok(y)
    }

    /// Solve `A · x = rhs` using the Thomas algorithm.
    ///
    /// # Errors
    /// Fails on a size mismatch or a vanishing pivot.
    pub fn solve_for(&self, rhs: &Array) -> Result<Array> {
        let n = self.size();
        ensure!(
            rhs.size() == n,
            "right-hand side of size {} does not match operator of size {n}",
            rhs.size()
        );

        // Forward sweep
        let mut c_prime = vec![0.0; n];
        let mut d_prime = vec![0.0; n];

        if self.diag[0] == 0.0 {
            fail!("division by zero in tridiagonal solver (row 0)");
        }
        c_prime[0] = self.upper[0] / self.diag[0];
        d_prime[0] = rhs[0] / self.diag[0];

        for i in 1..n {
            let m = self.diag[i] - self.lower[i] * c_prime[i - 1];
            if m == 0.0 {
                fail!("division by zero in tridiagonal solver (row {i})");
            }
            if i < n - 1 {
                c_prime[i] = self.upper[i] / m;
            }
            d_prime[i] = (rhs[i] - self.lower[i] * d_prime[i - 1]) / m;
        }

        // Back substitution
        let mut x = Array::zeros(n);
        x[n - 1] = d_prime[n - 1];
        for i in (0..n - 1).rev() {
            x[i] = d_prime[i] - c_prime[i] * x[i + 1];
        }

        Ok(x)
    }

    /// Scale all entries by a scalar.
    pub fn scale(&mut self, factor: Real) {
        for v in self
            .lower
            .iter_mut()
            .chain(self.diag.iter_mut())
            .chain(self.upper.iter_mut())
        {
            *v *= factor;
        }
    }

    /// Add the identity matrix scaled by `factor`: `A ← A + factor · I`.
    pub fn add_identity(&mut self, factor: Real) {
        for d in &mut self.diag {
            *d += factor;
        }
    }
}
