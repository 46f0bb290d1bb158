//! Price-grid limits for the finite-difference lattice.
//!
//! The grid spans a log-symmetric band of four (slightly inflated) standard
//! deviations around a centre, then is widened so the strike sits strictly
//! inside it.

use ql_core::{ensure, ensure_post, errors::Result, Real, Time};
use ql_math::{bounded_log_grid, Array};

/// Minimum distance, as a ratio, between the strike and the grid edges.
pub const SAFETY_ZONE_FACTOR: Real = 1.1;

/// Bounds and centre of a log-spaced price grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLimits {
    s_min: Real,
    s_max: Real,
    center: Real,
}

impl GridLimits {
    /// Limits centred on `center` for a total Black `variance` to expiry.
    ///
    /// `sMax / center = center / sMin = exp(4·(σ√T + 0.02))`.
    ///
    /// # Errors
    /// Fails if `center` is not a positive finite number or the variance is
    /// negative.
    pub fn new(center: Real, variance: Real) -> Result<Self> {
        ensure!(
            center > 0.0 && center.is_finite(),
            "grid center must be positive, got {center}"
        );
        ensure!(
            variance >= 0.0,
            "variance must be non-negative, got {variance}"
        );
        let vol_sqrt_time = variance.sqrt();
        let min_max_factor = (4.0 * (vol_sqrt_time + 0.02)).exp();
        Ok(Self {
            s_min: center / min_max_factor,
            s_max: center * min_max_factor,
            center,
        })
    }

    /// Lower bound.
    pub fn s_min(&self) -> Real {
        self.s_min
    }

    /// Upper bound.
    pub fn s_max(&self) -> Real {
        self.s_max
    }

    /// Grid centre.
    pub fn center(&self) -> Real {
        self.center
    }

    /// Widen the limits so that `strike` lies inside them with a
    /// [`SAFETY_ZONE_FACTOR`] margin, keeping the centre at the geometric
    /// middle of the band.
    ///
    /// # Errors
    /// Fails if `strike` is not positive.
    pub fn ensure_strike_in_grid(&mut self, strike: Real) -> Result<()> {
        ensure!(strike > 0.0, "strike must be positive, got {strike}");
        if self.s_min > strike / SAFETY_ZONE_FACTOR {
            self.s_min = strike / SAFETY_ZONE_FACTOR;
            self.s_max = self.center / (self.s_min / self.center);
        }
        if self.s_max < strike * SAFETY_ZONE_FACTOR {
            self.s_max = strike * SAFETY_ZONE_FACTOR;
            self.s_min = self.center / (self.s_max / self.center);
        }
        ensure_post!(
            self.s_min < strike && strike < self.s_max,
            "strike {strike} outside grid [{}, {}]",
            self.s_min,
            self.s_max
        );
        Ok(())
    }

    /// Multiply bounds and centre by `factor`.
    pub fn scale(&mut self, factor: Real) {
        self.s_min *= factor;
        self.s_max *= factor;
        self.center *= factor;
    }

    /// Add `delta` to bounds and centre.
    pub fn shift(&mut self, delta: Real) {
        self.s_min += delta;
        self.s_max += delta;
        self.center += delta;
    }

    /// A log-spaced grid of `points` nodes between the bounds.
    pub fn log_grid(&self, points: usize) -> Array {
        bounded_log_grid(self.s_min, self.s_max, points.saturating_sub(1))
    }
}

/// Number of grid points actually used for a residual time.
///
/// Long-dated options get a floor of `10 + 2·(T − 1)` points.
pub fn safe_grid_points(grid_points: usize, residual_time: Time) -> usize {
    const MIN_GRID_POINTS: usize = 10;
    const MIN_GRID_POINTS_PER_YEAR: Real = 2.0;
    let floor = if residual_time > 1.0 {
        (MIN_GRID_POINTS as Real + (residual_time - 1.0) * MIN_GRID_POINTS_PER_YEAR) as usize
    } else {
        MIN_GRID_POINTS
    };
    grid_points.max(floor)
}
