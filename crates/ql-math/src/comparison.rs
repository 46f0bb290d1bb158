//! Floating-point comparison helpers.
//!
//! Event scheduling compares times against tolerances scaled by the residual
//! time; grid code compares against machine precision.

use ql_core::Real;

/// Return `true` if `|a - b| <= tolerance`.
#[inline]
pub fn close(a: Real, b: Real, tolerance: Real) -> bool {
    (a - b).abs() <= tolerance
}

/// Return `true` if `a` and `b` agree to within `n` ulps of the larger
/// magnitude.
#[inline]
pub fn close_enough(a: Real, b: Real, n: u32) -> bool {
    if a == b {
        return true;
    }
    let scale = a.abs().max(b.abs());
    (a - b).abs() <= scale * f64::EPSILON * Real::from(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_tolerance() {
        assert!(close(0.5, 0.5 + 4e-7, 5e-7));
        assert!(!close(0.5, 0.5 + 6e-7, 5e-7));
    }

    #[test]
    fn ulp_tolerance() {
        assert!(close_enough(100.0, 100.0, 1));
        assert!(close_enough(100.0, 100.0 * (1.0 + 2.0 * f64::EPSILON), 4));
        assert!(!close_enough(100.0, 100.0001, 4));
    }
}
