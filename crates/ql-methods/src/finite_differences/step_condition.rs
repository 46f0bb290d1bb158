//! Conditions applied to the lattice after every rollback sub-step.

use ql_core::{ensure, errors::Result, Rate, Time};
use ql_math::Array;

/// Early-exercise behaviour enforced between time steps.
#[derive(Debug, Clone, PartialEq)]
pub enum StepCondition {
    /// No constraint.
    Null,
    /// The holder may exercise at any time: `a ≥ intrinsic`.
    American {
        /// Intrinsic values on the grid.
        intrinsic: Array,
    },
    /// The holder may lock in the current intrinsic value, paid at expiry:
    /// `a ≥ exp(−rate·(residual_time − t)) · intrinsic`.
    ///
    /// The locked-in amount is discounted from expiry back to `t`, so with a
    /// positive rate the floor sits below the intrinsic value before expiry
    /// (QuantLib's `ShoutCondition` compounds with `exp(−rate·(t − T))`).
    Shout {
        /// Intrinsic values on the grid.
        intrinsic: Array,
        /// Time of expiry.
        residual_time: Time,
        /// Riskless zero rate to expiry.
        rate: Rate,
    },
}

impl StepCondition {
    /// An American condition on `intrinsic`.
    pub fn american(intrinsic: Array) -> Self {
        Self::American { intrinsic }
    }

    /// A shout condition on `intrinsic`.
    pub fn shout(intrinsic: Array, residual_time: Time, rate: Rate) -> Self {
        Self::Shout {
            intrinsic,
            residual_time,
            rate,
        }
    }

    /// The same kind of condition re-armed on new intrinsic values.
    pub fn rearmed(&self, intrinsic: Array) -> Self {
        match self {
            Self::Null => Self::Null,
            Self::American { .. } => Self::American { intrinsic },
            Self::Shout {
                residual_time,
                rate,
                ..
            } => Self::Shout {
                intrinsic,
                residual_time: *residual_time,
                rate: *rate,
            },
        }
    }

    /// Enforce the condition on `a` at time `t`.
    ///
    /// # Errors
    /// Fails if `a` and the captured intrinsic values differ in size.
    pub fn apply_to(&self, a: &mut Array, t: Time) -> Result<()> {
        match self {
            Self::Null => {}
            Self::American { intrinsic } => {
                check_size(a, intrinsic)?;
                a.floor_with(intrinsic);
            }
            Self::Shout {
                intrinsic,
                residual_time,
                rate,
            } => {
                check_size(a, intrinsic)?;
                let discount = (-rate * (residual_time - t)).exp();
                for (v, &x) in a.iter_mut().zip(intrinsic.iter()) {
                    *v = v.max(discount * x);
                }
            }
        }
        Ok(())
    }
}

fn check_size(a: &Array, intrinsic: &Array) -> Result<()> {
    ensure!(
        a.size() == intrinsic.size(),
        "array of size {} does not match intrinsic values of size {}",
        a.size(),
        intrinsic.size()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    #[test]
    fn null_leaves_values_alone() {
        let mut a = Array::from_slice(&[1.0, -2.0]);
        StepCondition::Null.apply_to(&mut a, 0.5).unwrap();
        assert_eq!(a.as_slice(), &[1.0, -2.0]);
    }

    #[test]
    fn american_floors_at_intrinsic() {
        let c = StepCondition::american(Array::from_slice(&[5.0, 0.0, 0.0]));
        let mut a = Array::from_slice(&[4.0, 1.0, 0.5]);
        c.apply_to(&mut a, 0.0).unwrap();
        assert_eq!(a.as_slice(), &[5.0, 1.0, 0.5]);
        assert!(c.apply_to(&mut Array::zeros(2), 0.0).is_err());
    }

    #[test]
    fn shout_discounts_the_locked_value() {
        let c = StepCondition::shout(Array::from_slice(&[10.0, 0.0]), 1.0, 0.05);
        let mut a = Array::from_slice(&[0.0, 0.3]);
        c.apply_to(&mut a, 0.25).unwrap();
        assert_abs_diff_eq!(a[0], 10.0 * (-0.05f64 * 0.75).exp(), epsilon = 1e-14);
        assert!(a[0] < 10.0, "locked value must be discounted, got {}", a[0]);
        assert_eq!(a[1], 0.3);

        // At expiry nothing is discounted.
        let mut a = Array::zeros(2);
        c.apply_to(&mut a, 1.0).unwrap();
        assert_eq!(a[0], 10.0);
    }

    #[test]
    fn rearming_keeps_the_kind() {
        let c = StepCondition::shout(Array::zeros(2), 1.0, 0.05);
        match c.rearmed(Array::from_element(3, 1.0)) {
            StepCondition::Shout { intrinsic, rate, .. } => {
                assert_eq!(intrinsic.size(), 3);
                assert_eq!(rate, 0.05);
            }
            other => panic!("unexpected condition {other:?}"),
        }
        assert_eq!(StepCondition::Null.rearmed(Array::zeros(1)), StepCondition::Null);
    }

    proptest! {
        #[test]
        fn american_is_idempotent(values in proptest::collection::vec((-10.0f64..10.0, -10.0f64..10.0), 1..50)) {
            let (a, x): (Vec<f64>, Vec<f64>) = values.into_iter().unzip();
            let c = StepCondition::american(Array::from_vec(x));
            let mut once = Array::from_vec(a);
            c.apply_to(&mut once, 0.0).unwrap();
            let mut twice = once.clone();
            c.apply_to(&mut twice, 0.0).unwrap();
            prop_assert_eq!(once, twice);
        }
    }
}
