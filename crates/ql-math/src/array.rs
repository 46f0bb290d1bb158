//! `Array`: a one-dimensional vector of reals.
//!
//! A thin newtype around `nalgebra::DVector<f64>`. Finite-difference code
//! stores both grids and solution values in it: the rollback model applies
//! operators to it, step conditions floor it element-wise, and sampled curves
//! keep their abscissas and ordinates in two parallel arrays.

use nalgebra::DVector;
use ql_core::Real;
use std::ops::{Add, Index, IndexMut, Mul, Sub};

/// A dynamically-sized 1D vector of `Real` values.
#[derive(Debug, Clone, PartialEq)]
pub struct Array(DVector<Real>);

impl Array {
    /// Create a zero-filled array of length `n`.
    pub fn zeros(n: usize) -> Self {
        Self(DVector::zeros(n))
    }

    /// Create an array filled with `value`.
    pub fn from_element(n: usize, value: Real) -> Self {
        Self(DVector::from_element(n, value))
    }

    /// Create an array from a slice.
    pub fn from_slice(data: &[Real]) -> Self {
        Self(DVector::from_column_slice(data))
    }

    /// Create an array from a `Vec`.
    pub fn from_vec(data: Vec<Real>) -> Self {
        Self(DVector::from_vec(data))
    }

    /// Build an array of length `n` from `f(i)`.
    pub fn from_fn(n: usize, f: impl Fn(usize) -> Real) -> Self {
        Self(DVector::from_fn(n, |i, _| f(i)))
    }

    /// Number of elements.
    pub fn size(&self) -> usize {
        self.0.len()
    }

    /// Return `true` if empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Return the elements as a slice.
    pub fn as_slice(&self) -> &[Real] {
        self.0.as_slice()
    }

    /// Return the elements as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [Real] {
        self.0.as_mut_slice()
    }

    /// First element.
    ///
    /// # Panics
    /// Panics if the array is empty.
    pub fn first(&self) -> Real {
        self.0[0]
    }

    /// Last element.
    ///
    /// # Panics
    /// Panics if the array is empty.
    pub fn last(&self) -> Real {
        self.0[self.0.len() - 1]
    }

    /// Apply a function element-wise, returning a new array.
    pub fn map<F: Fn(Real) -> Real>(&self, f: F) -> Self {
        Self(self.0.map(f))
    }

    /// Apply a function element-wise in place.
    pub fn apply<F: Fn(Real) -> Real>(&mut self, f: F) {
        for v in self.0.iter_mut() {
            *v = f(*v);
        }
    }

    /// Element-wise `self[i] = max(self[i], floor[i])`.
    ///
    /// # Panics
    /// Panics if the lengths differ.
    pub fn floor_with(&mut self, floor: &Array) {
        assert_eq!(self.size(), floor.size(), "array size mismatch");
        for (v, &f) in self.0.iter_mut().zip(floor.0.iter()) {
            *v = v.max(f);
        }
    }

    /// `true` if the elements are strictly increasing.
    pub fn is_strictly_increasing(&self) -> bool {
        self.as_slice().windows(2).all(|w| w[0] < w[1])
    }

    /// Iterator over elements.
    pub fn iter(&self) -> impl Iterator<Item = &Real> {
        self.0.iter()
    }

    /// Mutable iterator over elements.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Real> {
        self.0.iter_mut()
    }
}

// ── From / Into conversions ───────────────────────────────────────────────────

impl From<Vec<Real>> for Array {
    fn from(v: Vec<Real>) -> Self {
        Self::from_vec(v)
    }
}

impl From<&[Real]> for Array {
    fn from(s: &[Real]) -> Self {
        Self::from_slice(s)
    }
}

impl From<Array> for Vec<Real> {
    fn from(a: Array) -> Self {
        a.as_slice().to_vec()
    }
}

// ── Index ─────────────────────────────────────────────────────────────────────

impl Index<usize> for Array {
    type Output = Real;
    fn index(&self, i: usize) -> &Real {
        &self.0[i]
    }
}

impl IndexMut<usize> for Array {
    fn index_mut(&mut self, i: usize) -> &mut Real {
        &mut self.0[i]
    }
}

// ── Element-wise arithmetic ───────────────────────────────────────────────────

impl Add for &Array {
    type Output = Array;
    fn add(self, rhs: &Array) -> Array {
        Array(&self.0 + &rhs.0)
    }
}

impl Sub for &Array {
    type Output = Array;
    fn sub(self, rhs: &Array) -> Array {
        Array(&self.0 - &rhs.0)
    }
}

impl Mul<Real> for &Array {
    type Output = Array;
    fn mul(self, rhs: Real) -> Array {
        Array(&self.0 * rhs)
    }
}
