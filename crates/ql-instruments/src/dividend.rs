//! Discrete cash dividends.

use chrono::NaiveDate;
use ql_core::Real;

/// A fixed cash dividend paid on `date`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dividend {
    /// Payment date.
    pub date: NaiveDate,
    /// Cash amount per share.
    pub amount: Real,
}

impl Dividend {
    /// Create a dividend.
    pub fn new(date: NaiveDate, amount: Real) -> Self {
        Self { date, amount }
    }
}
