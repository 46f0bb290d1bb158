//! Option exercise schedules.
//!
//! An `Exercise` defines *when* an option can be exercised.

use chrono::NaiveDate;
use ql_core::{ensure, errors::Result};
use std::fmt;

/// Type of exercise right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExerciseType {
    /// Can only be exercised at expiry.
    European,
    /// Can be exercised at any time up to expiry.
    American,
    /// Can be exercised on specific dates.
    Bermudan,
}

/// Exercise terms of an option.
///
/// The date list is never empty: every constructor either takes the expiry
/// explicitly or rejects an empty schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exercise {
    exercise_type: ExerciseType,
    /// - European: single date (the expiry).
    /// - American: two dates (earliest, latest).
    /// - Bermudan: sorted, distinct dates.
    dates: Vec<NaiveDate>,
}

impl Exercise {
    /// A European exercise at `expiry`.
    pub fn european(expiry: NaiveDate) -> Self {
        Self {
            exercise_type: ExerciseType::European,
            dates: vec![expiry],
        }
    }

    /// An American exercise between `earliest` and `latest`.
    ///
    /// # Errors
    /// Fails if `earliest` is after `latest`.
    pub fn american(earliest: NaiveDate, latest: NaiveDate) -> Result<Self> {
        ensure!(
            earliest <= latest,
            "earliest exercise date {earliest} is after latest {latest}"
        );
        Ok(Self {
            exercise_type: ExerciseType::American,
            dates: vec![earliest, latest],
        })
    }

    /// A Bermudan exercise on the given dates (sorted and deduplicated).
    ///
    /// # Errors
    /// Fails if no dates are given.
    pub fn bermudan(mut dates: Vec<NaiveDate>) -> Result<Self> {
        ensure!(!dates.is_empty(), "a Bermudan exercise needs at least one date");
        dates.sort();
        dates.dedup();
        Ok(Self {
            exercise_type: ExerciseType::Bermudan,
            dates,
        })
    }

    /// The last possible exercise date.
    pub fn last_date(&self) -> NaiveDate {
        self.dates[self.dates.len() - 1]
    }

    /// All exercise dates.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// The type of exercise.
    pub fn exercise_type(&self) -> ExerciseType {
        self.exercise_type
    }

    /// `true` for American exercise.
    pub fn is_american(&self) -> bool {
        self.exercise_type == ExerciseType::American
    }

    /// `true` for Bermudan exercise.
    pub fn is_bermudan(&self) -> bool {
        self.exercise_type == ExerciseType::Bermudan
    }

    /// `true` for European exercise.
    pub fn is_european(&self) -> bool {
        self.exercise_type == ExerciseType::European
    }
}

impl fmt::Display for Exercise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.exercise_type {
            ExerciseType::European => write!(f, "European({})", self.dates[0]),
            ExerciseType::American => {
                write!(f, "American({} to {})", self.dates[0], self.last_date())
            }
            ExerciseType::Bermudan => write!(f, "Bermudan({} dates)", self.dates.len()),
        }
    }
}
