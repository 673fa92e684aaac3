//! Scoring functions with a declared direction.
//!
//! The evaluator never interprets a score itself. Whether a larger value
//! is better travels with the scorer into every report, so that model
//! selection can rank candidates for accuracy and for error metrics alike.
//!
//! ```
//! use foldwise::prelude::*;
//! use foldwise::metrics::{Direction, Metric, Scorer, ScoringFn};
//!
//! let y_true = Array::from(vec![1.0, 2.0]);
//! let y_hat = Array::from(vec![1.0, 4.0]);
//!
//! assert_eq!(Metric::MeanSquaredError.score(&y_true, &y_hat).unwrap(), 2.0);
//! assert_eq!(Metric::MeanSquaredError.direction(), Direction::LowerIsBetter);
//!
//! let max_error = ScoringFn::new(Direction::LowerIsBetter, |y_true: &Array, y_hat: &Array| {
//!     Ok(y_true.data().iter()
//!         .zip(y_hat.data().iter())
//!         .map(|(a, b)| (a - b).abs())
//!         .fold(0.0, f32::max))
//! });
//!
//! assert_eq!(max_error.score(&y_true, &y_hat).unwrap(), 2.0);
//! ```

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::array::dense::Array;

use super::{accuracy_score, mean_absolute_error, mean_squared_error, r2_score};


/// Whether higher or lower scores indicate a better model.
#[derive(Serialize, Deserialize)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    HigherIsBetter,
    LowerIsBetter,
}


impl Direction {
    /// Order two scores so that the better one compares as `Greater`.
    pub fn compare(&self, a: f32, b: f32) -> Ordering {
        let ordering = a.partial_cmp(&b).unwrap_or(Ordering::Equal);

        match *self {
            Direction::HigherIsBetter => ordering,
            Direction::LowerIsBetter => ordering.reverse(),
        }
    }

    /// Whether `a` is strictly better than `b`.
    pub fn is_better(&self, a: f32, b: f32) -> bool {
        self.compare(a, b) == Ordering::Greater
    }
}


/// A scoring function from (true targets, predictions) to a number.
pub trait Scorer {
    fn score(&self, y_true: &Array, y_hat: &Array) -> Result<f32, &'static str>;
    fn direction(&self) -> Direction;
}


/// The built-in metrics.
#[derive(Serialize, Deserialize)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Metric {
    Accuracy,
    MeanAbsoluteError,
    MeanSquaredError,
    R2,
}


impl Scorer for Metric {
    fn score(&self, y_true: &Array, y_hat: &Array) -> Result<f32, &'static str> {
        match *self {
            Metric::Accuracy => accuracy_score(y_true, y_hat),
            Metric::MeanAbsoluteError => mean_absolute_error(y_true, y_hat),
            Metric::MeanSquaredError => mean_squared_error(y_true, y_hat),
            Metric::R2 => r2_score(y_true, y_hat),
        }
    }

    fn direction(&self) -> Direction {
        match *self {
            Metric::Accuracy | Metric::R2 => Direction::HigherIsBetter,
            Metric::MeanAbsoluteError | Metric::MeanSquaredError => Direction::LowerIsBetter,
        }
    }
}


/// Wraps an arbitrary scoring closure together with its direction.
pub struct ScoringFn<F> {
    func: F,
    direction: Direction,
}


impl<F> ScoringFn<F>
where
    F: Fn(&Array, &Array) -> Result<f32, &'static str>,
{
    pub fn new(direction: Direction, func: F) -> ScoringFn<F> {
        ScoringFn { func, direction }
    }
}


impl<F> Scorer for ScoringFn<F>
where
    F: Fn(&Array, &Array) -> Result<f32, &'static str>,
{
    fn score(&self, y_true: &Array, y_hat: &Array) -> Result<f32, &'static str> {
        (self.func)(y_true, y_hat)
    }

    fn direction(&self) -> Direction {
        self.direction
    }
}


impl<'a, S: Scorer + ?Sized> Scorer for &'a S {
    fn score(&self, y_true: &Array, y_hat: &Array) -> Result<f32, &'static str> {
        (**self).score(y_true, y_hat)
    }

    fn direction(&self) -> Direction {
        (**self).direction()
    }
}
