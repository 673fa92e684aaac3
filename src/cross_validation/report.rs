//! Per-fold scores from one cross-validation run.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::metrics::Direction;


/// The scores of a cross-validation run, one per fold, in fold order.
///
/// Reports are created by the evaluator and cannot be changed afterwards.
#[derive(Serialize, Deserialize)]
#[derive(Clone, Debug, PartialEq)]
pub struct ScoreReport {
    scores: Vec<f32>,
    direction: Direction,
}


impl ScoreReport {
    pub(crate) fn new(scores: Vec<f32>, direction: Direction) -> ScoreReport {
        ScoreReport { scores, direction }
    }

    /// Score of every fold, indexed by fold id.
    pub fn scores(&self) -> &[f32] {
        &self.scores
    }

    /// Whether higher or lower scores are better.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn n_folds(&self) -> usize {
        self.scores.len()
    }

    /// Mean score across folds.
    pub fn mean(&self) -> f32 {
        if self.scores.is_empty() {
            return 0.0;
        }

        (self.scores.iter().map(|&score| score as f64).sum::<f64>() / self.scores.len() as f64) as f32
    }

    /// Sample standard deviation of the fold scores (`n - 1` divisor).
    pub fn std(&self) -> f32 {
        if self.scores.len() < 2 {
            return 0.0;
        }

        let mean = self.mean() as f64;
        let variance = self.scores
            .iter()
            .map(|&score| (score as f64 - mean).powi(2))
            .sum::<f64>() / (self.scores.len() - 1) as f64;

        variance.sqrt() as f32
    }

    pub fn min(&self) -> f32 {
        self.scores.iter().copied().fold(f32::INFINITY, f32::min)
    }

    pub fn max(&self) -> f32 {
        self.scores.iter().copied().fold(f32::NEG_INFINITY, f32::max)
    }

    /// The fold with the best score and that score. Ties go to the lower fold.
    pub fn best_fold(&self) -> Option<(usize, f32)> {
        let mut best: Option<(usize, f32)> = None;

        for (fold, &score) in self.scores.iter().enumerate() {
            match best {
                Some((_, best_score)) if !self.direction.is_better(score, best_score) => {}
                _ => best = Some((fold, score)),
            }
        }

        best
    }

    /// Compare mean scores; the better report compares as `Greater`.
    pub fn compare(&self, other: &ScoreReport) -> Ordering {
        self.direction.compare(self.mean(), other.mean())
    }
}
