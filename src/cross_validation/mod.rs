//! Cross validation utilities.
//!
//! `Evaluator` (or the `evaluate` shorthand) runs a complete k-fold
//! evaluation and returns a `ScoreReport`. The fold builders and the
//! `CrossValidation` and `ShuffleSplit` iterators are available for
//! writing evaluation loops by hand.

pub mod cross_validation;
pub mod evaluator;
pub mod folds;
pub mod report;
pub mod shuffle_split;

pub use self::cross_validation::CrossValidation;
pub use self::evaluator::{evaluate, Evaluator};
pub use self::folds::{kfold, stratified_kfold, FoldAssignment};
pub use self::report::ScoreReport;
pub use self::shuffle_split::{train_test_split, ShuffleSplit};
