//! K-fold cross-validation for Rust models.
//!
//!
//! # Introduction
//!
//! `foldwise` estimates how well a model generalises: it partitions a dataset into
//! `k` folds, fits a fresh model on all but one of them, scores it on the held-out fold,
//! and reports the per-fold scores together with their mean and standard deviation.
//!
//! Folds can be shuffled with a seed and stratified by class label. Evaluation can run on
//! several threads; the scores are always reported in fold order, and any failing fold aborts
//! the whole evaluation with an error naming that fold.
//!
//! # Features
//!
//! ## Evaluation
//!
//! - [the evaluator](cross_validation/evaluator/index.html) and its [score reports](cross_validation/report/index.html),
//! - [plain and stratified fold assignments](cross_validation/folds/index.html),
//! - [k-fold](cross_validation/cross_validation/index.html) and [shuffle-split](cross_validation/shuffle_split/index.html) iterators.
//!
//! ## Model selection
//!
//! - [grid search](model_selection/grid_search/index.html),
//! - [model comparison](model_selection/comparison/index.html) on identical folds,
//! - [feature subset evaluation and forward selection](model_selection/feature_selection/index.html).
//!
//! ## Models
//!
//! Anything implementing `SupervisedModel` can be evaluated. The crate ships with
//!
//! - [logistic regression](linear_models/sgdclassifier/index.html) using stochastic gradient descent,
//! - [least squares regression](linear_models/linear_regression/index.html), and
//! - [nearest neighbour](neighbors/index.html) classification and regression.
//!
//! ## Model serialization
//!
//! Models, evaluator settings and score reports are serializable via `serde`.
//!
//! # Using `foldwise`
//!
//! - import the prelude for the array type and the common traits:
//!
//! ```
//! use foldwise::prelude::*;
//! ```
//!
//! - import the evaluator, metrics and models from submodules:
//!
//! ```
//! use foldwise::prelude::*;
//!
//! use foldwise::cross_validation::Evaluator;
//! use foldwise::metrics::Metric;
//! // more imports
//! ```
//!
//! # Examples
//!
//! ## Cross-validating logistic regression
//!
//! ```
//! use foldwise::prelude::*;
//! use foldwise::cross_validation::evaluate;
//! use foldwise::datasets::synthetic;
//! use foldwise::linear_models::sgdclassifier::Hyperparameters;
//! use foldwise::metrics::Metric;
//!
//!
//! let (X, y) = synthetic::classification(&[50, 50, 50], 4, 3.0, 0);
//!
//! let report = evaluate(&X,
//!                       &y,
//!                       || {
//!                           Ok(Hyperparameters::new(4)
//!                               .learning_rate(0.5)
//!                               .epochs(5)
//!                               .one_vs_rest())
//!                       },
//!                       10,
//!                       &Metric::Accuracy,
//!                       true,
//!                       42,
//!                       true)
//!     .unwrap();
//!
//! println!("Accuracy: {:.3} +/- {:.3}", report.mean(), report.std());
//! ```
//!
//! ## Handling failures
//!
//! ```
//! use foldwise::prelude::*;
//! use foldwise::cross_validation::Evaluator;
//! use foldwise::datasets::synthetic;
//! use foldwise::error::{Error, Stage};
//! use foldwise::metrics::Metric;
//! use foldwise::neighbors;
//!
//! let (X, y) = synthetic::regression(20, &[1.0], 0.1, 0);
//!
//! // Five folds of 20 rows leave 16 training rows, too few for 17 neighbours.
//! let result = Evaluator::new(5)
//!     .evaluate(&X, &y, || Ok(neighbors::Hyperparameters::new(17).regressor()), &Metric::MeanSquaredError);
//!
//! match result {
//!     Err(Error::ModelFit { fold, stage, .. }) => {
//!         assert_eq!(fold, 0);
//!         assert_eq!(stage, Stage::Fit);
//!     }
//!     _ => panic!("expected a fold failure"),
//! }
//! ```


// Allow conventional capital X for feature arrays.
#![allow(non_snake_case)]

pub mod array;
pub mod cross_validation;
pub mod datasets;
pub mod error;
pub mod linear_models;
pub mod metrics;
pub mod model_selection;
pub mod multiclass;
pub mod neighbors;
pub mod traits;
pub mod utils;

pub use crate::error::{Error, Stage};


#[allow(unused_imports)]
pub mod prelude {
    //! Basic data structures and traits used throughout `foldwise`.
    pub use crate::array::prelude::*;
    pub use crate::traits::*;
}
