//! Hyperparameter search over an explicit list of candidates.
//!
//! # Examples
//!
//! ```
//! use foldwise::prelude::*;
//! use foldwise::cross_validation::Evaluator;
//! use foldwise::datasets::synthetic;
//! use foldwise::metrics::Metric;
//! use foldwise::model_selection::GridSearch;
//! use foldwise::neighbors;
//!
//! let (X, y) = synthetic::classification(&[30, 30], 2, 3.0, 1);
//!
//! let mut evaluator = Evaluator::new(5);
//! evaluator.shuffle(true).seed(7).stratify(true);
//!
//! let search = GridSearch::new(vec![1, 3, 7]);
//! let result = search
//!     .evaluate(&evaluator, &X, &y, |&k| Ok(neighbors::Hyperparameters::new(k).classifier()), &Metric::Accuracy)
//!     .unwrap();
//!
//! let (best_k, report) = result.best().unwrap();
//! println!("Best n_neighbors: {} ({:.3})", best_k, report.mean());
//! ```

use log::info;

use crate::array::prelude::*;
use crate::cross_validation::{Evaluator, ScoreReport};
use crate::error::{Error, Result};
use crate::metrics::{Direction, Scorer};
use crate::traits::SupervisedModel;


/// A list of parameter candidates to cross-validate.
#[derive(Clone, Debug)]
pub struct GridSearch<P> {
    candidates: Vec<P>,
}


impl<P> GridSearch<P> {
    pub fn new(candidates: Vec<P>) -> GridSearch<P> {
        GridSearch { candidates }
    }

    pub fn candidates(&self) -> &[P] {
        &self.candidates
    }

    /// Cross-validate a model built from every candidate.
    ///
    /// All candidates are evaluated on the same folds. The first failing
    /// candidate aborts the search.
    pub fn evaluate<M, F, S>(&self,
                             evaluator: &Evaluator,
                             X: &Array,
                             y: &Array,
                             model_factory: F,
                             scorer: &S)
                             -> Result<GridSearchResult<P>>
    where
        P: Clone + Sync,
        M: SupervisedModel,
        F: Fn(&P) -> std::result::Result<M, &'static str> + Sync,
        S: Scorer + Sync + ?Sized,
    {
        if self.candidates.is_empty() {
            return Err(Error::invalid("grid search needs at least one candidate"));
        }

        let mut results = Vec::with_capacity(self.candidates.len());

        for (idx, params) in self.candidates.iter().enumerate() {
            let report = evaluator.evaluate(X, y, || model_factory(params), scorer)?;

            info!("Grid candidate {}: mean score {:.4}", idx, report.mean());

            results.push((params.clone(), report));
        }

        Ok(GridSearchResult {
            results,
            direction: scorer.direction(),
        })
    }
}


/// Reports of a grid search, in candidate order.
#[derive(Clone, Debug)]
pub struct GridSearchResult<P> {
    results: Vec<(P, ScoreReport)>,
    direction: Direction,
}


impl<P> GridSearchResult<P> {
    pub fn results(&self) -> &[(P, ScoreReport)] {
        &self.results
    }

    /// The candidate with the best mean score. Earlier candidates win ties.
    pub fn best(&self) -> Option<(&P, &ScoreReport)> {
        let mut best: Option<&(P, ScoreReport)> = None;

        for entry in &self.results {
            match best {
                Some(current) if !self.direction.is_better(entry.1.mean(), current.1.mean()) => {}
                _ => best = Some(entry),
            }
        }

        best.map(|&(ref params, ref report)| (params, report))
    }
}
