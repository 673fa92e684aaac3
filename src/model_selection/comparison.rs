//! Side-by-side comparison of different model families.
//!
//! Every candidate is cross-validated with the same evaluator, and so on
//! the same folds, which makes the fold scores directly comparable.
//!
//! # Examples
//!
//! ```
//! use foldwise::prelude::*;
//! use foldwise::cross_validation::Evaluator;
//! use foldwise::datasets::synthetic;
//! use foldwise::linear_models::sgdclassifier;
//! use foldwise::metrics::Metric;
//! use foldwise::model_selection::{compare_models, Candidate};
//! use foldwise::neighbors;
//!
//! let (X, y) = synthetic::classification(&[40, 40], 2, 3.0, 2);
//!
//! let candidates = vec![
//!     Candidate::new("knn", || Ok(neighbors::Hyperparameters::new(5).classifier())),
//!     Candidate::new("logistic", || Ok(sgdclassifier::Hyperparameters::new(2).epochs(10).build())),
//! ];
//!
//! let mut evaluator = Evaluator::new(4);
//! evaluator.shuffle(true).seed(11).stratify(true);
//!
//! let comparison = compare_models(&evaluator, &X, &y, &candidates, &Metric::Accuracy).unwrap();
//!
//! for (name, report) in comparison.ranked() {
//!     println!("{}: {:.3} +/- {:.3}", name, report.mean(), report.std());
//! }
//! ```

use log::info;

use crate::array::prelude::*;
use crate::cross_validation::{Evaluator, ScoreReport};
use crate::error::{Error, Result};
use crate::metrics::{Direction, Scorer};
use crate::traits::{BoxedModel, SupervisedModel};


type ModelFactory = Box<dyn Fn() -> std::result::Result<BoxedModel, &'static str> + Sync>;


/// A named model factory.
pub struct Candidate {
    name: String,
    factory: ModelFactory,
}


impl Candidate {
    pub fn new<N, M, F>(name: N, factory: F) -> Candidate
    where
        N: Into<String>,
        M: SupervisedModel + Send + 'static,
        F: Fn() -> std::result::Result<M, &'static str> + Sync + 'static,
    {
        Candidate {
            name: name.into(),
            factory: Box::new(move || factory().map(|model| Box::new(model) as BoxedModel)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}


/// Cross-validate every candidate on identical folds.
///
/// The first failing candidate aborts the comparison.
pub fn compare_models<S>(evaluator: &Evaluator,
                         X: &Array,
                         y: &Array,
                         candidates: &[Candidate],
                         scorer: &S)
                         -> Result<Comparison>
where
    S: Scorer + Sync + ?Sized,
{
    if candidates.is_empty() {
        return Err(Error::invalid("no models to compare"));
    }

    let mut entries = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        let report = evaluator.evaluate(X, y, || (candidate.factory)(), scorer)?;

        info!("Model {}: mean score {:.4}, std {:.4}",
              candidate.name,
              report.mean(),
              report.std());

        entries.push((candidate.name.clone(), report));
    }

    Ok(Comparison {
        entries,
        direction: scorer.direction(),
    })
}


/// Per-model reports, in candidate order.
#[derive(Clone, Debug)]
pub struct Comparison {
    entries: Vec<(String, ScoreReport)>,
    direction: Direction,
}


impl Comparison {
    pub fn entries(&self) -> &[(String, ScoreReport)] {
        &self.entries
    }

    /// Report of the model named `name`.
    pub fn get(&self, name: &str) -> Option<&ScoreReport> {
        self.entries
            .iter()
            .find(|&&(ref entry_name, _)| entry_name == name)
            .map(|&(_, ref report)| report)
    }

    /// Models from best to worst mean score. Ties keep candidate order.
    pub fn ranked(&self) -> Vec<(&str, &ScoreReport)> {
        let mut ranked = self.entries
            .iter()
            .map(|&(ref name, ref report)| (name.as_str(), report))
            .collect::<Vec<_>>();

        // Stable sort, best first.
        ranked.sort_by(|a, b| self.direction.compare(b.1.mean(), a.1.mean()));

        ranked
    }

    pub fn best(&self) -> Option<(&str, &ScoreReport)> {
        self.ranked().into_iter().next()
    }
}
