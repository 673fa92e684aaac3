//! Cross-validated feature subset evaluation and greedy forward selection.
//!
//! Model factories receive the number of columns in the subset being
//! evaluated, so that models declaring their dimensionality up front can
//! be built for it.
//!
//! # Examples
//!
//! ```
//! use foldwise::prelude::*;
//! use foldwise::cross_validation::Evaluator;
//! use foldwise::datasets::synthetic;
//! use foldwise::linear_models::linear_regression;
//! use foldwise::metrics::Metric;
//! use foldwise::model_selection::forward_selection;
//!
//! let (X, y) = synthetic::regression(60, &[0.0, 4.0, 0.0, 1.0], 0.05, 3);
//!
//! let mut evaluator = Evaluator::new(5);
//! evaluator.shuffle(true).seed(3);
//!
//! let path = forward_selection(&evaluator,
//!                              &X,
//!                              &y,
//!                              2,
//!                              |dim| Ok(linear_regression::Hyperparameters::new(dim).build()),
//!                              &Metric::MeanSquaredError)
//!     .unwrap();
//!
//! assert_eq!(path.steps()[0].added(), 1);
//! ```

use log::info;

use crate::array::prelude::*;
use crate::cross_validation::{Evaluator, ScoreReport};
use crate::error::{Error, Result};
use crate::metrics::{Direction, Scorer};
use crate::traits::SupervisedModel;


fn check_columns(X: &Array, columns: &[usize]) -> Result<()> {
    if columns.is_empty() {
        return Err(Error::invalid("feature subsets must not be empty"));
    }

    for (idx, &column) in columns.iter().enumerate() {
        if column >= X.cols() {
            return Err(Error::invalid(format!("column {} out of range for {} features", column, X.cols())));
        }
        if columns[..idx].contains(&column) {
            return Err(Error::invalid(format!("column {} listed twice", column)));
        }
    }

    Ok(())
}


fn evaluate_columns<M, F, S>(evaluator: &Evaluator,
                             X: &Array,
                             y: &Array,
                             columns: &[usize],
                             model_factory: &F,
                             scorer: &S)
                             -> Result<ScoreReport>
where
    M: SupervisedModel,
    F: Fn(usize) -> std::result::Result<M, &'static str> + Sync,
    S: Scorer + Sync + ?Sized,
{
    let X_subset = X.get_columns(columns);
    let dim = columns.len();

    evaluator.evaluate(&X_subset, y, || model_factory(dim), scorer)
}


/// Cross-validate the model on each of the listed column subsets.
///
/// Every subset is checked before anything is evaluated; reports come back
/// in subset order.
pub fn evaluate_feature_subsets<M, F, S>(evaluator: &Evaluator,
                                         X: &Array,
                                         y: &Array,
                                         subsets: &[Vec<usize>],
                                         model_factory: F,
                                         scorer: &S)
                                         -> Result<Vec<(Vec<usize>, ScoreReport)>>
where
    M: SupervisedModel,
    F: Fn(usize) -> std::result::Result<M, &'static str> + Sync,
    S: Scorer + Sync + ?Sized,
{
    if subsets.is_empty() {
        return Err(Error::invalid("no feature subsets given"));
    }

    for subset in subsets {
        check_columns(X, subset)?;
    }

    let mut results = Vec::with_capacity(subsets.len());

    for subset in subsets {
        let report = evaluate_columns(evaluator, X, y, subset, &model_factory, scorer)?;

        info!("Features {:?}: mean score {:.4}", subset, report.mean());

        results.push((subset.clone(), report));
    }

    Ok(results)
}


/// One step of forward selection.
#[derive(Clone, Debug)]
pub struct SelectionStep {
    columns: Vec<usize>,
    report: ScoreReport,
}


impl SelectionStep {
    /// Columns selected so far, in the order they were added.
    pub fn columns(&self) -> &[usize] {
        &self.columns
    }

    /// The column added at this step.
    pub fn added(&self) -> usize {
        self.columns[self.columns.len() - 1]
    }

    pub fn report(&self) -> &ScoreReport {
        &self.report
    }
}


/// The steps taken by forward selection.
#[derive(Clone, Debug)]
pub struct SelectionPath {
    steps: Vec<SelectionStep>,
    direction: Direction,
}


impl SelectionPath {
    pub fn steps(&self) -> &[SelectionStep] {
        &self.steps
    }

    /// The step with the best mean score. Smaller subsets win ties.
    pub fn best(&self) -> Option<&SelectionStep> {
        let mut best: Option<&SelectionStep> = None;

        for step in &self.steps {
            match best {
                Some(current) if !self.direction.is_better(step.report.mean(), current.report.mean()) => {}
                _ => best = Some(step),
            }
        }

        best
    }
}


/// Greedy forward selection of up to `max_features` columns.
///
/// Starting from no columns, each step cross-validates every remaining
/// column added to the current selection and keeps the one with the best
/// mean score. Lower column indices win ties.
pub fn forward_selection<M, F, S>(evaluator: &Evaluator,
                                  X: &Array,
                                  y: &Array,
                                  max_features: usize,
                                  model_factory: F,
                                  scorer: &S)
                                  -> Result<SelectionPath>
where
    M: SupervisedModel,
    F: Fn(usize) -> std::result::Result<M, &'static str> + Sync,
    S: Scorer + Sync + ?Sized,
{
    if max_features == 0 || max_features > X.cols() {
        return Err(Error::invalid(format!("max_features must lie in [1, {}], got {}",
                                          X.cols(),
                                          max_features)));
    }

    let direction = scorer.direction();

    let mut selected: Vec<usize> = Vec::with_capacity(max_features);
    let mut steps = Vec::with_capacity(max_features);

    for _ in 0..max_features {
        let mut step_best: Option<SelectionStep> = None;

        for column in (0..X.cols()).filter(|column| !selected.contains(column)) {
            let mut columns = selected.clone();
            columns.push(column);

            let report = evaluate_columns(evaluator, X, y, &columns, &model_factory, scorer)?;

            let improves = match step_best {
                Some(ref current) => direction.is_better(report.mean(), current.report.mean()),
                None => true,
            };

            if improves {
                step_best = Some(SelectionStep { columns, report });
            }
        }

        match step_best {
            Some(step) => {
                info!("Forward selection added column {}: mean score {:.4}",
                      step.added(),
                      step.report.mean());

                selected = step.columns.clone();
                steps.push(step);
            }
            None => break,
        }
    }

    Ok(SelectionPath { steps, direction })
}
