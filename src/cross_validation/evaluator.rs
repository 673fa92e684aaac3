//! Cross-validated model evaluation.
//!
//! The evaluator partitions a dataset into folds, fits a fresh model on all
//! but one fold, scores it on the held-out fold, and collects the scores in
//! fold order. Any failure aborts the whole evaluation; no partial report is
//! ever returned.
//!
//! # Examples
//!
//! ```
//! use foldwise::prelude::*;
//! use foldwise::cross_validation::Evaluator;
//! use foldwise::datasets::synthetic;
//! use foldwise::metrics::Metric;
//! use foldwise::neighbors;
//!
//! let (X, y) = synthetic::classification(&[50, 50, 50], 4, 3.0, 0);
//!
//! let mut evaluator = Evaluator::new(10);
//! evaluator.shuffle(true).seed(42).stratify(true);
//!
//! let report = evaluator
//!     .evaluate(&X, &y, || Ok(neighbors::Hyperparameters::new(5).classifier()), &Metric::Accuracy)
//!     .unwrap();
//!
//! assert_eq!(report.n_folds(), 10);
//! println!("Accuracy {:.3} +/- {:.3}", report.mean(), report.std());
//! ```

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::array::prelude::*;
use crate::error::{Error, Result, Stage};
use crate::metrics::Scorer;
use crate::traits::SupervisedModel;
use crate::utils::labels_are_categorical;

use super::folds::{kfold, stratified_kfold, FoldAssignment};
use super::report::ScoreReport;


/// Settings for a k-fold cross-validation run.
#[derive(Serialize, Deserialize)]
#[derive(Clone, Debug, PartialEq)]
pub struct Evaluator {
    n_folds: usize,
    shuffle: bool,
    seed: u64,
    stratify: bool,
    num_threads: usize,
    fold_timeout: Option<Duration>,
}


impl Evaluator {
    /// Evaluate with `n_folds` folds, unshuffled, unstratified, on the calling thread.
    pub fn new(n_folds: usize) -> Evaluator {
        Evaluator {
            n_folds,
            shuffle: false,
            seed: 0,
            stratify: false,
            num_threads: 1,
            fold_timeout: None,
        }
    }

    /// Permute the samples before building folds.
    pub fn shuffle(&mut self, shuffle: bool) -> &mut Evaluator {
        self.shuffle = shuffle;
        self
    }

    /// Seed for the permutation used when shuffling.
    pub fn seed(&mut self, seed: u64) -> &mut Evaluator {
        self.seed = seed;
        self
    }

    /// Keep class proportions in every fold.
    ///
    /// Only applies to whole-number class labels; other labels get plain folds.
    pub fn stratify(&mut self, stratify: bool) -> &mut Evaluator {
        self.stratify = stratify;
        self
    }

    /// Evaluate folds on this many worker threads.
    pub fn num_threads(&mut self, num_threads: usize) -> &mut Evaluator {
        self.num_threads = num_threads;
        self
    }

    /// Fail any fold that takes longer than `timeout`.
    ///
    /// The check happens once the fold has finished; a running fit is
    /// never interrupted, so a fit that never returns blocks the
    /// evaluation indefinitely.
    pub fn fold_timeout(&mut self, timeout: Duration) -> &mut Evaluator {
        self.fold_timeout = Some(timeout);
        self
    }

    /// Remove the per-fold time limit.
    pub fn clear_fold_timeout(&mut self) -> &mut Evaluator {
        self.fold_timeout = None;
        self
    }

    pub fn n_folds(&self) -> usize {
        self.n_folds
    }

    /// Validate the inputs and build the folds an evaluation would use.
    pub fn folds(&self, X: &Array, y: &Array) -> Result<FoldAssignment> {

        if X.rows() != y.rows() {
            return Err(Error::invalid(format!("features have {} rows but labels have {}",
                                              X.rows(),
                                              y.rows())));
        }
        if y.cols() != 1 {
            return Err(Error::invalid("labels must be a single column"));
        }
        if X.cols() == 0 {
            return Err(Error::invalid("features must have at least one column"));
        }
        if self.num_threads == 0 {
            return Err(Error::invalid("number of threads must be at least 1"));
        }

        let shuffle_seed = if self.shuffle { Some(self.seed) } else { None };

        let folds = if self.stratify && labels_are_categorical(y) {
            stratified_kfold(y, self.n_folds, shuffle_seed)?
        } else {
            if self.stratify {
                debug!("Labels are not categorical, building unstratified folds");
            }
            kfold(X.rows(), self.n_folds, shuffle_seed)?
        };

        if let Some(fold) = folds.fold_sizes().iter().position(|&size| size == folds.n_samples()) {
            return Err(Error::invalid(format!("fold {} would leave no training samples", fold)));
        }

        Ok(folds)
    }

    /// Cross-validate the models produced by `model_factory`.
    ///
    /// The factory is called once per fold, so every fold trains a fresh
    /// model. Scores are reported in fold order.
    pub fn evaluate<M, F, S>(&self, X: &Array, y: &Array, model_factory: F, scorer: &S) -> Result<ScoreReport>
    where
        M: SupervisedModel,
        F: Fn() -> std::result::Result<M, &'static str> + Sync,
        S: Scorer + Sync + ?Sized,
    {
        let folds = self.folds(X, y)?;

        let result = if self.num_threads > 1 {
            self.evaluate_parallel(X, y, &folds, &model_factory, scorer)
        } else {
            (0..folds.n_folds())
                .map(|fold| self.evaluate_fold(fold, X, y, &folds, &model_factory, scorer))
                .collect::<Result<Vec<f32>>>()
        };

        let scores = match result {
            Ok(scores) => scores,
            Err(err) => {
                warn!("Cross-validation aborted: {}", err);
                return Err(err);
            }
        };

        let report = ScoreReport::new(scores, scorer.direction());

        info!("Cross-validated {} folds: mean score {:.4}, std {:.4}",
              report.n_folds(),
              report.mean(),
              report.std());

        Ok(report)
    }

    fn evaluate_fold<M, F, S>(&self,
                              fold: usize,
                              X: &Array,
                              y: &Array,
                              folds: &FoldAssignment,
                              model_factory: &F,
                              scorer: &S)
                              -> Result<f32>
    where
        M: SupervisedModel,
        F: Fn() -> std::result::Result<M, &'static str>,
        S: Scorer + ?Sized,
    {
        let start = Instant::now();

        let (train, test) = folds.split(fold);

        let X_train = X.get_rows(&train);
        let y_train = y.get_rows(&train);
        let X_test = X.get_rows(&test);
        let y_test = y.get_rows(&test);

        let mut model = model_factory().map_err(|cause| Error::model_fit(fold, Stage::Construct, cause))?;

        model.fit(&X_train, &y_train)
            .map_err(|cause| Error::model_fit(fold, Stage::Fit, cause))?;

        let y_hat = model.predict(&X_test)
            .map_err(|cause| Error::model_fit(fold, Stage::Predict, cause))?;

        let score = scorer.score(&y_test, &y_hat)
            .map_err(|cause| Error::model_fit(fold, Stage::Score, cause))?;

        let elapsed = start.elapsed();

        if let Some(limit) = self.fold_timeout {
            if elapsed > limit {
                return Err(Error::model_fit(fold,
                                            Stage::Timeout,
                                            format!("took {:?}, limit is {:?}", elapsed, limit)));
            }
        }

        debug!("Fold {}: {} training samples, {} held out, score {:.4} in {:?}",
               fold,
               train.len(),
               test.len(),
               score,
               elapsed);

        Ok(score)
    }

    fn evaluate_parallel<M, F, S>(&self,
                                  X: &Array,
                                  y: &Array,
                                  folds: &FoldAssignment,
                                  model_factory: &F,
                                  scorer: &S)
                                  -> Result<Vec<f32>>
    where
        M: SupervisedModel,
        F: Fn() -> std::result::Result<M, &'static str> + Sync,
        S: Scorer + Sync + ?Sized,
    {
        let n_folds = folds.n_folds();
        let next_fold = AtomicUsize::new(0);
        let failed = AtomicBool::new(false);

        let outcome = crossbeam::scope(|scope| {
            let next_fold = &next_fold;
            let failed = &failed;
            let mut handles = Vec::new();

            for _ in 0..self.num_threads.min(n_folds) {
                handles.push(scope.spawn(move |_| {
                    let mut completed = Vec::new();

                    while !failed.load(Ordering::SeqCst) {
                        let fold = next_fold.fetch_add(1, Ordering::SeqCst);
                        if fold >= n_folds {
                            break;
                        }

                        let result = self.evaluate_fold(fold, X, y, folds, model_factory, scorer);

                        if result.is_err() {
                            failed.store(true, Ordering::SeqCst);
                        }

                        completed.push((fold, result));
                    }

                    completed
                }));
            }

            handles.into_iter().map(|handle| handle.join()).collect::<Vec<_>>()
        });

        let joined = match outcome {
            Ok(joined) => joined,
            Err(panic) => std::panic::resume_unwind(panic),
        };

        let mut scores = vec![None; n_folds];
        let mut first_error: Option<Error> = None;

        for worker in joined {
            let completed = match worker {
                Ok(completed) => completed,
                Err(panic) => std::panic::resume_unwind(panic),
            };

            for (fold, result) in completed {
                match result {
                    Ok(score) => scores[fold] = Some(score),
                    Err(err) => {
                        let earlier = match first_error {
                            Some(ref current) => err.fold() < current.fold(),
                            None => true,
                        };
                        if earlier {
                            first_error = Some(err);
                        }
                    }
                }
            }
        }

        if let Some(err) = first_error {
            return Err(err);
        }

        scores.into_iter()
            .collect::<Option<Vec<f32>>>()
            .ok_or_else(|| Error::invalid("not every fold was evaluated"))
    }
}


/// Cross-validate `model_factory` with `k` folds in a single call.
///
/// Equivalent to configuring an `Evaluator` with the same settings.
#[allow(clippy::too_many_arguments)]
pub fn evaluate<M, F, S>(X: &Array,
                         y: &Array,
                         model_factory: F,
                         k: usize,
                         scorer: &S,
                         shuffle: bool,
                         seed: u64,
                         stratify: bool)
                         -> Result<ScoreReport>
where
    M: SupervisedModel,
    F: Fn() -> std::result::Result<M, &'static str> + Sync,
    S: Scorer + Sync + ?Sized,
{
    let mut evaluator = Evaluator::new(k);
    evaluator.shuffle(shuffle).seed(seed).stratify(stratify);

    evaluator.evaluate(X, y, model_factory, scorer)
}


#[cfg(test)]
mod tests {
    use std::thread;

    use crate::datasets::synthetic;
    use crate::linear_models::{linear_regression, sgdclassifier};
    use crate::metrics::{Direction, Metric, ScoringFn};
    use crate::neighbors;

    use super::*;

    /// Predicts the training mean; fails to fit whenever the training set
    /// lacks a marker row.
    struct MeanModel {
        mean: Option<f32>,
        missing_marker_fails: Option<f32>,
    }

    impl SupervisedModel for MeanModel {
        fn fit(&mut self, X: &Array, y: &Array) -> std::result::Result<(), &'static str> {
            if let Some(marker) = self.missing_marker_fails {
                if X.iter_rows().all(|row| row[0] != marker) {
                    return Err("marker row missing");
                }
            }

            self.mean = Some(y.mean());
            Ok(())
        }

        fn decision_function(&self, X: &Array) -> std::result::Result<Array, &'static str> {
            match self.mean {
                Some(mean) => Ok(Array::from(vec![mean; X.rows()])),
                None => Err("not fitted"),
            }
        }

        fn predict(&self, X: &Array) -> std::result::Result<Array, &'static str> {
            self.decision_function(X)
        }
    }

    fn mean_model() -> std::result::Result<MeanModel, &'static str> {
        Ok(MeanModel { mean: None, missing_marker_fails: None })
    }

    fn index_data(n_samples: usize) -> (Array, Array) {
        let rows = (0..n_samples).map(|i| vec![i as f32]).collect::<Vec<_>>();
        let targets = (0..n_samples).map(|i| (i % 3) as f32).collect::<Vec<_>>();

        (Array::from(&rows), Array::from(targets))
    }

    #[test]
    fn invalid_fold_counts() {
        let (X, y) = index_data(10);

        for &k in &[0, 1, 11] {
            match Evaluator::new(k).evaluate(&X, &y, mean_model, &Metric::MeanSquaredError) {
                Err(Error::InvalidParameter(_)) => {}
                other => panic!("unexpected result {:?}", other),
            }
        }
    }

    #[test]
    fn mismatched_lengths() {
        let (X, _) = index_data(10);
        let y = Array::from(vec![0.0; 9]);

        let result = evaluate(&X, &y, mean_model, 3, &Metric::MeanSquaredError, false, 0, false);

        match result {
            Err(Error::InvalidParameter(msg)) => assert!(msg.contains("10")),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn invalid_settings() {
        let (X, y) = index_data(10);

        let mut evaluator = Evaluator::new(2);
        evaluator.num_threads(0);
        assert!(evaluator.evaluate(&X, &y, mean_model, &Metric::MeanSquaredError).is_err());

        let two_columns = Array::zeros(10, 2);
        assert!(Evaluator::new(2).evaluate(&X, &two_columns, mean_model, &Metric::MeanSquaredError).is_err());
    }

    #[test]
    fn continuous_labels_ignore_stratification() {
        let (X, y) = synthetic::regression(40, &[1.0, -2.0], 0.1, 6);
        let factory = || Ok(neighbors::Hyperparameters::new(3).regressor());

        let stratified = evaluate(&X, &y, factory, 4, &Metric::MeanSquaredError, true, 1, true).unwrap();
        let plain = evaluate(&X, &y, factory, 4, &Metric::MeanSquaredError, true, 1, false).unwrap();

        assert_eq!(stratified, plain);

        let mut evaluator = Evaluator::new(4);
        evaluator.shuffle(true).seed(1).stratify(true);
        assert_eq!(evaluator.folds(&X, &y).unwrap(), kfold(40, 4, Some(1)).unwrap());
    }

    #[test]
    fn parallel_scores_follow_fold_order() {
        // Targets equal row indices, so each fold scores its first held-out index.
        // Earlier folds sleep longer and finish last.
        let rows = (0..10).map(|i| vec![i as f32]).collect::<Vec<_>>();
        let X = Array::from(&rows);
        let y = Array::from((0..10).map(|i| i as f32).collect::<Vec<_>>());

        let first_index = ScoringFn::new(Direction::HigherIsBetter, |y_true: &Array, _: &Array| {
            let first = y_true.get(0, 0);
            thread::sleep(Duration::from_millis(((8.0 - first) * 15.0) as u64));
            Ok(first)
        });

        let mut evaluator = Evaluator::new(5);
        evaluator.num_threads(4);

        let report = evaluator.evaluate(&X, &y, mean_model, &first_index).unwrap();

        assert_eq!(report.scores(), &[0.0, 2.0, 4.0, 6.0, 8.0]);
    }

    #[test]
    fn factory_called_once_per_fold() {
        let (X, y) = index_data(20);
        let calls = AtomicUsize::new(0);

        let report = Evaluator::new(4)
            .evaluate(&X,
                      &y,
                      || {
                          calls.fetch_add(1, Ordering::SeqCst);
                          mean_model()
                      },
                      &Metric::MeanSquaredError)
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert_eq!(report.n_folds(), 4);
        assert_eq!(report.direction(), Direction::LowerIsBetter);
    }

    #[test]
    fn scores_follow_fold_order() {
        // Scores are the held-out fold sizes: 12 samples over 5 folds.
        let (X, y) = index_data(12);

        let first_index = ScoringFn::new(Direction::HigherIsBetter, |y_true: &Array, _: &Array| {
            Ok(y_true.rows() as f32)
        });

        let report = Evaluator::new(5).evaluate(&X, &y, mean_model, &first_index).unwrap();

        assert_eq!(report.scores(), &[3.0, 3.0, 2.0, 2.0, 2.0]);
    }

    #[test]
    fn fit_failure_names_the_fold() {
        let (X, y) = index_data(50);

        // Fold 3 of 10 holds rows 15..20; row 17 is then missing from training.
        let factory = || {
            Ok(MeanModel {
                mean: None,
                missing_marker_fails: Some(17.0),
            })
        };

        for &threads in &[1, 4] {
            let mut evaluator = Evaluator::new(10);
            evaluator.num_threads(threads);

            match evaluator.evaluate(&X, &y, factory, &Metric::MeanSquaredError) {
                Err(Error::ModelFit { fold, stage, .. }) => {
                    assert_eq!(fold, 3);
                    assert_eq!(stage, Stage::Fit);
                }
                other => panic!("unexpected result {:?}", other),
            }
        }
    }

    #[test]
    fn construct_and_score_failures() {
        let (X, y) = index_data(10);

        let failing_factory = || -> std::result::Result<MeanModel, &'static str> { Err("no model") };

        match Evaluator::new(2).evaluate(&X, &y, failing_factory, &Metric::MeanSquaredError) {
            Err(Error::ModelFit { fold: 0, stage: Stage::Construct, cause }) => assert_eq!(cause, "no model"),
            other => panic!("unexpected result {:?}", other),
        }

        let failing_scorer = ScoringFn::new(Direction::HigherIsBetter, |_: &Array, _: &Array| {
            Err("cannot score")
        });

        match Evaluator::new(2).evaluate(&X, &y, mean_model, &failing_scorer) {
            Err(Error::ModelFit { fold: 0, stage: Stage::Score, .. }) => {}
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn slow_folds_time_out() {
        let (X, y) = index_data(6);

        let slow_factory = || {
            thread::sleep(Duration::from_millis(20));
            mean_model()
        };

        let mut evaluator = Evaluator::new(3);
        evaluator.fold_timeout(Duration::from_millis(1));

        match evaluator.evaluate(&X, &y, slow_factory, &Metric::MeanSquaredError) {
            Err(Error::ModelFit { fold: 0, stage: Stage::Timeout, .. }) => {}
            other => panic!("unexpected result {:?}", other),
        }

        let mut evaluator = Evaluator::new(3);
        evaluator.fold_timeout(Duration::from_secs(60));
        assert!(evaluator.evaluate(&X, &y, mean_model, &Metric::MeanSquaredError).is_ok());

        let mut evaluator = Evaluator::new(3);
        evaluator.fold_timeout(Duration::from_millis(1)).clear_fold_timeout();
        assert_eq!(evaluator, Evaluator::new(3));
        assert!(evaluator.evaluate(&X, &y, slow_factory, &Metric::MeanSquaredError).is_ok());
    }

    #[test]
    fn leave_one_out() {
        let (X, y) = synthetic::regression(8, &[2.0], 0.0, 1);

        let report = Evaluator::new(8)
            .evaluate(&X, &y, || Ok(linear_regression::Hyperparameters::new(1).build()), &Metric::MeanAbsoluteError)
            .unwrap();

        assert_eq!(report.n_folds(), 8);
        for &score in report.scores() {
            assert!(score < 1e-3);
        }
    }

    #[test]
    fn stratified_iris_sized_problem() {
        let (X, y) = synthetic::classification(&[50, 50, 50], 4, 4.0, 8);

        let mut evaluator = Evaluator::new(10);
        evaluator.shuffle(true).seed(3).stratify(true);

        let folds = evaluator.folds(&X, &y).unwrap();
        assert_eq!(folds.fold_sizes(), vec![15; 10]);

        let report = evaluator
            .evaluate(&X, &y, || Ok(neighbors::Hyperparameters::new(5).classifier()), &Metric::Accuracy)
            .unwrap();

        assert_eq!(report.n_folds(), 10);
        assert!(report.mean() > 0.9);
    }

    #[test]
    fn deterministic_given_seed() {
        let (X, y) = synthetic::classification(&[40, 35], 3, 2.0, 4);

        let run = |threads: usize| {
            let mut evaluator = Evaluator::new(5);
            evaluator.shuffle(true).seed(99).num_threads(threads);

            let factory = || {
                Ok(sgdclassifier::Hyperparameters::new(3)
                    .learning_rate(0.5)
                    .epochs(3)
                    .build())
            };

            (evaluator.folds(&X, &y).unwrap(),
             evaluator.evaluate(&X, &y, factory, &Metric::Accuracy).unwrap())
        };

        let (folds_a, report_a) = run(1);
        let (folds_b, report_b) = run(1);
        let (folds_c, report_c) = run(3);

        assert_eq!(folds_a, folds_b);
        assert_eq!(report_a, report_b);
        assert_eq!(folds_a, folds_c);
        assert_eq!(report_a, report_c);
    }

    #[test]
    fn free_function_matches_builder() {
        let (X, y) = synthetic::classification(&[20, 20, 20], 2, 3.0, 6);

        let factory = || Ok(neighbors::Hyperparameters::new(3).classifier());

        let mut evaluator = Evaluator::new(6);
        evaluator.shuffle(true).seed(5).stratify(true);

        assert_eq!(evaluate(&X, &y, factory, 6, &Metric::Accuracy, true, 5, true).unwrap(),
                   evaluator.evaluate(&X, &y, factory, &Metric::Accuracy).unwrap());
    }

    #[test]
    fn serialization() {
        let mut evaluator = Evaluator::new(5);
        evaluator.shuffle(true).seed(12).fold_timeout(Duration::from_millis(250));

        let encoded = bincode::serialize(&evaluator).unwrap();
        let decoded: Evaluator = bincode::deserialize(&encoded).unwrap();

        assert_eq!(evaluator, decoded);
    }
}
