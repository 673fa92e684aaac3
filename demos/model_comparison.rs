//! Example comparing several classifiers with stratified 10-fold cross-validation.
//!
//! A synthetic three-class problem is generated, the models are evaluated on identical
//! folds, the nearest neighbour model is tuned with a grid search, and finally a noisy
//! regression problem is used for forward feature selection.
#![allow(non_snake_case)]

use std::process;
use std::time::Duration;

use foldwise::prelude::*;
use foldwise::cross_validation::{Evaluator, ScoreReport};
use foldwise::datasets::synthetic;
use foldwise::linear_models::{linear_regression, sgdclassifier};
use foldwise::metrics::Metric;
use foldwise::model_selection::{compare_models, forward_selection, Candidate, GridSearch};
use foldwise::neighbors;
use foldwise::Error;


fn describe(name: &str, report: &ScoreReport) {
    println!("{:>12}: {:.4} +/- {:.4} (min {:.4}, max {:.4})",
             name,
             report.mean(),
             report.std(),
             report.min(),
             report.max());
}


fn run_comparison(X: &Array, y: &Array, evaluator: &Evaluator) -> Result<(), Error> {

    println!("Comparing classifiers...");

    let dim = X.cols();

    let candidates = vec![
        Candidate::new("logistic", move || {
            Ok(sgdclassifier::Hyperparameters::new(dim)
                .learning_rate(0.5)
                .l2_penalty(0.000001)
                .epochs(10)
                .one_vs_rest())
        }),
        Candidate::new("1-nn", || Ok(neighbors::Hyperparameters::new(1).classifier())),
        Candidate::new("15-nn", || Ok(neighbors::Hyperparameters::new(15).classifier())),
    ];

    let comparison = compare_models(evaluator, X, y, &candidates, &Metric::Accuracy)?;

    for (name, report) in comparison.ranked() {
        describe(name, report);
    }

    Ok(())
}


fn run_grid_search(X: &Array, y: &Array, evaluator: &Evaluator) -> Result<(), Error> {

    println!("Tuning the number of neighbours...");

    let search = GridSearch::new(vec![1, 3, 5, 9, 15, 25]);
    let result = search.evaluate(evaluator,
                                 X,
                                 y,
                                 |&k| Ok(neighbors::Hyperparameters::new(k).classifier()),
                                 &Metric::Accuracy)?;

    for (k, report) in result.results() {
        describe(&format!("k = {}", k), report);
    }

    if let Some((k, report)) = result.best() {
        println!("Best number of neighbours: {} ({:.4})", k, report.mean());
    }

    Ok(())
}


fn run_feature_selection() -> Result<(), Error> {

    println!("Selecting regression features...");

    let (X, y) = synthetic::regression(200, &[0.0, 2.5, 0.0, -1.0, 0.3, 0.0], 0.2, 7);

    let mut evaluator = Evaluator::new(5);
    evaluator.shuffle(true).seed(7);

    let path = forward_selection(&evaluator,
                                 &X,
                                 &y,
                                 4,
                                 |dim| Ok(linear_regression::Hyperparameters::new(dim).build()),
                                 &Metric::R2)?;

    for step in path.steps() {
        describe(&format!("{:?}", step.columns()), step.report());
    }

    if let Some(best) = path.best() {
        println!("Best feature set: {:?}", best.columns());
    }

    Ok(())
}


fn run() -> Result<(), Error> {

    let (X, y) = synthetic::classification(&[120, 60, 20], 5, 2.0, 42);

    println!("Data: {} by {} matrix, {} classes", X.rows(), X.cols(), 3);

    let mut evaluator = Evaluator::new(10);
    evaluator.shuffle(true)
        .seed(42)
        .stratify(true)
        .num_threads(4)
        .fold_timeout(Duration::from_secs(10));

    run_comparison(&X, &y, &evaluator)?;
    run_grid_search(&X, &y, &evaluator)?;
    run_feature_selection()
}


fn main() {
    if let Err(err) = run() {
        println!("Evaluation failed: {}", err);
        process::exit(1);
    }
}
