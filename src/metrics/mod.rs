//! Accuracy metrics.
//!
//! Each metric takes the true targets first and the predictions second,
//! and fails if the two are of unequal length or empty.

use crate::array::prelude::*;

mod scoring;

pub use self::scoring::{Direction, Metric, Scorer, ScoringFn};


fn check_pair(y_true: &Array, y_hat: &Array) -> Result<(), &'static str> {
    if y_true.rows() != y_hat.rows() {
        return Err("True and predicted targets are of unequal length");
    }
    if y_true.rows() == 0 {
        return Err("Cannot score an empty set of predictions");
    }

    Ok(())
}


/// Measure classifier accuracy: the share of exact matches.
pub fn accuracy_score(y_true: &Array, y_hat: &Array) -> Result<f32, &'static str> {

    check_pair(y_true, y_hat)?;

    let mut accuracy = 0.0;

    for (yt, yh) in y_true.data().iter().zip(y_hat.data().iter()) {
        if yt == yh {
            accuracy += 1.0;
        }
    }

    Ok(accuracy / (y_true.rows() as f32))
}

/// Measure Regressor Performance
/// Mean Absolute Error
pub fn mean_absolute_error(y_true: &Array, y_hat: &Array) -> Result<f32, &'static str> {
    check_pair(y_true, y_hat)?;
    let mut abs_diff = 0.0;
    for (yt, yh) in y_true.data().iter().zip(y_hat.data().iter()) {
        abs_diff += (yt - yh).abs();
    }

    Ok(abs_diff / (y_true.rows() as f32))
}

/// Measure Regressor Performance
/// Mean Squared Error
pub fn mean_squared_error(y_true: &Array, y_hat: &Array) -> Result<f32, &'static str> {
    check_pair(y_true, y_hat)?;
    let mut sq_diff = 0.0;
    for (yt, yh) in y_true.data().iter().zip(y_hat.data().iter()) {
        sq_diff += (yt - yh).powi(2);
    }

    Ok(sq_diff / (y_true.rows() as f32))
}

/// Coefficient of determination.
///
/// A constant target gives 1.0 for a perfect fit and 0.0 otherwise.
pub fn r2_score(y_true: &Array, y_hat: &Array) -> Result<f32, &'static str> {
    check_pair(y_true, y_hat)?;

    let mean = y_true.mean();

    let mut ss_res = 0.0;
    let mut ss_tot = 0.0;

    for (yt, yh) in y_true.data().iter().zip(y_hat.data().iter()) {
        ss_res += (yt - yh).powi(2);
        ss_tot += (yt - mean).powi(2);
    }

    if ss_tot == 0.0 {
        return Ok(if ss_res == 0.0 { 1.0 } else { 0.0 });
    }

    Ok(1.0 - ss_res / ss_tot)
}
