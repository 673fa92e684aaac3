//! Internal utils.
use std::cmp::Ordering;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::array::prelude::*;


/// Build the generator used for every seeded random choice in the crate.
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}


pub fn check_matched_dimensions(X: &Array, y: &Array) -> Result<(), &'static str> {
    if X.rows() != y.rows() {
        return Err("Data matrix and target array do not have the same number of rows");
    }
    if y.cols() != 1 {
        return Err("Target array must have exactly one column");
    }

    Ok(())
}


pub fn check_data_dimensionality(dim: usize, X: &Array) -> Result<(), &'static str> {
    match X.cols() == dim {
        true => Ok(()),
        false => Err("Model input and model dimensionality differ."),
    }
}


/// Whether every label is a finite whole number.
pub fn labels_are_categorical(y: &Array) -> bool {
    y.data().iter().all(|v| v.is_finite() && v.fract() == 0.0)
}


/// Distinct label values, in increasing order.
pub fn class_labels(y: &Array) -> Vec<f32> {
    let mut classes = y.data().clone();
    classes.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    classes.dedup();

    classes
}
