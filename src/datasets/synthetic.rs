//! Seeded synthetic datasets.
//!
//! Both generators are deterministic given their seed, so tests and demos
//! built on them are reproducible.

use rand::Rng;

use crate::array::prelude::*;
use crate::utils::seeded_rng;


/// Generate a classification problem with one cluster per class.
///
/// Class `c` has `class_sizes[c]` samples. Feature `j` of its cluster centre
/// is `separation * ((c + j) % n_classes)`, and every feature gets uniform
/// noise in `[-1, 1)`. Rows are grouped by class, in class order, and the
/// labels are `0.0, 1.0, ...`.
///
/// # Panics
/// If there are no samples at all or `n_features` is zero.
pub fn classification(class_sizes: &[usize],
                      n_features: usize,
                      separation: f32,
                      seed: u64)
                      -> (Array, Array) {

    assert!(class_sizes.iter().sum::<usize>() > 0);
    assert!(n_features > 0);

    let mut rng = seeded_rng(seed);
    let n_classes = class_sizes.len();

    let mut rows = Vec::new();
    let mut labels = Vec::new();

    for (class, &size) in class_sizes.iter().enumerate() {
        for _ in 0..size {
            let row = (0..n_features)
                .map(|j| {
                    let centre = separation * ((class + j) % n_classes) as f32;
                    centre + rng.gen_range(-1.0..1.0)
                })
                .collect::<Vec<f32>>();

            rows.push(row);
            labels.push(class as f32);
        }
    }

    (Array::from(&rows), Array::from(labels))
}


/// Generate a linear regression problem.
///
/// Features are uniform in `[-1, 1)`; the target is the dot product with
/// `coefficients` plus uniform noise of amplitude `noise`.
///
/// # Panics
/// If `n_samples` is zero or `coefficients` is empty.
pub fn regression(n_samples: usize, coefficients: &[f32], noise: f32, seed: u64) -> (Array, Array) {

    assert!(n_samples > 0);
    assert!(!coefficients.is_empty());

    let mut rng = seeded_rng(seed);

    let mut rows = Vec::with_capacity(n_samples);
    let mut targets = Vec::with_capacity(n_samples);

    for _ in 0..n_samples {
        let row = coefficients.iter()
            .map(|_| rng.gen_range(-1.0..1.0))
            .collect::<Vec<f32>>();

        let target = row.iter().zip(coefficients.iter()).map(|(x, w)| x * w).sum::<f32>()
            + noise * rng.gen_range(-1.0..1.0);

        rows.push(row);
        targets.push(target);
    }

    (Array::from(&rows), Array::from(targets))
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shapes_and_labels() {
        let (X, y) = classification(&[3, 2], 4, 2.0, 0);

        assert_eq!(X.rows(), 5);
        assert_eq!(X.cols(), 4);
        assert_eq!(y.data(), &vec![0.0, 0.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn reproducible() {
        let (a, _) = classification(&[5, 5], 2, 2.0, 17);
        let (b, _) = classification(&[5, 5], 2, 2.0, 17);
        let (c, _) = classification(&[5, 5], 2, 2.0, 18);

        assert_eq!(a, b);
        assert!(a != c);

        let (_, y1) = regression(20, &[1.0, 2.0], 0.5, 3);
        let (_, y2) = regression(20, &[1.0, 2.0], 0.5, 3);
        assert_eq!(y1, y2);
    }
}
