//! Validation via repeated random shuffling
//! of the data and splitting into a training and test set.
//!
//! # Examples
//!
//! ```
//! use foldwise::prelude::*;
//! use foldwise::datasets::synthetic;
//! use foldwise::cross_validation::ShuffleSplit;
//!
//!
//! let (X, y) = synthetic::classification(&[50, 50, 50], 4, 3.0, 0);
//!
//! let num_splits = 10;
//! let test_percentage = 0.2;
//!
//! for (train_idx, test_idx) in ShuffleSplit::new(X.rows(), num_splits, test_percentage).unwrap() {
//!
//!     let X_train = X.get_rows(&train_idx);
//!     let y_train = y.get_rows(&train_idx);
//!     let X_test = X.get_rows(&test_idx);
//!     let y_test = y.get_rows(&test_idx);
//!
//!     // Model fitting happens here
//! }
//! ```

use std::iter::Iterator;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::array::prelude::*;
use crate::error::{Error, Result};
use crate::utils::{check_matched_dimensions, seeded_rng};


pub struct ShuffleSplit {
    n: usize,
    n_iter: usize,
    test_size: f32,
    rng: StdRng,
    iter: usize,
}


fn check_test_size(n_samples: usize, test_size: f32) -> Result<usize> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(Error::invalid(format!("test size must lie in (0, 1), got {}", test_size)));
    }

    let split_idx = (n_samples as f32 * (1.0 - test_size)).floor() as usize;

    if split_idx == 0 || split_idx == n_samples {
        return Err(Error::invalid("test size leaves the train or the test set empty"));
    }

    Ok(split_idx)
}


impl ShuffleSplit {
    /// Create a new instance of the shuffle split utility.
    ///
    /// Iterating over it will split the dataset of size `n_samples`
    /// into a train set of `(1.0 - test_size) * n_samples` rows
    /// and a test set of the remaining rows, `n_iter` times.
    pub fn new(n_samples: usize, n_iter: usize, test_size: f32) -> Result<ShuffleSplit> {
        check_test_size(n_samples, test_size)?;

        Ok(ShuffleSplit {
            n: n_samples,
            n_iter,
            test_size,
            rng: seeded_rng(0),
            iter: 0,
        })
    }

    /// Reseed the random number generator.
    pub fn set_seed(&mut self, seed: u64) {
        self.rng = seeded_rng(seed);
    }

    fn get_shuffled_indices(&mut self) -> Vec<usize> {
        let mut indices = (0..self.n).collect::<Vec<usize>>();
        indices.shuffle(&mut self.rng);

        indices
    }
}


impl Iterator for ShuffleSplit {
    type Item = (Vec<usize>, Vec<usize>);
    fn next(&mut self) -> Option<(Vec<usize>, Vec<usize>)> {

        let ret = match self.iter < self.n_iter {
            true => {
                let split_idx: usize = (self.n as f32 * (1.0 - self.test_size)).floor() as usize;
                let shuffled_indices = self.get_shuffled_indices();
                let (train, test) = shuffled_indices.split_at(split_idx);
                Some((train.to_owned(), test.to_owned()))
            }
            false => None,
        };

        self.iter += 1;
        ret
    }
}


/// Split a dataset once into `(X_train, X_test, y_train, y_test)`.
pub fn train_test_split(X: &Array, y: &Array, test_size: f32, seed: u64) -> Result<(Array, Array, Array, Array)> {

    check_matched_dimensions(X, y).map_err(Error::invalid)?;

    let mut split = ShuffleSplit::new(X.rows(), 1, test_size)?;
    split.set_seed(seed);

    match split.next() {
        Some((train, test)) => Ok((X.get_rows(&train), X.get_rows(&test), y.get_rows(&train), y.get_rows(&test))),
        None => Err(Error::invalid("no split produced")),
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iteration() {
        let split = ShuffleSplit::new(100, 4, 0.2).unwrap();
        let mut count = 0;

        for _ in split {
            count += 1;
        }

        assert!(count == 4);
    }


    #[test]
    fn size_split() {
        let split = ShuffleSplit::new(100, 4, 0.2).unwrap();

        for (train, test) in split {
            assert!(train.len() == 80);
            assert!(test.len() == 20);
        }
    }


    #[test]
    fn set_seed() {
        let mut split1 = ShuffleSplit::new(1000, 1, 0.2).unwrap();
        let mut split2 = ShuffleSplit::new(1000, 1, 0.2).unwrap();

        split1.set_seed(1234);
        split2.set_seed(1234);

        let set1 = split1.collect::<Vec<_>>();
        let set2 = split2.collect::<Vec<_>>();

        assert!(set1[0].0 == set2[0].0);

        let mut split3 = ShuffleSplit::new(1000, 1, 0.2).unwrap();
        split3.set_seed(4321);

        assert!(split3.collect::<Vec<_>>()[0].0 != set1[0].0);
    }

    #[test]
    fn invalid_test_size() {
        assert!(ShuffleSplit::new(100, 1, 0.0).is_err());
        assert!(ShuffleSplit::new(100, 1, 1.0).is_err());
        assert!(ShuffleSplit::new(2, 1, 0.9).is_err());
    }

    #[test]
    fn single_split() {
        let X = Array::from(&(0..10).map(|i| vec![i as f32, 0.0]).collect::<Vec<_>>());
        let y = Array::from((0..10).map(|i| i as f32).collect::<Vec<_>>());

        let (X_train, X_test, y_train, y_test) = train_test_split(&X, &y, 0.3, 5).unwrap();

        assert_eq!(X_train.rows(), 7);
        assert_eq!(X_test.rows(), 3);

        // Rows stay aligned with their targets.
        for (row, &target) in X_train.iter_rows().zip(y_train.data().iter()) {
            assert_eq!(row[0], target);
        }
        for (row, &target) in X_test.iter_rows().zip(y_test.data().iter()) {
            assert_eq!(row[0], target);
        }

        assert!(train_test_split(&X, &Array::from(vec![1.0]), 0.3, 5).is_err());
    }
}
