//! K-fold cross validation iterator.
//!
//! Iterating yields `(train_indices, test_indices)` pairs, one per fold.
//! Indices are shuffled by default with a fixed seed; use `set_seed` to
//! pick another permutation, or `kfold` for unshuffled folds.
//!
//! # Examples
//!
//! ```
//! use foldwise::prelude::*;
//! use foldwise::datasets::synthetic;
//! use foldwise::cross_validation::CrossValidation;
//!
//!
//! let (X, y) = synthetic::classification(&[50, 50, 50], 4, 3.0, 0);
//!
//! let num_splits = 10;
//!
//! for (train_idx, test_idx) in CrossValidation::new(X.rows(), num_splits).unwrap() {
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

use crate::error::Result;

use super::folds::{kfold, FoldAssignment};


const DEFAULT_SEED: u64 = 0;


pub struct CrossValidation {
    folds: FoldAssignment,
    iter: usize,
}


impl CrossValidation {
    /// Create a new instance of the cross validation utility.
    ///
    /// Fails if `n_folds > n_samples` or `n_folds <= 1`.
    pub fn new(n_samples: usize, n_folds: usize) -> Result<CrossValidation> {
        Ok(CrossValidation {
            folds: kfold(n_samples, n_folds, Some(DEFAULT_SEED))?,
            iter: 0,
        })
    }

    /// Iterate over an existing fold assignment.
    pub fn from_folds(folds: FoldAssignment) -> CrossValidation {
        CrossValidation { folds, iter: 0 }
    }

    /// Reshuffle the indices with `seed` and restart the iteration.
    pub fn set_seed(&mut self, seed: u64) {
        // Both arguments were validated when the folds were first built.
        if let Ok(folds) = kfold(self.folds.n_samples(), self.folds.n_folds(), Some(seed)) {
            self.folds = folds;
        }
        self.iter = 0;
    }

    /// The fold assignment being iterated over.
    pub fn folds(&self) -> &FoldAssignment {
        &self.folds
    }
}


impl Iterator for CrossValidation {
    type Item = (Vec<usize>, Vec<usize>);

    fn next(&mut self) -> Option<(Vec<usize>, Vec<usize>)> {

        let ret = match self.iter < self.folds.n_folds() {
            true => Some(self.folds.split(self.iter)),
            false => None,
        };

        self.iter += 1;

        ret
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    use crate::array::prelude::*;
    use crate::cross_validation::folds::stratified_kfold;

    #[test]
    fn cross_validate_iteration() {
        let split = CrossValidation::new(100, 4).unwrap();
        let mut count = 0;

        for _ in split {
            count += 1;
        }

        assert!(count == 4);
    }


    #[test]
    fn cross_validate_size_split() {
        let split = CrossValidation::new(100, 4).unwrap();

        for (train, test) in split {

            let mut set = HashSet::new();

            assert!(train.len() == 75);
            assert!(test.len() == 25);

            for idx in train.iter().chain(test.iter()) {
                set.insert(idx);
            }

            assert!(set.len() == 100);
        }
    }

    #[test]
    fn uneven_split_covers_everything() {
        let split = CrossValidation::new(10, 3).unwrap();

        let mut held_out = Vec::new();

        for (train, test) in split {
            assert_eq!(train.len() + test.len(), 10);
            held_out.extend(test);
        }

        held_out.sort();
        assert_eq!(held_out, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn set_seed() {
        let mut split1 = CrossValidation::new(1000, 5).unwrap();
        let mut split2 = CrossValidation::new(1000, 5).unwrap();

        split1.set_seed(7);
        split2.set_seed(7);

        assert_eq!(split1.collect::<Vec<_>>(), split2.collect::<Vec<_>>());

        let mut split3 = CrossValidation::new(1000, 5).unwrap();
        split3.set_seed(8);

        let mut split4 = CrossValidation::new(1000, 5).unwrap();
        split4.set_seed(7);

        assert!(split3.next() != split4.next());
    }

    #[test]
    fn invalid_fold_counts() {
        assert!(CrossValidation::new(10, 1).is_err());
        assert!(CrossValidation::new(10, 11).is_err());
    }

    #[test]
    fn iterate_stratified_folds() {
        let y = Array::from(vec![0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0]);
        let folds = stratified_kfold(&y, 4, Some(3)).unwrap();

        let split = CrossValidation::from_folds(folds.clone());
        assert_eq!(split.folds(), &folds);

        let mut count = 0;

        for (train, test) in split {
            assert_eq!(train.len(), 6);
            assert_eq!(test.len(), 2);

            // One sample of each class held out per fold.
            let held_out_ones = test.iter().filter(|&&idx| y.get(idx, 0) == 1.0).count();
            assert_eq!(held_out_ones, 1);

            count += 1;
        }

        assert_eq!(count, 4);
    }
}
