//! Assignment of samples to cross-validation folds.
//!
//! Folds are built by cutting the (optionally shuffled) sample indices into
//! `n_folds` contiguous groups. The first `n_samples % n_folds` folds hold
//! one extra sample, so fold sizes never differ by more than one.
//!
//! Stratified folds keep the same fold sizes, and also keep every class's
//! share of each fold within one sample of its share of the whole dataset.
//!
//! ```
//! use foldwise::prelude::*;
//! use foldwise::cross_validation::{kfold, stratified_kfold};
//!
//! let folds = kfold(10, 3, None).unwrap();
//! assert_eq!(folds.fold_sizes(), vec![4, 3, 3]);
//! assert_eq!(folds.fold(0), &[0, 1, 2, 3]);
//!
//! let y = Array::from(vec![0.0, 0.0, 0.0, 0.0, 1.0, 1.0]);
//! let folds = stratified_kfold(&y, 2, Some(7)).unwrap();
//! assert_eq!(folds.fold_sizes(), vec![3, 3]);
//! ```

use std::cmp::Ordering;

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::array::prelude::*;
use crate::error::{Error, Result};
use crate::utils::{class_labels, labels_are_categorical, seeded_rng};


/// The held-out indices of every fold, in fold order.
#[derive(Serialize, Deserialize)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FoldAssignment {
    n_samples: usize,
    folds: Vec<Vec<usize>>,
}


impl FoldAssignment {
    pub fn n_folds(&self) -> usize {
        self.folds.len()
    }

    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    /// Held-out indices of fold `fold`.
    ///
    /// # Panics
    /// If `fold` is out of range.
    pub fn fold(&self, fold: usize) -> &[usize] {
        &self.folds[fold]
    }

    pub fn folds(&self) -> &[Vec<usize>] {
        &self.folds
    }

    pub fn fold_sizes(&self) -> Vec<usize> {
        self.folds.iter().map(|fold| fold.len()).collect()
    }

    /// The fold id of every sample.
    pub fn fold_of(&self) -> Vec<usize> {
        let mut fold_of = vec![0; self.n_samples];

        for (fold_id, fold) in self.folds.iter().enumerate() {
            for &idx in fold {
                fold_of[idx] = fold_id;
            }
        }

        fold_of
    }

    /// Indices of every fold except `fold`, in fold order.
    pub fn train_indices(&self, fold: usize) -> Vec<usize> {
        let mut train = Vec::with_capacity(self.n_samples - self.folds[fold].len());

        for (fold_id, indices) in self.folds.iter().enumerate() {
            if fold_id != fold {
                train.extend_from_slice(indices);
            }
        }

        train
    }

    /// `(train, held_out)` indices for fold `fold`.
    pub fn split(&self, fold: usize) -> (Vec<usize>, Vec<usize>) {
        (self.train_indices(fold), self.folds[fold].clone())
    }
}


pub(crate) fn check_n_folds(n_samples: usize, n_folds: usize) -> Result<()> {
    if n_folds < 2 {
        return Err(Error::invalid(format!("number of folds must be at least 2, got {}", n_folds)));
    }
    if n_folds > n_samples {
        return Err(Error::invalid(format!("number of folds ({}) exceeds the number of samples ({})",
                                          n_folds,
                                          n_samples)));
    }

    Ok(())
}


fn fold_sizes(n_samples: usize, n_folds: usize) -> Vec<usize> {
    let fold_size = n_samples / n_folds;
    let remainder = n_samples % n_folds;

    (0..n_folds)
        .map(|i| if i < remainder { fold_size + 1 } else { fold_size })
        .collect()
}


fn sample_order(n_samples: usize, shuffle_seed: Option<u64>) -> Vec<usize> {
    let mut indices = (0..n_samples).collect::<Vec<_>>();

    if let Some(seed) = shuffle_seed {
        indices.shuffle(&mut seeded_rng(seed));
    }

    indices
}


/// Plain k-fold assignment of `n_samples` samples.
///
/// With `shuffle_seed` the indices are permuted first; the same seed
/// always gives the same folds.
pub fn kfold(n_samples: usize, n_folds: usize, shuffle_seed: Option<u64>) -> Result<FoldAssignment> {

    check_n_folds(n_samples, n_folds)?;

    let indices = sample_order(n_samples, shuffle_seed);

    let mut folds = Vec::with_capacity(n_folds);
    let mut start = 0;

    for size in fold_sizes(n_samples, n_folds) {
        folds.push(indices[start..start + size].to_vec());
        start += size;
    }

    Ok(FoldAssignment { n_samples, folds })
}


/// Stratified k-fold assignment for the class labels in `y`.
///
/// Labels must be whole numbers. Every fold keeps the plain k-fold size,
/// and holds each class in proportion to its overall frequency, to within
/// one sample.
pub fn stratified_kfold(y: &Array, n_folds: usize, shuffle_seed: Option<u64>) -> Result<FoldAssignment> {

    if y.cols() != 1 {
        return Err(Error::invalid("labels must be a single column"));
    }
    if !labels_are_categorical(y) {
        return Err(Error::invalid("stratification requires whole-number class labels"));
    }

    let n_samples = y.rows();
    check_n_folds(n_samples, n_folds)?;

    let labels = class_labels(y);
    let mut classes = vec![Vec::new(); labels.len()];

    for idx in sample_order(n_samples, shuffle_seed) {
        let label = y.get(idx, 0);
        let class = labels.binary_search_by(|known| known.partial_cmp(&label).unwrap_or(Ordering::Equal));

        match class {
            Ok(class) => classes[class].push(idx),
            Err(_) => return Err(Error::invalid("label missing from the class list")),
        }
    }

    let class_sizes = classes.iter().map(|members| members.len()).collect::<Vec<_>>();
    let counts = allocate(&class_sizes, &fold_sizes(n_samples, n_folds))?;

    let mut folds = vec![Vec::new(); n_folds];

    for (class, members) in classes.iter().enumerate() {
        let mut start = 0;
        for (fold, fold_counts) in folds.iter_mut().zip(counts.iter()) {
            let count = fold_counts[class];
            fold.extend_from_slice(&members[start..start + count]);
            start += count;
        }
    }

    Ok(FoldAssignment { n_samples, folds })
}


/// Per-fold, per-class sample counts (`counts[fold][class]`).
///
/// Each count is the floor or the ceiling of `class_size * fold_size / n`,
/// with row sums equal to the fold sizes and column sums equal to the class
/// sizes. Remainders are placed in increasing fold order, moving earlier
/// placements along when a fold is already full.
fn allocate(class_sizes: &[usize], fold_sizes: &[usize]) -> Result<Vec<Vec<usize>>> {

    let n_samples = class_sizes.iter().sum::<usize>();

    let mut counts = vec![vec![0; class_sizes.len()]; fold_sizes.len()];
    let mut eligible = vec![vec![false; class_sizes.len()]; fold_sizes.len()];

    for (fold, &fold_size) in fold_sizes.iter().enumerate() {
        for (class, &class_size) in class_sizes.iter().enumerate() {
            let target = class_size * fold_size;
            counts[fold][class] = target / n_samples;
            eligible[fold][class] = target % n_samples != 0;
        }
    }

    let mut remainders = Remainders {
        eligible: &eligible,
        placed: vec![vec![false; class_sizes.len()]; fold_sizes.len()],
        spare: fold_sizes.iter()
            .zip(counts.iter())
            .map(|(&size, fold_counts)| size - fold_counts.iter().sum::<usize>())
            .collect(),
    };

    for (class, &class_size) in class_sizes.iter().enumerate() {
        let assigned = counts.iter().map(|fold_counts| fold_counts[class]).sum::<usize>();

        for _ in assigned..class_size {
            let mut visited = vec![false; fold_sizes.len()];
            if !remainders.place(class, &mut visited) {
                return Err(Error::invalid("unable to build stratified folds for these labels"));
            }
        }
    }

    for (fold_counts, placed) in counts.iter_mut().zip(remainders.placed.iter()) {
        for (count, &extra) in fold_counts.iter_mut().zip(placed.iter()) {
            if extra {
                *count += 1;
            }
        }
    }

    Ok(counts)
}


/// Bookkeeping for placing the one-sample remainders of each class.
struct Remainders<'a> {
    eligible: &'a [Vec<bool>],
    placed: Vec<Vec<bool>>,
    spare: Vec<usize>,
}


impl<'a> Remainders<'a> {
    /// Place one remainder of `class`, looking for an augmenting path.
    fn place(&mut self, class: usize, visited: &mut [bool]) -> bool {

        for fold in 0..self.spare.len() {
            if visited[fold] || !self.eligible[fold][class] || self.placed[fold][class] {
                continue;
            }

            visited[fold] = true;

            if self.spare[fold] > 0 {
                self.spare[fold] -= 1;
                self.placed[fold][class] = true;
                return true;
            }

            for other in 0..self.placed[fold].len() {
                if other != class && self.placed[fold][other] && self.place(other, visited) {
                    self.placed[fold][other] = false;
                    self.placed[fold][class] = true;
                    return true;
                }
            }
        }

        false
    }
}


#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::Rng;

    use crate::utils::seeded_rng;

    use super::*;

    fn assert_partition(folds: &FoldAssignment) {
        let mut seen = HashSet::new();

        for fold in folds.folds() {
            for &idx in fold {
                assert!(idx < folds.n_samples());
                assert!(seen.insert(idx), "index {} appears twice", idx);
            }
        }

        assert_eq!(seen.len(), folds.n_samples());

        let sizes = folds.fold_sizes();
        let max = *sizes.iter().max().unwrap();
        let min = *sizes.iter().min().unwrap();
        assert!(max - min <= 1);
    }

    #[test]
    fn partition_for_all_sizes() {
        for n_samples in 2..40 {
            for n_folds in 2..(n_samples + 1) {
                let folds = kfold(n_samples, n_folds, None).unwrap();
                assert_eq!(folds.n_folds(), n_folds);
                assert_partition(&folds);

                let shuffled = kfold(n_samples, n_folds, Some(n_samples as u64)).unwrap();
                assert_partition(&shuffled);
            }
        }
    }

    #[test]
    fn larger_folds_come_first() {
        let folds = kfold(11, 4, None).unwrap();

        assert_eq!(folds.fold_sizes(), vec![3, 3, 3, 2]);
        assert_eq!(folds.fold(1), &[3, 4, 5]);
        assert_eq!(folds.fold(3), &[9, 10]);
        assert_eq!(folds.fold_of(), vec![0, 0, 0, 1, 1, 1, 2, 2, 2, 3, 3]);
    }

    #[test]
    fn train_and_held_out_are_complementary() {
        let folds = kfold(17, 5, Some(3)).unwrap();

        for fold in 0..folds.n_folds() {
            let (train, test) = folds.split(fold);

            let train_set = train.iter().collect::<HashSet<_>>();
            assert!(test.iter().all(|idx| !train_set.contains(idx)));
            assert_eq!(train.len() + test.len(), 17);
        }
    }

    #[test]
    fn shuffling_is_seeded() {
        let a = kfold(50, 5, Some(10)).unwrap();
        let b = kfold(50, 5, Some(10)).unwrap();
        let c = kfold(50, 5, Some(11)).unwrap();

        assert_eq!(a, b);
        assert!(a != c);
        assert!(a != kfold(50, 5, None).unwrap());
    }

    #[test]
    fn leave_one_out() {
        let folds = kfold(6, 6, Some(1)).unwrap();

        assert_eq!(folds.fold_sizes(), vec![1; 6]);
        assert_partition(&folds);
    }

    #[test]
    fn invalid_fold_counts() {
        assert!(kfold(10, 1, None).is_err());
        assert!(kfold(10, 0, None).is_err());
        assert!(kfold(10, 11, None).is_err());
        assert!(stratified_kfold(&Array::from(vec![0.0, 1.0]), 3, None).is_err());
    }

    #[test]
    fn stratification_requires_class_labels() {
        let y = Array::from(vec![0.0, 0.5, 1.0, 1.0]);
        assert!(stratified_kfold(&y, 2, None).is_err());

        let mut wide = Array::zeros(4, 2);
        wide.set(0, 0, 1.0);
        assert!(stratified_kfold(&wide, 2, None).is_err());
    }

    #[test]
    fn stratified_large_labels_stay_distinct() {
        let y = Array::from(vec![1e19, 1e19, 2e19, 2e19]);

        let folds = stratified_kfold(&y, 2, None).unwrap();

        assert_eq!(folds.fold(0), &[0, 2]);
        assert_eq!(folds.fold(1), &[1, 3]);
    }

    #[test]
    fn stratified_balanced_classes() {
        let labels = (0..150).map(|i| (i / 50) as f32).collect::<Vec<_>>();
        let y = Array::from(labels);

        let folds = stratified_kfold(&y, 10, Some(0)).unwrap();

        assert_eq!(folds.fold_sizes(), vec![15; 10]);
        assert_partition(&folds);

        for fold in folds.folds() {
            for class in 0..3 {
                let count = fold.iter().filter(|&&idx| y.get(idx, 0) == class as f32).count();
                assert_eq!(count, 5);
            }
        }
    }

    fn assert_proportional(y: &Array, folds: &FoldAssignment) {
        let n_samples = y.rows() as f32;
        let classes = crate::utils::class_labels(y);

        for fold in folds.folds() {
            for &class in &classes {
                let class_size = y.data().iter().filter(|&&v| v == class).count() as f32;
                let count = fold.iter().filter(|&&idx| y.get(idx, 0) == class).count() as f32;
                let expected = class_size / n_samples * fold.len() as f32;

                assert!((count - expected).abs() <= 1.0,
                        "class {} has {} samples in a fold of {}, expected {}",
                        class, count, fold.len(), expected);
            }
        }
    }

    #[test]
    fn stratified_imbalanced_classes() {
        // Class sizes for which dealing each class's remainder to the
        // lowest folds would unbalance the fold sizes.
        let mut labels = Vec::new();
        for (class, &size) in [10usize, 19, 9, 8].iter().enumerate() {
            labels.extend(std::iter::repeat(class as f32).take(size));
        }
        let y = Array::from(labels);

        let folds = stratified_kfold(&y, 6, None).unwrap();

        assert_eq!(folds.fold_sizes(), vec![8, 8, 8, 8, 7, 7]);
        assert_partition(&folds);
        assert_proportional(&y, &folds);
    }

    #[test]
    fn stratified_random_label_sets() {
        let mut rng = seeded_rng(2024);

        for _ in 0..300 {
            let n_classes = rng.gen_range(1..6);
            let mut labels = Vec::new();
            for class in 0..n_classes {
                let size = rng.gen_range(1..30);
                labels.extend(std::iter::repeat(class as f32 * 2.0 - 3.0).take(size));
            }
            labels.shuffle(&mut rng);

            let n_samples = labels.len();
            if n_samples < 2 {
                continue;
            }

            let n_folds = rng.gen_range(2..(n_samples.min(12) + 1));
            let y = Array::from(labels);

            let folds = stratified_kfold(&y, n_folds, Some(rng.gen())).unwrap();

            let expected_sizes = kfold(n_samples, n_folds, None).unwrap().fold_sizes();
            assert_eq!(folds.fold_sizes(), expected_sizes);
            assert_partition(&folds);
            assert_proportional(&y, &folds);
        }
    }

    #[test]
    fn serialization() {
        let folds = kfold(9, 3, Some(4)).unwrap();

        let encoded = bincode::serialize(&folds).unwrap();
        let decoded: FoldAssignment = bincode::deserialize(&encoded).unwrap();

        assert_eq!(folds, decoded);
    }
}
