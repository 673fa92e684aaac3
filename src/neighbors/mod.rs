//! k-nearest-neighbours classification and regression.
//!
//! Fitting stores the training rows; prediction finds the `n_neighbors`
//! closest training rows by Euclidean distance (equal distances resolved
//! in favour of the earlier training row). The classifier takes a majority
//! vote, resolving ties in favour of the smallest label; the regressor
//! averages the neighbours' targets.
//!
//! # Examples
//!
//! ```
//! use foldwise::prelude::*;
//! use foldwise::neighbors::Hyperparameters;
//!
//! let X = Array::from(&vec![vec![0.0, 0.0],
//!                           vec![0.1, 0.0],
//!                           vec![5.0, 5.0],
//!                           vec![5.1, 5.0]]);
//! let y = Array::from(vec![0.0, 0.0, 1.0, 1.0]);
//!
//! let mut model = Hyperparameters::new(3).classifier();
//! model.fit(&X, &y).unwrap();
//!
//! let prediction = model.predict(&Array::from(&vec![vec![4.0, 4.5]])).unwrap();
//! assert_eq!(prediction.data(), &vec![1.0]);
//! ```

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::prelude::*;

use crate::utils::check_matched_dimensions;


/// Hyperparameters for k-nearest-neighbours models.
#[derive(Serialize, Deserialize)]
#[derive(Clone, Debug)]
pub struct Hyperparameters {
    n_neighbors: usize,
}


impl Hyperparameters {
    pub fn new(n_neighbors: usize) -> Hyperparameters {
        Hyperparameters { n_neighbors }
    }

    /// Set the number of neighbours consulted for each prediction.
    pub fn n_neighbors(&mut self, n_neighbors: usize) -> &mut Hyperparameters {
        self.n_neighbors = n_neighbors;
        self
    }

    pub fn classifier(&self) -> KNeighborsClassifier {
        KNeighborsClassifier {
            index: NeighborIndex::new(self.n_neighbors),
        }
    }

    pub fn regressor(&self) -> KNeighborsRegressor {
        KNeighborsRegressor {
            index: NeighborIndex::new(self.n_neighbors),
        }
    }
}


/// The stored training set.
#[derive(Serialize, Deserialize)]
#[derive(Clone, Debug)]
struct NeighborIndex {
    n_neighbors: usize,
    data: Option<(Array, Array)>,
}


impl NeighborIndex {
    fn new(n_neighbors: usize) -> NeighborIndex {
        NeighborIndex {
            n_neighbors,
            data: None,
        }
    }

    fn fit(&mut self, X: &Array, y: &Array) -> Result<(), &'static str> {
        check_matched_dimensions(X, y)?;

        if self.n_neighbors == 0 {
            return Err("Number of neighbors must be at least one");
        }
        if self.n_neighbors > X.rows() {
            return Err("Number of neighbors exceeds the number of training samples");
        }

        self.data = Some((X.clone(), y.clone()));

        Ok(())
    }

    /// Targets of the nearest training rows, for every row of `X`.
    fn neighbor_targets(&self, X: &Array) -> Result<Vec<Vec<f32>>, &'static str> {

        let (train_x, train_y) = match self.data {
            Some((ref train_x, ref train_y)) => (train_x, train_y),
            None => return Err("Model has not been fitted"),
        };

        if X.cols() != train_x.cols() {
            return Err("Model input and model dimensionality differ.");
        }
        if X.rows() == 0 {
            return Err("Cannot predict on an empty data matrix");
        }

        let mut distances = Vec::with_capacity(train_x.rows());
        let mut targets = Vec::with_capacity(X.rows());

        for row in X.iter_rows() {
            distances.clear();

            for (idx, train_row) in train_x.iter_rows().enumerate() {
                let distance = row.iter()
                    .zip(train_row.iter())
                    .map(|(a, b)| (a - b).powi(2))
                    .sum::<f32>();
                distances.push((distance, idx));
            }

            distances.sort_by(|a, b| {
                a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal).then(a.1.cmp(&b.1))
            });

            targets.push(distances.iter()
                .take(self.n_neighbors)
                .map(|&(_, idx)| train_y.get(idx, 0))
                .collect());
        }

        Ok(targets)
    }
}


/// Majority label and its share of the votes. Ties go to the smallest label.
fn vote(labels: &[f32]) -> (f32, f32) {
    let mut sorted = labels.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let mut best = (sorted[0], 0);
    let mut idx = 0;

    while idx < sorted.len() {
        let label = sorted[idx];
        let count = sorted[idx..].iter().take_while(|&&v| v == label).count();

        if count > best.1 {
            best = (label, count);
        }

        idx += count;
    }

    (best.0, best.1 as f32 / labels.len() as f32)
}


/// A k-nearest-neighbours classifier.
#[derive(Serialize, Deserialize)]
#[derive(Clone, Debug)]
pub struct KNeighborsClassifier {
    index: NeighborIndex,
}


impl SupervisedModel for KNeighborsClassifier {
    fn fit(&mut self, X: &Array, y: &Array) -> Result<(), &'static str> {
        self.index.fit(X, y)
    }

    /// The share of neighbours agreeing with the predicted label.
    fn decision_function(&self, X: &Array) -> Result<Array, &'static str> {
        let targets = self.index.neighbor_targets(X)?;

        Ok(Array::from(targets.iter().map(|labels| vote(labels).1).collect::<Vec<_>>()))
    }

    fn predict(&self, X: &Array) -> Result<Array, &'static str> {
        let targets = self.index.neighbor_targets(X)?;

        Ok(Array::from(targets.iter().map(|labels| vote(labels).0).collect::<Vec<_>>()))
    }
}


/// A k-nearest-neighbours regressor.
#[derive(Serialize, Deserialize)]
#[derive(Clone, Debug)]
pub struct KNeighborsRegressor {
    index: NeighborIndex,
}


impl SupervisedModel for KNeighborsRegressor {
    fn fit(&mut self, X: &Array, y: &Array) -> Result<(), &'static str> {
        self.index.fit(X, y)
    }

    fn decision_function(&self, X: &Array) -> Result<Array, &'static str> {
        let targets = self.index.neighbor_targets(X)?;

        Ok(Array::from(targets
            .iter()
            .map(|values| values.iter().sum::<f32>() / values.len() as f32)
            .collect::<Vec<_>>()))
    }

    fn predict(&self, X: &Array) -> Result<Array, &'static str> {
        self.decision_function(X)
    }
}
