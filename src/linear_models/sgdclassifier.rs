//! A two-class logistic regression classifier implemented using stochastic gradient descent.
//!
//! This model implements a two-class logistic regression classifier, using stochastic
//! gradient descent with an adaptive per-parameter learning rate (Adagrad). The model
//! can be regularized using L2 and L1 regularization. An unpenalized intercept is
//! learned alongside the coefficients.
//!
//! Each call to `fit` runs the configured number of epochs over the data; repeated
//! calls continue training from the current coefficients.
//!
//! # Examples
//!
//! ```
//! use foldwise::prelude::*;
//! use foldwise::linear_models::sgdclassifier::Hyperparameters;
//! use foldwise::datasets::synthetic;
//!
//! let (X, y) = synthetic::classification(&[40, 40, 40], 4, 4.0, 11);
//!
//! let mut model = Hyperparameters::new(4)
//!                                 .learning_rate(0.5)
//!                                 .l2_penalty(0.0)
//!                                 .l1_penalty(0.0)
//!                                 .epochs(10)
//!                                 .one_vs_rest();
//!
//! model.fit(&X, &y).unwrap();
//!
//! let prediction = model.predict(&X).unwrap();
//! ```

use serde::{Deserialize, Serialize};

use crate::prelude::*;

use crate::multiclass::OneVsRestWrapper;
use crate::utils::{check_data_dimensionality, check_matched_dimensions};


/// Hyperparameters for a SGDClassifier model.
#[derive(Serialize, Deserialize)]
#[derive(Clone, Debug)]
pub struct Hyperparameters {
    dim: usize,

    learning_rate: f32,
    l2_penalty: f32,
    l1_penalty: f32,
    epochs: usize,
}


impl Hyperparameters {
    /// Creates new Hyperparameters.
    ///
    /// # Examples
    ///
    /// ```
    /// use foldwise::prelude::*;
    /// use foldwise::linear_models::sgdclassifier::Hyperparameters;
    ///
    ///
    /// let mut model = Hyperparameters::new(4)
    ///                                 .learning_rate(1.0)
    ///                                 .l2_penalty(0.5)
    ///                                 .l1_penalty(0.0)
    ///                                 .build();
    /// ```
    pub fn new(dim: usize) -> Hyperparameters {
        Hyperparameters {
            dim,
            learning_rate: 0.05,
            l2_penalty: 0.0,
            l1_penalty: 0.0,
            epochs: 1,
        }
    }
    /// Set the initial learning rate.
    ///
    /// During fitting, the learning rate decreases more for parameters which have
    /// have received larger gradient updates. This maintains more stable estimates
    /// for common features while allowing fast learning for rare features.
    pub fn learning_rate(&mut self, learning_rate: f32) -> &mut Hyperparameters {
        self.learning_rate = learning_rate;
        self
    }

    /// Set the L2 penalty.
    pub fn l2_penalty(&mut self, l2_penalty: f32) -> &mut Hyperparameters {
        self.l2_penalty = l2_penalty;
        self
    }

    /// Set the L1 penalty.
    ///
    /// Coefficient sparsity is achieved by truncating at zero whenever
    /// a coefficient update would change its sign.
    pub fn l1_penalty(&mut self, l1_penalty: f32) -> &mut Hyperparameters {
        self.l1_penalty = l1_penalty;
        self
    }

    /// Set the number of passes over the data made by each call to `fit`.
    pub fn epochs(&mut self, epochs: usize) -> &mut Hyperparameters {
        self.epochs = epochs;
        self
    }

    /// Build a two-class model.
    pub fn build(&self) -> SGDClassifier {
        SGDClassifier {
            dim: self.dim,
            learning_rate: self.learning_rate,
            l2_penalty: self.l2_penalty,
            l1_penalty: self.l1_penalty,
            epochs: self.epochs,
            coefficients: Array::zeros(self.dim, 1),
            intercept: 0.0,
            gradsq: Array::ones(self.dim, 1),
            intercept_gradsq: 1.0,
            applied_l1: Array::zeros(self.dim, 1),
            applied_l2: Array::ones(self.dim, 1),
            accumulated_l1: 0.0,
            accumulated_l2: 1.0,
        }
    }

    /// Build a one-vs-rest multiclass model.
    pub fn one_vs_rest(&self) -> OneVsRestWrapper<SGDClassifier> {
        let base_model = self.build();

        OneVsRestWrapper::new(base_model)
    }
}

/// A two-class logistic regression classifier implemented using stochastic gradient descent.
#[derive(Serialize, Deserialize)]
#[derive(Clone, Debug)]
pub struct SGDClassifier {
    dim: usize,

    learning_rate: f32,
    l2_penalty: f32,
    l1_penalty: f32,
    epochs: usize,

    coefficients: Array,
    intercept: f32,
    gradsq: Array,
    intercept_gradsq: f32,
    applied_l1: Array,
    applied_l2: Array,
    accumulated_l1: f32,
    accumulated_l2: f32,
}


fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}


fn logistic_loss(y: f32, y_hat: f32) -> f32 {
    y_hat - y
}


fn check_valid_labels(y: &Array) -> Result<(), &'static str> {
    let y_valid = y.data().iter().all(|&x| x == 0.0 || x == 1.0);

    match y_valid {
        true => Ok(()),
        false => Err("Target array for two-class classifiers must consist of 0s and 1s only."),
    }
}


impl SupervisedModel for SGDClassifier {

    fn fit(&mut self, X: &Array, y: &Array) -> Result<(), &'static str> {

        check_data_dimensionality(self.dim, X)?;
        check_matched_dimensions(X, y)?;
        check_valid_labels(y)?;

        for _ in 0..self.epochs {
            for (row, &true_y) in X.iter_rows().zip(y.data().iter()) {
                let y_hat = self.compute_prediction(row);
                let loss = logistic_loss(true_y, y_hat);
                self.update(row, loss);
            }
        }

        for idx in 0..self.dim {
            self.apply_regularization(idx);
        }

        Ok(())
    }

    fn decision_function(&self, X: &Array) -> Result<Array, &'static str> {

        check_data_dimensionality(self.dim, X)?;

        if X.rows() == 0 {
            return Err("Cannot predict on an empty data matrix");
        }

        let mut data = Vec::with_capacity(X.rows());

        for row in X.iter_rows() {
            data.push(self.compute_prediction(row));
        }

        Ok(Array::from(data))
    }
}


impl SGDClassifier {

    /// Returns a reference to the estimated coefficients vector.
    pub fn get_coefficients(&self) -> &Array {
        &self.coefficients
    }

    /// Returns the estimated intercept.
    pub fn get_intercept(&self) -> f32 {
        self.intercept
    }

    fn update_at_idx(&mut self, idx: usize, update: f32) {

        let gradsq = self.gradsq.get(idx, 0);

        let local_learning_rate = self.learning_rate / gradsq.sqrt();

        *self.coefficients.get_mut(idx, 0) -= local_learning_rate * update;
        *self.gradsq.get_mut(idx, 0) += update.powi(2);
    }

    fn update(&mut self, x: &[f32], loss: f32) {

        for (idx, &gradient) in x.iter().enumerate() {
            if gradient == 0.0 {
                continue;
            }

            self.update_at_idx(idx, loss * gradient);
            self.apply_regularization(idx);
        }

        let local_learning_rate = self.learning_rate / self.intercept_gradsq.sqrt();
        self.intercept -= local_learning_rate * loss;
        self.intercept_gradsq += loss.powi(2);

        self.accumulate_regularization();
    }

    fn accumulate_regularization(&mut self) {
        self.accumulated_l1 += self.l1_penalty;
        self.accumulated_l2 *= 1.0 - self.l2_penalty;
    }

    fn apply_regularization(&mut self, coefficient_index: usize) {

        let idx = coefficient_index;
        let local_learning_rate = self.learning_rate / self.gradsq.get(idx, 0).sqrt();

        let coefficient = self.coefficients.get_mut(idx, 0);
        let applied_l2 = self.applied_l2.get_mut(idx, 0);
        let applied_l1 = self.applied_l1.get_mut(idx, 0);

        let l2_update = self.accumulated_l2 / *applied_l2;

        *coefficient *= 1.0 - (1.0 - l2_update) * local_learning_rate;
        *applied_l2 *= l2_update;

        let pre_update_coeff = *coefficient;
        let l1_potential_update = self.accumulated_l1 - *applied_l1;

        if *coefficient > 0.0 {
            *coefficient = f32::max(0.0, *coefficient - local_learning_rate * l1_potential_update);
        } else {
            *coefficient = f32::min(0.0, *coefficient + local_learning_rate * l1_potential_update);
        }

        let l1_actual_update = (pre_update_coeff - *coefficient).abs();
        *applied_l1 += l1_actual_update;
    }

    fn compute_prediction(&self, row: &[f32]) -> f32 {

        let mut prediction = self.intercept;

        for (idx, &value) in row.iter().enumerate() {
            prediction += self.coefficients.get(idx, 0) * value;
        }

        sigmoid(prediction)
    }

}
