//! Utilities for multiclass classifiers.

use std::cmp::Ordering;
use std::f32;
use std::iter::Iterator;

use serde::{Deserialize, Serialize};

use crate::array::prelude::*;
use crate::traits::*;
use crate::utils::class_labels;


/// Splits a multiclass target into one binary target per class.
pub struct OneVsRest<'a> {
    y: &'a Array,
    classes: Vec<f32>,
    iter: usize,
}


impl<'a> OneVsRest<'a> {
    pub fn split(y: &'a Array) -> OneVsRest<'a> {
        OneVsRest {
            y,
            classes: class_labels(y),
            iter: 0,
        }
    }
}


impl<'a> Iterator for OneVsRest<'a> {
    type Item = (f32, Array);
    fn next(&mut self) -> Option<(f32, Array)> {

        let ret = match self.iter < self.classes.len() {
            true => {
                let target_class = self.classes[self.iter];
                let binary_target = Array::from(
                    self.y.data().iter()
                        .map(|&v| if v == target_class { 1.0 } else { 0.0 })
                        .collect::<Vec<_>>());
                Some((target_class, binary_target))
            }
            false => None,
        };

        self.iter += 1;
        ret
    }
}

/// Wraps simple two-class classifiers to implement one-vs-rest strategies.
#[derive(Serialize, Deserialize)]
#[derive(Clone, Debug)]
pub struct OneVsRestWrapper<T> {
    base_model: T,
    models: Vec<T>,
    class_labels: Vec<f32>,
}


impl<T: Clone> OneVsRestWrapper<T> {
    pub fn new(base_model: T) -> OneVsRestWrapper<T> {
        OneVsRestWrapper {
            base_model,
            models: Vec::new(),
            class_labels: Vec::new(),
        }
    }

    fn get_model(&mut self, class_label: f32) -> &mut T {
        let position = self.class_labels
            .iter()
            .position(|label| class_label.partial_cmp(label) == Some(Ordering::Equal));

        match position {
            Some(idx) => &mut self.models[idx],
            None => {
                self.class_labels.push(class_label);
                self.models.push(self.base_model.clone());

                let last = self.models.len() - 1;
                &mut self.models[last]
            }
        }
    }

    pub fn models(&self) -> &Vec<T> {
        &self.models
    }

    pub fn class_labels(&self) -> &Vec<f32> {
        &self.class_labels
    }
}


impl<T: SupervisedModel + Clone> SupervisedModel for OneVsRestWrapper<T> {
    fn fit(&mut self, X: &Array, y: &Array) -> Result<(), &'static str> {

        for (class_label, binary_target) in OneVsRest::split(y) {
            let model = self.get_model(class_label);
            model.fit(X, &binary_target)?;
        }

        Ok(())
    }

    fn decision_function(&self, X: &Array) -> Result<Array, &'static str> {

        if self.models.is_empty() {
            return Err("Model has not been fitted");
        }

        let mut out = Array::zeros(X.rows(), self.class_labels.len());

        for (col_idx, model) in self.models.iter().enumerate() {
            let values = model.decision_function(X)?;
            for (row_idx, &val) in values.data().iter().enumerate() {
                *out.get_mut(row_idx, col_idx) = val;
            }
        }

        Ok(out)
    }

    fn predict(&self, X: &Array) -> Result<Array, &'static str> {

        let decision = self.decision_function(X)?;
        let mut predictions = Vec::with_capacity(X.rows());

        for row in decision.iter_rows() {

            let mut max_value = f32::NEG_INFINITY;
            let mut max_class = 0;

            for (class_idx, &val) in row.iter().enumerate() {
                if val > max_value {
                    max_value = val;
                    max_class = class_idx;
                }
            }

            predictions.push(self.class_labels[max_class]);
        }

        Ok(Array::from(predictions))
    }
}
