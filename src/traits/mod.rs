//! Common foldwise traits.

use std::cmp::Ordering;

use crate::array::dense::*;


/// Trait describing supervised models.
///
/// Anything that can be fitted on a feature matrix and a target column,
/// and then produce predictions for new rows, can be cross-validated.
pub trait SupervisedModel {
    fn fit(&mut self, X: &Array, y: &Array) -> Result<(), &'static str>;
    fn decision_function(&self, X: &Array) -> Result<Array, &'static str>;
    fn predict(&self, X: &Array) -> Result<Array, &'static str> {

        let decision_func = self.decision_function(X)?;

        Ok(Array::from(decision_func.data()
            .iter()
            .map(|v| {
                match v.partial_cmp(&0.5) {
                    Some(Ordering::Greater) => 1.0,
                    _ => 0.0,
                }
            })
            .collect::<Vec<f32>>()))
    }
}


impl<M: SupervisedModel + ?Sized> SupervisedModel for Box<M> {
    fn fit(&mut self, X: &Array, y: &Array) -> Result<(), &'static str> {
        (**self).fit(X, y)
    }

    fn decision_function(&self, X: &Array) -> Result<Array, &'static str> {
        (**self).decision_function(X)
    }

    fn predict(&self, X: &Array) -> Result<Array, &'static str> {
        (**self).predict(X)
    }
}


/// A type-erased model, for comparing different model families
/// on the same folds.
pub type BoxedModel = Box<dyn SupervisedModel + Send>;
