//! Ordinary least squares regression, with optional L2 (ridge) penalty.
//!
//! The coefficients are found by solving the normal equations
//! `(X'X + l2 I) w = X'y` with Gaussian elimination. The intercept is
//! fitted by centering the data and is never penalized.
//!
//! # Examples
//!
//! ```
//! use foldwise::prelude::*;
//! use foldwise::linear_models::linear_regression::Hyperparameters;
//!
//! let X = Array::from(&vec![vec![0.0], vec![1.0], vec![2.0], vec![3.0]]);
//! let y = Array::from(vec![1.0, 3.0, 5.0, 7.0]);
//!
//! let mut model = Hyperparameters::new(1).build();
//! model.fit(&X, &y).unwrap();
//!
//! let prediction = model.predict(&Array::from(&vec![vec![4.0]])).unwrap();
//! assert!(close(prediction.get(0, 0), 9.0));
//! ```

use serde::{Deserialize, Serialize};

use crate::prelude::*;

use crate::utils::{check_data_dimensionality, check_matched_dimensions};


/// Hyperparameters for a LinearRegression model.
#[derive(Serialize, Deserialize)]
#[derive(Clone, Debug)]
pub struct Hyperparameters {
    dim: usize,
    l2_penalty: f32,
}


impl Hyperparameters {
    pub fn new(dim: usize) -> Hyperparameters {
        Hyperparameters {
            dim,
            l2_penalty: 0.0,
        }
    }

    /// Set the L2 penalty applied to the coefficients.
    pub fn l2_penalty(&mut self, l2_penalty: f32) -> &mut Hyperparameters {
        self.l2_penalty = l2_penalty;
        self
    }

    pub fn build(&self) -> LinearRegression {
        LinearRegression {
            dim: self.dim,
            l2_penalty: self.l2_penalty,
            coefficients: None,
            intercept: 0.0,
        }
    }
}


/// A least squares linear regression model.
#[derive(Serialize, Deserialize)]
#[derive(Clone, Debug)]
pub struct LinearRegression {
    dim: usize,
    l2_penalty: f32,
    coefficients: Option<Vec<f32>>,
    intercept: f32,
}


impl LinearRegression {
    /// The fitted coefficients, if the model has been fitted.
    pub fn get_coefficients(&self) -> Option<&[f32]> {
        self.coefficients.as_deref()
    }

    pub fn get_intercept(&self) -> f32 {
        self.intercept
    }
}


impl SupervisedModel for LinearRegression {
    fn fit(&mut self, X: &Array, y: &Array) -> Result<(), &'static str> {

        check_data_dimensionality(self.dim, X)?;
        check_matched_dimensions(X, y)?;

        if X.rows() == 0 {
            return Err("Cannot fit on an empty data matrix");
        }

        let n = X.rows() as f64;
        let dim = self.dim;

        let mut x_mean = vec![0.0f64; dim];
        for row in X.iter_rows() {
            for (mean, &value) in x_mean.iter_mut().zip(row.iter()) {
                *mean += value as f64 / n;
            }
        }
        let y_mean = y.data().iter().map(|&v| v as f64).sum::<f64>() / n;

        // Augmented system [X'X + l2 I | X'y] on centered data.
        let mut system = vec![vec![0.0f64; dim + 1]; dim];

        for (row, &target) in X.iter_rows().zip(y.data().iter()) {
            let target = target as f64 - y_mean;
            for i in 0..dim {
                let xi = row[i] as f64 - x_mean[i];
                for j in 0..dim {
                    system[i][j] += xi * (row[j] as f64 - x_mean[j]);
                }
                system[i][dim] += xi * target;
            }
        }

        for (i, equation) in system.iter_mut().enumerate() {
            equation[i] += self.l2_penalty as f64;
        }

        let weights = solve(system)?;

        let intercept = y_mean
            - weights.iter().zip(x_mean.iter()).map(|(w, m)| w * m).sum::<f64>();

        self.coefficients = Some(weights.iter().map(|&w| w as f32).collect());
        self.intercept = intercept as f32;

        Ok(())
    }

    fn decision_function(&self, X: &Array) -> Result<Array, &'static str> {

        check_data_dimensionality(self.dim, X)?;

        let coefficients = match self.coefficients {
            Some(ref coefficients) => coefficients,
            None => return Err("Model has not been fitted"),
        };

        if X.rows() == 0 {
            return Err("Cannot predict on an empty data matrix");
        }

        let data = X.iter_rows()
            .map(|row| {
                self.intercept
                    + row.iter().zip(coefficients.iter()).map(|(x, w)| x * w).sum::<f32>()
            })
            .collect::<Vec<f32>>();

        Ok(Array::from(data))
    }

    fn predict(&self, X: &Array) -> Result<Array, &'static str> {
        self.decision_function(X)
    }
}


/// Solve an augmented `n x (n + 1)` linear system with partial pivoting.
fn solve(mut system: Vec<Vec<f64>>) -> Result<Vec<f64>, &'static str> {

    let n = system.len();

    for col in 0..n {
        let mut pivot = col;
        for row in (col + 1)..n {
            if system[row][col].abs() > system[pivot][col].abs() {
                pivot = row;
            }
        }

        if system[pivot][col].abs() < 1e-10 {
            return Err("Singular matrix: features are linearly dependent");
        }

        system.swap(col, pivot);

        for row in (col + 1)..n {
            let factor = system[row][col] / system[col][col];
            if factor == 0.0 {
                continue;
            }
            for k in col..(n + 1) {
                system[row][k] -= factor * system[col][k];
            }
        }
    }

    let mut solution = vec![0.0; n];

    for row in (0..n).rev() {
        let mut value = system[row][n];
        for k in (row + 1)..n {
            value -= system[row][k] * solution[k];
        }
        solution[row] = value / system[row][row];
    }

    Ok(solution)
}


#[cfg(test)]
mod tests {
    use crate::datasets::synthetic;
    use crate::metrics::r2_score;

    use super::*;

    #[test]
    fn exact_fit() {
        let X = Array::from(&vec![vec![1.0, 0.0],
                                  vec![0.0, 1.0],
                                  vec![1.0, 1.0],
                                  vec![2.0, 3.0]]);
        let y = Array::from(vec![3.0, -1.0, 1.0, -1.0]);

        let mut model = Hyperparameters::new(2).build();
        model.fit(&X, &y).unwrap();

        let coefficients = model.get_coefficients().unwrap();
        assert!((coefficients[0] - 2.0).abs() < 1e-4);
        assert!((coefficients[1] + 2.0).abs() < 1e-4);
        assert!((model.get_intercept() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn singular_design() {
        let X = Array::from(&vec![vec![1.0, 2.0],
                                  vec![2.0, 4.0],
                                  vec![3.0, 6.0]]);
        let y = Array::from(vec![1.0, 2.0, 3.0]);

        let mut model = Hyperparameters::new(2).build();
        assert!(model.fit(&X, &y).is_err());

        // The ridge penalty makes the system solvable.
        let mut model = Hyperparameters::new(2).l2_penalty(0.1).build();
        assert!(model.fit(&X, &y).is_ok());
    }

    #[test]
    fn unfitted_model_fails() {
        let model = Hyperparameters::new(1).build();
        assert!(model.predict(&Array::ones(2, 1)).is_err());
    }

    #[test]
    fn noisy_regression() {
        let (X, y) = synthetic::regression(200, &[1.5, -2.0, 0.5], 0.1, 9);

        let mut model = Hyperparameters::new(3).build();
        model.fit(&X, &y).unwrap();

        let y_hat = model.predict(&X).unwrap();
        assert!(r2_score(&y, &y_hat).unwrap() > 0.95);
    }
}
