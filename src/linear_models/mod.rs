//! Linear models: logistic regression trained with SGD, and least squares regression.

pub mod linear_regression;
pub mod sgdclassifier;
