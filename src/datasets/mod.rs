//! Datasets for demos and tests.

pub mod synthetic;
