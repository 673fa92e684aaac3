//! Basic two-dimensional dense matrix type.
//!
//! # Creation
//! An array of ones or zeros:
//!
//! ```
//! use foldwise::prelude::*;
//!
//! let zeros = Array::zeros(20, 10);
//! let ones = Array::ones(10, 10);
//! ```
//!
//! From a vector (a single column):
//!
//! ```
//! use foldwise::prelude::*;
//!
//! let mut array = Array::from(vec![0.0, 1.0, 2.0, 3.0]);
//! array.reshape(2, 2);
//! ```
//!
//! From a vector of rows:
//!
//! ```
//! use foldwise::prelude::*;
//!
//! let array = Array::from(&vec![vec![0.0, 1.0],
//!                               vec![2.0, 3.0]]);
//! ```
//!
//! # Selecting rows and columns
//!
//! ```
//! use foldwise::prelude::*;
//!
//! let array = Array::from(&vec![vec![0.0, 1.0, 2.0],
//!                               vec![3.0, 4.0, 5.0],
//!                               vec![6.0, 7.0, 8.0]]);
//!
//! let rows = array.get_rows(&vec![2, 0]);
//! assert!(allclose(&rows, &Array::from(&vec![vec![6.0, 7.0, 8.0],
//!                                            vec![0.0, 1.0, 2.0]])));
//!
//! let columns = array.get_columns(&vec![1]);
//! assert!(allclose(&columns, &Array::from(vec![1.0, 4.0, 7.0])));
//! ```

use std::iter::Iterator;

use serde::{Deserialize, Serialize};

use crate::array::traits::*;


/// Basic two-dimensional dense matrix type, stored in row-major order.
#[derive(Serialize, Deserialize)]
#[derive(Clone, Debug, PartialEq)]
pub struct Array {
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}


/// Iterator over the rows of a dense matrix, as slices.
pub struct ArrayRows<'a> {
    array: &'a Array,
    idx: usize,
}


impl<'a> Iterator for ArrayRows<'a> {
    type Item = &'a [f32];

    fn next(&mut self) -> Option<&'a [f32]> {

        let result = if self.idx < self.array.rows {
            Some(self.array.row(self.idx))
        } else {
            None
        };

        self.idx += 1;

        result
    }
}


impl IndexableMatrix for Array {
    fn rows(&self) -> usize {
        self.rows
    }

    fn cols(&self) -> usize {
        self.cols
    }

    fn get(&self, row: usize, column: usize) -> f32 {
        assert!(row < self.rows);
        assert!(column < self.cols);

        self.data[row * self.cols + column]
    }

    fn get_mut(&mut self, row: usize, column: usize) -> &mut f32 {
        assert!(row < self.rows);
        assert!(column < self.cols);

        &mut self.data[row * self.cols + column]
    }
}


impl Array {
    /// Create a `rows` by `cols` array of zeros.
    pub fn zeros(rows: usize, cols: usize) -> Array {
        Array {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Create a `rows` by `cols` array of ones.
    pub fn ones(rows: usize, cols: usize) -> Array {
        Array {
            rows,
            cols,
            data: vec![1.0; rows * cols],
        }
    }

    /// Build an array from a slice of rows.
    ///
    /// Fails if there are no rows or if the rows are of unequal length.
    pub fn from_rows(input: &[Vec<f32>]) -> Result<Array, &'static str> {

        if input.is_empty() {
            return Err("Cannot build an array from zero rows");
        }

        let rows = input.len();
        let cols = input[0].len();

        let mut data: Vec<f32> = Vec::with_capacity(rows * cols);

        for row in input {
            if row.len() != cols {
                return Err("All rows must have the same number of columns");
            }
            data.extend_from_slice(row);
        }

        Ok(Array { rows, cols, data })
    }

    /// Change the shape of the array to `rows` by `cols`.
    ///
    /// # Panics
    /// If the number of elements implied by the new shape
    /// is different from the current number of elements.
    pub fn reshape(&mut self, rows: usize, cols: usize) {
        assert!(rows * cols == self.rows * self.cols);

        self.rows = rows;
        self.cols = cols;
    }

    /// Return the underlying data in row-major order.
    pub fn data(&self) -> &Vec<f32> {
        &self.data
    }

    /// Return an immutable slice of the underlying data.
    pub fn as_slice(&self) -> &[f32] {
        &self.data[..]
    }

    /// Return a mutable slice of the underlying data.
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data[..]
    }

    /// View a single row.
    ///
    /// # Panics
    /// If `idx` is out of bounds.
    pub fn row(&self, idx: usize) -> &[f32] {
        assert!(idx < self.rows);

        &self.data[idx * self.cols..(idx + 1) * self.cols]
    }

    /// Iterate over the rows of the array.
    pub fn iter_rows(&self) -> ArrayRows<'_> {
        ArrayRows { array: self, idx: 0 }
    }

    /// Sum of all elements.
    pub fn sum(&self) -> f32 {
        self.data.iter().sum()
    }

    /// Compute the mean of the array.
    pub fn mean(&self) -> f32 {
        self.sum() / ((self.cols * self.rows) as f32)
    }
}


impl From<Vec<f32>> for Array {
    /// Construct a single-column array from a vector.
    ///
    /// # Panics
    /// This will panic if the input vector is empty.
    fn from(data: Vec<f32>) -> Array {

        assert!(!data.is_empty());

        Array {
            rows: data.len(),
            cols: 1,
            data,
        }
    }
}


impl<'a> From<&'a Vec<Vec<f32>>> for Array {
    /// Construct an array from a vector of rows.
    ///
    /// # Panics
    /// This will panic if the input vector is empty
    /// or if its rows are of unequal length.
    fn from(input: &Vec<Vec<f32>>) -> Array {
        match Array::from_rows(input) {
            Ok(array) => array,
            Err(msg) => panic!("{}", msg),
        }
    }
}


impl RowIndex<[usize]> for Array {
    type Output = Array;
    fn get_rows(&self, index: &[usize]) -> Array {

        let mut data = Vec::with_capacity(index.len() * self.cols);

        for &row_idx in index {
            data.extend_from_slice(self.row(row_idx));
        }

        Array {
            rows: index.len(),
            cols: self.cols,
            data,
        }
    }
}


impl ColumnIndex<[usize]> for Array {
    type Output = Array;
    fn get_columns(&self, index: &[usize]) -> Array {

        for &col_idx in index {
            assert!(col_idx < self.cols);
        }

        let mut data = Vec::with_capacity(index.len() * self.rows);

        for row in self.iter_rows() {
            for &col_idx in index {
                data.push(row[col_idx]);
            }
        }

        Array {
            rows: self.rows,
            cols: index.len(),
            data,
        }
    }
}


/// Determines whether two arrays are sufficiently close to each other.
pub fn allclose(x: &Array, y: &Array) -> bool {
    x.rows == y.rows
        && x.cols == y.cols
        && x.data.iter().zip(y.data.iter()).all(|(&a, &b)| close(a, b))
}


/// Determines whether two floats are sufficiently close to each other.
pub fn close(x: f32, y: f32) -> bool {

    let atol = 1e-08;
    let rtol = 1e-05;

    (x - y).abs() <= (atol + rtol * y.abs())
}
