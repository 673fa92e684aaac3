//! Basic traits applying to all matrices.

use std::ops::Range;


/// Trait representing a shaped matrix whose entries can be accessed
/// at will using their row and column position.
pub trait IndexableMatrix {

    /// Return the number of rows of the matrix.
    fn rows(&self) -> usize;

    /// Return the number of columns of the matrix.
    fn cols(&self) -> usize;

    /// Get the value of the entry at (`row`, `column`).
    ///
    /// # Panics
    /// Will panic if the element accessed is out of bounds.
    fn get(&self, row: usize, column: usize) -> f32;

    /// Get a mutable reference to value of the entry at (`row`, `column`).
    ///
    /// # Panics
    /// Will panic if the element accessed is out of bounds.
    fn get_mut(&mut self, row: usize, column: usize) -> &mut f32;

    /// Set the value of the entry at (`row`, `column`) to `value`.
    ///
    /// # Panics
    /// Will panic if the element accessed is out of bounds.
    fn set(&mut self, row: usize, column: usize, value: f32) {
        *self.get_mut(row, column) = value;
    }
}


/// Trait representing a matrix whose rows can be selected
/// to create a new matrix containing those rows.
pub trait RowIndex<Rhs: ?Sized> {
    type Output;
    fn get_rows(&self, index: &Rhs) -> Self::Output;
}


impl<T> RowIndex<Vec<usize>> for T where T: RowIndex<[usize]> {
    type Output = T::Output;
    fn get_rows(&self, index: &Vec<usize>) -> Self::Output {
        self.get_rows(&index[..])
    }
}


impl<T> RowIndex<Range<usize>> for T where T: RowIndex<[usize]> {
    type Output = T::Output;
    fn get_rows(&self, index: &Range<usize>) -> Self::Output {
        self.get_rows(&index.clone().collect::<Vec<usize>>()[..])
    }
}


/// Trait representing a matrix whose columns can be selected
/// to create a new matrix containing those columns.
pub trait ColumnIndex<Rhs: ?Sized> {
    type Output;
    fn get_columns(&self, index: &Rhs) -> Self::Output;
}


impl<T> ColumnIndex<Vec<usize>> for T where T: ColumnIndex<[usize]> {
    type Output = T::Output;
    fn get_columns(&self, index: &Vec<usize>) -> Self::Output {
        self.get_columns(&index[..])
    }
}
