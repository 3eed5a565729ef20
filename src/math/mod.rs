pub mod kernel;
pub mod matrix;
pub mod ops;
pub mod vector;

use std::fmt;

pub use kernel::{Kernel, Validation};
pub use matrix::Matrix;
pub use vector::Vector;

/// Scalar used for every magnitude, weight and gradient.
pub type Number = f64;

/// Row/column extent of a buffer. A vector of length `n` reports `n x 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dims {
    pub rows: usize,
    pub cols: usize,
}

impl Dims {
    pub fn new(rows: usize, cols: usize) -> Dims {
        Dims { rows, cols }
    }

    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for Dims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

/// Owned, contiguous storage of scalars with a fixed shape.
///
/// Implemented by [`Vector`] and [`Matrix`] so the elementwise operations in
/// [`Kernel`] are written once for both.
pub trait Buffer {
    fn dims(&self) -> Dims;
    fn values(&self) -> &[Number];
    fn values_mut(&mut self) -> &mut [Number];
}
