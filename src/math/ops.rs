//! Free-function form of the primitives, always shape-checked.
//!
//! Thin wrappers over [`Kernel::checked`] for callers that do not carry a
//! kernel around.

use crate::error::Result;
use crate::math::{Buffer, Kernel, Matrix, Number, Vector};

const K: Kernel = Kernel::checked();

pub fn add<T: Buffer>(out: &mut T, a: &T, b: &T) -> Result<()> {
    K.add(out, a, b)
}

pub fn sub<T: Buffer>(out: &mut T, a: &T, b: &T) -> Result<()> {
    K.sub(out, a, b)
}

pub fn scale<T: Buffer>(out: &mut T, input: &T, k: Number) -> Result<()> {
    K.scale(out, input, k)
}

pub fn entrywise_product<T: Buffer>(out: &mut T, a: &T, b: &T) -> Result<()> {
    K.entrywise_product(out, a, b)
}

pub fn copy<T: Buffer>(out: &mut T, input: &T) -> Result<()> {
    K.copy(out, input)
}

pub fn matrix_product(out: &mut Matrix, a: &Matrix, b: &Matrix) -> Result<()> {
    K.matrix_product(out, a, b)
}

pub fn matrix_vector_product(out: &mut Vector, a: &Matrix, b: &Vector) -> Result<()> {
    K.matrix_vector_product(out, a, b)
}

pub fn transpose(out: &mut Matrix, input: &Matrix) -> Result<()> {
    K.transpose(out, input)
}

pub fn column_sum(out: &mut Vector, input: &Matrix) -> Result<()> {
    K.column_sum(out, input)
}

pub fn broadcast_add_vector_to_columns(out: &mut Matrix, mat: &Matrix, vec: &Vector) -> Result<()> {
    K.broadcast_add_vector_to_columns(out, mat, vec)
}
