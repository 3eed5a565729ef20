use rand::Rng;
use std::f64::consts::PI;

use crate::error::{MlError, Result};
use crate::math::{Buffer, Dims, Number};

/// Fixed-shape matrix stored row-major in one contiguous buffer.
///
/// The entry at `(row, col)` lives at `row * cols + col`.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<Number>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    pub fn filled(rows: usize, cols: usize, value: Number) -> Matrix {
        Matrix {
            rows,
            cols,
            data: vec![value; rows * cols],
        }
    }

    /// Wraps a row-major buffer. Fails if `data.len() != rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<Number>) -> Result<Matrix> {
        if data.len() != rows * cols {
            return Err(MlError::ShapeMismatch {
                op: "Matrix::from_vec",
                detail: format!(
                    "buffer of {} values cannot hold {rows}x{cols}",
                    data.len()
                ),
            });
        }
        Ok(Matrix { rows, cols, data })
    }

    /// Builds a matrix from per-row vectors; every row must have the same length.
    pub fn from_rows(rows: Vec<Vec<Number>>) -> Result<Matrix> {
        let cols = rows.first().map(|r| r.len()).unwrap_or(0);
        let n_rows = rows.len();
        let mut data = Vec::with_capacity(n_rows * cols);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != cols {
                return Err(MlError::ShapeMismatch {
                    op: "Matrix::from_rows",
                    detail: format!("row {i} has {} values, expected {cols}", row.len()),
                });
            }
            data.extend(row);
        }
        Ok(Matrix {
            rows: n_rows,
            cols,
            data,
        })
    }

    /// Uniform initialization on [-1, 1).
    pub fn uniform<R: Rng>(rows: usize, cols: usize, rng: &mut R) -> Matrix {
        let mut res = Matrix::zeros(rows, cols);
        for x in res.data.iter_mut() {
            *x = rng.gen::<f64>() * 2.0 - 1.0;
        }
        res
    }

    /// Samples a single value from N(0, 1) using the Box-Muller transform.
    fn sample_standard_normal<R: Rng>(rng: &mut R) -> f64 {
        // Both uniforms on (0, 1] to avoid log(0).
        let u1: f64 = 1.0 - rng.gen::<f64>();
        let u2: f64 = 1.0 - rng.gen::<f64>();
        (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
    }

    fn normal<R: Rng>(rows: usize, cols: usize, std_dev: f64, rng: &mut R) -> Matrix {
        let mut res = Matrix::zeros(rows, cols);
        for x in res.data.iter_mut() {
            *x = Matrix::sample_standard_normal(rng) * std_dev;
        }
        res
    }

    /// He initialization: samples from N(0, sqrt(2 / cols)).
    ///
    /// Suited to rectifier layers. `cols` is the fan-in.
    pub fn he<R: Rng>(rows: usize, cols: usize, rng: &mut R) -> Matrix {
        let std_dev = (2.0 / cols.max(1) as f64).sqrt();
        Matrix::normal(rows, cols, std_dev, rng)
    }

    /// Xavier (Glorot) initialization: samples from N(0, sqrt(1 / cols)).
    pub fn xavier<R: Rng>(rows: usize, cols: usize, rng: &mut R) -> Matrix {
        let std_dev = (1.0 / cols.max(1) as f64).sqrt();
        Matrix::normal(rows, cols, std_dev, rng)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub(crate) fn offset(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    fn check_index(&self, row: usize, col: usize) -> Result<usize> {
        if row >= self.rows || col >= self.cols {
            return Err(MlError::IndexOutOfRange {
                row,
                col,
                dims: self.dims(),
            });
        }
        Ok(self.offset(row, col))
    }

    pub fn get(&self, row: usize, col: usize) -> Result<Number> {
        let idx = self.check_index(row, col)?;
        Ok(self.data[idx])
    }

    pub fn set(&mut self, row: usize, col: usize, value: Number) -> Result<()> {
        let idx = self.check_index(row, col)?;
        self.data[idx] = value;
        Ok(())
    }

    pub fn row(&self, row: usize) -> Result<&[Number]> {
        if row >= self.rows {
            return Err(MlError::IndexOutOfRange {
                row,
                col: 0,
                dims: self.dims(),
            });
        }
        let start = self.offset(row, 0);
        Ok(&self.data[start..start + self.cols])
    }

    pub fn as_slice(&self) -> &[Number] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [Number] {
        &mut self.data
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix {
            rows: 0,
            cols: 0,
            data: vec![],
        }
    }
}

impl Buffer for Matrix {
    fn dims(&self) -> Dims {
        Dims::new(self.rows, self.cols)
    }

    fn values(&self) -> &[Number] {
        &self.data
    }

    fn values_mut(&mut self) -> &mut [Number] {
        &mut self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn storage_is_row_major() {
        let m = Matrix::from_rows(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
        assert_eq!(m.as_slice(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(m.get(1, 0).unwrap(), 4.0);
        assert_eq!(m.row(1).unwrap(), &[4.0, 5.0, 6.0]);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let err = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert!(matches!(err, MlError::ShapeMismatch { .. }));
        assert!(Matrix::from_vec(2, 2, vec![1.0; 3]).is_err());
    }

    #[test]
    fn out_of_range_access_fails() {
        let mut m = Matrix::zeros(2, 3);
        assert!(matches!(
            m.get(2, 0),
            Err(MlError::IndexOutOfRange { row: 2, col: 0, .. })
        ));
        assert!(m.set(0, 3, 1.0).is_err());
        assert!(m.row(5).is_err());
        assert!(m.as_slice().iter().all(|&x| x == 0.0));
    }

    #[test]
    fn seeded_initializers_are_reproducible() {
        let a = Matrix::he(3, 4, &mut StdRng::seed_from_u64(7));
        let b = Matrix::he(3, 4, &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);

        let u = Matrix::uniform(5, 5, &mut StdRng::seed_from_u64(1));
        assert!(u.as_slice().iter().all(|&x| (-1.0..1.0).contains(&x)));
    }
}
