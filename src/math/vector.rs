use crate::error::{MlError, Result};
use crate::math::{Buffer, Dims, Number};

/// Fixed-length, owned buffer of scalars. Never resized after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct Vector {
    data: Vec<Number>,
}

impl Vector {
    pub fn zeros(size: usize) -> Vector {
        Vector { data: vec![0.0; size] }
    }

    pub fn filled(size: usize, value: Number) -> Vector {
        Vector { data: vec![value; size] }
    }

    pub fn from_vec(data: Vec<Number>) -> Vector {
        Vector { data }
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<Number> {
        self.data
            .get(index)
            .copied()
            .ok_or_else(|| self.out_of_range(index))
    }

    pub fn set(&mut self, index: usize, value: Number) -> Result<()> {
        let err = self.out_of_range(index);
        let slot = self.data.get_mut(index).ok_or(err)?;
        *slot = value;
        Ok(())
    }

    pub fn as_slice(&self) -> &[Number] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [Number] {
        &mut self.data
    }

    fn out_of_range(&self, index: usize) -> MlError {
        MlError::IndexOutOfRange {
            row: index,
            col: 0,
            dims: self.dims(),
        }
    }
}

impl Buffer for Vector {
    fn dims(&self) -> Dims {
        Dims::new(self.data.len(), 1)
    }

    fn values(&self) -> &[Number] {
        &self.data
    }

    fn values_mut(&mut self) -> &mut [Number] {
        &mut self.data
    }
}

impl From<Vec<Number>> for Vector {
    fn from(data: Vec<Number>) -> Self {
        Vector { data }
    }
}

impl From<Vector> for Vec<Number> {
    fn from(v: Vector) -> Self {
        v.data
    }
}

impl AsRef<[Number]> for Vector {
    fn as_ref(&self) -> &[Number] {
        &self.data
    }
}
