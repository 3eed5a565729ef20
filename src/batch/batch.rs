use crate::error::{MlError, Result};
use crate::math::{Buffer, Kernel, Matrix, Number, Vector};

/// A group of samples laid out as the columns of one matrix.
///
/// `data.rows() == vector_size` and `data.cols() == number_of_vectors`.
/// The batch owns only its matrix; samples are copied in, never aliased.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    data: Matrix,
}

impl Batch {
    /// Allocates a zeroed `sample_size x number_of_samples` batch.
    pub fn empty(number_of_samples: usize, sample_size: usize) -> Batch {
        Batch {
            data: Matrix::zeros(sample_size, number_of_samples),
        }
    }

    /// Builds a batch holding `samples`, in order, one per column.
    pub fn from_samples<S: AsRef<[Number]>>(samples: &[S]) -> Result<Batch> {
        let first = samples
            .first()
            .ok_or(MlError::EmptyInput("batch needs at least one sample"))?;
        let mut batch = Batch::empty(samples.len(), first.as_ref().len());
        batch.load_samples(samples)?;
        Ok(batch)
    }

    /// Wraps a matrix that already has samples as columns.
    pub fn from_matrix(data: Matrix) -> Batch {
        Batch { data }
    }

    /// Copies `samples[j][i]` into `data[i][j]`.
    ///
    /// Every sample must have `vector_size` entries and there must be exactly
    /// `number_of_vectors` of them; nothing is written otherwise.
    pub fn load_samples<S: AsRef<[Number]>>(&mut self, samples: &[S]) -> Result<()> {
        if samples.len() != self.number_of_vectors() {
            return Err(MlError::ShapeMismatch {
                op: "load_samples",
                detail: format!(
                    "batch holds {} samples, got {}",
                    self.number_of_vectors(),
                    samples.len()
                ),
            });
        }
        let size = self.vector_size();
        for (j, sample) in samples.iter().enumerate() {
            let len = sample.as_ref().len();
            if len != size {
                return Err(MlError::ShapeMismatch {
                    op: "load_samples",
                    detail: format!("sample {j} has {len} features, expected {size}"),
                });
            }
        }

        let cols = self.number_of_vectors();
        let data = self.data.as_mut_slice();
        for (j, sample) in samples.iter().enumerate() {
            for (i, &x) in sample.as_ref().iter().enumerate() {
                data[i * cols + j] = x;
            }
        }
        Ok(())
    }

    pub fn number_of_vectors(&self) -> usize {
        self.data.cols()
    }

    pub fn vector_size(&self) -> usize {
        self.data.rows()
    }

    pub fn data(&self) -> &Matrix {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut Matrix {
        &mut self.data
    }

    /// Feature `feature` of sample `sample`.
    pub fn get(&self, feature: usize, sample: usize) -> Result<Number> {
        self.data.get(feature, sample)
    }

    /// Copies sample `j` (column `j`) back out.
    pub fn sample(&self, j: usize) -> Result<Vector> {
        if j >= self.number_of_vectors() {
            return Err(MlError::IndexOutOfRange {
                row: 0,
                col: j,
                dims: self.data.dims(),
            });
        }
        let cols = self.number_of_vectors();
        let values = self
            .data
            .as_slice()
            .iter()
            .skip(j)
            .step_by(cols)
            .copied()
            .collect();
        Ok(Vector::from_vec(values))
    }
}

impl Kernel {
    /// Applies `weights` to every sample: `out = weights · input`.
    pub fn multiply_batch_by_matrix(
        &self,
        out: &mut Batch,
        weights: &Matrix,
        input: &Batch,
    ) -> Result<()> {
        self.matrix_product(&mut out.data, weights, &input.data)
    }

    /// Adds `vec` to every sample of `input`.
    pub fn add_vector_to_batch(&self, out: &mut Batch, input: &Batch, vec: &Vector) -> Result<()> {
        self.broadcast_add_vector_to_columns(&mut out.data, &input.data, vec)
    }

    pub fn batch_hadamard_product(&self, out: &mut Batch, a: &Batch, b: &Batch) -> Result<()> {
        self.entrywise_product(&mut out.data, &a.data, &b.data)
    }
}
