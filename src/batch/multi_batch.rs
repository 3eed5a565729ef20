use crate::batch::Batch;
use crate::error::{MlError, Result};
use crate::math::Number;

/// An ordered run of batches sharing one `vector_size`.
///
/// Sample counts of the member batches add up to `total_number_of_vectors`.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiBatch {
    batches: Vec<Batch>,
    total_number_of_vectors: usize,
    vector_size: usize,
}

impl MultiBatch {
    /// Splits `samples` into `ceil(len / chunk_size)` batches of `chunk_size`
    /// samples each, in order. The last batch holds the remainder when the
    /// count does not divide evenly.
    pub fn partition<S: AsRef<[Number]>>(samples: &[S], chunk_size: usize) -> Result<MultiBatch> {
        if samples.is_empty() {
            return Err(MlError::EmptyInput("cannot partition an empty sample collection"));
        }
        if chunk_size == 0 {
            return Err(MlError::InvalidConfig("chunk size must be at least 1".to_owned()));
        }

        let batches = samples
            .chunks(chunk_size)
            .map(Batch::from_samples)
            .collect::<Result<Vec<_>>>()?;

        let vector_size = batches[0].vector_size();
        if let Some((i, b)) = batches
            .iter()
            .enumerate()
            .find(|(_, b)| b.vector_size() != vector_size)
        {
            return Err(MlError::ShapeMismatch {
                op: "partition",
                detail: format!(
                    "batch {i} has samples of {} features, expected {vector_size}",
                    b.vector_size()
                ),
            });
        }

        log::trace!(
            "partitioned {} samples into {} batches of up to {}",
            samples.len(),
            batches.len(),
            chunk_size
        );

        Ok(MultiBatch {
            batches,
            total_number_of_vectors: samples.len(),
            vector_size,
        })
    }

    pub fn batches(&self) -> &[Batch] {
        &self.batches
    }

    pub fn number_of_batches(&self) -> usize {
        self.batches.len()
    }

    pub fn total_number_of_vectors(&self) -> usize {
        self.total_number_of_vectors
    }

    pub fn vector_size(&self) -> usize {
        self.vector_size
    }

    pub fn get(&self, index: usize) -> Option<&Batch> {
        self.batches.get(index)
    }

    /// Batch at `index` wrapped around the collection, for cyclic iteration.
    pub fn cyclic(&self, index: usize) -> &Batch {
        &self.batches[index % self.batches.len()]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Batch> {
        self.batches.iter()
    }
}

impl<'a> IntoIterator for &'a MultiBatch {
    type Item = &'a Batch;
    type IntoIter = std::slice::Iter<'a, Batch>;

    fn into_iter(self) -> Self::IntoIter {
        self.batches.iter()
    }
}
