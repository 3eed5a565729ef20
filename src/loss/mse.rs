use crate::error::Result;
use crate::math::{Buffer, Kernel, Matrix, Number};

/// Squared-error loss over a batch whose columns are samples.
pub struct MseLoss;

impl MseLoss {
    /// Summed squared error per sample, averaged over the batch:
    /// `Σ (predicted - expected)² / batch_size`.
    pub fn loss(kernel: &Kernel, predicted: &Matrix, expected: &Matrix) -> Result<Number> {
        kernel.ensure("MseLoss::loss", predicted.dims() == expected.dims(), || {
            format!("prediction {} vs target {}", predicted.dims(), expected.dims())
        })?;
        let n = predicted.cols().max(1) as Number;
        let sum: Number = predicted
            .as_slice()
            .iter()
            .zip(expected.as_slice())
            .map(|(a, b)| (a - b).powi(2))
            .sum();
        Ok(sum / n)
    }

    /// Unscaled gradient with respect to the prediction: `predicted - expected`.
    pub fn derivative(
        kernel: &Kernel,
        out: &mut Matrix,
        predicted: &Matrix,
        expected: &Matrix,
    ) -> Result<()> {
        kernel.sub(out, predicted, expected)
    }
}
