use crate::error::Result;
use crate::layers::{DenseLayer, Gradients};
use crate::math::{Kernel, Number};

/// Plain gradient descent with the network's learning rate (gamma).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sgd {
    pub learning_rate: Number,
}

impl Sgd {
    pub fn new(learning_rate: Number) -> Sgd {
        Sgd { learning_rate }
    }

    /// Factor applied to summed batch gradients: `learning_rate / batch_size`.
    pub fn step_size(&self, batch_size: usize) -> Number {
        self.learning_rate / batch_size as Number
    }

    /// Scales `grads` by [`Sgd::step_size`] and applies one descent step to `layer`.
    pub fn step(
        &self,
        kernel: &Kernel,
        layer: &mut DenseLayer,
        grads: &mut Gradients,
        batch_size: usize,
    ) -> Result<()> {
        let step = self.step_size(batch_size);
        kernel.scale_assign(&mut grads.weights, step);
        kernel.scale_assign(&mut grads.biases, step);
        layer.apply_gradients(kernel, grads)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Matrix, Vector};

    #[test]
    fn step_is_scaled_by_batch_size() {
        let k = Kernel::checked();
        let mut layer = DenseLayer::new(Matrix::filled(1, 2, 1.0), Vector::zeros(1)).unwrap();
        let mut grads = Gradients {
            weights: Matrix::from_rows(vec![vec![4.0, -8.0]]).unwrap(),
            biases: Vector::from_vec(vec![2.0]),
            delta: Matrix::zeros(1, 4),
        };

        Sgd::new(0.5).step(&k, &mut layer, &mut grads, 4).unwrap();
        assert_eq!(layer.weights().as_slice(), &[0.5, 2.0]);
        assert_eq!(layer.biases().as_slice(), &[-0.25]);
    }
}
