use crate::batch::Batch;
use crate::error::{MlError, Result};
use crate::layers::LayerOutput;
use crate::math::{Matrix, Number};
use crate::network::Network;

/// Every intermediate of one forward pass, kept for backpropagation.
///
/// Layer `0` is the input layer: `y(0)` is a copy of the input batch and it
/// has no `linear` or `z`. For `i >= 1`, `linear(i) = W(i-1)·y(i-1)`,
/// `z(i) = linear(i) + b(i-1)` and `y(i) = f(z(i))`.
#[derive(Debug, Clone, PartialEq)]
pub struct ForwardPass {
    input: Matrix,
    layers: Vec<LayerOutput>,
}

impl ForwardPass {
    pub fn number_of_layers(&self) -> usize {
        self.layers.len() + 1
    }

    /// Number of samples (columns) that went through the network.
    pub fn batch_size(&self) -> usize {
        self.input.cols()
    }

    pub fn y(&self, i: usize) -> Option<&Matrix> {
        match i {
            0 => Some(&self.input),
            _ => self.layers.get(i - 1).map(|l| &l.y),
        }
    }

    pub fn z(&self, i: usize) -> Option<&Matrix> {
        i.checked_sub(1)
            .and_then(|i| self.layers.get(i))
            .map(|l| &l.z)
    }

    pub fn linear(&self, i: usize) -> Option<&Matrix> {
        i.checked_sub(1)
            .and_then(|i| self.layers.get(i))
            .map(|l| &l.linear)
    }

    /// Output of the last layer.
    pub fn output(&self) -> &Matrix {
        self.layers.last().map(|l| &l.y).unwrap_or(&self.input)
    }

    pub fn into_output(self) -> Matrix {
        match self.layers.into_iter().last() {
            Some(l) => l.y,
            None => self.input,
        }
    }

    pub(crate) fn layer(&self, transition: usize) -> &LayerOutput {
        &self.layers[transition]
    }

    /// Activation feeding transition `transition`, i.e. `y(transition)`.
    pub(crate) fn layer_input(&self, transition: usize) -> &Matrix {
        match transition {
            0 => &self.input,
            t => &self.layers[t - 1].y,
        }
    }
}

impl Network {
    /// Forward propagation of a batch whose columns are samples.
    ///
    /// The caller's batch is copied into `y(0)` and never modified.
    pub fn forward(&self, input: &Batch) -> Result<ForwardPass> {
        if input.vector_size() != self.input_size() {
            return Err(MlError::ShapeMismatch {
                op: "forward",
                detail: format!(
                    "network takes {} features per sample, batch has {}",
                    self.input_size(),
                    input.vector_size()
                ),
            });
        }

        let mut y0 = Matrix::zeros(input.vector_size(), input.number_of_vectors());
        self.kernel.copy(&mut y0, input.data())?;

        let mut layers: Vec<LayerOutput> = Vec::with_capacity(self.layers.len());
        for layer in &self.layers {
            let prev = layers.last().map(|l| &l.y).unwrap_or(&y0);
            let out = layer.feed_forward(&self.kernel, &self.activation, prev)?;
            layers.push(out);
        }

        Ok(ForwardPass { input: y0, layers })
    }

    /// Network output for a single sample.
    pub fn forward_sample(&self, sample: &[Number]) -> Result<Vec<Number>> {
        let batch = Batch::from_samples(&[sample])?;
        Ok(self.forward(&batch)?.into_output().as_slice().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vector;
    use crate::network::{Init, NetworkSpec};

    #[test]
    fn zero_sits_on_the_boundary() {
        let spec = NetworkSpec::new(vec![2, 1]).with_init(Init::Constant {
            weight: 1.0,
            bias: 0.0,
        });
        let net = Network::from_spec(&spec).unwrap();
        let input = Batch::from_samples(&[vec![1.0, -1.0]]).unwrap();

        let pass = net.forward(&input).unwrap();
        assert_eq!(pass.linear(1).unwrap().as_slice(), &[0.0]);
        assert_eq!(pass.z(1).unwrap().as_slice(), &[0.0]);
        assert_eq!(pass.output().as_slice(), &[0.0]);
    }

    #[test]
    fn every_intermediate_is_retained() {
        let mut net = Network::new(&[2, 2, 1]).unwrap();
        net.set_weights(0, Matrix::from_rows(vec![vec![1.0, 0.0], vec![0.0, -1.0]]).unwrap())
            .unwrap();
        net.set_biases(0, Vector::zeros(2)).unwrap();
        net.set_weights(1, Matrix::from_rows(vec![vec![2.0, 1.0]]).unwrap())
            .unwrap();
        net.set_biases(1, Vector::from_vec(vec![0.5])).unwrap();

        let input = Batch::from_samples(&[vec![3.0, 2.0], vec![-1.0, -4.0]]).unwrap();
        let pass = net.forward(&input).unwrap();

        assert_eq!(pass.number_of_layers(), 3);
        assert_eq!(pass.batch_size(), 2);
        assert_eq!(pass.y(0).unwrap(), input.data());
        assert!(pass.z(0).is_none());
        assert!(pass.linear(3).is_none());

        // hidden: z = (3, -2) and (-1, 4), y = (3, -0.2) and (-0.1, 4)
        assert_eq!(pass.z(1).unwrap().as_slice(), &[3.0, -1.0, -2.0, 4.0]);
        assert_eq!(
            pass.y(1).unwrap().as_slice(),
            &[3.0, 0.1 * -1.0, 0.1 * -2.0, 4.0]
        );
        // output z = 2*y1 + y2 + 0.5
        let expected = [
            2.0 * 3.0 + 0.1 * -2.0 + 0.5,
            2.0 * (0.1 * -1.0) + 4.0 + 0.5,
        ];
        assert_eq!(pass.output().as_slice(), &expected);
        assert_eq!(net.forward_sample(&[3.0, 2.0]).unwrap(), vec![expected[0]]);
    }

    #[test]
    fn wrong_feature_count_is_rejected() {
        let net = Network::new(&[3, 1]).unwrap();
        let input = Batch::from_samples(&[vec![1.0, 2.0]]).unwrap();
        assert!(matches!(
            net.forward(&input),
            Err(MlError::ShapeMismatch { op: "forward", .. })
        ));
    }
}
