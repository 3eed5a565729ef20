use crate::activation::LeakyRelu;
use crate::batch::Batch;
use crate::error::{MlError, Result};
use crate::layers::DenseLayer;
use crate::loss::MseLoss;
use crate::math::{Buffer, Dims, Kernel, Matrix, Number, Vector};
use crate::network::spec::NetworkSpec;
use crate::optim::Sgd;

/// A stack of fully-connected layers sharing the leaky rectifier.
///
/// For `layer_sizes = [n0, n1, ..., nL]` there is one [`DenseLayer`] per
/// adjacent pair, with weights `n(i+1) x n(i)` and `n(i+1)` biases. The
/// network owns all parameter storage; dropping it releases everything.
#[derive(Debug, Clone)]
pub struct Network {
    layer_sizes: Vec<usize>,
    pub(crate) layers: Vec<DenseLayer>,
    pub(crate) optimizer: Sgd,
    pub(crate) activation: LeakyRelu,
    pub(crate) kernel: Kernel,
}

impl Network {
    /// Builds a network with the default learning rate, init and validation.
    pub fn new(layer_sizes: &[usize]) -> Result<Network> {
        Network::from_spec(&NetworkSpec::new(layer_sizes.to_vec()))
    }

    pub fn from_spec(spec: &NetworkSpec) -> Result<Network> {
        spec.validate()?;
        let layers = spec
            .init
            .build(&spec.layer_sizes)
            .into_iter()
            .map(|(weights, biases)| DenseLayer::new(weights, biases))
            .collect::<Result<Vec<_>>>()?;

        Ok(Network {
            layer_sizes: spec.layer_sizes.clone(),
            layers,
            optimizer: Sgd::new(spec.learning_rate),
            activation: LeakyRelu,
            kernel: Kernel::new(spec.validation),
        })
    }

    pub fn layer_sizes(&self) -> &[usize] {
        &self.layer_sizes
    }

    pub fn number_of_layers(&self) -> usize {
        self.layer_sizes.len()
    }

    pub fn input_size(&self) -> usize {
        self.layer_sizes[0]
    }

    pub fn output_size(&self) -> usize {
        self.layer_sizes[self.layer_sizes.len() - 1]
    }

    pub fn learning_rate(&self) -> Number {
        self.optimizer.learning_rate
    }

    pub fn set_learning_rate(&mut self, learning_rate: Number) -> Result<()> {
        if !learning_rate.is_finite() || learning_rate <= 0.0 {
            return Err(MlError::InvalidConfig(format!(
                "learning rate must be positive and finite, got {learning_rate}"
            )));
        }
        self.optimizer.learning_rate = learning_rate;
        Ok(())
    }

    pub fn kernel(&self) -> &Kernel {
        &self.kernel
    }

    pub fn layers(&self) -> &[DenseLayer] {
        &self.layers
    }

    /// Weights of the transition from layer `i` to layer `i + 1`.
    pub fn weights(&self, i: usize) -> Option<&Matrix> {
        self.layers.get(i).map(|l| &l.weights)
    }

    pub fn biases(&self, i: usize) -> Option<&Vector> {
        self.layers.get(i).map(|l| &l.biases)
    }

    /// Replaces the weights of transition `i`; the shape must stay the same.
    pub fn set_weights(&mut self, i: usize, weights: Matrix) -> Result<()> {
        let layer = self.layer_mut(i)?;
        if weights.dims() != layer.weights.dims() {
            return Err(MlError::ShapeMismatch {
                op: "set_weights",
                detail: format!("layer {i} expects {}, got {}", layer.weights.dims(), weights.dims()),
            });
        }
        layer.weights = weights;
        Ok(())
    }

    /// Replaces the biases of transition `i`; the length must stay the same.
    pub fn set_biases(&mut self, i: usize, biases: Vector) -> Result<()> {
        let layer = self.layer_mut(i)?;
        if biases.size() != layer.biases.size() {
            return Err(MlError::ShapeMismatch {
                op: "set_biases",
                detail: format!(
                    "layer {i} expects {} biases, got {}",
                    layer.biases.size(),
                    biases.size()
                ),
            });
        }
        layer.biases = biases;
        Ok(())
    }

    fn layer_mut(&mut self, i: usize) -> Result<&mut DenseLayer> {
        let count = self.layers.len();
        self.layers.get_mut(i).ok_or(MlError::IndexOutOfRange {
            row: i,
            col: 0,
            dims: Dims::new(count, 1),
        })
    }

    /// Output batch for `input`.
    pub fn predict(&self, input: &Batch) -> Result<Batch> {
        Ok(Batch::from_matrix(self.forward(input)?.into_output()))
    }

    /// Squared-error loss of the network's output against `target`,
    /// averaged over the samples of the batch.
    pub fn evaluate(&self, input: &Batch, target: &Batch) -> Result<Number> {
        let pass = self.forward(input)?;
        MseLoss::loss(&self.kernel, pass.output(), target.data())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::Init;

    #[test]
    fn shapes_follow_layer_sizes() {
        let net = Network::new(&[3, 5, 2]).unwrap();
        assert_eq!(net.number_of_layers(), 3);
        assert_eq!(net.layers().len(), 2);
        assert_eq!(net.weights(0).unwrap().rows(), 5);
        assert_eq!(net.weights(0).unwrap().cols(), 3);
        assert_eq!(net.biases(0).unwrap().size(), 5);
        assert_eq!(net.weights(1).unwrap().rows(), 2);
        assert_eq!(net.weights(1).unwrap().cols(), 5);
        assert_eq!(net.biases(1).unwrap().size(), 2);
        assert!(net.weights(2).is_none());
        assert_eq!(net.learning_rate(), 0.4);
    }

    #[test]
    fn default_init_is_constant_one() {
        let net = Network::new(&[2, 2]).unwrap();
        assert!(net.weights(0).unwrap().as_slice().iter().all(|&w| w == 1.0));
        assert!(net.biases(0).unwrap().as_slice().iter().all(|&b| b == 1.0));
    }

    #[test]
    fn same_seed_builds_same_network() {
        let spec = NetworkSpec::new(vec![4, 3, 1]).with_init(Init::He { seed: 11 });
        let a = Network::from_spec(&spec).unwrap();
        let b = Network::from_spec(&spec).unwrap();
        assert_eq!(a.layers(), b.layers());
    }

    #[test]
    fn setters_keep_shapes() {
        let mut net = Network::new(&[2, 1]).unwrap();
        assert!(net.set_weights(0, Matrix::zeros(2, 1)).is_err());
        assert!(net.set_biases(0, Vector::zeros(2)).is_err());
        assert!(net.set_weights(1, Matrix::zeros(1, 2)).is_err());
        net.set_weights(0, Matrix::from_rows(vec![vec![0.5, -0.5]]).unwrap())
            .unwrap();
        assert_eq!(net.weights(0).unwrap().as_slice(), &[0.5, -0.5]);
        assert!(net.set_learning_rate(-1.0).is_err());
    }

    #[test]
    fn invalid_layer_sizes_are_rejected() {
        assert!(matches!(Network::new(&[4]), Err(MlError::InvalidConfig(_))));
        assert!(Network::new(&[]).is_err());
        assert!(Network::new(&[2, 0]).is_err());
    }
}
