use crate::batch::Batch;
use crate::error::{MlError, Result};
use crate::loss::MseLoss;
use crate::math::{Buffer, Matrix, Number};
use crate::network::Network;
use crate::train::forward::ForwardPass;

impl Network {
    /// One gradient-descent step on a batch: forward pass, then backward pass.
    ///
    /// Returns the squared-error loss of the batch measured before the update.
    pub fn train_step(&mut self, input: &Batch, target: &Batch) -> Result<Number> {
        let pass = self.forward(input)?;
        let loss = MseLoss::loss(&self.kernel, pass.output(), target.data())?;
        log::debug!(
            "train step over {} samples: loss = {:.6}",
            pass.batch_size(),
            loss
        );
        self.backward(&pass, target)?;
        Ok(loss)
    }

    /// Backward propagation from a completed forward pass.
    ///
    /// Walks the transitions from the output down. For each one the error
    /// signal `δ = dE/dy ⊙ f'(z)` gives `dW = δ·yᵀ` and `db = Σ_cols δ`, both
    /// scaled by `learning_rate / batch_size` before being subtracted. The
    /// layer below then receives `Wᵀ·δ` with the same scaling, taken from the
    /// weights this step has just updated.
    pub fn backward(&mut self, pass: &ForwardPass, target: &Batch) -> Result<()> {
        if pass.number_of_layers() != self.number_of_layers() {
            return Err(MlError::ShapeMismatch {
                op: "backward",
                detail: format!(
                    "forward pass has {} layers, network has {}",
                    pass.number_of_layers(),
                    self.number_of_layers()
                ),
            });
        }
        let batch_size = pass.batch_size();
        if batch_size == 0 {
            return Err(MlError::EmptyInput("cannot train on a batch without samples"));
        }

        let kernel = self.kernel;
        let activation = self.activation;
        let optimizer = self.optimizer;

        let output = pass.output();
        kernel.ensure(
            "backward",
            target.data().dims() == output.dims(),
            || {
                format!(
                    "target batch {} does not match network output {}",
                    target.data().dims(),
                    output.dims()
                )
            },
        )?;

        // dE/dy at the output layer
        let mut error = Matrix::zeros(output.rows(), output.cols());
        MseLoss::derivative(&kernel, &mut error, output, target.data())?;

        for j in (0..self.layers.len()).rev() {
            let mut grads = self.layers[j].compute_gradients(
                &kernel,
                &activation,
                &error,
                &pass.layer(j).z,
                pass.layer_input(j),
            )?;

            optimizer.step(&kernel, &mut self.layers[j], &mut grads, batch_size)?;

            if j > 0 {
                let mut below = self.layers[j].propagate(&kernel, &grads.delta)?;
                kernel.scale_assign(&mut below, optimizer.step_size(batch_size));
                error = below;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Validation, Vector};
    use crate::network::{Init, NetworkSpec};
    use approx::assert_abs_diff_eq;

    fn single_layer() -> Network {
        let mut net = Network::new(&[2, 1]).unwrap();
        net.set_learning_rate(0.1).unwrap();
        net.set_weights(0, Matrix::from_rows(vec![vec![0.5, -0.25]]).unwrap())
            .unwrap();
        net.set_biases(0, Vector::from_vec(vec![0.1])).unwrap();
        net
    }

    #[test]
    fn single_step_matches_hand_derivation() {
        let mut net = single_layer();
        let input = Batch::from_samples(&[vec![1.0, 2.0], vec![0.5, -1.0]]).unwrap();
        let target = Batch::from_samples(&[vec![1.0], vec![0.5]]).unwrap();

        // outputs 0.1 and 0.6: ((-0.9)² + 0.1²) / 2
        let loss = net.train_step(&input, &target).unwrap();
        assert_abs_diff_eq!(loss, 0.41, epsilon = 1e-12);

        // δ = (-0.9, 0.1), step = 0.1 / 2
        let w = net.weights(0).unwrap();
        assert_abs_diff_eq!(w.get(0, 0).unwrap(), 0.5 + 0.05 * 0.85, epsilon = 1e-12);
        assert_abs_diff_eq!(w.get(0, 1).unwrap(), -0.25 + 0.05 * 1.9, epsilon = 1e-12);
        assert_abs_diff_eq!(net.biases(0).unwrap().get(0).unwrap(), 0.14, epsilon = 1e-12);
    }

    #[test]
    fn target_shape_is_checked_before_any_update() {
        let mut net = single_layer();
        let before = net.layers().to_vec();
        let input = Batch::from_samples(&[vec![1.0, 2.0]]).unwrap();
        let target = Batch::from_samples(&[vec![1.0, 0.0]]).unwrap();

        assert!(net.train_step(&input, &target).is_err());
        assert_eq!(net.layers(), before.as_slice());
    }

    #[test]
    fn empty_batch_is_rejected() {
        let mut net = single_layer();
        let input = Batch::empty(0, 2);
        let target = Batch::empty(0, 1);
        assert!(matches!(
            net.train_step(&input, &target),
            Err(MlError::EmptyInput(_))
        ));
    }

    #[test]
    fn hidden_layer_receives_scaled_error() {
        let mut net = Network::new(&[1, 1, 1]).unwrap();
        net.set_learning_rate(0.5).unwrap();
        net.set_weights(0, Matrix::filled(1, 1, 2.0)).unwrap();
        net.set_biases(0, Vector::zeros(1)).unwrap();
        net.set_weights(1, Matrix::filled(1, 1, 3.0)).unwrap();
        net.set_biases(1, Vector::zeros(1)).unwrap();

        let input = Batch::from_samples(&[vec![1.0]]).unwrap();
        let target = Batch::from_samples(&[vec![4.0]]).unwrap();
        net.train_step(&input, &target).unwrap();

        // y1 = 2, y2 = 6, δ2 = 2
        // W1 -= 0.5 * δ2 * y1 = 2, b1 -= 0.5 * 2 = 1
        assert_eq!(net.weights(1).unwrap().as_slice(), &[1.0]);
        assert_eq!(net.biases(1).unwrap().as_slice(), &[-1.0]);
        // error below = 0.5 * W1(updated) * δ2 = 1, δ1 = 1
        // W0 -= 0.5 * 1 * 1, b0 -= 0.5 * 1
        assert_eq!(net.weights(0).unwrap().as_slice(), &[1.5]);
        assert_eq!(net.biases(0).unwrap().as_slice(), &[-0.5]);
    }

    #[test]
    fn trusted_network_trains_like_a_checked_one() {
        let spec = NetworkSpec::new(vec![3, 4, 2])
            .with_learning_rate(0.05)
            .with_init(Init::Xavier { seed: 7 });
        let mut checked = Network::from_spec(&spec).unwrap();
        let mut trusted =
            Network::from_spec(&spec.clone().with_validation(Validation::Trusted)).unwrap();
        assert_eq!(trusted.kernel().validation(), Validation::Trusted);

        let input = Batch::from_samples(&[
            vec![0.5, -1.0, 2.0],
            vec![1.5, 0.25, -0.75],
            vec![-2.0, 0.0, 1.0],
        ])
        .unwrap();
        let target =
            Batch::from_samples(&[vec![1.0, 0.0], vec![0.5, -0.5], vec![0.0, 2.0]]).unwrap();

        assert_eq!(
            checked.forward(&input).unwrap(),
            trusted.forward(&input).unwrap()
        );
        for _ in 0..3 {
            let a = checked.train_step(&input, &target).unwrap();
            let b = trusted.train_step(&input, &target).unwrap();
            assert_eq!(a.to_bits(), b.to_bits());
        }
        assert_eq!(checked.layers(), trusted.layers());
    }
}
