use crate::activation::LeakyRelu;
use crate::error::{MlError, Result};
use crate::math::{Buffer, Kernel, Matrix, Vector};

/// One affine transition `z = W·x + b` between two adjacent layers.
///
/// `weights` is `next_size x input_size` and `biases` has `next_size` entries.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseLayer {
    pub(crate) weights: Matrix,
    pub(crate) biases: Vector,
}

/// Intermediates of one layer's forward step over a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerOutput {
    /// `W · y_prev`
    pub linear: Matrix,
    /// `linear + b` broadcast over the samples
    pub z: Matrix,
    /// `f(z)`
    pub y: Matrix,
}

/// Parameter gradients of one layer plus its error signal `dE/dz`.
#[derive(Debug, Clone, PartialEq)]
pub struct Gradients {
    pub weights: Matrix,
    pub biases: Vector,
    pub delta: Matrix,
}

impl DenseLayer {
    pub fn new(weights: Matrix, biases: Vector) -> Result<DenseLayer> {
        if weights.rows() != biases.size() {
            return Err(MlError::ShapeMismatch {
                op: "DenseLayer::new",
                detail: format!(
                    "{} weight rows but {} biases",
                    weights.rows(),
                    biases.size()
                ),
            });
        }
        Ok(DenseLayer { weights, biases })
    }

    pub fn input_size(&self) -> usize {
        self.weights.cols()
    }

    pub fn output_size(&self) -> usize {
        self.weights.rows()
    }

    pub fn weights(&self) -> &Matrix {
        &self.weights
    }

    pub fn biases(&self) -> &Vector {
        &self.biases
    }

    /// Runs the layer over a batch whose columns are samples.
    pub fn feed_forward(
        &self,
        kernel: &Kernel,
        activation: &LeakyRelu,
        input: &Matrix,
    ) -> Result<LayerOutput> {
        let (rows, cols) = (self.output_size(), input.cols());
        let mut linear = Matrix::zeros(rows, cols);
        let mut z = Matrix::zeros(rows, cols);
        let mut y = Matrix::zeros(rows, cols);

        kernel.matrix_product(&mut linear, &self.weights, input)?;
        kernel.broadcast_add_vector_to_columns(&mut z, &linear, &self.biases)?;
        activation.activate(kernel, &mut y, &z)?;

        Ok(LayerOutput { linear, z, y })
    }

    /// Unscaled gradients for this layer.
    ///
    /// `error` is `dE/dy` for this layer's output, `z` its pre-activation and
    /// `input` the activation of the layer below (`y_prev`).
    pub fn compute_gradients(
        &self,
        kernel: &Kernel,
        activation: &LeakyRelu,
        error: &Matrix,
        z: &Matrix,
        input: &Matrix,
    ) -> Result<Gradients> {
        let mut dy_dz = Matrix::zeros(z.rows(), z.cols());
        activation.activate_derivative(kernel, &mut dy_dz, z)?;

        // δ = dE/dy ⊙ f'(z)
        let mut delta = Matrix::zeros(z.rows(), z.cols());
        kernel.entrywise_product(&mut delta, error, &dy_dz)?;

        let mut input_t = Matrix::zeros(input.cols(), input.rows());
        kernel.transpose(&mut input_t, input)?;

        let mut weights = Matrix::zeros(self.weights.rows(), self.weights.cols());
        kernel.matrix_product(&mut weights, &delta, &input_t)?;

        let mut biases = Vector::zeros(self.biases.size());
        kernel.column_sum(&mut biases, &delta)?;

        Ok(Gradients {
            weights,
            biases,
            delta,
        })
    }

    /// `Wᵀ · delta`, the error signal handed to the layer below.
    pub fn propagate(&self, kernel: &Kernel, delta: &Matrix) -> Result<Matrix> {
        let mut weights_t = Matrix::zeros(self.weights.cols(), self.weights.rows());
        kernel.transpose(&mut weights_t, &self.weights)?;

        let mut out = Matrix::zeros(self.input_size(), delta.cols());
        kernel.matrix_product(&mut out, &weights_t, delta)?;
        Ok(out)
    }

    /// Descends along already-scaled gradients: `W -= dW`, `b -= db`.
    pub fn apply_gradients(&mut self, kernel: &Kernel, grads: &Gradients) -> Result<()> {
        kernel.ensure(
            "apply_gradients",
            grads.weights.dims() == self.weights.dims()
                && grads.biases.size() == self.biases.size(),
            || {
                format!(
                    "gradients {} / {} do not fit layer {} / {}",
                    grads.weights.dims(),
                    grads.biases.size(),
                    self.weights.dims(),
                    self.biases.size()
                )
            },
        )?;
        kernel.sub_assign(&mut self.weights, &grads.weights)?;
        kernel.sub_assign(&mut self.biases, &grads.biases)
    }
}
