use crate::error::Result;
use crate::math::{Kernel, Matrix, Number};

/// Slope applied to non-positive inputs.
pub const LEAKY_SLOPE: Number = 0.1;

/// Leaky rectifier, the network's only nonlinearity.
///
/// `f(x) = x` for `x > 0`, otherwise `0.1 * x`. At zero, `f(0) = 0` and
/// `f'(0) = 0.1`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LeakyRelu;

impl LeakyRelu {
    pub fn function(&self, x: Number) -> Number {
        if x > 0.0 { x } else { LEAKY_SLOPE * x }
    }

    pub fn derivative(&self, x: Number) -> Number {
        if x > 0.0 { 1.0 } else { LEAKY_SLOPE }
    }

    /// Elementwise `out = f(input)`; shapes must match.
    pub fn activate(&self, kernel: &Kernel, out: &mut Matrix, input: &Matrix) -> Result<()> {
        kernel.map_into(out, input, |x| self.function(x))
    }

    /// Elementwise `out = f'(input)`; shapes must match.
    pub fn activate_derivative(
        &self,
        kernel: &Kernel,
        out: &mut Matrix,
        input: &Matrix,
    ) -> Result<()> {
        kernel.map_into(out, input, |x| self.derivative(x))
    }
}
