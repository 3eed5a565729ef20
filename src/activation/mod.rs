pub mod leaky_relu;

pub use leaky_relu::{LeakyRelu, LEAKY_SLOPE};
