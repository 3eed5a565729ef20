pub mod dense;

pub use dense::{DenseLayer, Gradients, LayerOutput};
