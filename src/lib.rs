pub mod error;
pub mod math;
pub mod activation;
pub mod batch;
pub mod layers;
pub mod network;
pub mod loss;
pub mod optim;
pub mod train;

// Convenience re-exports
pub use error::{MlError, Result};
pub use math::{ops, Buffer, Dims, Kernel, Matrix, Number, Validation, Vector};
pub use activation::LeakyRelu;
pub use batch::{Batch, MultiBatch};
pub use layers::DenseLayer;
pub use network::{Init, Network, NetworkSpec};
pub use loss::MseLoss;
pub use optim::Sgd;
pub use train::{train_network, ForwardPass, StepStats, TrainConfig};
