pub mod network;
pub mod spec;

pub use network::Network;
pub use spec::{Init, NetworkSpec, DEFAULT_LEARNING_RATE};
