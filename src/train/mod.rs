pub mod forward;
pub mod step;
pub mod step_stats;
pub mod train_config;
pub mod trainer;

pub use forward::ForwardPass;
pub use step_stats::StepStats;
pub use train_config::TrainConfig;
pub use trainer::train_network;
