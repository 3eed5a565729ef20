use serde::{Deserialize, Serialize};

use crate::math::Number;

/// Record of one training iteration emitted by `train_network`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepStats {
    /// 0-based iteration number.
    pub iteration: usize,
    /// Index of the batch drawn for this iteration.
    pub batch_index: usize,
    /// Squared-error loss of that batch before the update.
    pub loss: Number,
}
