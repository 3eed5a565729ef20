use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Configuration for a `train_network` run.
///
/// # Fields
/// - `iterations`: number of training steps. Batches are drawn in order and
///   wrap around, so this may exceed the number of batches. There is no
///   convergence check.
/// - `log_every`: emit an `info` log line every this many iterations;
///   `0` disables the periodic line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainConfig {
    pub iterations: usize,
    #[serde(default)]
    pub log_every: usize,
}

impl TrainConfig {
    /// Creates a `TrainConfig` without periodic logging.
    pub fn new(iterations: usize) -> Self {
        TrainConfig {
            iterations,
            log_every: 0,
        }
    }

    pub fn with_log_every(mut self, log_every: usize) -> Self {
        self.log_every = log_every;
        self
    }

    /// Deserializes a `TrainConfig` from a JSON file.
    pub fn load_json(path: &str) -> Result<TrainConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_every_defaults_to_off() {
        let cfg: TrainConfig = serde_json::from_str(r#"{ "iterations": 250 }"#).unwrap();
        assert_eq!(cfg, TrainConfig::new(250));
        assert!(serde_json::from_str::<TrainConfig>("{}").is_err());
    }
}
