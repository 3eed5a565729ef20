use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::error::{MlError, Result};
use crate::math::{Matrix, Number, Validation, Vector};

/// Learning rate used when a spec does not set one.
pub const DEFAULT_LEARNING_RATE: Number = 0.4;

/// How weights and biases are filled when a network is built.
///
/// Random variants are seeded so a given spec always builds the same network.
/// Their biases start at zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Init {
    /// Every weight and every bias set to the given constants.
    Constant { weight: Number, bias: Number },
    /// Weights uniform on [-1, 1).
    Uniform { seed: u64 },
    /// He normal, suited to the rectifier.
    He { seed: u64 },
    /// Xavier (Glorot) normal.
    Xavier { seed: u64 },
}

impl Default for Init {
    fn default() -> Self {
        Init::Constant {
            weight: 1.0,
            bias: 1.0,
        }
    }
}

impl Init {
    /// Builds `(weights, biases)` for every transition of `layer_sizes`.
    pub(crate) fn build(&self, layer_sizes: &[usize]) -> Vec<(Matrix, Vector)> {
        let seed = match *self {
            Init::Uniform { seed } | Init::He { seed } | Init::Xavier { seed } => seed,
            Init::Constant { .. } => 0,
        };
        let mut rng = StdRng::seed_from_u64(seed);

        layer_sizes
            .windows(2)
            .map(|pair| {
                let (input, output) = (pair[0], pair[1]);
                match *self {
                    Init::Constant { weight, bias } => (
                        Matrix::filled(output, input, weight),
                        Vector::filled(output, bias),
                    ),
                    Init::Uniform { .. } => {
                        (Matrix::uniform(output, input, &mut rng), Vector::zeros(output))
                    }
                    Init::He { .. } => (Matrix::he(output, input, &mut rng), Vector::zeros(output)),
                    Init::Xavier { .. } => {
                        (Matrix::xavier(output, input, &mut rng), Vector::zeros(output))
                    }
                }
            })
            .collect()
    }
}

fn default_learning_rate() -> Number {
    DEFAULT_LEARNING_RATE
}

/// Serializable description of a network: architecture plus training settings.
///
/// Describes how to build a network, never its trained parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSpec {
    /// Neurons per layer, input layer first. At least two entries, none zero.
    pub layer_sizes: Vec<usize>,
    /// Gradient-descent step factor (gamma).
    #[serde(default = "default_learning_rate")]
    pub learning_rate: Number,
    #[serde(default)]
    pub init: Init,
    /// Shape validation mode for the primitives the network calls.
    #[serde(default)]
    pub validation: Validation,
}

impl NetworkSpec {
    /// Spec with the default learning rate, init and validation.
    pub fn new(layer_sizes: Vec<usize>) -> NetworkSpec {
        NetworkSpec {
            layer_sizes,
            learning_rate: DEFAULT_LEARNING_RATE,
            init: Init::default(),
            validation: Validation::default(),
        }
    }

    pub fn with_learning_rate(mut self, learning_rate: Number) -> NetworkSpec {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_init(mut self, init: Init) -> NetworkSpec {
        self.init = init;
        self
    }

    pub fn with_validation(mut self, validation: Validation) -> NetworkSpec {
        self.validation = validation;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.layer_sizes.len() < 2 {
            return Err(MlError::InvalidConfig(format!(
                "a network needs at least 2 layers, got {}",
                self.layer_sizes.len()
            )));
        }
        if let Some(i) = self.layer_sizes.iter().position(|&s| s == 0) {
            return Err(MlError::InvalidConfig(format!("layer {i} has no neurons")));
        }
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(MlError::InvalidConfig(format!(
                "learning rate must be positive and finite, got {}",
                self.learning_rate
            )));
        }
        Ok(())
    }

    /// Serializes the spec to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a `NetworkSpec` from a JSON file.
    pub fn load_json(path: &str) -> Result<NetworkSpec> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let spec: NetworkSpec = serde_json::from_str(r#"{ "layer_sizes": [3, 4, 1] }"#).unwrap();
        assert_eq!(spec, NetworkSpec::new(vec![3, 4, 1]));
        assert_eq!(spec.learning_rate, 0.4);
        assert_eq!(spec.validation, Validation::Checked);
    }

    #[test]
    fn init_is_tagged_by_type() {
        let spec: NetworkSpec = serde_json::from_str(
            r#"{ "layer_sizes": [2, 1], "learning_rate": 0.05,
                 "init": { "type": "he", "seed": 42 }, "validation": "trusted" }"#,
        )
        .unwrap();
        assert_eq!(spec.init, Init::He { seed: 42 });
        assert_eq!(spec.validation, Validation::Trusted);
    }

    #[test]
    fn validate_rejects_degenerate_specs() {
        assert!(NetworkSpec::new(vec![3]).validate().is_err());
        assert!(NetworkSpec::new(vec![3, 0, 1]).validate().is_err());
        assert!(NetworkSpec::new(vec![3, 1])
            .with_learning_rate(0.0)
            .validate()
            .is_err());
        assert!(NetworkSpec::new(vec![3, 1]).validate().is_ok());
    }

    #[test]
    fn json_file_round_trip() {
        let path = std::env::temp_dir().join(format!("mllib-spec-{}.json", std::process::id()));
        let path = path.to_str().unwrap();
        let spec = NetworkSpec::new(vec![4, 2]).with_init(Init::Xavier { seed: 3 });
        spec.save_json(path).unwrap();
        assert_eq!(NetworkSpec::load_json(path).unwrap(), spec);
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn seeded_init_is_deterministic() {
        let a = Init::Uniform { seed: 9 }.build(&[3, 5, 2]);
        let b = Init::Uniform { seed: 9 }.build(&[3, 5, 2]);
        assert_eq!(a, b);
        assert_eq!(a[0].0.rows(), 5);
        assert_eq!(a[0].0.cols(), 3);
        assert_eq!(a[1].1.size(), 2);
    }
}
