//! Error type shared by every fallible operation in the crate.

use thiserror::Error;

use crate::math::Dims;

/// Errors raised by the primitives, the batch layer and the network.
///
/// All of them are structural: they describe a caller bug (bad shapes, bad
/// indices, bad configuration) and are returned before any output buffer is
/// touched.
#[derive(Debug, Error)]
pub enum MlError {
    #[error("shape mismatch in {op}: {detail}")]
    ShapeMismatch { op: &'static str, detail: String },

    #[error("empty input: {0}")]
    EmptyInput(&'static str),

    #[error("index ({row}, {col}) out of range for {dims}")]
    IndexOutOfRange { row: usize, col: usize, dims: Dims },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("configuration parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MlError>;
