//! Sample layout for bulk computation.
//!
//! A [`Batch`] stores one sample per column of a matrix so a single matrix
//! product applies a layer to every sample at once. [`MultiBatch`] splits a
//! large sample collection into fixed-size batches for mini-batch training.

pub mod batch;
pub mod multi_batch;

pub use batch::Batch;
pub use multi_batch::MultiBatch;
