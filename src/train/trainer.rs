use crate::batch::MultiBatch;
use crate::error::{MlError, Result};
use crate::network::Network;
use crate::train::step_stats::StepStats;
use crate::train::train_config::TrainConfig;

/// Trains `network` for `config.iterations` steps over a multi-batch.
///
/// Iteration `i` trains on input batch `i % number_of_batches` paired with the
/// target batch at the same index. Returns one [`StepStats`] per iteration.
///
/// # Errors
/// `ShapeMismatch` before any update if the two collections disagree in
/// sample count, batch count or per-batch sample count, or if their sample
/// sizes do not match the network's first and last layers.
pub fn train_network(
    network: &mut Network,
    inputs: &MultiBatch,
    targets: &MultiBatch,
    config: &TrainConfig,
) -> Result<Vec<StepStats>> {
    check_pairing(network, inputs, targets)?;

    let n = inputs.number_of_batches();
    let mut history = Vec::with_capacity(config.iterations);

    for iteration in 0..config.iterations {
        let batch_index = iteration % n;
        let loss = network.train_step(inputs.cyclic(batch_index), targets.cyclic(batch_index))?;
        history.push(StepStats {
            iteration,
            batch_index,
            loss,
        });

        if config.log_every > 0 && (iteration + 1) % config.log_every == 0 {
            log::info!(
                "Iteration {}/{}: batch {} loss = {:.6}",
                iteration + 1,
                config.iterations,
                batch_index,
                loss
            );
        }
    }

    if let Some(last) = history.last() {
        log::info!(
            "finished {} iterations over {} batches, last loss = {:.6}",
            config.iterations,
            n,
            last.loss
        );
    }

    Ok(history)
}

fn check_pairing(network: &Network, inputs: &MultiBatch, targets: &MultiBatch) -> Result<()> {
    let mismatch = |detail: String| MlError::ShapeMismatch {
        op: "train_network",
        detail,
    };

    if inputs.total_number_of_vectors() != targets.total_number_of_vectors() {
        return Err(mismatch(format!(
            "{} inputs but {} targets",
            inputs.total_number_of_vectors(),
            targets.total_number_of_vectors()
        )));
    }
    if inputs.vector_size() != network.input_size() {
        return Err(mismatch(format!(
            "inputs have {} features, input layer has {}",
            inputs.vector_size(),
            network.input_size()
        )));
    }
    if targets.vector_size() != network.output_size() {
        return Err(mismatch(format!(
            "targets have {} features, output layer has {}",
            targets.vector_size(),
            network.output_size()
        )));
    }
    if inputs.number_of_batches() != targets.number_of_batches() {
        return Err(mismatch(format!(
            "{} input batches but {} target batches",
            inputs.number_of_batches(),
            targets.number_of_batches()
        )));
    }
    if let Some(i) = inputs
        .iter()
        .zip(targets)
        .position(|(x, t)| x.number_of_vectors() != t.number_of_vectors())
    {
        return Err(mismatch(format!("batch {i} pairs different sample counts")));
    }
    Ok(())
}
