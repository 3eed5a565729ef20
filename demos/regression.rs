use mllib::{train_network, Batch, Init, MultiBatch, Network, NetworkSpec, TrainConfig};

fn main() -> mllib::Result<()> {
    // y = 0.5 * x1 + 2 * x2 - 1, sampled on a small grid
    let mut inputs = Vec::new();
    let mut targets = Vec::new();
    for i in 0..10 {
        for j in 0..10 {
            let (x1, x2) = (i as f64 / 10.0, j as f64 / 10.0);
            inputs.push(vec![x1, x2]);
            targets.push(vec![0.5 * x1 + 2.0 * x2 - 1.0]);
        }
    }

    let spec = NetworkSpec::new(vec![2, 8, 1])
        .with_learning_rate(0.05)
        .with_init(Init::He { seed: 7 });
    let mut network = Network::from_spec(&spec)?;

    let input_batches = MultiBatch::partition(&inputs, 16)?;
    let target_batches = MultiBatch::partition(&targets, 16)?;

    let history = train_network(
        &mut network,
        &input_batches,
        &target_batches,
        &TrainConfig::new(5000),
    )?;
    for stats in history.iter().step_by(500) {
        println!("Iteration {}: loss = {:.6}", stats.iteration, stats.loss);
    }

    let all_inputs = Batch::from_samples(&inputs)?;
    let all_targets = Batch::from_samples(&targets)?;
    println!("Final loss: {:.6}", network.evaluate(&all_inputs, &all_targets)?);

    for sample in [[0.2, 0.3], [0.9, 0.1]] {
        let out = network.forward_sample(&sample)?;
        println!("Input: {:?} -> Output: {:.4}", sample, out[0]);
    }
    Ok(())
}
