use std::sync::atomic::AtomicBool;
use std::time::Instant;

use ising_sim::config::*;
use ising_sim::statistics::spontaneous_magnetization;
use ising_sim::{run_chains_parallel, Chain, Lattice};

const SIDE_COUNT: i32 = 25;
const N_STEPS: usize = 1_000_000;
const N_CHAINS: usize = 16;
const TEMPERATURE: f64 = 1.5;

fn main() {
    let lattice = Lattice::new(SIDE_COUNT).expect("valid side count");

    let mut chains: Vec<Chain> = (0..N_CHAINS)
        .map(|i| Chain::new(&lattice, InitialState::Random, 42 + i as u64))
        .collect();

    let interrupted = AtomicBool::new(false);

    let config = SimConfig {
        side_count: SIDE_COUNT,
        n_steps: N_STEPS,
        coupling: 1.0,
        temperature: TEMPERATURE,
        seed: Some(42),
        initial_state: InitialState::Random,
        snapshot_interval: None,
    };

    println!(
        "Lattice: {0}x{0}  |  Steps: {1}  |  Chains: {2}  |  kT: {3}",
        lattice.width, N_STEPS, N_CHAINS, TEMPERATURE
    );
    println!("{}", "-".repeat(70));

    let t0 = Instant::now();
    run_chains_parallel(&lattice, &mut chains, &config, false, &interrupted, &|| {})
        .expect("run failed");
    let elapsed = t0.elapsed().as_secs_f64();

    let per_step = elapsed / (N_STEPS * N_CHAINS) as f64 * 1e9;
    println!("Total: {:.3} s  |  {:.1} ns/step", elapsed, per_step);

    let mean_abs: f64 = chains
        .iter()
        .map(|c| c.trajectory.second_half().mean_abs)
        .sum::<f64>()
        / N_CHAINS as f64;
    println!(
        "<|m|> (second half): {:.4}  |  Onsager: {:.4}",
        mean_abs,
        spontaneous_magnetization(TEMPERATURE, 1.0)
    );
}
