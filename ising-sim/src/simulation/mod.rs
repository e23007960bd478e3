pub mod chain;

pub use chain::{Chain, Snapshot};

use std::sync::atomic::{AtomicBool, Ordering};

use crate::config::SimConfig;
use crate::error::{Result, SimError};
use crate::geometry::Lattice;
use crate::mcmc::Metropolis;
use crate::parallel::par_over_chains;

/// Run `config.n_steps` Metropolis steps on one [`Chain`].
///
/// Each step:
/// 1. Check `interrupted` (the only cancellation point)
/// 2. Propose and accept/reject one single-spin flip
/// 3. Record the post-step magnetization
/// 4. Optionally keep a spin snapshot (every `snapshot_interval` steps)
///
/// Step indices continue from whatever the chain already recorded, so a run
/// may be split into several calls. On interruption the steps recorded so
/// far stay in the chain.
///
/// `on_step` is called once per step (useful for progress bars).
pub fn run_chain(
    lattice: &Lattice,
    chain: &mut Chain,
    config: &SimConfig,
    interrupted: &AtomicBool,
    on_step: &(dyn Fn() + Sync),
) -> Result<()> {
    config.check()?;
    if config.side_count != lattice.side_count {
        return Err(SimError::InvalidConfiguration(format!(
            "config side_count {} does not match lattice side_count {}",
            config.side_count, lattice.side_count
        )));
    }
    if chain.spins.len() != lattice.n_sites {
        return Err(SimError::InvalidConfiguration(format!(
            "chain holds {} spins, lattice has {} sites",
            chain.spins.len(),
            lattice.n_sites
        )));
    }

    let engine = Metropolis::new(config.coupling, config.temperature)?;
    log::debug!(
        "metropolis run: side_count={} sites={} steps={} J={} kT={}",
        lattice.side_count,
        lattice.n_sites,
        config.n_steps,
        config.coupling,
        config.temperature
    );

    chain.trajectory.reserve(config.n_steps);

    for done in 0..config.n_steps {
        if interrupted.load(Ordering::Relaxed) {
            log::warn!("run interrupted after {done} of {} steps", config.n_steps);
            return Err(SimError::Interrupted { completed: done });
        }
        on_step();

        let step = chain.steps_completed();
        let outcome = engine.step(lattice, &mut chain.spins, &mut chain.rng)?;
        if outcome.flipped {
            chain.accepted += 1;
        }
        chain.trajectory.record(&chain.spins);

        if let Some(interval) = config.snapshot_interval {
            if step % interval == 0 {
                log::trace!("snapshot at step {step}");
                chain.snapshots.push(Snapshot {
                    step,
                    spins: chain.spins.as_slice().to_vec(),
                });
            }
        }
    }

    log::info!(
        "run finished: {} steps, m={:.4}, acceptance={:.4}",
        chain.steps_completed(),
        chain.magnetization(),
        chain.acceptance_rate()
    );
    Ok(())
}

/// Run independent chains over a shared lattice, in parallel unless
/// `sequential` is set.
///
/// Chains never exchange state; the first failing chain's error is returned
/// after all chains have stopped.
pub fn run_chains_parallel(
    lattice: &Lattice,
    chains: &mut [Chain],
    config: &SimConfig,
    sequential: bool,
    interrupted: &AtomicBool,
    on_step: &(dyn Fn() + Sync),
) -> Result<()> {
    let results = par_over_chains(chains, sequential, |_, chain| {
        run_chain(lattice, chain, config, interrupted, on_step)
    });
    results.into_iter().collect::<Result<Vec<_>>>()?;
    Ok(())
}

/// Build the lattice and one chain from `config`, then run it to completion.
pub fn simulate(config: &SimConfig) -> Result<(Lattice, Chain)> {
    config.check()?;
    let lattice = Lattice::new(config.side_count)?;
    let mut chain = Chain::new(&lattice, config.initial_state, config.resolve_seed());
    run_chain(&lattice, &mut chain, config, &AtomicBool::new(false), &|| {})?;
    Ok((lattice, chain))
}

/// Run `n_chains` independent chains seeded `base_seed, base_seed+1, …`.
pub fn simulate_ensemble(config: &SimConfig, n_chains: usize) -> Result<(Lattice, Vec<Chain>)> {
    config.check()?;
    let lattice = Lattice::new(config.side_count)?;
    let base_seed = config.resolve_seed();
    let mut chains: Vec<Chain> = (0..n_chains)
        .map(|i| Chain::new(&lattice, config.initial_state, base_seed.wrapping_add(i as u64)))
        .collect();
    run_chains_parallel(
        &lattice,
        &mut chains,
        config,
        false,
        &AtomicBool::new(false),
        &|| {},
    )?;
    Ok((lattice, chains))
}
