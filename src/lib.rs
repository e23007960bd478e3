use std::path::PathBuf;
use std::sync::atomic::AtomicBool;

use indicatif::{ProgressBar, ProgressStyle};
use numpy::ndarray::{Array1, Array2, Array3};
use numpy::{IntoPyArray, PyArray1, PyArray2};
use pyo3::exceptions::{PyIOError, PyKeyboardInterrupt, PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyDict;

use ising_sim::statistics::{critical_temperature, spontaneous_magnetization};
use ising_sim::{
    run_chain, simulate_ensemble, write_csv_file, Chain, InitialState, Lattice, SimConfig,
    SimError,
};

/// Steps run between checks for Ctrl-C.
const CHUNK_STEPS: usize = 10_000;

fn to_py_err(err: SimError) -> PyErr {
    let msg = err.to_string();
    match err {
        SimError::Interrupted { .. } => PyKeyboardInterrupt::new_err(msg),
        SimError::Io(_) => PyIOError::new_err(msg),
        SimError::IndexOutOfRange { .. } => PyRuntimeError::new_err(msg),
        _ => PyValueError::new_err(msg),
    }
}

fn grid<T>(width: usize, values: Vec<T>) -> PyResult<Array2<T>> {
    Array2::from_shape_vec((width, width), values)
        .map_err(|e| PyRuntimeError::new_err(e.to_string()))
}

#[pyclass]
struct IsingSimulation {
    lattice: Lattice,
    config: SimConfig,
    chain: Chain,
}

#[pymethods]
impl IsingSimulation {
    /// Create a new single-chain Ising simulation.
    ///
    /// Arguments:
    ///   side_count: half-extent N; the lattice is (2N+1) x (2N+1)
    ///   coupling: ferromagnetic coupling J (default 1.0)
    ///   temperature: kT (default 1.0)
    ///   seed: RNG seed; a fresh one is drawn when omitted
    ///   initial_state: "random", "up" or "down"
    #[new]
    #[pyo3(signature = (side_count, coupling=1.0, temperature=1.0, seed=None, initial_state="random"))]
    fn new(
        side_count: i32,
        coupling: f64,
        temperature: f64,
        seed: Option<u64>,
        initial_state: &str,
    ) -> PyResult<Self> {
        let initial_state = InitialState::try_from(initial_state).map_err(PyValueError::new_err)?;
        let config = SimConfig {
            side_count,
            coupling,
            temperature,
            seed,
            initial_state,
            ..SimConfig::default()
        };
        config.check().map_err(to_py_err)?;

        let lattice = Lattice::new(side_count).map_err(to_py_err)?;
        let chain = Chain::new(&lattice, initial_state, config.resolve_seed());

        Ok(Self {
            lattice,
            config,
            chain,
        })
    }

    /// Advance the chain by `n_steps` single-spin-flip steps.
    ///
    /// Returns: dict with
    ///   "steps": step indices of this call
    ///   "magnetization": magnetization after each of those steps
    ///   "acceptance_rate": accepted flips / steps over the chain's lifetime
    ///   "snapshot_steps", "snapshots": only when snapshot_interval is set;
    ///     snapshots has shape (n_snapshots, 2N+1, 2N+1)
    #[pyo3(signature = (n_steps, snapshot_interval=None, progress=true))]
    fn run<'py>(
        &mut self,
        py: Python<'py>,
        n_steps: usize,
        snapshot_interval: Option<usize>,
        progress: bool,
    ) -> PyResult<Bound<'py, PyDict>> {
        let run_config = SimConfig {
            n_steps,
            snapshot_interval,
            ..self.config.clone()
        };
        run_config.check().map_err(to_py_err)?;

        let pb = if progress {
            ProgressBar::new(n_steps as u64)
        } else {
            ProgressBar::hidden()
        };
        pb.set_style(
            ProgressStyle::with_template(
                "{msg} [{bar:40}] {pos}/{len} [{elapsed_precise} < {eta_precise}, {per_sec}]",
            )
            .map_err(|e| PyRuntimeError::new_err(e.to_string()))?
            .progress_chars("=> "),
        );
        pb.set_message("steps");

        let start = self.chain.steps_completed();
        let first_snapshot = self.chain.snapshots.len();
        let interrupted = AtomicBool::new(false);

        let mut remaining = n_steps;
        while remaining > 0 {
            if let Err(e) = py.check_signals() {
                pb.abandon();
                return Err(e);
            }
            let chunk = remaining.min(CHUNK_STEPS);
            let chunk_config = SimConfig {
                n_steps: chunk,
                ..run_config.clone()
            };
            if let Err(e) = run_chain(
                &self.lattice,
                &mut self.chain,
                &chunk_config,
                &interrupted,
                &|| pb.inc(1),
            ) {
                pb.abandon();
                return Err(to_py_err(e));
            }
            remaining -= chunk;
        }
        pb.finish();

        let end = self.chain.steps_completed();
        let dict = PyDict::new(py);
        dict.set_item(
            "steps",
            Array1::from_iter((start..end).map(|k| k as u64)).into_pyarray(py),
        )?;
        dict.set_item(
            "magnetization",
            Array1::from(self.chain.trajectory.values()[start..].to_vec()).into_pyarray(py),
        )?;
        dict.set_item("acceptance_rate", self.chain.acceptance_rate())?;

        if snapshot_interval.is_some() {
            let new_snapshots = &self.chain.snapshots[first_snapshot..];
            let width = self.lattice.width;
            let steps: Vec<u64> = new_snapshots.iter().map(|s| s.step as u64).collect();
            let flat: Vec<i8> = new_snapshots
                .iter()
                .flat_map(|s| s.spins.iter().copied())
                .collect();
            let cube = Array3::from_shape_vec((new_snapshots.len(), width, width), flat)
                .map_err(|e| PyRuntimeError::new_err(e.to_string()))?;
            dict.set_item("snapshot_steps", Array1::from(steps).into_pyarray(py))?;
            dict.set_item("snapshots", cube.into_pyarray(py))?;
        }

        Ok(dict)
    }

    /// Current spins as an int8 array of shape (2N+1, 2N+1), indexed [x+N, y+N].
    fn get_spins<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyArray2<i8>>> {
        let values = self.chain.spins.as_slice().to_vec();
        Ok(grid(self.lattice.width, values)?.into_pyarray(py))
    }

    /// Full magnetization series recorded so far.
    fn get_magnetization<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        Array1::from(self.chain.trajectory.values().to_vec()).into_pyarray(py)
    }

    fn magnetization(&self) -> f64 {
        self.chain.magnetization()
    }

    /// Energy per site, E/N.
    fn energy(&self) -> f64 {
        self.chain.energy_per_site(&self.lattice, self.config.coupling)
    }

    #[getter]
    fn steps_completed(&self) -> usize {
        self.chain.steps_completed()
    }

    /// Averages (m, |m|, m²) over the second half of the recorded series.
    fn second_half_summary<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let summary = self.chain.trajectory.second_half();
        let dict = PyDict::new(py);
        dict.set_item("n_samples", summary.n_samples)?;
        dict.set_item("mean", summary.mean)?;
        dict.set_item("mean_abs", summary.mean_abs)?;
        dict.set_item("mean_sq", summary.mean_sq)?;
        Ok(dict)
    }

    /// Write the series as `step,magnetization` lines.
    fn write_csv(&self, path: PathBuf) -> PyResult<()> {
        write_csv_file(path, &self.chain.trajectory).map_err(to_py_err)
    }

    /// Redraw spins from a new seed and clear the recorded series.
    #[pyo3(signature = (seed=None))]
    fn reset(&mut self, seed: Option<u64>) {
        let config = SimConfig {
            seed,
            ..self.config.clone()
        };
        self.chain
            .reset(&self.lattice, config.initial_state, config.resolve_seed());
    }
}

/// Run independent chains in parallel and return their magnetization series
/// as an array of shape (n_chains, n_steps). Chain i is seeded `seed + i`.
#[pyfunction]
#[pyo3(signature = (side_count, n_steps, n_chains, coupling=1.0, temperature=1.0, seed=None, initial_state="random"))]
#[allow(clippy::too_many_arguments)]
fn run_ensemble<'py>(
    py: Python<'py>,
    side_count: i32,
    n_steps: usize,
    n_chains: usize,
    coupling: f64,
    temperature: f64,
    seed: Option<u64>,
    initial_state: &str,
) -> PyResult<Bound<'py, PyArray2<f64>>> {
    let initial_state = InitialState::try_from(initial_state).map_err(PyValueError::new_err)?;
    let config = SimConfig {
        side_count,
        n_steps,
        coupling,
        temperature,
        seed,
        initial_state,
        snapshot_interval: None,
    };

    let (_, chains) = py
        .allow_threads(|| simulate_ensemble(&config, n_chains))
        .map_err(to_py_err)?;

    let flat: Vec<f64> = chains
        .iter()
        .flat_map(|c| c.trajectory.values().iter().copied())
        .collect();
    let series = Array2::from_shape_vec((n_chains, n_steps), flat)
        .map_err(|e| PyRuntimeError::new_err(e.to_string()))?;
    Ok(series.into_pyarray(py))
}

/// Onsager spontaneous magnetization of the infinite lattice at `temperature`.
#[pyfunction]
#[pyo3(signature = (temperature, coupling=1.0))]
fn onsager_magnetization(temperature: f64, coupling: f64) -> f64 {
    spontaneous_magnetization(temperature, coupling)
}

/// Onsager critical temperature `2J / ln(1 + sqrt(2))`.
#[pyfunction(name = "critical_temperature")]
#[pyo3(signature = (coupling=1.0))]
fn py_critical_temperature(coupling: f64) -> f64 {
    critical_temperature(coupling)
}

#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<IsingSimulation>()?;
    m.add_function(wrap_pyfunction!(run_ensemble, m)?)?;
    m.add_function(wrap_pyfunction!(onsager_magnetization, m)?)?;
    m.add_function(wrap_pyfunction!(py_critical_temperature, m)?)?;
    Ok(())
}
