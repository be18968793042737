//! Solver configuration.

/// Configuration parameters for an optimization run.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Maximum number of annealing iterations.
    pub iterations: usize,

    /// Starting temperature for the acceptance criterion.
    pub initial_temperature: f64,

    /// Multiplicative cooling applied after every iteration.
    pub cooling_rate: f64,

    /// Temperature floor; the search stops once cooling reaches it.
    pub min_temperature: f64,

    /// Maximum candidate routes enumerated per train.
    pub max_routes: usize,

    /// Fixed RNG seed for reproducible runs.
    /// `None` seeds from entropy, which is what production wants.
    pub seed: Option<u64>,
}

impl SolverConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(
        iterations: usize,
        initial_temperature: f64,
        cooling_rate: f64,
        min_temperature: f64,
        max_routes: usize,
        seed: Option<u64>,
    ) -> Self {
        Self {
            iterations,
            initial_temperature,
            cooling_rate,
            min_temperature,
            max_routes,
            seed,
        }
    }

    /// Returns a copy of this configuration pinned to a fixed seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            iterations: 2000,
            initial_temperature: 1000.0,
            cooling_rate: 0.99,
            min_temperature: 0.01,
            max_routes: 5,
            seed: None,
        }
    }
}
