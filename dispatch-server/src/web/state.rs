//! Application state for the web layer.

use std::sync::Arc;

use crate::dashboard::SnapshotStore;
use crate::solver::SolverConfig;
use crate::topology::Topology;

/// Shared application state.
///
/// Everything a handler needs; cheap to clone per request.
#[derive(Clone)]
pub struct AppState {
    /// The station layout every run is planned against.
    pub topology: Arc<Topology>,

    /// Solver parameters.
    pub config: Arc<SolverConfig>,

    /// Latest dashboard snapshot, shared with the read endpoints.
    pub store: SnapshotStore,
}

impl AppState {
    /// Create a new app state.
    pub fn new(topology: Topology, config: SolverConfig, store: SnapshotStore) -> Self {
        Self {
            topology: Arc::new(topology),
            config: Arc::new(config),
            store,
        }
    }
}
