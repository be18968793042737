//! Dashboard read side.
//!
//! Reshapes optimization reports into the aggregates the dispatcher
//! dashboard renders, and retains the latest snapshot in a file-backed
//! store. Everything here is downstream of the engine: the projection
//! is a pure function of the report, and store failures never affect a
//! computed result.

mod projection;
mod store;

pub use projection::{
    AuditEntry, DashboardSnapshot, DelayEntry, Kpis, PlatformEntry, QueueEntry, TrainTypeStat,
    build_snapshot,
};
pub use store::{SnapshotStore, StoreError};
