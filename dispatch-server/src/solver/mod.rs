//! The optimization engine.
//!
//! This module answers: "given these trains, their schedules, and the
//! segments currently out of service, what should each train do?" Raw
//! records become validated [`TrainJourney`]s, the simulated annealer
//! searches the plan space with the discrete-event simulator as its
//! objective, and the [`Dispatcher`] packages the winning plan as an
//! [`OptimizationReport`].

mod anneal;
mod config;
mod error;
mod journey;
mod plan;
mod run;
mod simulate;

pub use anneal::optimize;
pub use config::SolverConfig;
pub use error::ScheduleError;
pub use journey::{DelayInput, TrainInput, TrainJourney};
pub use plan::{Decision, Plan};
pub use run::{Action, ConflictReport, Dispatcher, OptimizationReport, Recommendation, parse_outages};
pub use simulate::{Conflict, SimulationOutcome, TimelineSpan, evaluate};
