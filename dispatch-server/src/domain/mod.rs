//! Domain types for the station dispatch planner.
//!
//! This module contains the core domain model types that represent
//! validated dispatch data. All types enforce their invariants at
//! construction time, so code that receives these types can trust their
//! validity.

mod delay;
mod node;
mod time;
mod train;

pub use delay::{DelayFactors, InvalidDelay};
pub use node::{InvalidNode, InvalidSegment, NodeId, Segment};
pub use time::{TimeError, add_minutes, format_hhmm, minutes_between, parse_timestamp};
pub use train::{InvalidTrainId, TrainId, TrainType, UnknownTrainType};
