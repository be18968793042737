//! Train journey assembly.
//!
//! A [`TrainJourney`] is the validated, route-annotated form of one raw
//! [`TrainInput`] record: identity and classification parsed, timestamps
//! resolved, candidate routes enumerated against the current state of
//! the topology. Construction fails fast on malformed data, naming the
//! offending train, and a whole run aborts on the first failure.

use chrono::NaiveDateTime;
use serde::Deserialize;

use super::error::ScheduleError;
use crate::domain::{DelayFactors, NodeId, TrainId, TrainType, add_minutes, parse_timestamp};
use crate::topology::{RoutingGraph, enumerate_routes};

/// Raw per-train record as supplied by the caller.
///
/// String-typed fields are validated during journey construction so
/// that failures can be attributed to the train they belong to.
#[derive(Debug, Clone, Deserialize)]
pub struct TrainInput {
    /// Boundary node where the train enters the station.
    pub entry_node: String,
    /// Boundary node where the train leaves the station.
    pub exit_node: String,
    /// Scheduled entry instant, ISO-8601 local.
    pub scheduled_entry_time: String,
    /// Service classification, one of the four known types.
    #[serde(rename = "type")]
    pub train_type: String,
    /// Scheduled exit instant. Validated when present, otherwise unused.
    pub scheduled_exit_time: Option<String>,
    /// Externally-imposed delay components.
    pub delay_factors: Option<DelayInput>,
}

impl TrainInput {
    /// Decode one raw JSON record, attributing failures to its train.
    pub fn from_value(train: &str, value: &serde_json::Value) -> Result<Self, ScheduleError> {
        serde_json::from_value(value.clone()).map_err(|e| ScheduleError::malformed(train, e))
    }
}

/// Raw delay factor block as supplied by the caller.
///
/// Missing components default to zero minutes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DelayInput {
    #[serde(default)]
    pub chain_pull_delay: f64,
    #[serde(default)]
    pub loco_pilot_delay: f64,
    #[serde(default)]
    pub ml_weather_delay: f64,
    /// Accepted for wire compatibility; the planner does not read it.
    pub is_track_functional: Option<bool>,
}

/// A validated train with its resolved routing options.
///
/// The ideal route is the shortest route through the undisturbed
/// topology; the candidate routes are enumerated against the topology
/// minus the run's outages. A journey with no candidate routes can only
/// ever be held.
#[derive(Debug, Clone)]
pub struct TrainJourney {
    id: TrainId,
    train_type: TrainType,
    scheduled_entry: NaiveDateTime,
    delay: DelayFactors,
    actual_arrival: NaiveDateTime,
    ideal_route: Option<Vec<NodeId>>,
    routes: Vec<Vec<NodeId>>,
}

impl TrainJourney {
    /// Validate a raw record and resolve its routes.
    ///
    /// `ideal` is the routing view of the undisturbed topology and
    /// `current` the view minus the run's outages. Nodes that exist
    /// nowhere in the topology are not an error here; they simply
    /// produce no routes and force the train into hold.
    pub fn build(
        id: &str,
        input: &TrainInput,
        ideal: &RoutingGraph,
        current: &RoutingGraph,
        max_routes: usize,
    ) -> Result<Self, ScheduleError> {
        let train = TrainId::new(id.to_string()).map_err(|e| ScheduleError::malformed(id, e))?;
        let entry =
            NodeId::new(input.entry_node.clone()).map_err(|e| ScheduleError::malformed(id, e))?;
        let exit =
            NodeId::new(input.exit_node.clone()).map_err(|e| ScheduleError::malformed(id, e))?;
        let train_type: TrainType = input
            .train_type
            .parse()
            .map_err(|e| ScheduleError::malformed(id, e))?;
        let scheduled_entry = parse_timestamp(&input.scheduled_entry_time)
            .map_err(|e| ScheduleError::malformed(id, e))?;

        if let Some(exit_time) = input.scheduled_exit_time.as_deref() {
            // Validated for consistency; the planner does not use it.
            if !exit_time.is_empty() {
                parse_timestamp(exit_time).map_err(|e| ScheduleError::malformed(id, e))?;
            }
        }

        let delay = match &input.delay_factors {
            Some(raw) => {
                DelayFactors::new(raw.chain_pull_delay, raw.loco_pilot_delay, raw.ml_weather_delay)
                    .map_err(|e| ScheduleError::malformed(id, e))?
            }
            None => DelayFactors::default(),
        };
        let actual_arrival = add_minutes(scheduled_entry, delay.total());

        let ideal_route = enumerate_routes(ideal, &entry, &exit, 1).into_iter().next();
        let routes = enumerate_routes(current, &entry, &exit, max_routes);

        Ok(Self {
            id: train,
            train_type,
            scheduled_entry,
            delay,
            actual_arrival,
            ideal_route,
            routes,
        })
    }

    /// The train's identifier.
    pub fn id(&self) -> &TrainId {
        &self.id
    }

    /// The train's service classification.
    pub fn train_type(&self) -> TrainType {
        self.train_type
    }

    /// The scheduled entry instant.
    pub fn scheduled_entry(&self) -> NaiveDateTime {
        self.scheduled_entry
    }

    /// The externally-imposed delay components.
    pub fn delay(&self) -> DelayFactors {
        self.delay
    }

    /// Scheduled entry shifted by the imposed delays.
    pub fn actual_arrival(&self) -> NaiveDateTime {
        self.actual_arrival
    }

    /// Shortest route through the undisturbed topology, if any.
    pub fn ideal_route(&self) -> Option<&[NodeId]> {
        self.ideal_route.as_deref()
    }

    /// Candidate routes through the disturbed topology, shortest first.
    pub fn routes(&self) -> &[Vec<NodeId>] {
        &self.routes
    }

    /// First candidate route, used when a plan proceeds by default.
    pub fn default_route(&self) -> Option<&[NodeId]> {
        self.routes.first().map(Vec::as_slice)
    }

    /// Returns true if at least one candidate route exists.
    pub fn has_routes(&self) -> bool {
        !self.routes.is_empty()
    }
}
