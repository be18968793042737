//! Run orchestration.
//!
//! The [`Dispatcher`] ties the engine together: it validates the raw
//! train records into journeys, runs the annealer, re-evaluates the
//! winning plan once for reporting, and emits an
//! [`OptimizationReport`] in the external wire shape. Callers and the
//! dashboard projection see only the report, never plan or journey
//! internals.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::anneal;
use super::config::SolverConfig;
use super::error::ScheduleError;
use super::journey::{TrainInput, TrainJourney};
use super::plan::Decision;
use super::simulate::{self, Conflict, TimelineSpan};
use crate::domain::{NodeId, Segment, TrainId, format_hhmm};
use crate::topology::Topology;

/// The dispatcher's final classification of a train.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Run along the train's ideal route.
    #[serde(rename = "PROCEED")]
    Proceed,
    /// Keep the train outside the station.
    #[serde(rename = "HOLD")]
    Hold,
    /// Run, but along a route other than the ideal one.
    #[serde(rename = "REROUTED")]
    Rerouted,
}

impl Action {
    /// Wire name of the action.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Proceed => "PROCEED",
            Action::Hold => "HOLD",
            Action::Rerouted => "REROUTED",
        }
    }
}

/// Per-train outcome in the wire shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// The train this recommendation is for.
    pub train_id: String,
    /// What the dispatcher should do with it.
    pub action: Action,
    /// Node sequence to run, empty when held.
    pub route: Vec<String>,
    /// Final realized delay, minutes, rounded to two decimals.
    pub total_delay_minutes: f64,
}

/// A conflict record in the wire shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictReport {
    /// Detection instant as "HH:MM".
    pub time: String,
    /// The waiting train followed by the holding train.
    pub trains: [String; 2],
    /// Human-readable contested location.
    pub location: String,
    /// Severity tag, currently always "medium".
    pub severity: String,
    /// Suggested resolution naming the wait duration.
    pub resolution: String,
}

impl ConflictReport {
    fn from_conflict(conflict: &Conflict) -> Self {
        Self {
            time: format_hhmm(conflict.time),
            trains: [
                conflict.waiting.as_str().to_string(),
                conflict.holder.as_str().to_string(),
            ],
            location: format!("Junction {}", conflict.location),
            severity: "medium".to_string(),
            resolution: format!(
                "HOLD {} for {:.2} min",
                conflict.waiting, conflict.wait_minutes
            ),
        }
    }
}

/// The complete result of one optimization run.
///
/// Timeline keys are train ids and `"from->to"` segment strings, so the
/// report serializes directly to the external JSON contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationReport {
    /// Sum of final per-train delays, minutes, two decimals.
    pub score: f64,
    /// Per-train outcomes in train-id order.
    pub recommendations: Vec<Recommendation>,
    /// Detected conflicts in detection order.
    pub conflicts: Vec<ConflictReport>,
    /// Realized segment occupations per train.
    pub timelines: BTreeMap<String, BTreeMap<String, TimelineSpan>>,
}

/// Builds journeys, runs the search, and reports the outcome.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    topology: Topology,
    config: SolverConfig,
}

impl Dispatcher {
    /// Create a dispatcher for one topology and solver configuration.
    pub fn new(topology: Topology, config: SolverConfig) -> Self {
        Self { topology, config }
    }

    /// Run one full optimization over the given train records.
    ///
    /// Fails fast on the first malformed record; no partial results.
    pub fn run(
        &self,
        trains: &BTreeMap<String, TrainInput>,
        outages: &BTreeSet<Segment>,
    ) -> Result<OptimizationReport, ScheduleError> {
        if trains.is_empty() {
            return Err(ScheduleError::NoTrains);
        }

        let ideal = self.topology.routing_graph(&BTreeSet::new());
        let current = self.topology.routing_graph(outages);

        let mut journeys: BTreeMap<TrainId, TrainJourney> = BTreeMap::new();
        for (id, input) in trains {
            let journey =
                TrainJourney::build(id, input, &ideal, &current, self.config.max_routes)?;
            journeys.insert(journey.id().clone(), journey);
        }

        let best = anneal::optimize(&journeys, &self.topology, &self.config);
        let outcome = simulate::evaluate(&best, &journeys, &self.topology);

        let mut recommendations = Vec::with_capacity(journeys.len());
        for (id, decision) in best.decisions() {
            let Some(journey) = journeys.get(id) else {
                continue;
            };
            let (action, route) = match decision {
                Decision::Hold => (Action::Hold, Vec::new()),
                Decision::Proceed { route } => {
                    let rerouted = journey
                        .ideal_route()
                        .is_some_and(|ideal| ideal != route.as_slice());
                    let action = if rerouted {
                        Action::Rerouted
                    } else {
                        Action::Proceed
                    };
                    (action, route.iter().map(NodeId::to_string).collect())
                }
            };
            recommendations.push(Recommendation {
                train_id: id.as_str().to_string(),
                action,
                route,
                total_delay_minutes: round2(outcome.delays.get(id).copied().unwrap_or(0.0)),
            });
        }

        let score = round2(outcome.delays.values().sum());
        let conflicts: Vec<ConflictReport> = outcome
            .conflicts
            .iter()
            .map(ConflictReport::from_conflict)
            .collect();
        let timelines = outcome
            .timelines
            .iter()
            .map(|(id, timeline)| {
                let spans = timeline
                    .iter()
                    .map(|(segment, span)| (segment.to_string(), *span))
                    .collect();
                (id.as_str().to_string(), spans)
            })
            .collect();

        info!(
            trains = journeys.len(),
            score,
            conflicts = conflicts.len(),
            "optimization run complete"
        );

        Ok(OptimizationReport {
            score,
            recommendations,
            conflicts,
            timelines,
        })
    }
}

/// Parse wire outage pairs into a segment set.
///
/// Pairs naming invalid nodes cannot match any real segment and are
/// skipped.
pub fn parse_outages(pairs: &[[String; 2]]) -> BTreeSet<Segment> {
    let mut outages = BTreeSet::new();
    for [from, to] in pairs {
        match (NodeId::new(from.clone()), NodeId::new(to.clone())) {
            (Ok(from), Ok(to)) => {
                outages.insert(Segment::new(from, to));
            }
            _ => debug!(from, to, "skipping malformed outage pair"),
        }
    }
    outages
}

/// Round to two decimal places, the wire precision for minutes.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(entry: &str, exit: &str, time: &str, ty: &str) -> TrainInput {
        TrainInput {
            entry_node: entry.to_string(),
            exit_node: exit.to_string(),
            scheduled_entry_time: time.to_string(),
            train_type: ty.to_string(),
            scheduled_exit_time: None,
            delay_factors: None,
        }
    }

    fn dispatcher(seed: u64) -> Dispatcher {
        Dispatcher::new(
            crate::topology::standard(),
            SolverConfig::default().with_seed(seed),
        )
    }

    #[test]
    fn reports_single_train_run() {
        let trains = BTreeMap::from([(
            "T1".to_string(),
            input("Entry_1", "Entry_9", "2026-08-21T10:00:00", "Passenger"),
        )]);
        let report = dispatcher(5).run(&trains, &BTreeSet::new()).unwrap();

        assert_eq!(report.recommendations.len(), 1);
        let rec = &report.recommendations[0];
        assert_eq!(rec.train_id, "T1");
        assert_eq!(rec.action, Action::Proceed);
        assert_eq!(rec.route.first().map(String::as_str), Some("Entry_1"));
        assert_eq!(rec.route.last().map(String::as_str), Some("Entry_9"));
        assert_eq!(rec.total_delay_minutes, 0.0);
        assert_eq!(report.score, 0.0);
        assert!(report.conflicts.is_empty());
        assert!(report.timelines.contains_key("T1"));
    }

    #[test]
    fn recommendations_come_in_train_id_order() {
        let trains = BTreeMap::from([
            (
                "T3".to_string(),
                input("Entry_3", "Entry_7", "2026-08-21T10:00:00", "Freight"),
            ),
            (
                "T1".to_string(),
                input("Entry_1", "Entry_9", "2026-08-21T10:00:00", "Passenger"),
            ),
            (
                "T2".to_string(),
                input("Entry_2", "Entry_11", "2026-08-21T10:02:00", "Local"),
            ),
        ]);
        let report = dispatcher(9).run(&trains, &BTreeSet::new()).unwrap();

        let order: Vec<&str> = report
            .recommendations
            .iter()
            .map(|r| r.train_id.as_str())
            .collect();
        assert_eq!(order, vec!["T1", "T2", "T3"]);
    }

    #[test]
    fn score_is_the_sum_of_final_delays() {
        let trains = BTreeMap::from([
            (
                "T1".to_string(),
                input("Entry_2", "Entry_9", "2026-08-21T10:00:00", "Passenger"),
            ),
            (
                "T2".to_string(),
                input("Entry_5", "Entry_11", "2026-08-21T10:00:00", "Local"),
            ),
        ]);
        let report = dispatcher(13).run(&trains, &BTreeSet::new()).unwrap();

        let summed: f64 = report
            .recommendations
            .iter()
            .map(|r| r.total_delay_minutes)
            .sum();
        assert!((report.score - summed).abs() < 0.02);
        assert!(report.score >= 0.0);
    }

    #[test]
    fn outage_forces_reroute_classification() {
        let trains = BTreeMap::from([(
            "T1".to_string(),
            input("Entry_1", "Entry_9", "2026-08-21T10:00:00", "Passenger"),
        )]);
        // Entry_1's ideal route to Entry_9 crosses A->B; kill it.
        let outages = parse_outages(&[["A".to_string(), "B".to_string()]]);
        let report = dispatcher(17).run(&trains, &outages).unwrap();

        let rec = &report.recommendations[0];
        assert_eq!(rec.action, Action::Rerouted);
        assert!(!rec.route.is_empty());
        for pair in rec.route.windows(2) {
            assert!(!(pair[0] == "A" && pair[1] == "B"));
        }
    }

    #[test]
    fn disconnected_train_is_held_with_empty_route() {
        let trains = BTreeMap::from([(
            "T1".to_string(),
            input("Entry_1", "Entry_9", "2026-08-21T10:00:00", "Passenger"),
        )]);
        // Severing both inbound junctions from Entry_1 strands the train.
        let outages = parse_outages(&[
            ["Entry_1".to_string(), "A".to_string()],
        ]);
        let report = dispatcher(21).run(&trains, &outages).unwrap();

        let rec = &report.recommendations[0];
        assert_eq!(rec.action, Action::Hold);
        assert!(rec.route.is_empty());
        assert!(report.timelines["T1"].is_empty());
    }

    #[test]
    fn malformed_train_aborts_the_run() {
        let trains = BTreeMap::from([
            (
                "OK".to_string(),
                input("Entry_1", "Entry_9", "2026-08-21T10:00:00", "Passenger"),
            ),
            (
                "BAD".to_string(),
                input("Entry_2", "Entry_11", "sometime", "Local"),
            ),
        ]);
        let err = dispatcher(1).run(&trains, &BTreeSet::new()).unwrap_err();

        assert!(matches!(
            err,
            ScheduleError::MalformedTrain { ref train, .. } if train == "BAD"
        ));
    }

    #[test]
    fn empty_request_is_rejected() {
        let err = dispatcher(1).run(&BTreeMap::new(), &BTreeSet::new()).unwrap_err();
        assert_eq!(err, ScheduleError::NoTrains);
    }

    #[test]
    fn seeded_runs_produce_identical_reports() {
        let trains = BTreeMap::from([
            (
                "T1".to_string(),
                input("Entry_2", "Entry_9", "2026-08-21T10:00:00", "Passenger"),
            ),
            (
                "T2".to_string(),
                input("Entry_5", "Entry_11", "2026-08-21T10:00:00", "Freight"),
            ),
        ]);
        let first = dispatcher(99).run(&trains, &BTreeSet::new()).unwrap();
        let second = dispatcher(99).run(&trains, &BTreeSet::new()).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn report_round_trips_through_json() {
        let trains = BTreeMap::from([
            (
                "T1".to_string(),
                input("Entry_2", "Entry_9", "2026-08-21T10:00:00", "Passenger"),
            ),
            (
                "T2".to_string(),
                input("Entry_2", "Entry_11", "2026-08-21T10:00:00", "Local"),
            ),
        ]);
        let report = dispatcher(31).run(&trains, &BTreeSet::new()).unwrap();

        let wire = serde_json::to_string(&report).unwrap();
        let back: OptimizationReport = serde_json::from_str(&wire).unwrap();
        assert_eq!(back, report);

        // Timeline keys stay parseable segment strings.
        for timeline in back.timelines.values() {
            for key in timeline.keys() {
                assert!(key.parse::<Segment>().is_ok(), "bad segment key {key}");
            }
        }
    }

    #[test]
    fn conflict_reports_use_the_wire_shape() {
        let trains = BTreeMap::from([
            (
                "T1".to_string(),
                input("Entry_2", "Entry_9", "2026-08-21T10:00:00", "Passenger"),
            ),
            (
                "T2".to_string(),
                input("Entry_2", "Entry_11", "2026-08-21T10:00:00", "Passenger"),
            ),
        ]);
        let mut config = SolverConfig::default().with_seed(3);
        config.iterations = 0;
        let dispatcher = Dispatcher::new(crate::topology::standard(), config);
        let report = dispatcher.run(&trains, &BTreeSet::new()).unwrap();

        // Both trains enter at Entry_2, so the initial plan collides.
        assert!(!report.conflicts.is_empty());
        let conflict = &report.conflicts[0];
        assert_eq!(conflict.severity, "medium");
        assert!(conflict.location.starts_with("Junction "));
        assert!(conflict.resolution.starts_with("HOLD "));
        assert!(conflict.resolution.ends_with(" min"));
        assert_eq!(conflict.time.len(), 5);
    }

    #[test]
    fn action_wire_names() {
        assert_eq!(
            serde_json::to_string(&Action::Proceed).unwrap(),
            "\"PROCEED\""
        );
        assert_eq!(serde_json::to_string(&Action::Hold).unwrap(), "\"HOLD\"");
        assert_eq!(
            serde_json::to_string(&Action::Rerouted).unwrap(),
            "\"REROUTED\""
        );
        assert_eq!(Action::Rerouted.as_str(), "REROUTED");
    }

    #[test]
    fn parse_outages_skips_bad_pairs() {
        let outages = parse_outages(&[
            ["A".to_string(), "B".to_string()],
            ["".to_string(), "B".to_string()],
            ["A".to_string(), "bad->node".to_string()],
        ]);
        assert_eq!(outages.len(), 1);
        assert!(outages.contains(&"A->B".parse().unwrap()));
    }
}
