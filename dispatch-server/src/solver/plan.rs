//! Dispatch plans.
//!
//! A [`Plan`] holds one [`Decision`] per train and is the value the
//! annealer perturbs. Plans are independent values: cloning one shares
//! no mutable state with the original, so the optimizer's "current" and
//! "best" plans can never alias each other.

use std::collections::BTreeMap;

use super::journey::TrainJourney;
use crate::domain::{NodeId, TrainId};

/// The dispatcher's decision for one train.
///
/// A proceeding train always carries its route; "proceed without a
/// route" is unrepresentable. The held set is exactly the `Hold`
/// decisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Run the train through the station along the given route.
    Proceed {
        /// The node sequence the train will traverse.
        route: Vec<NodeId>,
    },
    /// Keep the train outside the station until released.
    Hold,
}

impl Decision {
    /// Returns true for a proceed decision.
    pub fn is_proceed(&self) -> bool {
        matches!(self, Decision::Proceed { .. })
    }

    /// The decided route, if the train proceeds.
    pub fn route(&self) -> Option<&[NodeId]> {
        match self {
            Decision::Proceed { route } => Some(route),
            Decision::Hold => None,
        }
    }
}

/// One decision per train, keyed by train id.
///
/// The map is ordered so that iteration over a plan is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Plan {
    decisions: BTreeMap<TrainId, Decision>,
}

impl Plan {
    /// The natural starting plan: proceed on the default route wherever
    /// one exists, otherwise hold.
    pub fn initial(journeys: &BTreeMap<TrainId, TrainJourney>) -> Self {
        let decisions = journeys
            .iter()
            .map(|(id, journey)| {
                let decision = match journey.default_route() {
                    Some(route) => Decision::Proceed {
                        route: route.to_vec(),
                    },
                    None => Decision::Hold,
                };
                (id.clone(), decision)
            })
            .collect();
        Self { decisions }
    }

    /// The decision for one train.
    pub fn decision(&self, id: &TrainId) -> Option<&Decision> {
        self.decisions.get(id)
    }

    /// Replace the decision for one train.
    pub fn set(&mut self, id: TrainId, decision: Decision) {
        self.decisions.insert(id, decision);
    }

    /// All decisions in train-id order.
    pub fn decisions(&self) -> impl Iterator<Item = (&TrainId, &Decision)> {
        self.decisions.iter()
    }

    /// All train ids in the plan, in order.
    pub fn train_ids(&self) -> impl Iterator<Item = &TrainId> {
        self.decisions.keys()
    }

    /// Number of trains currently proceeding.
    pub fn proceeding(&self) -> usize {
        self.decisions.values().filter(|d| d.is_proceed()).count()
    }

    /// Number of trains in the plan.
    pub fn len(&self) -> usize {
        self.decisions.len()
    }

    /// Returns true if the plan covers no trains.
    pub fn is_empty(&self) -> bool {
        self.decisions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::solver::journey::{TrainInput, TrainJourney};
    use crate::topology::standard;

    fn journeys(specs: &[(&str, &str, &str)]) -> BTreeMap<TrainId, TrainJourney> {
        let topo = standard();
        let graph = topo.routing_graph(&BTreeSet::new());
        specs
            .iter()
            .map(|(id, entry, exit)| {
                let input = TrainInput {
                    entry_node: entry.to_string(),
                    exit_node: exit.to_string(),
                    scheduled_entry_time: "2026-08-21T10:00:00".to_string(),
                    train_type: "Passenger".to_string(),
                    scheduled_exit_time: None,
                    delay_factors: None,
                };
                let journey = TrainJourney::build(id, &input, &graph, &graph, 5).unwrap();
                (journey.id().clone(), journey)
            })
            .collect()
    }

    fn train(id: &str) -> TrainId {
        TrainId::new(id.to_string()).unwrap()
    }

    #[test]
    fn initial_proceeds_on_default_routes() {
        let journeys = journeys(&[("T1", "Entry_1", "Entry_9"), ("T2", "Entry_2", "Entry_11")]);
        let plan = Plan::initial(&journeys);

        assert_eq!(plan.len(), 2);
        assert_eq!(plan.proceeding(), 2);
        for (id, journey) in &journeys {
            assert_eq!(plan.decision(id).unwrap().route(), journey.default_route());
        }
    }

    #[test]
    fn initial_holds_routeless_trains() {
        let journeys = journeys(&[("T1", "Entry_1", "Entry_9"), ("T2", "Nowhere", "Entry_9")]);
        let plan = Plan::initial(&journeys);

        assert_eq!(plan.decision(&train("T2")), Some(&Decision::Hold));
        assert_eq!(plan.proceeding(), 1);
    }

    #[test]
    fn clones_are_independent() {
        let journeys = journeys(&[("T1", "Entry_1", "Entry_9")]);
        let original = Plan::initial(&journeys);
        let mut copy = original.clone();

        copy.set(train("T1"), Decision::Hold);

        assert_eq!(copy.decision(&train("T1")), Some(&Decision::Hold));
        assert!(original.decision(&train("T1")).unwrap().is_proceed());
    }

    #[test]
    fn decisions_iterate_in_train_id_order() {
        let journeys = journeys(&[
            ("T3", "Entry_1", "Entry_9"),
            ("T1", "Entry_2", "Entry_11"),
            ("T2", "Entry_3", "Entry_7"),
        ]);
        let plan = Plan::initial(&journeys);

        let order: Vec<&str> = plan.train_ids().map(|id| id.as_str()).collect();
        assert_eq!(order, vec!["T1", "T2", "T3"]);
    }

    #[test]
    fn empty_plan() {
        let plan = Plan::default();
        assert!(plan.is_empty());
        assert_eq!(plan.proceeding(), 0);
        assert!(plan.decision(&train("T1")).is_none());
    }
}
