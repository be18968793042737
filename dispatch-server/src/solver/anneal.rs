//! Simulated annealing over the plan space.
//!
//! Randomized local search: each iteration clones the current plan,
//! applies exactly one move, and accepts or rejects the neighbor by the
//! Metropolis criterion under a geometrically cooling temperature. Not
//! guaranteed optimal; the goal is a good plan quickly for a handful of
//! trains and a few contested platforms.

use std::collections::BTreeMap;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use super::config::SolverConfig;
use super::journey::TrainJourney;
use super::plan::{Decision, Plan};
use super::simulate::evaluate;
use crate::domain::TrainId;
use crate::topology::Topology;

/// Search the plan space and return the best plan found.
///
/// The result never scores worse than the initial plan. With a fixed
/// seed in the config the whole search is reproducible.
pub fn optimize(
    journeys: &BTreeMap<TrainId, TrainJourney>,
    topology: &Topology,
    config: &SolverConfig,
) -> Plan {
    let mut rng = match config.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::seed_from_u64(rand::random()),
    };

    let mut current = Plan::initial(journeys);
    let mut current_cost = evaluate(&current, journeys, topology).cost;
    let mut best = current.clone();
    let mut best_cost = current_cost;
    let mut temperature = config.initial_temperature;
    let mut completed = 0usize;

    for _ in 0..config.iterations {
        if temperature <= config.min_temperature {
            break;
        }

        let candidate = neighbor(&current, journeys, &mut rng);
        let candidate_cost = evaluate(&candidate, journeys, topology).cost;
        let delta = candidate_cost - current_cost;

        if delta < 0.0 || rng.gen_range(0.0..1.0) < (-delta / temperature).exp() {
            current = candidate;
            current_cost = candidate_cost;
            if current_cost < best_cost {
                best = current.clone();
                best_cost = current_cost;
            }
        }

        temperature *= config.cooling_rate;
        completed += 1;
    }

    debug!(
        iterations = completed,
        best_cost,
        final_temperature = temperature,
        "annealing complete"
    );

    best
}

/// Clone the plan and apply exactly one randomized move.
///
/// A move that finds no eligible train leaves the clone unchanged.
fn neighbor(
    plan: &Plan,
    journeys: &BTreeMap<TrainId, TrainJourney>,
    rng: &mut ChaCha8Rng,
) -> Plan {
    let mut next = plan.clone();
    if rng.gen_bool(0.5) {
        reroute_move(&mut next, journeys, rng);
    } else {
        toggle_move(&mut next, journeys, rng);
    }
    next
}

/// Reassign one proceeding train to a different candidate route.
fn reroute_move(
    plan: &mut Plan,
    journeys: &BTreeMap<TrainId, TrainJourney>,
    rng: &mut ChaCha8Rng,
) {
    let reroutable: Vec<TrainId> = plan
        .decisions()
        .filter(|&(id, decision)| {
            decision.is_proceed()
                && journeys.get(id).is_some_and(|j| j.routes().len() > 1)
        })
        .map(|(id, _)| id.clone())
        .collect();
    let Some(id) = pick(&reroutable, rng) else {
        return;
    };
    let Some(current_route) = plan.decision(id).and_then(Decision::route).map(<[_]>::to_vec)
    else {
        return;
    };
    let Some(journey) = journeys.get(id) else {
        return;
    };

    let alternatives: Vec<&Vec<crate::domain::NodeId>> = journey
        .routes()
        .iter()
        .filter(|route| **route != current_route)
        .collect();
    if let Some(route) = pick(&alternatives, rng) {
        plan.set(
            id.clone(),
            Decision::Proceed {
                route: route.to_vec(),
            },
        );
    }
}

/// Flip one train between proceeding and holding.
///
/// Toggling a route-less train towards proceed is a silent no-op.
fn toggle_move(
    plan: &mut Plan,
    journeys: &BTreeMap<TrainId, TrainJourney>,
    rng: &mut ChaCha8Rng,
) {
    let ids: Vec<TrainId> = plan.train_ids().cloned().collect();
    let Some(id) = pick(&ids, rng) else {
        return;
    };
    let proceeding = plan.decision(id).map(Decision::is_proceed);
    match proceeding {
        Some(true) => plan.set(id.clone(), Decision::Hold),
        Some(false) => {
            if let Some(route) = journeys.get(id).and_then(TrainJourney::default_route) {
                plan.set(
                    id.clone(),
                    Decision::Proceed {
                        route: route.to_vec(),
                    },
                );
            }
        }
        None => {}
    }
}

/// Uniformly pick one element, or nothing from an empty slice.
fn pick<'a, T>(items: &'a [T], rng: &mut ChaCha8Rng) -> Option<&'a T> {
    if items.is_empty() {
        None
    } else {
        items.get(rng.gen_range(0..items.len()))
    }
}
