//! Candidate route discovery.
//!
//! Routes are simple directed paths found by a breadth-first walk over a
//! [`RoutingGraph`]. The frontier is processed in FIFO order and neighbor
//! lists are already sorted, so results come out shortest-first with a
//! stable tie-break and the whole enumeration is deterministic.

use std::collections::VecDeque;

use tracing::debug;

use super::RoutingGraph;
use crate::domain::NodeId;

/// Enumerate up to `limit` simple routes from `start` to `end`.
///
/// Routes are returned in non-decreasing edge count. A missing endpoint
/// or an unreachable destination yields an empty list rather than an
/// error; the caller treats a route-less train as hold-only. When start
/// and end coincide the single-node route is returned.
pub fn enumerate_routes(
    graph: &RoutingGraph,
    start: &NodeId,
    end: &NodeId,
    limit: usize,
) -> Vec<Vec<NodeId>> {
    if limit == 0 {
        return Vec::new();
    }
    if !graph.contains(start) || !graph.contains(end) {
        debug!(
            start = %start.as_str(),
            end = %end.as_str(),
            "route endpoint absent from topology"
        );
        return Vec::new();
    }
    if start == end {
        return vec![vec![start.clone()]];
    }

    let mut found: Vec<Vec<NodeId>> = Vec::new();
    let mut frontier: VecDeque<Vec<NodeId>> = VecDeque::new();
    frontier.push_back(vec![start.clone()]);

    'search: while let Some(path) = frontier.pop_front() {
        let last = match path.last() {
            Some(node) => node.clone(),
            None => continue,
        };
        for neighbor in graph.neighbors(&last) {
            // Simple paths only: never revisit a node.
            if path.contains(neighbor) {
                continue;
            }
            let mut extended = path.clone();
            extended.push(neighbor.clone());
            if neighbor == end {
                found.push(extended);
                if found.len() == limit {
                    break 'search;
                }
            } else {
                frontier.push_back(extended);
            }
        }
    }

    debug!(
        start = %start.as_str(),
        end = %end.as_str(),
        routes = found.len(),
        "route enumeration complete"
    );

    found
}
