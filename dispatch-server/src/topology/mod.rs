//! Station topology model.
//!
//! The topology is a fixed directed graph of track segments, each with a
//! traversal time in minutes, plus per-train-type platform dwell times.
//! A run never mutates the topology; outages are applied by building a
//! disposable [`RoutingGraph`] view that omits the excluded segments.

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::{NodeId, Segment, TrainType};

mod paths;

pub use paths::enumerate_routes;

/// Travel minutes assumed for a segment with no configured time.
const DEFAULT_SEGMENT_MINUTES: f64 = 2.0;

/// Dwell minutes assumed for a train type with no configured dwell.
const DEFAULT_DWELL_MINUTES: f64 = 3.0;

/// The station track layout and its timing data.
///
/// Both maps are ordered so that every iteration over the topology is
/// deterministic, which in turn makes route discovery order and
/// simulation results reproducible.
#[derive(Debug, Clone, Default)]
pub struct Topology {
    travel_minutes: BTreeMap<Segment, f64>,
    dwell_minutes: BTreeMap<TrainType, f64>,
}

impl Topology {
    /// Create an empty topology.
    pub fn new() -> Self {
        Self::default()
    }

    /// Travel time for a segment, in minutes.
    ///
    /// Falls back to a conservative default when the segment has no
    /// configured time.
    pub fn segment_minutes(&self, segment: &Segment) -> f64 {
        self.travel_minutes
            .get(segment)
            .copied()
            .unwrap_or(DEFAULT_SEGMENT_MINUTES)
    }

    /// Platform dwell time for a train type, in minutes.
    pub fn dwell_minutes(&self, train_type: TrainType) -> f64 {
        self.dwell_minutes
            .get(&train_type)
            .copied()
            .unwrap_or(DEFAULT_DWELL_MINUTES)
    }

    /// All configured segments with their travel minutes.
    pub fn segments(&self) -> impl Iterator<Item = (&Segment, f64)> {
        self.travel_minutes.iter().map(|(seg, mins)| (seg, *mins))
    }

    /// Returns the number of configured segments.
    pub fn len(&self) -> usize {
        self.travel_minutes.len()
    }

    /// Returns true if no segments are configured.
    pub fn is_empty(&self) -> bool {
        self.travel_minutes.is_empty()
    }

    /// Build a routing view of this topology minus the excluded segments.
    ///
    /// Neighbor lists come out in segment order, so path discovery over
    /// the view is deterministic.
    pub fn routing_graph(&self, excluded: &BTreeSet<Segment>) -> RoutingGraph {
        let mut adjacency: BTreeMap<NodeId, Vec<NodeId>> = BTreeMap::new();
        for (segment, _) in self.travel_minutes.iter() {
            if excluded.contains(segment) {
                continue;
            }
            adjacency
                .entry(segment.from.clone())
                .or_default()
                .push(segment.to.clone());
            // Terminal nodes still count as present in the graph.
            adjacency.entry(segment.to.clone()).or_default();
        }
        RoutingGraph { adjacency }
    }
}

/// A disposable adjacency view of a [`Topology`] for route discovery.
#[derive(Debug, Clone)]
pub struct RoutingGraph {
    adjacency: BTreeMap<NodeId, Vec<NodeId>>,
}

impl RoutingGraph {
    /// Nodes reachable in one segment from `node`, in deterministic order.
    pub fn neighbors(&self, node: &NodeId) -> &[NodeId] {
        self.adjacency.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns true if the node appears in the view at all.
    pub fn contains(&self, node: &NodeId) -> bool {
        self.adjacency.contains_key(node)
    }

    /// Returns the number of nodes in the view.
    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }
}

/// Builder for assembling a topology from string constants.
///
/// Entries with invalid node names are skipped rather than failing the
/// whole build.
#[derive(Debug, Default)]
pub struct TopologyBuilder {
    inner: Topology,
}

impl TopologyBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a directed segment with its travel time in minutes.
    pub fn segment(mut self, from: &str, to: &str, minutes: f64) -> Self {
        if let (Ok(from), Ok(to)) = (
            NodeId::new(from.to_string()),
            NodeId::new(to.to_string()),
        ) {
            self.inner
                .travel_minutes
                .insert(Segment::new(from, to), minutes);
        }
        self
    }

    /// Set the platform dwell time for a train type.
    pub fn dwell(mut self, train_type: TrainType, minutes: f64) -> Self {
        self.inner.dwell_minutes.insert(train_type, minutes);
        self
    }

    /// Build the topology.
    pub fn build(self) -> Topology {
        self.inner
    }
}

/// The production station layout.
///
/// Six approach boundaries feed three inbound junctions (A, B, C), each
/// junction commits to one platform, and three outbound junctions
/// (D, E, F) release to six exit boundaries. Crossovers join A with B
/// and E with F, giving the optimizer its rerouting headroom.
pub fn standard() -> Topology {
    TopologyBuilder::new()
        // Approach boundaries into the inbound junctions
        .segment("Entry_1", "A", 3.0)
        .segment("Entry_4", "A", 2.0)
        .segment("Entry_2", "B", 4.0)
        .segment("Entry_5", "B", 3.0)
        .segment("Entry_3", "C", 5.0)
        .segment("Entry_6", "C", 3.0)
        // Junctions commit to their platforms
        .segment("A", "P1_entry", 2.0)
        .segment("B", "P2_entry", 2.0)
        .segment("C", "P3_entry", 2.0)
        // Platform berths
        .segment("P1_entry", "P1_exit", 5.0)
        .segment("P2_entry", "P2_exit", 5.0)
        .segment("P3_entry", "P3_exit", 5.0)
        // Platforms release to the outbound junctions
        .segment("P1_exit", "F", 2.0)
        .segment("P2_exit", "E", 2.0)
        .segment("P3_exit", "D", 2.0)
        // Outbound junctions to exit boundaries
        .segment("F", "Entry_10", 3.0)
        .segment("F", "Entry_12", 3.0)
        .segment("E", "Entry_9", 4.0)
        .segment("E", "Entry_11", 2.0)
        .segment("D", "Entry_7", 2.0)
        .segment("D", "Entry_8", 4.0)
        // Crossovers
        .segment("A", "B", 1.5)
        .segment("B", "A", 1.5)
        .segment("E", "F", 1.5)
        .segment("F", "E", 1.5)
        .dwell(TrainType::Special, 2.0)
        .dwell(TrainType::Passenger, 3.0)
        .dwell(TrainType::Local, 5.0)
        .dwell(TrainType::Freight, 8.0)
        .build()
}
