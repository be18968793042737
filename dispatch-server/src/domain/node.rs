//! Station topology node and segment types.

use std::fmt;
use std::str::FromStr;

/// Error returned when parsing an invalid node identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid node id: {reason}")]
pub struct InvalidNode {
    reason: &'static str,
}

/// A validated identifier for a location in the station topology.
///
/// Node ids name entry boundaries (`Entry_1`), junctions (`A`), and
/// platform approach/release points (`P1_entry`, `P1_exit`). They are
/// restricted to ASCII alphanumerics and underscores so that the
/// `from->to` wire form of a segment is always unambiguous.
///
/// # Examples
///
/// ```
/// use dispatch_server::domain::NodeId;
///
/// let junction = NodeId::new("A".to_string()).unwrap();
/// assert_eq!(junction.as_str(), "A");
///
/// // Empty ids are rejected
/// assert!(NodeId::new("".to_string()).is_err());
///
/// // Separator characters are rejected
/// assert!(NodeId::new("A->B".to_string()).is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(String);

impl NodeId {
    /// Create a new node id from a string.
    ///
    /// The input must be non-empty and contain only ASCII alphanumerics
    /// and underscores.
    pub fn new(s: String) -> Result<Self, InvalidNode> {
        if s.is_empty() {
            return Err(InvalidNode {
                reason: "node id cannot be empty",
            });
        }
        if !s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(InvalidNode {
                reason: "node id must be ASCII alphanumerics or underscores",
            });
        }
        Ok(NodeId(s))
    }

    /// Returns the node id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the NodeId and returns the inner String.
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Returns true if this node is a platform approach point.
    ///
    /// Traversing a segment that starts at a platform approach point
    /// (`P1_entry`, `P2_entry`, ...) incurs the train type's dwell time
    /// on top of the segment's travel time.
    pub fn is_platform_entry(&self) -> bool {
        self.0.ends_with("_entry")
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Error returned when parsing an invalid segment key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid segment: {reason}")]
pub struct InvalidSegment {
    reason: &'static str,
}

/// A directed track segment between two topology nodes.
///
/// Segments are the unit of exclusive occupancy: at most one train may
/// hold a segment at any instant. On the wire a segment is written as
/// `from->to`, the same key format used in timeline output.
///
/// # Examples
///
/// ```
/// use dispatch_server::domain::Segment;
///
/// let seg: Segment = "A->P1_entry".parse().unwrap();
/// assert_eq!(seg.from.as_str(), "A");
/// assert_eq!(seg.to.as_str(), "P1_entry");
/// assert_eq!(seg.to_string(), "A->P1_entry");
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Segment {
    /// Node the segment leaves from.
    pub from: NodeId,
    /// Node the segment arrives at.
    pub to: NodeId,
}

impl Segment {
    /// Creates a new directed segment.
    pub fn new(from: NodeId, to: NodeId) -> Self {
        Self { from, to }
    }
}

impl fmt::Debug for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Segment({}->{})", self.from, self.to)
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.from, self.to)
    }
}

impl FromStr for Segment {
    type Err = InvalidSegment;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (from, to) = s.split_once("->").ok_or(InvalidSegment {
            reason: "expected `from->to`",
        })?;
        let from = NodeId::new(from.to_string()).map_err(|_| InvalidSegment {
            reason: "origin is not a valid node id",
        })?;
        let to = NodeId::new(to.to_string()).map_err(|_| InvalidSegment {
            reason: "destination is not a valid node id",
        })?;
        Ok(Segment { from, to })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(s: &str) -> NodeId {
        NodeId::new(s.to_string()).unwrap()
    }

    #[test]
    fn new_valid_node() {
        assert!(NodeId::new("A".to_string()).is_ok());
        assert!(NodeId::new("Entry_1".to_string()).is_ok());
        assert!(NodeId::new("P1_entry".to_string()).is_ok());
        assert!(NodeId::new("P3_exit".to_string()).is_ok());
        assert!(NodeId::new("lowercase_ok".to_string()).is_ok());
        assert!(NodeId::new("123".to_string()).is_ok());
    }

    #[test]
    fn reject_empty() {
        assert!(NodeId::new("".to_string()).is_err());
    }

    #[test]
    fn reject_separator_characters() {
        assert!(NodeId::new("A->B".to_string()).is_err());
        assert!(NodeId::new("A-B".to_string()).is_err());
        assert!(NodeId::new("A B".to_string()).is_err());
        assert!(NodeId::new("A>".to_string()).is_err());
        assert!(NodeId::new("Ä".to_string()).is_err());
    }

    #[test]
    fn platform_entry_detection() {
        assert!(node("P1_entry").is_platform_entry());
        assert!(node("P3_entry").is_platform_entry());
        assert!(!node("P1_exit").is_platform_entry());
        assert!(!node("Entry_1").is_platform_entry());
        assert!(!node("A").is_platform_entry());
    }

    #[test]
    fn node_display_and_debug() {
        let n = node("P2_entry");
        assert_eq!(format!("{}", n), "P2_entry");
        assert_eq!(format!("{:?}", n), "NodeId(P2_entry)");
    }

    #[test]
    fn node_ordering_is_lexicographic() {
        assert!(node("A") < node("B"));
        assert!(node("Entry_1") < node("Entry_2"));
    }

    #[test]
    fn segment_display() {
        let seg = Segment::new(node("A"), node("P1_entry"));
        assert_eq!(seg.to_string(), "A->P1_entry");
        assert_eq!(format!("{:?}", seg), "Segment(A->P1_entry)");
    }

    #[test]
    fn segment_parse_valid() {
        let seg: Segment = "Entry_1->A".parse().unwrap();
        assert_eq!(seg.from, node("Entry_1"));
        assert_eq!(seg.to, node("A"));
    }

    #[test]
    fn segment_parse_invalid() {
        assert!("".parse::<Segment>().is_err());
        assert!("A".parse::<Segment>().is_err());
        assert!("A-B".parse::<Segment>().is_err());
        assert!("->B".parse::<Segment>().is_err());
        assert!("A->".parse::<Segment>().is_err());
        assert!("A->B->C".parse::<Segment>().is_err());
    }

    #[test]
    fn segment_is_directed() {
        let ab = Segment::new(node("A"), node("B"));
        let ba = Segment::new(node("B"), node("A"));
        assert_ne!(ab, ba);
    }

    #[test]
    fn segment_equality_and_hash() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(Segment::new(node("A"), node("B")));
        assert!(set.contains(&Segment::new(node("A"), node("B"))));
        assert!(!set.contains(&Segment::new(node("B"), node("A"))));
    }
}
