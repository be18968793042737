//! Train identity and classification types.

use std::fmt;
use std::str::FromStr;

/// Error returned when parsing an invalid train id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid train id: {reason}")]
pub struct InvalidTrainId {
    reason: &'static str,
}

/// A unique identifier for a train in an optimization run.
///
/// Train ids are opaque identifiers supplied by the caller. The only
/// validation is that they must be non-empty.
///
/// # Examples
///
/// ```
/// use dispatch_server::domain::TrainId;
///
/// let id = TrainId::new("T1".to_string()).unwrap();
/// assert_eq!(id.as_str(), "T1");
///
/// // Empty ids are rejected
/// assert!(TrainId::new("".to_string()).is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrainId(String);

impl TrainId {
    /// Create a new train id from a string.
    ///
    /// Returns an error if the string is empty.
    pub fn new(s: String) -> Result<Self, InvalidTrainId> {
        if s.is_empty() {
            return Err(InvalidTrainId {
                reason: "train id cannot be empty",
            });
        }
        Ok(TrainId(s))
    }

    /// Returns the train id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the TrainId and returns the inner String.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for TrainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TrainId({})", self.0)
    }
}

impl fmt::Display for TrainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Error returned when parsing an unknown train type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown train type: {value}")]
pub struct UnknownTrainType {
    value: String,
}

/// The service classification of a train.
///
/// The classification drives two things: precedence when trains compete
/// for the same infrastructure, and dwell time at a platform. Variants
/// are declared in ascending precedence order, so the derived `Ord`
/// agrees with [`TrainType::precedence`].
///
/// # Examples
///
/// ```
/// use dispatch_server::domain::TrainType;
///
/// let express: TrainType = "Passenger".parse().unwrap();
/// assert_eq!(express.precedence(), 3);
/// assert!(TrainType::Freight < TrainType::Special);
///
/// // Unknown classifications are rejected
/// assert!("Steam".parse::<TrainType>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TrainType {
    /// Goods services, lowest precedence.
    Freight,
    /// Stopping services.
    Local,
    /// Express passenger services.
    Passenger,
    /// VIP or inspection specials, highest precedence.
    Special,
}

impl TrainType {
    /// Returns the precedence rank of this type.
    ///
    /// Higher ranks win access to contested infrastructure.
    pub fn precedence(&self) -> u8 {
        match self {
            TrainType::Freight => 1,
            TrainType::Local => 2,
            TrainType::Passenger => 3,
            TrainType::Special => 4,
        }
    }

    /// Returns the wire name of this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            TrainType::Freight => "Freight",
            TrainType::Local => "Local",
            TrainType::Passenger => "Passenger",
            TrainType::Special => "Special",
        }
    }
}

impl fmt::Display for TrainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrainType {
    type Err = UnknownTrainType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Freight" => Ok(TrainType::Freight),
            "Local" => Ok(TrainType::Local),
            "Passenger" => Ok(TrainType::Passenger),
            "Special" => Ok(TrainType::Special),
            other => Err(UnknownTrainType {
                value: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_valid_train_id() {
        assert!(TrainId::new("T1".to_string()).is_ok());
        assert!(TrainId::new("12951".to_string()).is_ok());
        assert!(TrainId::new("EXP-04".to_string()).is_ok());
    }

    #[test]
    fn reject_empty_train_id() {
        assert!(TrainId::new("".to_string()).is_err());
    }

    #[test]
    fn train_id_roundtrip() {
        let id = TrainId::new("T7".to_string()).unwrap();
        assert_eq!(id.as_str(), "T7");
        assert_eq!(id.clone().into_inner(), "T7".to_string());
        assert_eq!(format!("{}", id), "T7");
        assert_eq!(format!("{:?}", id), "TrainId(T7)");
    }

    #[test]
    fn train_id_ordering() {
        let a = TrainId::new("T1".to_string()).unwrap();
        let b = TrainId::new("T2".to_string()).unwrap();
        assert!(a < b);
    }

    #[test]
    fn parse_known_types() {
        assert_eq!("Freight".parse::<TrainType>().unwrap(), TrainType::Freight);
        assert_eq!("Local".parse::<TrainType>().unwrap(), TrainType::Local);
        assert_eq!(
            "Passenger".parse::<TrainType>().unwrap(),
            TrainType::Passenger
        );
        assert_eq!("Special".parse::<TrainType>().unwrap(), TrainType::Special);
    }

    #[test]
    fn reject_unknown_types() {
        assert!("".parse::<TrainType>().is_err());
        assert!("passenger".parse::<TrainType>().is_err());
        assert!("FREIGHT".parse::<TrainType>().is_err());
        assert!("Steam".parse::<TrainType>().is_err());
    }

    #[test]
    fn precedence_ranks() {
        assert_eq!(TrainType::Freight.precedence(), 1);
        assert_eq!(TrainType::Local.precedence(), 2);
        assert_eq!(TrainType::Passenger.precedence(), 3);
        assert_eq!(TrainType::Special.precedence(), 4);
    }

    #[test]
    fn ord_agrees_with_precedence() {
        let types = [
            TrainType::Freight,
            TrainType::Local,
            TrainType::Passenger,
            TrainType::Special,
        ];
        for pair in types.windows(2) {
            assert!(pair[0] < pair[1]);
            assert!(pair[0].precedence() < pair[1].precedence());
        }
    }

    #[test]
    fn display_matches_wire_name() {
        assert_eq!(TrainType::Passenger.to_string(), "Passenger");
        assert_eq!(TrainType::Freight.to_string(), "Freight");
    }

    #[test]
    fn parse_display_roundtrip() {
        for ty in [
            TrainType::Freight,
            TrainType::Local,
            TrainType::Passenger,
            TrainType::Special,
        ] {
            assert_eq!(ty.as_str().parse::<TrainType>().unwrap(), ty);
        }
    }
}
