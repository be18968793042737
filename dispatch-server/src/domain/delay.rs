//! Externally-imposed delay components.

/// Error returned when constructing invalid delay factors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid delay factors: {reason}")]
pub struct InvalidDelay {
    reason: &'static str,
}

/// Delay minutes imposed on a train before it reaches the station.
///
/// Each component is a non-negative, finite number of minutes. Components
/// a caller does not supply default to zero. The sum shifts the train's
/// actual arrival past its scheduled entry time.
///
/// # Examples
///
/// ```
/// use dispatch_server::domain::DelayFactors;
///
/// let delays = DelayFactors::new(2.0, 0.0, 3.5).unwrap();
/// assert_eq!(delays.total(), 5.5);
///
/// // Negative components are rejected
/// assert!(DelayFactors::new(-1.0, 0.0, 0.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DelayFactors {
    chain_pull: f64,
    loco_pilot: f64,
    weather: f64,
}

impl DelayFactors {
    /// Create delay factors from component minutes.
    ///
    /// Each component must be finite and non-negative.
    pub fn new(chain_pull: f64, loco_pilot: f64, weather: f64) -> Result<Self, InvalidDelay> {
        if !chain_pull.is_finite() || chain_pull < 0.0 {
            return Err(InvalidDelay {
                reason: "chain pull delay must be a finite non-negative number",
            });
        }
        if !loco_pilot.is_finite() || loco_pilot < 0.0 {
            return Err(InvalidDelay {
                reason: "loco pilot delay must be a finite non-negative number",
            });
        }
        if !weather.is_finite() || weather < 0.0 {
            return Err(InvalidDelay {
                reason: "weather delay must be a finite non-negative number",
            });
        }
        Ok(Self {
            chain_pull,
            loco_pilot,
            weather,
        })
    }

    /// Minutes lost to a chain pull event.
    pub fn chain_pull(&self) -> f64 {
        self.chain_pull
    }

    /// Minutes lost waiting for a relief loco pilot.
    pub fn loco_pilot(&self) -> f64 {
        self.loco_pilot
    }

    /// Minutes of predicted weather delay.
    pub fn weather(&self) -> f64 {
        self.weather
    }

    /// Total delay in minutes.
    pub fn total(&self) -> f64 {
        self.chain_pull + self.loco_pilot + self.weather
    }
}
