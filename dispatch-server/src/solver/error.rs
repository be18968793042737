//! Solver error types.

/// Errors raised while validating an optimization request.
///
/// Any of these abort the whole run before the optimizer starts; there
/// are no partial results.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    /// A train record failed validation.
    #[error("malformed data for train {train}: {reason}")]
    MalformedTrain {
        /// Identifier of the offending train as supplied by the caller.
        train: String,
        /// What was wrong with the record.
        reason: String,
    },

    /// The request contained no train records at all.
    #[error("no train data provided")]
    NoTrains,
}

impl ScheduleError {
    /// Convenience constructor tying a validation failure to its train.
    pub fn malformed(train: &str, reason: impl ToString) -> Self {
        ScheduleError::MalformedTrain {
            train: train.to_string(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ScheduleError::malformed("T1", "train id cannot be empty");
        assert_eq!(
            err.to_string(),
            "malformed data for train T1: train id cannot be empty"
        );

        let err = ScheduleError::NoTrains;
        assert_eq!(err.to_string(), "no train data provided");
    }
}
