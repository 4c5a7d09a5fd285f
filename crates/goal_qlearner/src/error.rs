//! Error types for the goal-conditioned Q-learner.

use crate::types::{ActionIndex, StateIndex};

/// A specialized `Result` type for learner operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The primary error enum for all operations within the `goal_qlearner` crate.
#[derive(Debug)]
pub enum Error {
    /// A learning hyperparameter or goal tuple is out of range or malformed.
    InvalidParameter(String),
    /// A policy query was made for a goal that has no table yet.
    UntrainedGoal(String),
    /// The environment reported no applicable action for a state.
    NoApplicableAction(StateIndex),
    /// The environment failed to execute an action or report its state.
    EnvironmentFailure(String),
    /// A state or action index lies outside the table bounds.
    IndexOutOfRange {
        /// What kind of index was rejected (`"state"` or `"action"`).
        kind: &'static str,
        /// The offending index.
        index: i64,
        /// The exclusive upper bound.
        bound: usize,
    },
    /// A state description is too short or its fields have the wrong type.
    InvalidState(String),
    /// An episode exceeded its step budget without reaching the goal.
    EpisodeTimeout {
        /// Zero-based number of the episode that was abandoned.
        episode: usize,
        /// Steps taken before giving up.
        steps: usize,
    },
    /// Configuration could not be parsed.
    Config(String),
}

impl Error {
    /// Builds an [`Error::IndexOutOfRange`] for a state index.
    pub fn state_out_of_range(index: i64, bound: usize) -> Self {
        Error::IndexOutOfRange {
            kind: "state",
            index,
            bound,
        }
    }

    /// Builds an [`Error::IndexOutOfRange`] for an action index.
    pub fn action_out_of_range(action: ActionIndex, bound: usize) -> Self {
        Error::IndexOutOfRange {
            kind: "action",
            index: action as i64,
            bound,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidParameter(s) => write!(f, "Invalid parameter: {}", s),
            Error::UntrainedGoal(s) => write!(f, "Untrained goal: {}", s),
            Error::NoApplicableAction(state) => {
                write!(f, "No applicable action in state {}", state)
            }
            Error::EnvironmentFailure(s) => write!(f, "Environment failure: {}", s),
            Error::IndexOutOfRange { kind, index, bound } => write!(
                f,
                "Index out of range: {} {} not in [0, {})",
                kind, index, bound
            ),
            Error::InvalidState(s) => write!(f, "Invalid state: {}", s),
            Error::EpisodeTimeout { episode, steps } => write!(
                f,
                "Episode timeout: episode {} gave up after {} steps",
                episode, steps
            ),
            Error::Config(s) => write!(f, "Configuration error: {}", s),
        }
    }
}

impl std::error::Error for Error {}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Config(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let errors = vec![
            (
                Error::InvalidParameter("alpha = 1.5".into()),
                "Invalid parameter: alpha = 1.5",
            ),
            (Error::UntrainedGoal("2|3".into()), "Untrained goal: 2|3"),
            (
                Error::NoApplicableAction(7),
                "No applicable action in state 7",
            ),
            (
                Error::EnvironmentFailure("lamp offline".into()),
                "Environment failure: lamp offline",
            ),
            (
                Error::state_out_of_range(-1, 4),
                "Index out of range: state -1 not in [0, 4)",
            ),
            (
                Error::action_out_of_range(9, 2),
                "Index out of range: action 9 not in [0, 2)",
            ),
            (
                Error::InvalidState("empty description".into()),
                "Invalid state: empty description",
            ),
            (
                Error::EpisodeTimeout {
                    episode: 3,
                    steps: 500,
                },
                "Episode timeout: episode 3 gave up after 500 steps",
            ),
            (
                Error::Config("missing field".into()),
                "Configuration error: missing field",
            ),
        ];

        for (error, expected) in errors {
            assert_eq!(format!("{}", error), expected);
        }
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_result: std::result::Result<serde_json::Value, _> =
            serde_json::from_str("{invalid}");
        let error: Error = json_result.unwrap_err().into();
        assert!(matches!(error, Error::Config(_)));
    }

    #[test]
    fn test_error_is_error_trait() {
        let error = Error::UntrainedGoal("1|1".into());
        let _: &dyn std::error::Error = &error;
    }
}
