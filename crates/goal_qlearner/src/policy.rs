//! Greedy policy queries over trained Q-tables.
//!
//! Querying never touches the environment's state and never mutates a table:
//! it reads the goal's table, picks the highest-valued action for the given
//! state and asks the environment only for that action's semantic annotation.

use crate::environment::Environment;
use crate::error::{Error, Result};
use crate::goal::Goal;
use crate::learning::engine::environment_failure;
use crate::learning::QLearner;
use crate::table::QTable;
use crate::types::{ActionIndex, StateIndex, Value};
use serde::{Deserialize, Serialize};

/// An action the embedding agent can execute by its own means.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRecommendation {
    /// Index of the recommended action.
    pub action: ActionIndex,
    /// Semantic tag of the action, e.g. `http://example.org/was#SetZ1Light`.
    pub tag: String,
    /// Ordered tags of the payload fields.
    pub payload_tags: Vec<String>,
    /// Payload values, in the same order as `payload_tags`.
    pub payload: Vec<Value>,
}

impl ActionRecommendation {
    /// Creates a new recommendation.
    pub fn new(
        action: ActionIndex,
        tag: &str,
        payload_tags: Vec<String>,
        payload: Vec<Value>,
    ) -> Self {
        Self {
            action,
            tag: tag.to_string(),
            payload_tags,
            payload,
        }
    }
}

/// Extracts the table row index from a state description.
///
/// The first field of the description doubles as the state index.
pub fn state_index(description: &[Value], state_count: usize) -> Result<StateIndex> {
    let first = description
        .first()
        .ok_or_else(|| Error::InvalidState("state description is empty".to_string()))?;
    let index = first.as_i64().ok_or_else(|| {
        Error::InvalidState(format!("state index field is not an integer: {}", first))
    })?;
    if index < 0 || index as u64 >= state_count as u64 {
        return Err(Error::state_out_of_range(index, state_count));
    }
    Ok(index as StateIndex)
}

/// The greedy action of `state` over the full action row.
pub fn greedy_action(table: &QTable, state: StateIndex) -> Result<ActionIndex> {
    table
        .best_action(state)?
        .ok_or(Error::NoApplicableAction(state))
}

impl<E: Environment> QLearner<E> {
    /// Returns the greedy action for `goal` in the state described by
    /// `description`, packaged for execution by the caller.
    ///
    /// # Errors
    ///
    /// - [`Error::UntrainedGoal`] if no table exists for `goal`.
    /// - [`Error::InvalidState`] if the description is empty or its first
    ///   field is not an integer.
    /// - [`Error::IndexOutOfRange`] if that index is outside the table.
    /// - [`Error::EnvironmentFailure`] if the environment cannot describe the
    ///   action, or describes a different one.
    pub fn get_action_from_state(
        &self,
        goal: &Goal,
        description: &[Value],
    ) -> Result<ActionRecommendation> {
        let table = self.dump_table(goal)?;
        let state = state_index(description, table.state_count())?;
        let action = greedy_action(table, state)?;
        log::debug!(
            "Goal {}: greedy action {} in state {}",
            goal,
            action,
            state
        );
        let recommendation = self
            .environment()
            .describe_action(action)
            .map_err(environment_failure)?;
        if recommendation.action != action {
            return Err(Error::EnvironmentFailure(format!(
                "asked to describe action {}, environment described action {}",
                action, recommendation.action
            )));
        }
        Ok(recommendation)
    }

    /// Greedy action index for `goal` in `state`, without packaging.
    pub fn best_action(&self, goal: &Goal, state: StateIndex) -> Result<ActionIndex> {
        greedy_action(self.dump_table(goal)?, state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_index_from_description() {
        let description = vec![Value::Int(2), Value::Int(3), Value::Bool(true)];
        assert_eq!(state_index(&description, 16).unwrap(), 2);
        assert_eq!(state_index(&[Value::from("5")], 16).unwrap(), 5);
    }

    #[test]
    fn test_state_index_errors() {
        assert!(matches!(
            state_index(&[], 4),
            Err(Error::InvalidState(_))
        ));
        assert!(matches!(
            state_index(&[Value::Bool(true)], 4),
            Err(Error::InvalidState(_))
        ));
        assert!(matches!(
            state_index(&[Value::Int(4)], 4),
            Err(Error::IndexOutOfRange { index: 4, bound: 4, .. })
        ));
        assert!(matches!(
            state_index(&[Value::Int(-1)], 4),
            Err(Error::IndexOutOfRange { index: -1, .. })
        ));
    }

    #[test]
    fn test_greedy_action_tie_break() {
        let mut table = QTable::zeros(2, 3);
        table.set(1, 1, 0.8).unwrap();
        table.set(1, 2, 0.8).unwrap();
        for _ in 0..5 {
            assert_eq!(greedy_action(&table, 1).unwrap(), 1);
        }
        assert_eq!(greedy_action(&table, 0).unwrap(), 0);
    }

    #[test]
    fn test_greedy_action_without_actions() {
        let table = QTable::zeros(2, 0);
        assert!(matches!(
            greedy_action(&table, 0),
            Err(Error::NoApplicableAction(0))
        ));
    }

    #[test]
    fn test_recommendation_serializes() {
        let rec = ActionRecommendation::new(
            1,
            "http://example.org/was#SetZ1Light",
            vec!["Z1Light".to_string()],
            vec![Value::Bool(true)],
        );
        let json = serde_json::to_string(&rec).unwrap();
        let back: ActionRecommendation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rec);
    }
}
