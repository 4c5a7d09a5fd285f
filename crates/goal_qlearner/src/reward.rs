//! Reward computation against a goal.

use crate::error::{Error, Result};
use crate::goal::Goal;
use crate::types::Value;

/// Reward returned while the goal has not been reached.
pub const NOT_REACHED_REWARD: f64 = 0.0;

/// Scores a state description against a goal.
pub trait RewardFunction {
    /// Returns the reward for being in the state described by `description`.
    fn reward(&self, goal: &Goal, description: &[Value]) -> Result<f64>;
}

/// Binary goal reward: `reached` when the goal-dimensioned prefix of the
/// description equals the goal element-wise, [`NOT_REACHED_REWARD`] otherwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoalReward {
    reached: f64,
}

impl GoalReward {
    /// Creates a reward function paying `reached` on goal.
    pub fn new(reached: f64) -> Self {
        Self { reached }
    }

    /// The goal-reached scalar.
    pub fn reached(&self) -> f64 {
        self.reached
    }
}

impl Default for GoalReward {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl RewardFunction for GoalReward {
    fn reward(&self, goal: &Goal, description: &[Value]) -> Result<f64> {
        if description.len() < goal.dimensions() {
            return Err(Error::InvalidState(format!(
                "description has {} fields, goal {} needs {}",
                description.len(),
                goal,
                goal.dimensions()
            )));
        }

        let reached = goal
            .targets()
            .iter()
            .zip(description)
            .all(|(target, field)| field.as_i64() == Some(*target));

        Ok(if reached {
            self.reached
        } else {
            NOT_REACHED_REWARD
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goal(targets: &[i64]) -> Goal {
        Goal::new(targets.to_vec()).unwrap()
    }

    #[test]
    fn test_reward_on_match() {
        let description = vec![Value::Int(2), Value::Int(3), Value::Bool(true)];
        let r = GoalReward::default().reward(&goal(&[2, 3]), &description).unwrap();
        assert_eq!(r, 1.0);
    }

    #[test]
    fn test_no_reward_on_mismatch() {
        let description = vec![Value::Int(2), Value::Int(1), Value::Bool(false)];
        let r = GoalReward::default().reward(&goal(&[2, 3]), &description).unwrap();
        assert_eq!(r, NOT_REACHED_REWARD);
    }

    #[test]
    fn test_only_prefix_is_compared() {
        let description = vec![Value::Int(3), Value::Int(0), Value::Int(0)];
        let r = GoalReward::new(10.0).reward(&goal(&[3]), &description).unwrap();
        assert_eq!(r, 10.0);
    }

    #[test]
    fn test_non_integer_field_never_matches() {
        let description = vec![Value::Float(2.0), Value::Int(3)];
        let r = GoalReward::default().reward(&goal(&[2, 3]), &description).unwrap();
        assert_eq!(r, NOT_REACHED_REWARD);
    }

    #[test]
    fn test_short_description_is_invalid_state() {
        let description = vec![Value::Int(2)];
        assert!(matches!(
            GoalReward::default().reward(&goal(&[2, 3]), &description),
            Err(Error::InvalidState(_))
        ));
    }
}
