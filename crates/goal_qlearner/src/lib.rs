#![doc = include_str!("../README.md")]
//! # goal_qlearner - Goal-Conditioned Tabular Q-Learning
//!
//! Learns one action-value table per goal over a discretized environment and
//! serves greedy action recommendations from the trained tables.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          QLearner                            │
//! ├──────────────────────────────────────────────────────────────┤
//! │                                                              │
//! │  calculate_q(goal)                 get_action_from_state     │
//! │  ┌──────────────────┐              ┌──────────────────────┐  │
//! │  │ epsilon-greedy   │  writes      │ greedy lookup        │  │
//! │  │ TD episodes      │──────┐  ┌───►│ first-seen tie-break │  │
//! │  └────────┬─────────┘      │  │    └──────────┬───────────┘  │
//! │           │                ▼  │               │              │
//! │           │          ┌─────────────┐          │              │
//! │           │          │ QTableStore │          │              │
//! │           │          │ GoalKey→QT  │          │              │
//! │           │          └─────────────┘          │              │
//! │           ▼                                   ▼              │
//! │  ┌────────────────────────────────────────────────────────┐ │
//! │  │               Environment (port)                       │ │
//! │  │  applicable_actions · perform_action · current_state   │ │
//! │  │  current_state_description · describe_action           │ │
//! │  └────────────────────────────────────────────────────────┘ │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use goal_qlearner::{Goal, QLearner, TabularEnvironment, TrainingConfig, Value};
//!
//! let env = TabularEnvironment::line(4).unwrap();
//! let mut learner = QLearner::with_seed(env, 42);
//! let goal = Goal::new(vec![3]).unwrap();
//!
//! learner
//!     .calculate_q(&goal, &TrainingConfig::new(50, 0.5, 0.9, 0.5, 1.0))
//!     .unwrap();
//!
//! let recommendation = learner
//!     .get_action_from_state(&goal, &[Value::Int(2)])
//!     .unwrap();
//! println!("next: {} {:?}", recommendation.tag, recommendation.payload);
//! ```
//!
//! ## Execution Model
//!
//! Training is synchronous and blocking: every step is a round-trip to the
//! environment. The learner owns its environment, so two trainings can never
//! drive the same environment at once.

pub mod config;
pub mod environment;
pub mod error;
pub mod goal;
pub mod learning;
pub mod policy;
pub mod reward;
pub mod store;
pub mod table;
pub mod types;

pub use config::{LearnerConfig, TrainingConfig};
pub use environment::{ActionDescriptor, Environment, TabularEnvironment};
pub use error::{Error, Result};
pub use goal::{Goal, GoalKey};
pub use learning::{QLearner, TrainingReport};
pub use policy::ActionRecommendation;
pub use reward::{GoalReward, RewardFunction, NOT_REACHED_REWARD};
pub use store::QTableStore;
pub use table::{td_update, QTable};
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Creates a learner bound to `environment` with a named default configuration.
///
/// # Examples
///
/// ```
/// use goal_qlearner::{create_learner, TabularEnvironment};
///
/// let learner = create_learner("lab", TabularEnvironment::line(4).unwrap());
/// assert_eq!(learner.config().name, "lab");
/// assert!(learner.store().is_empty());
/// ```
pub fn create_learner<E: Environment>(name: &str, environment: E) -> QLearner<E> {
    QLearner::with_config(environment, LearnerConfig::new(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_learner() {
        let learner = create_learner("test_learner", TabularEnvironment::line(3).unwrap());
        assert_eq!(learner.config().name, "test_learner");
        assert_eq!(learner.store().shape(), (3, 2));
    }

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
