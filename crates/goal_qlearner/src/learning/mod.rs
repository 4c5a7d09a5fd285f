//! Training of goal-conditioned Q-tables.
//!
//! ## Overview
//!
//! Training runs epsilon-greedy episodes against a live [`Environment`]. Every
//! step performs one action, observes the resulting state, scores it against
//! the goal and applies the one-step temporal-difference update
//!
//! ```text
//! Q[s][a] = (1 - α) · Q[s][a] + α · (r + γ · max_a' Q[s'][a'])
//! ```
//!
//! An episode ends as soon as the received reward equals the configured
//! goal-reached reward.
//!
//! ## Example
//!
//! ```rust
//! use goal_qlearner::{Goal, QLearner, TabularEnvironment, TrainingConfig};
//!
//! let env = TabularEnvironment::line(4).unwrap();
//! let mut learner = QLearner::with_seed(env, 7);
//! let goal = Goal::new(vec![3]).unwrap();
//!
//! let report = learner
//!     .calculate_q(&goal, &TrainingConfig::new(20, 0.5, 0.9, 0.5, 1.0))
//!     .unwrap();
//! assert_eq!(report.episodes(), 20);
//!
//! let table = learner.dump_table(&goal).unwrap();
//! assert_eq!(table.shape(), (4, 2));
//! ```
//!
//! [`Environment`]: crate::environment::Environment

pub mod engine;

pub use engine::{QLearner, TrainingReport};
