//! Configuration for the Q-learner.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Hyperparameters for one `calculate_q` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Number of episodes to run. Zero is a no-op.
    pub episodes: usize,
    /// The learning rate (alpha), in `[0, 1]`.
    pub alpha: f64,
    /// The discount factor (gamma), in `[0, 1]`.
    pub gamma: f64,
    /// The exploration probability (epsilon), in `[0, 1]`.
    pub epsilon: f64,
    /// Reward signalling that the goal was reached. Doubles as the episode
    /// termination sentinel.
    pub reward_on_goal: f64,
    /// Maximum number of steps per episode before it is abandoned with
    /// [`Error::EpisodeTimeout`]. `None` leaves episodes unbounded.
    pub max_steps_per_episode: Option<usize>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            episodes: 200,
            alpha: 0.5,
            gamma: 0.9,
            epsilon: 0.1,
            reward_on_goal: 1.0,
            max_steps_per_episode: Some(100_000),
        }
    }
}

impl TrainingConfig {
    /// Creates a configuration with explicit hyperparameters and no step cap.
    pub fn new(episodes: usize, alpha: f64, gamma: f64, epsilon: f64, reward_on_goal: f64) -> Self {
        Self {
            episodes,
            alpha,
            gamma,
            epsilon,
            reward_on_goal,
            max_steps_per_episode: None,
        }
    }

    /// A configuration that explores heavily, for large or poorly known state spaces.
    pub fn exploratory() -> Self {
        Self {
            episodes: 1_000,
            alpha: 0.3,
            gamma: 0.95,
            epsilon: 0.4,
            ..Default::default()
        }
    }

    /// A configuration that mostly exploits what has been learned already.
    pub fn conservative() -> Self {
        Self {
            episodes: 100,
            alpha: 0.1,
            gamma: 0.9,
            epsilon: 0.05,
            ..Default::default()
        }
    }

    /// Sets the number of episodes.
    pub fn with_episodes(mut self, episodes: usize) -> Self {
        self.episodes = episodes;
        self
    }

    /// Sets the exploration probability.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Sets the goal-reached reward.
    pub fn with_reward_on_goal(mut self, reward: f64) -> Self {
        self.reward_on_goal = reward;
        self
    }

    /// Sets (or removes, with `None`) the per-episode step cap.
    pub fn with_max_steps(mut self, max_steps: Option<usize>) -> Self {
        self.max_steps_per_episode = max_steps;
        self
    }

    /// Checks every hyperparameter, failing with [`Error::InvalidParameter`].
    pub fn validate(&self) -> Result<()> {
        check_unit_interval("alpha", self.alpha)?;
        check_unit_interval("gamma", self.gamma)?;
        check_unit_interval("epsilon", self.epsilon)?;

        if !self.reward_on_goal.is_finite() {
            return Err(Error::InvalidParameter(format!(
                "reward_on_goal must be finite, got {}",
                self.reward_on_goal
            )));
        }
        if self.reward_on_goal == crate::reward::NOT_REACHED_REWARD {
            return Err(Error::InvalidParameter(format!(
                "reward_on_goal must differ from the not-reached reward {}",
                crate::reward::NOT_REACHED_REWARD
            )));
        }
        if self.max_steps_per_episode == Some(0) {
            return Err(Error::InvalidParameter(
                "max_steps_per_episode must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Parses and validates a configuration from JSON. Missing fields take
    /// their default values.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the configuration to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

fn check_unit_interval(name: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::InvalidParameter(format!(
            "{} must be in [0, 1], got {}",
            name, value
        )))
    }
}

/// Defines the configuration of a [`QLearner`](crate::QLearner).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearnerConfig {
    /// Human-readable name, used in log output.
    pub name: String,
    /// Seed for the exploration RNG. `None` seeds from the operating system.
    pub seed: Option<u64>,
    /// Training hyperparameters used by [`QLearner::train`](crate::QLearner::train).
    pub training: TrainingConfig,
}

impl Default for LearnerConfig {
    fn default() -> Self {
        Self {
            name: "qlearner".to_string(),
            seed: None,
            training: TrainingConfig::default(),
        }
    }
}

impl LearnerConfig {
    /// Creates a new configuration with a specified name.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Fixes the exploration seed, making training reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Replaces the default training hyperparameters.
    pub fn with_training(mut self, training: TrainingConfig) -> Self {
        self.training = training;
        self
    }
}
