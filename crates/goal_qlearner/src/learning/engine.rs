//! The epsilon-greedy Q-learning training engine.
//!
//! [`QLearner`] binds one [`Environment`] to a [`QTableStore`] and trains one
//! goal's table at a time by driving the environment through real state
//! transitions.

use crate::config::{LearnerConfig, TrainingConfig};
use crate::environment::Environment;
use crate::error::{Error, Result};
use crate::goal::{Goal, GoalKey};
use crate::reward::{GoalReward, RewardFunction};
use crate::store::QTableStore;
use crate::table::{td_update, QTable};
use crate::types::{ActionIndex, StateIndex, Timestamp};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Summary of one `calculate_q` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingReport {
    /// The goal whose table was trained.
    pub goal: GoalKey,
    /// Steps taken in each completed episode, in order.
    pub episode_steps: Vec<usize>,
    /// When training started.
    pub started_at: Timestamp,
    /// When training finished.
    pub finished_at: Timestamp,
}

impl TrainingReport {
    fn new(goal: GoalKey) -> Self {
        let now = Timestamp::now();
        Self {
            goal,
            episode_steps: Vec::new(),
            started_at: now,
            finished_at: now,
        }
    }

    /// Number of episodes that reached the goal.
    pub fn episodes(&self) -> usize {
        self.episode_steps.len()
    }

    /// Total number of steps (and therefore table updates) across all episodes.
    pub fn total_steps(&self) -> u64 {
        self.episode_steps.iter().map(|&s| s as u64).sum()
    }

    /// Average episode length, or `0.0` when no episode ran.
    pub fn mean_steps(&self) -> f64 {
        if self.episode_steps.is_empty() {
            0.0
        } else {
            self.total_steps() as f64 / self.episode_steps.len() as f64
        }
    }

    /// Wall-clock training time in microseconds.
    pub fn duration_micros(&self) -> u64 {
        self.finished_at.micros_since(self.started_at)
    }
}

/// A goal-conditioned tabular Q-learner bound to one environment.
pub struct QLearner<E: Environment> {
    config: LearnerConfig,
    environment: E,
    store: QTableStore,
    rng: StdRng,
    total_updates: u64,
    total_episodes: u64,
}

impl<E: Environment> QLearner<E> {
    /// Binds a learner to `environment` with the default configuration.
    pub fn new(environment: E) -> Self {
        Self::with_config(environment, LearnerConfig::default())
    }

    /// Binds a learner to `environment` with a fixed exploration seed.
    pub fn with_seed(environment: E, seed: u64) -> Self {
        Self::with_config(environment, LearnerConfig::default().with_seed(seed))
    }

    /// Binds a learner to `environment` with a custom configuration.
    pub fn with_config(environment: E, config: LearnerConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let store = QTableStore::new(environment.state_count(), environment.action_count());
        log_binding(&config.name, &environment);
        Self {
            config,
            environment,
            store,
            rng,
            total_updates: 0,
            total_episodes: 0,
        }
    }

    /// Rebinds the learner to a new environment, clearing every table.
    ///
    /// Returns the previously bound environment.
    pub fn initialize(&mut self, environment: E) -> E {
        log_binding(&self.config.name, &environment);
        self.store
            .reset(environment.state_count(), environment.action_count());
        self.total_updates = 0;
        self.total_episodes = 0;
        std::mem::replace(&mut self.environment, environment)
    }

    /// Trains `goal` with the learner's default [`TrainingConfig`].
    pub fn train(&mut self, goal: &Goal) -> Result<TrainingReport> {
        let config = self.config.training.clone();
        self.calculate_q(goal, &config)
    }

    /// Runs `config.episodes` epsilon-greedy episodes for `goal`, updating its
    /// table in place.
    ///
    /// Each episode starts from the environment's current state and ends when
    /// the received reward equals `config.reward_on_goal`. With
    /// `episodes == 0` the goal's table is created but the environment is not
    /// touched.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidParameter`] for out-of-range hyperparameters or a goal
    ///   whose length differs from the environment's goal dimensionality.
    /// - [`Error::NoApplicableAction`] when the environment reaches a dead end.
    /// - [`Error::EnvironmentFailure`] when the environment fails.
    /// - [`Error::IndexOutOfRange`] when the environment reports an index
    ///   outside the table.
    /// - [`Error::EpisodeTimeout`] when `max_steps_per_episode` is exceeded.
    ///
    /// Updates made before an error are kept.
    pub fn calculate_q(&mut self, goal: &Goal, config: &TrainingConfig) -> Result<TrainingReport> {
        config.validate()?;
        self.check_goal(goal)?;

        let reward = GoalReward::new(config.reward_on_goal);
        let mut report = TrainingReport::new(goal.key());
        let name = &self.config.name;
        let table = self.store.get_or_create(&report.goal);

        for episode in 0..config.episodes {
            let steps = run_episode(
                &mut self.environment,
                table,
                &mut self.rng,
                goal,
                &reward,
                config,
                episode,
            )?;
            self.total_updates += steps as u64;
            self.total_episodes += 1;
            report.episode_steps.push(steps);
            log::debug!(
                "{}: goal {} episode {} reached in {} steps",
                name,
                goal,
                episode,
                steps
            );
        }

        report.finished_at = Timestamp::now();
        log::info!(
            "{}: trained goal {} for {} episodes ({} steps, mean {:.1})",
            name,
            goal,
            report.episodes(),
            report.total_steps(),
            report.mean_steps()
        );
        Ok(report)
    }

    /// Returns the trained table for `goal`.
    ///
    /// Fails with [`Error::UntrainedGoal`] if `calculate_q` was never called
    /// for it.
    pub fn dump_table(&self, goal: &Goal) -> Result<&QTable> {
        let key = goal.key();
        self.store
            .get(&key)
            .ok_or_else(|| Error::UntrainedGoal(key.to_string()))
    }

    fn check_goal(&self, goal: &Goal) -> Result<()> {
        let expected = self.environment.goal_dimensions();
        if goal.dimensions() != expected {
            return Err(Error::InvalidParameter(format!(
                "goal {} has {} components, environment expects {}",
                goal,
                goal.dimensions(),
                expected
            )));
        }
        Ok(())
    }

    /// The bound environment.
    pub fn environment(&self) -> &E {
        &self.environment
    }

    /// Mutable access to the bound environment, e.g. to reposition it
    /// between training calls.
    pub fn environment_mut(&mut self) -> &mut E {
        &mut self.environment
    }

    /// The table store.
    pub fn store(&self) -> &QTableStore {
        &self.store
    }

    /// The learner configuration.
    pub fn config(&self) -> &LearnerConfig {
        &self.config
    }

    /// Total table updates since the last (re)initialisation.
    pub fn total_updates(&self) -> u64 {
        self.total_updates
    }

    /// Total completed episodes since the last (re)initialisation.
    pub fn total_episodes(&self) -> u64 {
        self.total_episodes
    }
}

fn log_binding<E: Environment>(name: &str, environment: &E) {
    log::info!(
        "{}: initialized with a state space of n={}",
        name,
        environment.state_count()
    );
    log::info!(
        "{}: initialized with an action space of m={}",
        name,
        environment.action_count()
    );
}

/// Runs one episode and returns the number of steps it took.
fn run_episode<E: Environment, R: RewardFunction>(
    environment: &mut E,
    table: &mut QTable,
    rng: &mut StdRng,
    goal: &Goal,
    reward: &R,
    config: &TrainingConfig,
    episode: usize,
) -> Result<usize> {
    let mut state = observed_state(environment, table)?;
    let mut steps = 0;

    loop {
        if let Some(max_steps) = config.max_steps_per_episode {
            if steps >= max_steps {
                log::warn!(
                    "Goal {}: episode {} abandoned after {} steps",
                    goal,
                    episode,
                    steps
                );
                return Err(Error::EpisodeTimeout { episode, steps });
            }
        }

        let applicable = environment
            .applicable_actions(state)
            .map_err(environment_failure)?;
        let action = select_action(table, state, &applicable, config.epsilon, rng)?;

        environment
            .perform_action(action)
            .map_err(environment_failure)?;
        let next_state = observed_state(environment, table)?;
        let description = environment
            .current_state_description()
            .map_err(environment_failure)?;
        let received = reward.reward(goal, &description)?;

        let old = table.get(state, action)?;
        let updated = td_update(
            old,
            received,
            table.max_value(next_state)?,
            config.alpha,
            config.gamma,
        );
        table.set(state, action, updated)?;
        log::trace!(
            "Q[{}][{}]: {:.4} -> {:.4} (reward {})",
            state,
            action,
            old,
            updated,
            received
        );
        steps += 1;

        if received == config.reward_on_goal {
            return Ok(steps);
        }
        state = next_state;
    }
}

/// Epsilon-greedy choice among `applicable` actions.
///
/// The greedy branch breaks ties in favour of the first maximal action in
/// `applicable` order.
pub(crate) fn select_action<R: Rng>(
    table: &QTable,
    state: StateIndex,
    applicable: &[ActionIndex],
    epsilon: f64,
    rng: &mut R,
) -> Result<ActionIndex> {
    if applicable.is_empty() {
        return Err(Error::NoApplicableAction(state));
    }
    if let Some(&action) = applicable.iter().find(|&&a| a >= table.action_count()) {
        return Err(Error::action_out_of_range(action, table.action_count()));
    }

    if rng.random::<f64>() < epsilon {
        Ok(applicable[rng.random_range(0..applicable.len())])
    } else {
        table
            .best_action_among(state, applicable.iter().copied())?
            .ok_or(Error::NoApplicableAction(state))
    }
}

fn observed_state<E: Environment>(environment: &E, table: &QTable) -> Result<StateIndex> {
    let state = environment.current_state().map_err(environment_failure)?;
    if state >= table.state_count() {
        return Err(Error::state_out_of_range(state as i64, table.state_count()));
    }
    Ok(state)
}

/// Environment errors surface as [`Error::EnvironmentFailure`] unless they
/// already carry a more specific learner error.
pub(crate) fn environment_failure(error: Error) -> Error {
    match error {
        Error::EnvironmentFailure(_)
        | Error::NoApplicableAction(_)
        | Error::IndexOutOfRange { .. } => error,
        other => Error::EnvironmentFailure(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::TabularEnvironment;
    use crate::types::Value;

    fn line_goal() -> Goal {
        Goal::new(vec![3]).unwrap()
    }

    #[test]
    fn test_learner_creation() {
        let learner = QLearner::with_seed(TabularEnvironment::line(4).unwrap(), 1);
        assert!(learner.store().is_empty());
        assert_eq!(learner.store().shape(), (4, 2));
        assert_eq!(learner.total_updates(), 0);
    }

    #[test]
    fn test_zero_episodes_creates_zero_table() {
        let mut learner = QLearner::with_seed(TabularEnvironment::line(4).unwrap(), 1);
        let config = TrainingConfig::new(0, 0.5, 0.9, 0.1, 1.0);

        let report = learner.calculate_q(&line_goal(), &config).unwrap();
        assert_eq!(report.episodes(), 0);
        assert!(learner.dump_table(&line_goal()).unwrap().is_zero());
        assert_eq!(learner.environment().steps(), 0);
    }

    #[test]
    fn test_invalid_hyperparameters_fail_fast() {
        let mut learner = QLearner::with_seed(TabularEnvironment::line(4).unwrap(), 1);
        let config = TrainingConfig::new(10, 1.1, 0.9, 0.1, 1.0);

        assert!(matches!(
            learner.calculate_q(&line_goal(), &config),
            Err(Error::InvalidParameter(_))
        ));
        assert!(learner.store().is_empty());
        assert_eq!(learner.environment().steps(), 0);
    }

    #[test]
    fn test_goal_dimension_mismatch() {
        let mut learner = QLearner::with_seed(TabularEnvironment::line(4).unwrap(), 1);
        let goal = Goal::new(vec![3, 1]).unwrap();
        assert!(matches!(
            learner.calculate_q(&goal, &TrainingConfig::default()),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_episode_timeout() {
        // With epsilon = 0 and all-zero values the greedy tie-break keeps
        // choosing "decrement" in state 0, so the goal is never reached.
        let mut learner = QLearner::with_seed(TabularEnvironment::line(2).unwrap(), 3);
        let config = TrainingConfig::new(1, 0.5, 0.9, 0.0, 1.0).with_max_steps(Some(5));

        let result = learner.calculate_q(&Goal::new(vec![1]).unwrap(), &config);
        assert!(matches!(
            result,
            Err(Error::EpisodeTimeout {
                episode: 0,
                steps: 5
            })
        ));
        assert_eq!(learner.environment().steps(), 5);
        assert!(learner.dump_table(&Goal::new(vec![1]).unwrap()).is_ok());
    }

    #[test]
    fn test_single_step_update_values() {
        // State 0 only allows action 1, which leads straight to the goal.
        let transitions = vec![vec![None, Some(1)], vec![Some(0), Some(1)]];
        let descriptions = vec![vec![Value::Int(0)], vec![Value::Int(1)]];
        let env = TabularEnvironment::new(transitions, descriptions, 1).unwrap();
        let goal = Goal::new(vec![1]).unwrap();

        let mut learner = QLearner::with_seed(env.clone(), 9);
        learner
            .calculate_q(&goal, &TrainingConfig::new(1, 1.0, 0.9, 0.0, 2.0))
            .unwrap();
        let table = learner.dump_table(&goal).unwrap();
        assert_eq!(table.get(0, 1).unwrap(), 2.0);
        assert_eq!(table.get(0, 0).unwrap(), 0.0);

        let mut frozen = QLearner::with_seed(env, 9);
        frozen
            .calculate_q(&goal, &TrainingConfig::new(1, 0.0, 0.9, 0.0, 2.0))
            .unwrap();
        assert!(frozen.dump_table(&goal).unwrap().is_zero());
    }

    #[test]
    fn test_select_action_greedy_tie_break() {
        let mut table = QTable::zeros(1, 3);
        table.set(0, 0, 0.2).unwrap();
        table.set(0, 1, 0.7).unwrap();
        table.set(0, 2, 0.7).unwrap();
        let mut rng = StdRng::seed_from_u64(0);

        for _ in 0..20 {
            assert_eq!(select_action(&table, 0, &[0, 1, 2], 0.0, &mut rng).unwrap(), 1);
            assert_eq!(select_action(&table, 0, &[2, 1], 0.0, &mut rng).unwrap(), 2);
        }
    }

    #[test]
    fn test_select_action_explores_applicable_only() {
        let table = QTable::zeros(1, 4);
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let action = select_action(&table, 0, &[1, 3], 1.0, &mut rng).unwrap();
            assert!(action == 1 || action == 3);
        }
    }

    #[test]
    fn test_select_action_errors() {
        let table = QTable::zeros(1, 2);
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            select_action(&table, 0, &[], 0.5, &mut rng),
            Err(Error::NoApplicableAction(0))
        ));
        assert!(matches!(
            select_action(&table, 0, &[0, 5], 0.5, &mut rng),
            Err(Error::IndexOutOfRange { kind: "action", .. })
        ));
    }

    #[test]
    fn test_environment_failure_mapping() {
        assert!(matches!(
            environment_failure(Error::InvalidState("x".into())),
            Error::EnvironmentFailure(_)
        ));
        assert!(matches!(
            environment_failure(Error::NoApplicableAction(2)),
            Error::NoApplicableAction(2)
        ));
    }

    #[test]
    fn test_initialize_clears_store() {
        let mut learner = QLearner::with_seed(TabularEnvironment::line(4).unwrap(), 5);
        learner
            .calculate_q(&line_goal(), &TrainingConfig::new(0, 0.5, 0.9, 0.1, 1.0))
            .unwrap();
        assert_eq!(learner.store().len(), 1);

        let old = learner.initialize(TabularEnvironment::line(6).unwrap());
        assert_eq!(old.state_count(), 4);
        assert!(learner.store().is_empty());
        assert_eq!(learner.store().shape(), (6, 2));
        assert!(matches!(
            learner.dump_table(&line_goal()),
            Err(Error::UntrainedGoal(_))
        ));
    }

    #[test]
    fn test_report_statistics() {
        let mut report = TrainingReport::new(line_goal().key());
        assert_eq!(report.mean_steps(), 0.0);
        report.episode_steps = vec![2, 4];
        assert_eq!(report.episodes(), 2);
        assert_eq!(report.total_steps(), 6);
        assert_eq!(report.mean_steps(), 3.0);
    }
}
