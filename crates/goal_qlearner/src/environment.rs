//! The environment port consumed by the learner.
//!
//! The learner never models the environment itself. Anything that can report
//! its discrete state, list the actions applicable in a state and execute one
//! of them can be trained against by implementing [`Environment`].
//!
//! [`TabularEnvironment`] is a small in-memory implementation driven by an
//! explicit transition table, suitable for simulations and tests.

use crate::error::{Error, Result};
use crate::policy::ActionRecommendation;
use crate::types::{ActionIndex, StateDescription, StateIndex, Value};

/// A discrete, stateful environment.
///
/// Implementations are driven by one caller at a time: `perform_action`
/// mutates shared state that the following `current_state` call observes.
pub trait Environment {
    /// Size of the state space. Fixed for the lifetime of the environment.
    fn state_count(&self) -> usize;

    /// Size of the action space. Fixed for the lifetime of the environment.
    fn action_count(&self) -> usize;

    /// Number of components in a goal for this environment.
    fn goal_dimensions(&self) -> usize;

    /// Actions that may be performed in `state`, in a stable order.
    fn applicable_actions(&self, state: StateIndex) -> Result<Vec<ActionIndex>>;

    /// Executes `action`, advancing the environment.
    ///
    /// Failures should be reported as [`Error::EnvironmentFailure`].
    fn perform_action(&mut self, action: ActionIndex) -> Result<()>;

    /// Index of the current state.
    fn current_state(&self) -> Result<StateIndex>;

    /// Full semantic description of the current state.
    fn current_state_description(&self) -> Result<StateDescription>;

    /// Maps an action index to the recommendation an embedding agent can execute.
    ///
    /// The default carries the bare index under an `action` tag.
    fn describe_action(&self, action: ActionIndex) -> Result<ActionRecommendation> {
        if action >= self.action_count() {
            return Err(Error::action_out_of_range(action, self.action_count()));
        }
        Ok(ActionRecommendation::new(
            action,
            "action",
            vec!["index".to_string()],
            vec![Value::Int(action as i64)],
        ))
    }
}

/// Semantic annotation of one action of a [`TabularEnvironment`].
#[derive(Debug, Clone, PartialEq)]
pub struct ActionDescriptor {
    /// The action tag, e.g. `http://example.org/was#SetZ1Light`.
    pub tag: String,
    /// Tags of the payload fields, e.g. `["Z1Light"]`.
    pub payload_tags: Vec<String>,
    /// Payload values matching `payload_tags`.
    pub payload: Vec<Value>,
}

impl ActionDescriptor {
    pub fn new(tag: &str, payload_tags: &[&str], payload: Vec<Value>) -> Self {
        Self {
            tag: tag.to_string(),
            payload_tags: payload_tags.iter().map(|t| t.to_string()).collect(),
            payload,
        }
    }
}

/// An in-memory environment defined by a transition table.
///
/// `transitions[s][a]` is the state reached by performing `a` in `s`, or
/// `None` when `a` is not applicable in `s`.
#[derive(Debug, Clone)]
pub struct TabularEnvironment {
    transitions: Vec<Vec<Option<StateIndex>>>,
    descriptions: Vec<StateDescription>,
    goal_dimensions: usize,
    descriptors: Vec<ActionDescriptor>,
    current: StateIndex,
    steps: u64,
}

impl TabularEnvironment {
    /// Creates an environment starting in state 0.
    ///
    /// Every row of `transitions` must have the same length, every target must
    /// be a valid state, and there must be one description per state, each at
    /// least `goal_dimensions` long.
    pub fn new(
        transitions: Vec<Vec<Option<StateIndex>>>,
        descriptions: Vec<StateDescription>,
        goal_dimensions: usize,
    ) -> Result<Self> {
        let state_count = transitions.len();
        if state_count == 0 {
            return Err(Error::InvalidParameter(
                "environment needs at least one state".to_string(),
            ));
        }
        let action_count = transitions[0].len();
        for (state, row) in transitions.iter().enumerate() {
            if row.len() != action_count {
                return Err(Error::InvalidParameter(format!(
                    "state {} has {} actions, expected {}",
                    state,
                    row.len(),
                    action_count
                )));
            }
            if let Some(target) = row.iter().flatten().find(|&&t| t >= state_count) {
                return Err(Error::state_out_of_range(*target as i64, state_count));
            }
        }
        if descriptions.len() != state_count {
            return Err(Error::InvalidParameter(format!(
                "{} descriptions for {} states",
                descriptions.len(),
                state_count
            )));
        }
        if let Some(state) = descriptions.iter().position(|d| d.len() < goal_dimensions) {
            return Err(Error::InvalidState(format!(
                "description of state {} is shorter than {} goal dimensions",
                state, goal_dimensions
            )));
        }

        Ok(Self {
            transitions,
            descriptions,
            goal_dimensions,
            descriptors: Vec::new(),
            current: 0,
            steps: 0,
        })
    }

    /// A one-dimensional line of `length` states.
    ///
    /// Action 0 decrements and action 1 increments the position, clipped to
    /// `[0, length)`. Each state is described by `[position]`.
    pub fn line(length: usize) -> Result<Self> {
        let last = length.saturating_sub(1);
        let transitions = (0..length)
            .map(|s| vec![Some(s.saturating_sub(1)), Some((s + 1).min(last))])
            .collect();
        let descriptions = (0..length).map(|s| vec![Value::Int(s as i64)]).collect();
        Ok(Self::new(transitions, descriptions, 1)?.with_descriptors(vec![
            ActionDescriptor::new("decrement", &["step"], vec![Value::Int(-1)]),
            ActionDescriptor::new("increment", &["step"], vec![Value::Int(1)]),
        ]))
    }

    /// Attaches semantic descriptors, one per action.
    ///
    /// Actions without a descriptor fall back to the generic `action` tag.
    pub fn with_descriptors(mut self, descriptors: Vec<ActionDescriptor>) -> Self {
        self.descriptors = descriptors;
        self
    }

    /// Moves the environment to `state` without counting a step.
    pub fn reset_to(&mut self, state: StateIndex) -> Result<()> {
        if state >= self.transitions.len() {
            return Err(Error::state_out_of_range(
                state as i64,
                self.transitions.len(),
            ));
        }
        self.current = state;
        Ok(())
    }

    /// Number of actions performed since creation.
    pub fn steps(&self) -> u64 {
        self.steps
    }
}

impl Environment for TabularEnvironment {
    fn state_count(&self) -> usize {
        self.transitions.len()
    }

    fn action_count(&self) -> usize {
        self.transitions[0].len()
    }

    fn goal_dimensions(&self) -> usize {
        self.goal_dimensions
    }

    fn applicable_actions(&self, state: StateIndex) -> Result<Vec<ActionIndex>> {
        let row = self
            .transitions
            .get(state)
            .ok_or_else(|| Error::state_out_of_range(state as i64, self.transitions.len()))?;
        Ok(row
            .iter()
            .enumerate()
            .filter_map(|(action, target)| target.map(|_| action))
            .collect())
    }

    fn perform_action(&mut self, action: ActionIndex) -> Result<()> {
        let target = self.transitions[self.current]
            .get(action)
            .copied()
            .flatten()
            .ok_or_else(|| {
                Error::EnvironmentFailure(format!(
                    "action {} is not applicable in state {}",
                    action, self.current
                ))
            })?;
        self.current = target;
        self.steps += 1;
        Ok(())
    }

    fn current_state(&self) -> Result<StateIndex> {
        Ok(self.current)
    }

    fn current_state_description(&self) -> Result<StateDescription> {
        Ok(self.descriptions[self.current].clone())
    }

    fn describe_action(&self, action: ActionIndex) -> Result<ActionRecommendation> {
        if action >= self.action_count() {
            return Err(Error::action_out_of_range(action, self.action_count()));
        }
        Ok(match self.descriptors.get(action) {
            Some(d) => ActionRecommendation::new(
                action,
                &d.tag,
                d.payload_tags.clone(),
                d.payload.clone(),
            ),
            None => ActionRecommendation::new(
                action,
                "action",
                vec!["index".to_string()],
                vec![Value::Int(action as i64)],
            ),
        })
    }
}
