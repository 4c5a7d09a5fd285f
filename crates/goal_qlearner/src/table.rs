//! Dense action-value tables.

use crate::error::{Error, Result};
use crate::types::{ActionIndex, StateIndex};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A dense `[state_count][action_count]` table of action values for one goal.
///
/// Values are stored row-major. The shape is fixed at creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QTable {
    state_count: usize,
    action_count: usize,
    values: Vec<f64>,
}

impl QTable {
    /// Creates a zero-filled table.
    pub fn zeros(state_count: usize, action_count: usize) -> Self {
        Self {
            state_count,
            action_count,
            values: vec![0.0; state_count * action_count],
        }
    }

    /// Number of rows.
    pub fn state_count(&self) -> usize {
        self.state_count
    }

    /// Number of columns.
    pub fn action_count(&self) -> usize {
        self.action_count
    }

    /// `(state_count, action_count)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.state_count, self.action_count)
    }

    fn offset(&self, state: StateIndex, action: ActionIndex) -> Result<usize> {
        self.check_state(state)?;
        if action >= self.action_count {
            return Err(Error::action_out_of_range(action, self.action_count));
        }
        Ok(state * self.action_count + action)
    }

    fn check_state(&self, state: StateIndex) -> Result<()> {
        if state >= self.state_count {
            return Err(Error::state_out_of_range(state as i64, self.state_count));
        }
        Ok(())
    }

    /// Reads `Q[state][action]`.
    pub fn get(&self, state: StateIndex, action: ActionIndex) -> Result<f64> {
        Ok(self.values[self.offset(state, action)?])
    }

    /// Writes `Q[state][action]`.
    pub fn set(&mut self, state: StateIndex, action: ActionIndex, value: f64) -> Result<()> {
        let offset = self.offset(state, action)?;
        self.values[offset] = value;
        Ok(())
    }

    /// The action values of one state.
    pub fn row(&self, state: StateIndex) -> Result<&[f64]> {
        self.check_state(state)?;
        let start = state * self.action_count;
        Ok(&self.values[start..start + self.action_count])
    }

    /// `max_a Q[state][a]` over the full action dimension.
    ///
    /// A table with no actions yields `0.0`.
    pub fn max_value(&self, state: StateIndex) -> Result<f64> {
        let row = self.row(state)?;
        Ok(row
            .iter()
            .copied()
            .reduce(|max, v| if v > max { v } else { max })
            .unwrap_or(0.0))
    }

    /// The greedy action among `candidates`.
    ///
    /// Ties go to the first maximal candidate in iteration order. Returns
    /// `Ok(None)` when `candidates` is empty.
    pub fn best_action_among<I>(&self, state: StateIndex, candidates: I) -> Result<Option<ActionIndex>>
    where
        I: IntoIterator<Item = ActionIndex>,
    {
        let row = self.row(state)?;
        let mut best: Option<(ActionIndex, f64)> = None;
        for action in candidates {
            let value = *row
                .get(action)
                .ok_or_else(|| Error::action_out_of_range(action, self.action_count))?;
            match best {
                Some((_, best_value)) if value <= best_value => {}
                _ => best = Some((action, value)),
            }
        }
        Ok(best.map(|(action, _)| action))
    }

    /// The greedy action over the full action row, lowest index on ties.
    pub fn best_action(&self, state: StateIndex) -> Result<Option<ActionIndex>> {
        self.best_action_among(state, 0..self.action_count)
    }

    /// `true` when every cell holds a finite value.
    pub fn is_finite(&self) -> bool {
        self.values.iter().all(|v| v.is_finite())
    }

    /// `true` when every cell is exactly zero.
    pub fn is_zero(&self) -> bool {
        self.values.iter().all(|&v| v == 0.0)
    }

    /// Iterates over the rows of the table.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.values.chunks(self.action_count.max(1))
    }
}

/// Renders the table as a `Q matrix` listing, one `From state i:` line per row.
impl fmt::Display for QTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Q matrix")?;
        for state in 0..self.state_count {
            write!(f, "From state {}:  ", state)?;
            let start = state * self.action_count;
            for value in &self.values[start..start + self.action_count] {
                write!(f, "{:6.2} ", value)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// One-step temporal-difference (Q-learning) update.
///
/// `(1 - alpha) * old + alpha * (reward + gamma * max_next)`
pub fn td_update(old: f64, reward: f64, max_next: f64, alpha: f64, gamma: f64) -> f64 {
    (1.0 - alpha) * old + alpha * (reward + gamma * max_next)
}
