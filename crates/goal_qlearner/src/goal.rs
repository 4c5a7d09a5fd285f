//! Goals and the keys that index the Q-table store.
//!
//! A [`Goal`] is an ordered tuple of integer targets, one per controllable
//! dimension of the environment (for example the desired illuminance rank of
//! each lab zone). Loosely typed input is parsed once, here, so that the
//! learning code only ever sees validated integers.

use crate::error::{Error, Result};
use crate::types::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A target configuration the learner is trained to reach.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Goal {
    targets: Vec<i64>,
}

impl Goal {
    /// Creates a goal from its per-dimension targets.
    ///
    /// Fails with [`Error::InvalidParameter`] when `targets` is empty.
    pub fn new(targets: Vec<i64>) -> Result<Self> {
        if targets.is_empty() {
            return Err(Error::InvalidParameter(
                "goal must have at least one target".to_string(),
            ));
        }
        Ok(Self { targets })
    }

    /// Parses a goal from textual components such as `["2", "3"]`.
    pub fn parse<S: AsRef<str>>(components: &[S]) -> Result<Self> {
        let targets = components
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let c = c.as_ref();
                c.trim().parse::<i64>().map_err(|_| {
                    Error::InvalidParameter(format!(
                        "goal component {} is not an integer: {:?}",
                        i, c
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(targets)
    }

    /// Builds a goal from typed values, accepting integers and integer strings.
    pub fn from_values(values: &[Value]) -> Result<Self> {
        let targets = values
            .iter()
            .enumerate()
            .map(|(i, v)| {
                v.as_i64().ok_or_else(|| {
                    Error::InvalidParameter(format!(
                        "goal component {} is not an integer: {}",
                        i, v
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(targets)
    }

    /// The per-dimension targets.
    pub fn targets(&self) -> &[i64] {
        &self.targets
    }

    /// Number of goal dimensions.
    pub fn dimensions(&self) -> usize {
        self.targets.len()
    }

    /// The key under which this goal's Q-table is stored.
    pub fn key(&self) -> GoalKey {
        GoalKey(self.targets.clone())
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, t) in self.targets.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", t)?;
        }
        write!(f, "]")
    }
}

/// Identifies one goal's Q-table inside the store.
///
/// The key keeps the goal's components as a structured vector, so two goals
/// share a key exactly when they are element-wise equal. The textual form is
/// `|`-delimited: `[2, 13]` renders as `2|13` and `[21, 3]` as `21|3`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GoalKey(Vec<i64>);

impl GoalKey {
    /// The components this key was derived from.
    pub fn components(&self) -> &[i64] {
        &self.0
    }
}

impl fmt::Display for GoalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, c) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "|")?;
            }
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

impl From<&Goal> for GoalKey {
    fn from(goal: &Goal) -> Self {
        goal.key()
    }
}
