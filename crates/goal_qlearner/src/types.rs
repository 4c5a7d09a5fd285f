//! Core data types shared by the learner, the store and the environment port.

use serde::{Deserialize, Serialize};

/// Index of a discretized environment state, in `[0, state_count)`.
pub type StateIndex = usize;

/// Index of an environment action, in `[0, action_count)`.
pub type ActionIndex = usize;

/// The full semantic description of one environment state.
///
/// For the lighting lab this is e.g. `[z1_level, z2_level, z1_light, z2_light, ...]`.
/// Only the goal-dimensioned prefix takes part in reward computation.
pub type StateDescription = Vec<Value>;

/// A high-precision timestamp in microseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Timestamp(pub u64);

impl Timestamp {
    /// Returns the current timestamp.
    pub fn now() -> Self {
        let now = chrono::Utc::now();
        let micros = (now.timestamp() as u64) * 1_000_000 + (now.timestamp_subsec_micros() as u64);
        Self(micros)
    }

    /// Microseconds elapsed between `earlier` and `self`, saturating at zero.
    pub fn micros_since(&self, earlier: Timestamp) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

/// A typed value appearing in state descriptions and action payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// A boolean value, e.g. whether a light is switched on.
    Bool(bool),
    /// A 64-bit signed integer value, e.g. an illuminance rank.
    Int(i64),
    /// A 64-bit floating-point value.
    Float(f64),
    /// A string value.
    String(String),
}

impl Value {
    /// Returns the value as an integer if it is one.
    ///
    /// Strings holding a base-10 integer are accepted as well, since state
    /// descriptions frequently arrive from loosely typed sources.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Attempts to convert the `Value` to a `bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Attempts to convert the `Value` to an `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(v) => write!(f, "{}", v),
            Value::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_now() {
        let ts = Timestamp::now();
        assert!(ts.0 > 0);
    }

    #[test]
    fn test_timestamp_micros_since_saturates() {
        let earlier = Timestamp(100);
        let later = Timestamp(250);
        assert_eq!(later.micros_since(earlier), 150);
        assert_eq!(earlier.micros_since(later), 0);
    }

    #[test]
    fn test_value_as_i64() {
        assert_eq!(Value::Int(3).as_i64(), Some(3));
        assert_eq!(Value::from(" 12 ").as_i64(), Some(12));
        assert_eq!(Value::Float(2.0).as_i64(), None);
        assert_eq!(Value::Bool(true).as_i64(), None);
        assert_eq!(Value::from("two").as_i64(), None);
    }

    #[test]
    fn test_value_conversions() {
        assert_eq!(Value::from(true).as_bool(), Some(true));
        assert_eq!(Value::from(7i64).as_f64(), Some(7.0));
        assert_eq!(Value::from(1.5).as_f64(), Some(1.5));
        assert_eq!(Value::from("x").as_bool(), None);
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Int(4).to_string(), "4");
        assert_eq!(Value::Bool(false).to_string(), "false");
        assert_eq!(Value::from("Z1Light").to_string(), "Z1Light");
    }
}
