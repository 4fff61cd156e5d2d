use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Recurrent state a model carries between steps for one environment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum State {
    /// The model keeps no state.
    #[default]
    Stateless,
    Single(Vec<f32>),
    /// Several state tensors, e.g. an LSTM's `(h, c)`.
    Tuple(Vec<Vec<f32>>),
}

impl State {
    pub fn is_stateless(&self) -> bool {
        matches!(self, State::Stateless)
    }

    /// Number of floats held across all parts.
    pub fn size(&self) -> usize {
        match self {
            State::Stateless => 0,
            State::Single(v) => v.len(),
            State::Tuple(parts) => parts.iter().map(Vec::len).sum(),
        }
    }
}

/// Everything a model produced for one observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelOut<A> {
    pub action: A,
    /// State after consuming the observation; fed back on the next step.
    pub state: State,
    /// Named auxiliary outputs (value estimates, action parameters, ...).
    #[serde(default)]
    pub extras: BTreeMap<String, serde_json::Value>,
}

impl<A> ModelOut<A> {
    pub fn new(action: A, state: State) -> Self {
        Self {
            action,
            state,
            extras: BTreeMap::new(),
        }
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.extras.insert(key.into(), value.into());
        self
    }

    pub fn extra(&self, key: &str) -> Option<&serde_json::Value> {
        self.extras.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_sizes() {
        assert_eq!(State::Stateless.size(), 0);
        assert_eq!(State::Single(vec![1.0, 2.0]).size(), 2);
        assert_eq!(State::Tuple(vec![vec![1.0], vec![2.0, 3.0]]).size(), 3);
        assert!(State::default().is_stateless());
    }

    #[test]
    fn extras_are_part_of_equality() {
        let a = ModelOut::new(1u8, State::Stateless).with_extra("values", 0.5);
        let b = ModelOut::new(1u8, State::Stateless);
        assert_ne!(a, b);
        assert_eq!(a.extra("values"), Some(&serde_json::json!(0.5)));
    }
}
