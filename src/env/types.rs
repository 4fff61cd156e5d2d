use serde::{Deserialize, Serialize};

/// Result of stepping one sub-environment of a [`BatchedEnv`](super::BatchedEnv).
///
/// `obs` is always the observation the step produced, so for a finished
/// episode it is the terminal observation. The adapter resets finished
/// sub-environments straight away and hands back the first observation of
/// the next episode in `reset_obs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvStep<O, I> {
    pub obs: O,
    pub rew: f32,
    pub done: bool,
    pub info: I,
    pub reset_obs: Option<O>,
}

impl<O, I> EnvStep<O, I> {
    pub fn new(obs: O, rew: f32, done: bool, info: I) -> Self {
        Self {
            obs,
            rew,
            done,
            info,
            reset_obs: None,
        }
    }
}
