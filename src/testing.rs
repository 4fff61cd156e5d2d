//! Deterministic environment and model for exercising rollers.
//!
//! Both are pure functions of their seed and inputs, which is what the
//! rollers need to make sequential, batched and truncated collection
//! produce identical rollouts.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::env::{Env, EnvError};
use crate::model::{Model, ModelError, ModelOut, State};

/// Byte-vector observations, random episode lengths, rewards that depend on
/// the action. Everything is drawn from a generator seeded at construction.
pub struct SimpleEnv {
    rng: StdRng,
    obs_len: usize,
    min_len: usize,
    max_len: usize,
    remaining: Option<usize>,
}

impl SimpleEnv {
    pub fn new(seed: u64, obs_len: usize) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            obs_len,
            min_len: 1,
            max_len: 12,
            remaining: None,
        }
    }

    /// Episodes last between `min_len` and `max_len` steps, both inclusive.
    pub fn with_episode_len(mut self, min_len: usize, max_len: usize) -> Self {
        self.min_len = min_len.max(1);
        self.max_len = max_len.max(self.min_len);
        self
    }

    fn observation(&mut self) -> Vec<u8> {
        (0..self.obs_len).map(|_| self.rng.gen_range(0..=u8::MAX)).collect()
    }
}

impl Env for SimpleEnv {
    type Obs = Vec<u8>;
    type Act = Vec<u8>;
    type Info = ();

    fn reset(&mut self) -> Result<Vec<u8>, EnvError> {
        self.remaining = Some(self.rng.gen_range(self.min_len..=self.max_len));
        Ok(self.observation())
    }

    fn step(&mut self, act: Vec<u8>) -> Result<(Vec<u8>, f32, bool, ()), EnvError> {
        let remaining = self.remaining.ok_or(EnvError::NotReset)?;
        let done = remaining <= 1;
        self.remaining = if done { None } else { Some(remaining - 1) };

        let action_sum: u32 = act.iter().map(|&a| u32::from(a)).sum();
        let reward = (action_sum % 5) as f32 + self.rng.gen_range(0..3) as f32;
        Ok((self.observation(), reward, done, ()))
    }
}

/// Model whose outputs hash the observation and the incoming state.
///
/// Stateful variants carry either a single state vector or a two-part tuple
/// state that changes on every step.
#[derive(Debug, Clone)]
pub struct SimpleModel {
    action_len: usize,
    stateful: bool,
    state_tuple: bool,
}

impl SimpleModel {
    pub fn new(action_len: usize, stateful: bool, state_tuple: bool) -> Self {
        Self {
            action_len,
            stateful,
            state_tuple: stateful && state_tuple,
        }
    }

    fn next_state(&self, state: &State, h: f32) -> State {
        match state {
            State::Stateless => State::Stateless,
            State::Single(v) => State::Single(vec![v[0] * 0.5 + h, v[1] + 1.0]),
            State::Tuple(parts) => State::Tuple(vec![
                vec![parts[0][0] * 0.5 + h, parts[0][1] + 1.0],
                vec![parts[1][0] - h * 0.25],
            ]),
        }
    }
}

fn state_sum(state: &State) -> f32 {
    match state {
        State::Stateless => 0.0,
        State::Single(v) => v.iter().sum(),
        State::Tuple(parts) => parts.iter().flatten().sum(),
    }
}

impl Model for SimpleModel {
    type Obs = Vec<u8>;
    type Act = Vec<u8>;

    fn stateful(&self) -> bool {
        self.stateful
    }

    fn start_state(&self) -> State {
        match (self.stateful, self.state_tuple) {
            (false, _) => State::Stateless,
            (true, false) => State::Single(vec![0.0, 0.0]),
            (true, true) => State::Tuple(vec![vec![0.0, 0.0], vec![1.0]]),
        }
    }

    fn step(&self, obs: &[Vec<u8>], states: &[State]) -> Result<Vec<ModelOut<Vec<u8>>>, ModelError> {
        if obs.len() != states.len() {
            return Err(ModelError::BatchMismatch {
                expected: obs.len(),
                got: states.len(),
            });
        }
        Ok(obs
            .iter()
            .zip(states)
            .map(|(o, s)| {
                let h = o.iter().map(|&b| f32::from(b)).sum::<f32>();
                let mix = (h as u64).wrapping_add(state_sum(s).abs() as u64);
                let action = (0..self.action_len as u64)
                    .map(|k| (mix.wrapping_add(k * 31) % 256) as u8)
                    .collect();
                let value = f64::from(h) / 255.0 + f64::from(state_sum(s)) * 0.01;
                ModelOut::new(action, self.next_state(s, h)).with_extra("values", value)
            })
            .collect())
    }
}
