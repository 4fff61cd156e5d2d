use serde::{Deserialize, Serialize};

use super::errors::RolloutError;
use crate::model::{ModelOut, State};

/// A contiguous run of environment steps, possibly cut short by a step
/// budget on either end.
///
/// `observations` and `model_outs` hold `num_steps + 1` entries: the last one
/// belongs to the observation that closes the segment (the terminal one
/// unless `trunc_end`). `rewards` and `infos` hold one entry per step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rollout<O, A, I = ()> {
    observations: Vec<O>,
    model_outs: Vec<ModelOut<A>>,
    rewards: Vec<f32>,
    infos: Vec<I>,
    start_state: State,
    trunc_start: bool,
    trunc_end: bool,
}

/// One `(obs, action, reward, new_obs)` step pulled out of a rollout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition<O, A> {
    pub obs: O,
    pub action: A,
    pub reward: f32,
    pub new_obs: O,
    /// `new_obs` ends the episode.
    pub terminal: bool,
}

impl<O, A, I> Rollout<O, A, I> {
    pub fn new(
        observations: Vec<O>,
        model_outs: Vec<ModelOut<A>>,
        rewards: Vec<f32>,
        infos: Vec<I>,
        start_state: State,
        trunc_start: bool,
        trunc_end: bool,
    ) -> Result<Self, RolloutError> {
        if observations.len() != rewards.len() + 1 {
            return Err(RolloutError::InvalidRollout(format!(
                "{} observations for {} rewards",
                observations.len(),
                rewards.len()
            )));
        }
        if model_outs.len() != observations.len() {
            return Err(RolloutError::InvalidRollout(format!(
                "{} model outputs for {} observations",
                model_outs.len(),
                observations.len()
            )));
        }
        if infos.len() != rewards.len() {
            return Err(RolloutError::InvalidRollout(format!(
                "{} infos for {} rewards",
                infos.len(),
                rewards.len()
            )));
        }
        Ok(Self {
            observations,
            model_outs,
            rewards,
            infos,
            start_state,
            trunc_start,
            trunc_end,
        })
    }

    pub fn num_steps(&self) -> usize {
        self.rewards.len()
    }

    pub fn total_reward(&self) -> f32 {
        self.rewards.iter().sum()
    }

    pub fn observations(&self) -> &[O] {
        &self.observations
    }

    pub fn model_outs(&self) -> &[ModelOut<A>] {
        &self.model_outs
    }

    pub fn rewards(&self) -> &[f32] {
        &self.rewards
    }

    pub fn infos(&self) -> &[I] {
        &self.infos
    }

    pub fn start_state(&self) -> &State {
        &self.start_state
    }

    pub fn trunc_start(&self) -> bool {
        self.trunc_start
    }

    pub fn trunc_end(&self) -> bool {
        self.trunc_end
    }

    /// Observations at which an action was taken.
    pub fn step_observations(&self) -> &[O] {
        &self.observations[..self.num_steps()]
    }

    /// Model outputs whose action was taken.
    pub fn step_model_outs(&self) -> &[ModelOut<A>] {
        &self.model_outs[..self.num_steps()]
    }
}

impl<O: Clone, A: Clone, I: Clone> Rollout<O, A, I> {
    /// Cuts the rollout before step `t`, as if a step budget ran out there.
    ///
    /// The right half starts at observation `t` with the state the model
    /// produced on step `t - 1`.
    pub fn split_at(&self, t: usize) -> Result<(Self, Self), RolloutError> {
        if t == 0 || t >= self.num_steps() {
            return Err(RolloutError::InvalidRollout(format!(
                "cannot split a {}-step rollout at {t}",
                self.num_steps()
            )));
        }
        let left = Self {
            observations: self.observations[..=t].to_vec(),
            model_outs: self.model_outs[..=t].to_vec(),
            rewards: self.rewards[..t].to_vec(),
            infos: self.infos[..t].to_vec(),
            start_state: self.start_state.clone(),
            trunc_start: self.trunc_start,
            trunc_end: true,
        };
        let right = Self {
            observations: self.observations[t..].to_vec(),
            model_outs: self.model_outs[t..].to_vec(),
            rewards: self.rewards[t..].to_vec(),
            infos: self.infos[t..].to_vec(),
            start_state: self.model_outs[t - 1].state.clone(),
            trunc_start: true,
            trunc_end: self.trunc_end,
        };
        Ok((left, right))
    }

    /// One-step transitions, in order.
    pub fn transitions(&self) -> Vec<Transition<O, A>> {
        let steps = self.num_steps();
        (0..steps)
            .map(|t| Transition {
                obs: self.observations[t].clone(),
                action: self.model_outs[t].action.clone(),
                reward: self.rewards[t],
                new_obs: self.observations[t + 1].clone(),
                terminal: t + 1 == steps && !self.trunc_end,
            })
            .collect()
    }
}

impl<O: Clone + PartialEq, A: Clone + PartialEq, I: Clone> Rollout<O, A, I> {
    /// Re-joins a truncated segment with the segment that resumed it.
    pub fn join(&self, next: &Self) -> Result<Self, RolloutError> {
        if !self.trunc_end || !next.trunc_start {
            return Err(RolloutError::InvalidRollout(
                "only a truncated rollout can be joined with its continuation".to_string(),
            ));
        }
        if self.observations.last() != next.observations.first()
            || self.model_outs.last() != next.model_outs.first()
        {
            return Err(RolloutError::InvalidRollout(
                "continuation does not start where the rollout was cut".to_string(),
            ));
        }

        let mut joined = self.clone();
        joined.observations.extend_from_slice(&next.observations[1..]);
        joined.model_outs.extend_from_slice(&next.model_outs[1..]);
        joined.rewards.extend_from_slice(&next.rewards);
        joined.infos.extend_from_slice(&next.infos);
        joined.trunc_end = next.trunc_end;
        Ok(joined)
    }
}

/// Incremental writer used by the rollers.
///
/// Always holds at least one observation. The newest observation may not
/// have a model output yet; see [`RolloutBuilder::needs_out`].
#[derive(Debug, Clone)]
pub(crate) struct RolloutBuilder<O, A, I> {
    observations: Vec<O>,
    model_outs: Vec<ModelOut<A>>,
    rewards: Vec<f32>,
    infos: Vec<I>,
    start_state: State,
    trunc_start: bool,
}

impl<O: Clone, A: Clone, I> RolloutBuilder<O, A, I> {
    pub(crate) fn start(obs: O, start_state: State) -> Self {
        Self {
            observations: vec![obs],
            model_outs: Vec::new(),
            rewards: Vec::new(),
            infos: Vec::new(),
            start_state,
            trunc_start: false,
        }
    }

    pub(crate) fn num_steps(&self) -> usize {
        self.rewards.len()
    }

    pub(crate) fn needs_out(&self) -> bool {
        self.model_outs.len() < self.observations.len()
    }

    pub(crate) fn current_obs(&self) -> &O {
        &self.observations[self.observations.len() - 1]
    }

    pub(crate) fn last_out(&self) -> Option<&ModelOut<A>> {
        self.model_outs.last()
    }

    pub(crate) fn push_out(&mut self, out: ModelOut<A>) {
        debug_assert!(self.needs_out());
        self.model_outs.push(out);
    }

    pub(crate) fn push_step(&mut self, obs: O, rew: f32, info: I) {
        debug_assert!(!self.needs_out());
        self.observations.push(obs);
        self.rewards.push(rew);
        self.infos.push(info);
    }

    pub(crate) fn finish(self, trunc_end: bool) -> Rollout<O, A, I> {
        debug_assert!(!self.needs_out());
        Rollout {
            observations: self.observations,
            model_outs: self.model_outs,
            rewards: self.rewards,
            infos: self.infos,
            start_state: self.start_state,
            trunc_start: self.trunc_start,
            trunc_end,
        }
    }

    /// Ends the segment here with `trunc_end` set and leaves a continuation
    /// in its place that starts from the cut observation.
    ///
    /// `state` is the state that was fed to the model with that observation.
    pub(crate) fn cut(&mut self, state: State) -> Rollout<O, A, I> {
        let continuation = Self {
            observations: self.observations.last().cloned().into_iter().collect(),
            model_outs: self.model_outs.last().cloned().into_iter().collect(),
            rewards: Vec::new(),
            infos: Vec::new(),
            start_state: state,
            trunc_start: true,
        };
        std::mem::replace(self, continuation).finish(true)
    }
}
