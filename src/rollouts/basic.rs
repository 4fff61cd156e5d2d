use std::slice;

use tracing::{debug, trace};

use super::errors::RolloutError;
use super::rollout::{Rollout, RolloutBuilder};
use super::traits::Roller;
use crate::env::Env;
use crate::model::{Model, ModelOut, State, start_state_checked, step_checked};

/// Collects whole episodes from a single environment.
///
/// Every call resets the environment for each episode and keeps going until
/// both `min_episodes` and `min_steps` are reached. Rollouts are never
/// truncated.
pub struct BasicRoller<E, M> {
    env: E,
    model: M,
    min_episodes: usize,
    min_steps: usize,
}

impl<E, M> BasicRoller<E, M>
where
    E: Env,
    M: Model<Obs = E::Obs, Act = E::Act>,
{
    pub fn new(env: E, model: M, min_episodes: usize) -> Self {
        Self {
            env,
            model,
            min_episodes,
            min_steps: 1,
        }
    }

    pub fn with_min_steps(mut self, min_steps: usize) -> Self {
        self.min_steps = min_steps;
        self
    }

    pub fn env(&self) -> &E {
        &self.env
    }

    fn episode(&mut self) -> Result<Rollout<E::Obs, E::Act, E::Info>, RolloutError> {
        let start_state = start_state_checked(&self.model)?;
        let mut obs = self.env.reset()?;
        let mut state = start_state.clone();
        let mut builder = RolloutBuilder::start(obs.clone(), start_state);

        loop {
            let out = step_one(&self.model, &obs, &state)?;
            let action = out.action.clone();
            state = out.state.clone();
            builder.push_out(out);

            let (next_obs, rew, done, info) = self.env.step(action)?;
            builder.push_step(next_obs.clone(), rew, info);
            obs = next_obs;

            if done {
                builder.push_out(step_one(&self.model, &obs, &state)?);
                return Ok(builder.finish(false));
            }
        }
    }
}

fn step_one<M: Model>(
    model: &M,
    obs: &M::Obs,
    state: &State,
) -> Result<ModelOut<M::Act>, RolloutError> {
    let out = step_checked(model, slice::from_ref(obs), slice::from_ref(state))?
        .into_iter()
        .next();
    out.ok_or(RolloutError::BatchSize {
        expected: 1,
        got: 0,
    })
}

impl<E, M> Roller for BasicRoller<E, M>
where
    E: Env,
    M: Model<Obs = E::Obs, Act = E::Act>,
{
    type Obs = E::Obs;
    type Act = E::Act;
    type Info = E::Info;

    fn rollouts(&mut self) -> Result<Vec<Rollout<E::Obs, E::Act, E::Info>>, RolloutError> {
        let mut rollouts = Vec::new();
        let mut steps = 0;
        while rollouts.len() < self.min_episodes || steps < self.min_steps {
            let rollout = self.episode()?;
            trace!(steps = rollout.num_steps(), "episode finished");
            steps += rollout.num_steps();
            rollouts.push(rollout);
        }
        debug!(episodes = rollouts.len(), steps, "basic roller collected");
        Ok(rollouts)
    }
}
