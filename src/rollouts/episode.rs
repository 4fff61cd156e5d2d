use tracing::debug;

use super::errors::RolloutError;
use super::lanes::Lanes;
use super::rollout::Rollout;
use super::traits::Roller;
use crate::env::BatchedEnv;
use crate::model::{Model, start_state_checked};

/// Collects complete episodes from a batched env.
///
/// Every call resets all sub-environments and runs them until at least
/// `min_episodes` episodes and `min_steps` steps have finished. Once the quota
/// is met, a sub-environment that finishes its episode is left idle rather
/// than starting another one, so every episode that was started is returned
/// whole and short episodes are not over-represented.
pub struct EpisodeRoller<B, M> {
    env: B,
    model: M,
    min_episodes: usize,
    min_steps: usize,
}

impl<B, M> EpisodeRoller<B, M>
where
    B: BatchedEnv,
    M: Model<Obs = B::Obs, Act = B::Act>,
{
    pub fn new(env: B, model: M, min_episodes: usize) -> Self {
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
}

impl<B, M> Roller for EpisodeRoller<B, M>
where
    B: BatchedEnv,
    M: Model<Obs = B::Obs, Act = B::Act>,
{
    type Obs = B::Obs;
    type Act = B::Act;
    type Info = B::Info;

    fn rollouts(&mut self) -> Result<Vec<Rollout<B::Obs, B::Act, B::Info>>, RolloutError> {
        let obs = self.env.reset()?;
        let num_envs = obs.len();
        let mut lanes = Lanes::fresh(obs, &start_state_checked(&self.model)?);
        let mut active = vec![true; lanes.len()];
        let mut rollouts = Vec::new();
        let mut steps = 0;

        while active.iter().any(|&a| a) {
            for (index, rollout) in lanes.advance(&mut self.env, &self.model)? {
                if !active[index] {
                    continue;
                }
                steps += rollout.num_steps();
                rollouts.push(rollout);
                if rollouts.len() >= self.min_episodes && steps >= self.min_steps {
                    active[index] = false;
                }
            }
        }

        debug!(
            num_envs,
            episodes = rollouts.len(),
            steps,
            "episode roller collected"
        );
        Ok(rollouts)
    }
}
