use serde::{Deserialize, Serialize};
use tracing::debug;

use super::errors::RolloutError;
use super::lanes::Lanes;
use super::rollout::Rollout;
use super::traits::Roller;
use crate::env::BatchedEnv;
use crate::model::{Model, start_state_checked};

/// How many steps a [`TruncatedRoller`] takes per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepBudget {
    /// Every sub-environment advances this many steps.
    PerEnv(usize),
    /// Steps summed over all sub-environments, rounded up to a whole number
    /// of lockstep iterations.
    Total(usize),
}

impl StepBudget {
    /// Lockstep iterations needed to spend the budget over `num_envs`.
    pub fn iterations(&self, num_envs: usize) -> usize {
        match *self {
            StepBudget::PerEnv(steps) => steps,
            StepBudget::Total(_) if num_envs == 0 => 0,
            StepBudget::Total(steps) => steps.div_ceil(num_envs),
        }
    }
}

/// Collects a fixed number of timesteps per call from a batched env,
/// cutting episodes at the end of the call and resuming them on the next.
///
/// A resumed segment continues the environment where it left off and starts
/// from the exact recurrent state the model held at the cut, with
/// `trunc_start` set. Episodes that end inside a call produce their own
/// segments, so one call may return several rollouts per sub-environment.
pub struct TruncatedRoller<B: BatchedEnv, M> {
    env: B,
    model: M,
    budget: StepBudget,
    lanes: Option<Lanes<B::Obs, B::Act, B::Info>>,
}

impl<B, M> TruncatedRoller<B, M>
where
    B: BatchedEnv,
    M: Model<Obs = B::Obs, Act = B::Act>,
{
    pub fn new(env: B, model: M, budget: StepBudget) -> Self {
        Self {
            env,
            model,
            budget,
            lanes: None,
        }
    }

    pub fn budget(&self) -> StepBudget {
        self.budget
    }

    /// Drops all carried progress; the next call resets every sub-environment.
    pub fn reset(&mut self) {
        self.lanes = None;
    }

    pub fn into_inner(self) -> (B, M) {
        (self.env, self.model)
    }
}

impl<B, M> Roller for TruncatedRoller<B, M>
where
    B: BatchedEnv,
    M: Model<Obs = B::Obs, Act = B::Act>,
{
    type Obs = B::Obs;
    type Act = B::Act;
    type Info = B::Info;

    fn rollouts(&mut self) -> Result<Vec<Rollout<B::Obs, B::Act, B::Info>>, RolloutError> {
        let Self {
            env,
            model,
            budget,
            lanes,
        } = self;

        let num_envs = env.num_envs();
        if num_envs == 0 {
            return Ok(Vec::new());
        }
        if lanes.is_none() {
            let obs = env.reset()?;
            if obs.len() != num_envs {
                return Err(RolloutError::BatchSize {
                    expected: num_envs,
                    got: obs.len(),
                });
            }
            *lanes = Some(Lanes::fresh(obs, &start_state_checked(&*model)?));
        }
        let Some(lanes) = lanes.as_mut() else {
            return Ok(Vec::new());
        };

        let iterations = budget.iterations(num_envs);
        let mut rollouts = Vec::new();
        for _ in 0..iterations {
            rollouts.extend(
                lanes
                    .advance(env, &*model)?
                    .into_iter()
                    .map(|(_, rollout)| rollout),
            );
        }
        let finished = rollouts.len();
        rollouts.extend(lanes.truncate(&*model)?);

        debug!(
            num_envs,
            iterations,
            finished,
            truncated = rollouts.len() - finished,
            "truncated roller collected"
        );
        Ok(rollouts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_iterations() {
        assert_eq!(StepBudget::PerEnv(17).iterations(15), 17);
        assert_eq!(StepBudget::Total(17).iterations(15), 2);
        assert_eq!(StepBudget::Total(30).iterations(15), 2);
        assert_eq!(StepBudget::Total(9).iterations(1), 9);
        assert_eq!(StepBudget::Total(9).iterations(0), 0);
    }

    #[test]
    fn budget_deserializes() {
        let budget: StepBudget = serde_json::from_str(r#"{"PerEnv": 64}"#).unwrap();
        assert_eq!(budget, StepBudget::PerEnv(64));
    }
}
