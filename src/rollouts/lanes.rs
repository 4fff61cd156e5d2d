use tracing::trace;

use super::errors::RolloutError;
use super::rollout::{Rollout, RolloutBuilder};
use crate::env::BatchedEnv;
use crate::model::{Model, State, start_state_checked, step_checked};

/// One sub-environment's in-progress segment plus the recurrent state the
/// model should see with its current observation.
struct Lane<O, A, I> {
    builder: RolloutBuilder<O, A, I>,
    state: State,
}

/// Lockstep bookkeeping for a batch of sub-environments.
pub(crate) struct Lanes<O, A, I> {
    lanes: Vec<Lane<O, A, I>>,
}

impl<O: Clone, A: Clone, I: Clone> Lanes<O, A, I> {
    pub(crate) fn fresh(obs: Vec<O>, start_state: &State) -> Self {
        let lanes = obs
            .into_iter()
            .map(|o| Lane {
                builder: RolloutBuilder::start(o, start_state.clone()),
                state: start_state.clone(),
            })
            .collect();
        Self { lanes }
    }

    pub(crate) fn len(&self) -> usize {
        self.lanes.len()
    }

    /// Runs the model, as one batch, on every lane in `indices` whose current
    /// observation has no output yet.
    fn evaluate<M>(&mut self, model: &M, indices: &[usize]) -> Result<(), RolloutError>
    where
        M: Model<Obs = O, Act = A>,
    {
        let pending: Vec<usize> = indices
            .iter()
            .copied()
            .filter(|&i| self.lanes[i].builder.needs_out())
            .collect();
        if pending.is_empty() {
            return Ok(());
        }

        let obs: Vec<O> = pending
            .iter()
            .map(|&i| self.lanes[i].builder.current_obs().clone())
            .collect();
        let states: Vec<State> = pending
            .iter()
            .map(|&i| self.lanes[i].state.clone())
            .collect();
        let outs = step_checked(model, &obs, &states)?;
        for (i, out) in pending.into_iter().zip(outs) {
            self.lanes[i].builder.push_out(out);
        }
        Ok(())
    }

    fn evaluate_all<M>(&mut self, model: &M) -> Result<(), RolloutError>
    where
        M: Model<Obs = O, Act = A>,
    {
        let all: Vec<usize> = (0..self.lanes.len()).collect();
        self.evaluate(model, &all)
    }

    /// Advances every lane by one step.
    ///
    /// Returns the episodes that ended on this step, tagged with their lane.
    /// Those lanes restart from the reset observation with a fresh state.
    pub(crate) fn advance<B, M>(
        &mut self,
        env: &mut B,
        model: &M,
    ) -> Result<Vec<(usize, Rollout<O, A, I>)>, RolloutError>
    where
        B: BatchedEnv<Obs = O, Act = A, Info = I>,
        M: Model<Obs = O, Act = A>,
    {
        self.evaluate_all(model)?;
        let actions: Vec<A> = self
            .lanes
            .iter()
            .filter_map(|lane| lane.builder.last_out().map(|out| out.action.clone()))
            .collect();

        let steps = env.step(actions)?;
        if steps.len() != self.lanes.len() {
            return Err(RolloutError::BatchSize {
                expected: self.lanes.len(),
                got: steps.len(),
            });
        }

        let mut terminal = Vec::new();
        for (index, (lane, step)) in self.lanes.iter_mut().zip(steps).enumerate() {
            let next_state = lane
                .builder
                .last_out()
                .map(|out| out.state.clone())
                .unwrap_or_default();
            lane.builder.push_step(step.obs, step.rew, step.info);
            lane.state = next_state;
            if step.done {
                let reset_obs = step
                    .reset_obs
                    .ok_or(RolloutError::MissingResetObservation { index })?;
                terminal.push((index, reset_obs));
            }
        }
        if terminal.is_empty() {
            return Ok(Vec::new());
        }

        let indices: Vec<usize> = terminal.iter().map(|(i, _)| *i).collect();
        self.evaluate(model, &indices)?;

        let start_state = start_state_checked(model)?;
        let mut finished = Vec::with_capacity(terminal.len());
        for (index, reset_obs) in terminal {
            let lane = &mut self.lanes[index];
            let fresh = RolloutBuilder::start(reset_obs, start_state.clone());
            let rollout = std::mem::replace(&mut lane.builder, fresh).finish(false);
            lane.state = start_state.clone();
            trace!(
                lane = index,
                steps = rollout.num_steps(),
                "episode finished"
            );
            finished.push((index, rollout));
        }
        Ok(finished)
    }

    /// Cuts every lane that took at least one step, leaving continuations
    /// that resume from the cut observation on the next call.
    pub(crate) fn truncate<M>(&mut self, model: &M) -> Result<Vec<Rollout<O, A, I>>, RolloutError>
    where
        M: Model<Obs = O, Act = A>,
    {
        self.evaluate_all(model)?;
        Ok(self
            .lanes
            .iter_mut()
            .filter(|lane| lane.builder.num_steps() > 0)
            .map(|lane| lane.builder.cut(lane.state.clone()))
            .collect())
    }
}
