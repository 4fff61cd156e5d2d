use super::errors::EnvError;
use super::types::EnvStep;

/// A single simulator instance.
pub trait Env {
    type Obs: Clone;
    type Act: Clone;
    type Info: Clone;

    fn reset(&mut self) -> Result<Self::Obs, EnvError>;
    fn step(&mut self, act: Self::Act) -> Result<(Self::Obs, f32, bool, Self::Info), EnvError>;

    fn close(&mut self) -> Result<(), EnvError> {
        Ok(())
    }
}

/// A fixed-size group of environments driven in lockstep.
///
/// `step` is one unit of forward progress: every sub-environment advances
/// exactly one timestep before any result is handed back. Sub-environments
/// whose episode ended are reset before the next `step`.
pub trait BatchedEnv {
    type Obs: Clone;
    type Act: Clone;
    type Info: Clone;

    fn num_envs(&self) -> usize;
    fn reset(&mut self) -> Result<Vec<Self::Obs>, EnvError>;
    fn step(
        &mut self,
        actions: Vec<Self::Act>,
    ) -> Result<Vec<EnvStep<Self::Obs, Self::Info>>, EnvError>;

    fn close(&mut self) -> Result<(), EnvError> {
        Ok(())
    }
}

impl<B: BatchedEnv + ?Sized> BatchedEnv for &mut B {
    type Obs = B::Obs;
    type Act = B::Act;
    type Info = B::Info;

    fn num_envs(&self) -> usize {
        (**self).num_envs()
    }

    fn reset(&mut self) -> Result<Vec<Self::Obs>, EnvError> {
        (**self).reset()
    }

    fn step(
        &mut self,
        actions: Vec<Self::Act>,
    ) -> Result<Vec<EnvStep<Self::Obs, Self::Info>>, EnvError> {
        (**self).step(actions)
    }

    fn close(&mut self) -> Result<(), EnvError> {
        (**self).close()
    }
}
