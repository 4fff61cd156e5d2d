use super::{BatchedEnv, Env, EnvError, EnvStep};

/// In-process [`BatchedEnv`] over a vector of independent environments.
///
/// Environments are stepped one after another inside a single `step` call,
/// so the batch always advances as one unit.
pub struct VecEnv<E> {
    envs: Vec<E>,
    needs_reset: bool,
}

impl<E: Env> VecEnv<E> {
    pub fn new<F>(make_env: F, num_envs: usize) -> Self
    where
        F: Fn() -> E,
    {
        Self::from_envs((0..num_envs).map(|_| make_env()).collect())
    }

    pub fn from_envs(envs: Vec<E>) -> Self {
        Self {
            envs,
            needs_reset: true,
        }
    }

    pub fn len(&self) -> usize {
        self.envs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.envs.is_empty()
    }

    pub fn envs(&self) -> &[E] {
        &self.envs
    }
}

impl<E: Env> BatchedEnv for VecEnv<E> {
    type Obs = E::Obs;
    type Act = E::Act;
    type Info = E::Info;

    fn num_envs(&self) -> usize {
        self.envs.len()
    }

    fn reset(&mut self) -> Result<Vec<E::Obs>, EnvError> {
        let obs = self
            .envs
            .iter_mut()
            .map(|env| env.reset())
            .collect::<Result<Vec<_>, _>>()?;
        self.needs_reset = false;
        Ok(obs)
    }

    fn step(&mut self, actions: Vec<E::Act>) -> Result<Vec<EnvStep<E::Obs, E::Info>>, EnvError> {
        if self.needs_reset {
            return Err(EnvError::NotReset);
        }
        if actions.len() != self.envs.len() {
            return Err(EnvError::ActionCount {
                expected: self.envs.len(),
                got: actions.len(),
            });
        }

        self.envs
            .iter_mut()
            .zip(actions)
            .map(|(env, action)| {
                let (obs, rew, done, info) = env.step(action)?;
                let mut step = EnvStep::new(obs, rew, done, info);
                if done {
                    step.reset_obs = Some(env.reset()?);
                }
                Ok(step)
            })
            .collect()
    }

    fn close(&mut self) -> Result<(), EnvError> {
        for env in &mut self.envs {
            env.close()?;
        }
        self.needs_reset = true;
        Ok(())
    }
}
