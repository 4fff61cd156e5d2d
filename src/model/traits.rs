use super::errors::ModelError;
use super::types::{ModelOut, State};

/// A batched decision-making model.
///
/// `step` receives one observation and one previous state per environment
/// and must return exactly one [`ModelOut`] per environment, in order. Each
/// output may only depend on its own observation and state; the rollers rely
/// on this to make batched and sequential collection agree.
pub trait Model {
    type Obs;
    type Act: Clone;

    fn stateful(&self) -> bool;

    /// State to feed alongside the first observation of an episode.
    fn start_state(&self) -> State;

    fn step(&self, obs: &[Self::Obs], states: &[State])
    -> Result<Vec<ModelOut<Self::Act>>, ModelError>;
}

impl<M: Model + ?Sized> Model for &M {
    type Obs = M::Obs;
    type Act = M::Act;

    fn stateful(&self) -> bool {
        (**self).stateful()
    }

    fn start_state(&self) -> State {
        (**self).start_state()
    }

    fn step(
        &self,
        obs: &[Self::Obs],
        states: &[State],
    ) -> Result<Vec<ModelOut<Self::Act>>, ModelError> {
        (**self).step(obs, states)
    }
}

/// Start state of `model`, which must be `Stateless` exactly when the model
/// is not stateful.
pub(crate) fn start_state_checked<M: Model + ?Sized>(model: &M) -> Result<State, ModelError> {
    let stateful = model.stateful();
    let state = model.start_state();
    if state.is_stateless() == stateful {
        return Err(ModelError::StartState { stateful });
    }
    Ok(state)
}

/// Runs `model` and checks that it answered for every environment.
pub(crate) fn step_checked<M: Model + ?Sized>(
    model: &M,
    obs: &[M::Obs],
    states: &[State],
) -> Result<Vec<ModelOut<M::Act>>, ModelError> {
    let outs = model.step(obs, states)?;
    if outs.len() != obs.len() {
        return Err(ModelError::BatchMismatch {
            expected: obs.len(),
            got: outs.len(),
        });
    }
    Ok(outs)
}
