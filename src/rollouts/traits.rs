use super::errors::RolloutError;
use super::rollout::Rollout;

/// Something that gathers batches of rollouts from environments.
pub trait Roller {
    type Obs;
    type Act;
    type Info;

    fn rollouts(&mut self) -> Result<Vec<Rollout<Self::Obs, Self::Act, Self::Info>>, RolloutError>;
}
