use super::rollout::Rollout;

/// Mean of the per-rollout total reward, `None` for an empty batch.
pub fn mean_total_reward<O, A, I>(rollouts: &[Rollout<O, A, I>]) -> Option<f32> {
    if rollouts.is_empty() {
        return None;
    }
    let sum: f32 = rollouts.iter().map(Rollout::total_reward).sum();
    Some(sum / rollouts.len() as f32)
}

/// Mean total reward over the rollouts that cover a whole episode, i.e.
/// were neither resumed nor cut.
pub fn mean_finished_reward<O, A, I>(rollouts: &[Rollout<O, A, I>]) -> Option<f32> {
    let rewards: Vec<f32> = rollouts
        .iter()
        .filter(|r| !r.trunc_start() && !r.trunc_end())
        .map(Rollout::total_reward)
        .collect();
    if rewards.is_empty() {
        return None;
    }
    Some(rewards.iter().sum::<f32>() / rewards.len() as f32)
}
