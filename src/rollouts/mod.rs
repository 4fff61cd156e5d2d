mod basic;
mod episode;
mod errors;
mod lanes;
mod rollout;
mod stats;
mod traits;
mod truncated;

pub use basic::BasicRoller;
pub use episode::EpisodeRoller;
pub use errors::RolloutError;
pub use rollout::{Rollout, Transition};
pub use stats::{mean_finished_reward, mean_total_reward};
pub use traits::Roller;
pub use truncated::{StepBudget, TruncatedRoller};
