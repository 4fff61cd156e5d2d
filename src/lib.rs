//! Experience collection and prioritized replay for reinforcement learning.
//!
//! [`rollouts`] drives environments under a model and produces
//! [`Rollout`](rollouts::Rollout) segments, resuming truncated episodes
//! across calls. [`replay`] stores transitions and hands out prioritized,
//! importance-weighted minibatches.

pub mod env;
pub mod model;
pub mod replay;
pub mod rollouts;
pub mod testing;

pub use env::{BatchedEnv, Env, EnvError, EnvStep, VecEnv};
pub use model::{Model, ModelError, ModelOut, State};
pub use replay::{
    PrioritizedReplayBuffer, ReplayBuffer, ReplayConfig, ReplayError, Sampled, SharedReplayBuffer,
    UniformReplayBuffer,
};
pub use rollouts::{
    BasicRoller, EpisodeRoller, Roller, Rollout, RolloutError, StepBudget, Transition,
    TruncatedRoller,
};
