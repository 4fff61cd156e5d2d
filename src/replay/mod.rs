mod config;
mod errors;
mod prioritized;
mod ring;
mod shared;
mod sum_tree;
mod traits;
mod uniform;

pub use config::{DEFAULT_EPSILON, ReplayConfig};
pub use errors::ReplayError;
pub use prioritized::PrioritizedReplayBuffer;
pub use shared::SharedReplayBuffer;
pub use traits::{ReplayBuffer, Sampled};
pub use uniform::UniformReplayBuffer;
