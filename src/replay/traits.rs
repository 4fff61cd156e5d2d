use rand::Rng;
use serde::{Deserialize, Serialize};

use super::errors::ReplayError;

/// A copy of a stored payload handed out by [`ReplayBuffer::sample`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sampled<P> {
    pub payload: P,
    /// Importance-sampling weight, at most 1.
    pub weight: f64,
    /// Echo this back to [`ReplayBuffer::update_weights`].
    pub id: u64,
}

/// Fixed-capacity experience store with weighted sampling.
///
/// Sampling draws from a caller-owned random source so runs are reproducible.
/// None of the methods lock; wrap the buffer in a
/// [`SharedReplayBuffer`](super::SharedReplayBuffer) to share it across threads.
pub trait ReplayBuffer {
    type Payload: Clone;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn capacity(&self) -> usize;

    /// Stores `payload`, overwriting the oldest sample when full, and returns
    /// its id. `None` picks the buffer's default initial weight.
    fn add_sample(
        &mut self,
        payload: Self::Payload,
        init_weight: Option<f64>,
    ) -> Result<u64, ReplayError>;

    /// Draws `n` samples with replacement.
    fn sample<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        n: usize,
    ) -> Result<Vec<Sampled<Self::Payload>>, ReplayError>;

    /// Reports new raw weights for previously sampled ids. Ids that were
    /// overwritten since they were drawn are skipped.
    fn update_weights_by_id(&mut self, ids: &[u64], weights: &[f64]) -> Result<(), ReplayError>;

    fn update_weights(
        &mut self,
        samples: &[Sampled<Self::Payload>],
        weights: &[f64],
    ) -> Result<(), ReplayError> {
        let ids: Vec<u64> = samples.iter().map(|s| s.id).collect();
        self.update_weights_by_id(&ids, weights)
    }
}
