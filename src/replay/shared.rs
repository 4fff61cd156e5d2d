use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};
use rand::Rng;

use super::errors::ReplayError;
use super::traits::{ReplayBuffer, Sampled};

/// Thread-safe handle to a replay buffer.
///
/// Each operation takes the lock once for its whole duration. Use
/// [`SharedReplayBuffer::lock`] to run several operations in one critical
/// section.
pub struct SharedReplayBuffer<B> {
    inner: Arc<Mutex<B>>,
}

impl<B> Clone for SharedReplayBuffer<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<B: ReplayBuffer> SharedReplayBuffer<B> {
    pub fn new(buffer: B) -> Self {
        Self {
            inner: Arc::new(Mutex::new(buffer)),
        }
    }

    pub fn lock(&self) -> MutexGuard<'_, B> {
        self.inner.lock()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    pub fn add_sample(&self, payload: B::Payload, init_weight: Option<f64>) -> Result<u64, ReplayError> {
        self.inner.lock().add_sample(payload, init_weight)
    }

    pub fn sample<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        n: usize,
    ) -> Result<Vec<Sampled<B::Payload>>, ReplayError> {
        self.inner.lock().sample(rng, n)
    }

    pub fn update_weights(
        &self,
        samples: &[Sampled<B::Payload>],
        weights: &[f64],
    ) -> Result<(), ReplayError> {
        self.inner.lock().update_weights(samples, weights)
    }

    pub fn update_weights_by_id(&self, ids: &[u64], weights: &[f64]) -> Result<(), ReplayError> {
        self.inner.lock().update_weights_by_id(ids, weights)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::replay::PrioritizedReplayBuffer;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::thread;

    #[test]
    fn producers_and_consumer_share_one_buffer() {
        let shared = SharedReplayBuffer::new(PrioritizedReplayBuffer::new(64, 0.6, 0.4).unwrap());

        let producers: Vec<_> = (0..4u64)
            .map(|t| {
                let shared = shared.clone();
                thread::spawn(move || {
                    for i in 0..50u64 {
                        shared.add_sample(t * 100 + i, Some(i as f64)).unwrap();
                    }
                })
            })
            .collect();
        for handle in producers {
            handle.join().unwrap();
        }
        assert_eq!(shared.len(), 64);

        let mut rng = StdRng::seed_from_u64(11);
        let drawn = shared.sample(&mut rng, 16).unwrap();
        assert!(drawn.iter().all(|s| s.weight > 0.0 && s.weight <= 1.0));
        let weights = vec![0.5; drawn.len()];
        shared.update_weights(&drawn, &weights).unwrap();

        let guard = shared.lock();
        for sample in &drawn {
            assert_eq!(guard.raw_weight(sample.id), Some(0.5));
        }
    }
}
