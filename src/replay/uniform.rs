use rand::Rng;

use super::errors::{ReplayError, check_weight};
use super::ring::Ring;
use super::traits::{ReplayBuffer, Sampled};

/// Replay buffer that samples every live slot with equal probability.
///
/// Weights are still validated and recorded so callers can switch between
/// buffers without changing their update loop, but they never affect
/// sampling and every draw has weight 1.
#[derive(Debug, Clone)]
pub struct UniformReplayBuffer<P> {
    ring: Ring<P>,
}

impl<P: Clone> UniformReplayBuffer<P> {
    pub fn new(capacity: usize) -> Result<Self, ReplayError> {
        if capacity == 0 {
            return Err(ReplayError::invalid("capacity must be positive"));
        }
        Ok(Self {
            ring: Ring::new(capacity),
        })
    }

    pub fn raw_weight(&self, id: u64) -> Option<f64> {
        self.ring
            .index_of(id)
            .map(|index| self.ring.slot(index).raw_weight)
    }
}

impl<P: Clone> ReplayBuffer for UniformReplayBuffer<P> {
    type Payload = P;

    fn len(&self) -> usize {
        self.ring.len()
    }

    fn capacity(&self) -> usize {
        self.ring.capacity()
    }

    fn add_sample(&mut self, payload: P, init_weight: Option<f64>) -> Result<u64, ReplayError> {
        let weight = init_weight.unwrap_or(1.0);
        check_weight(weight)?;
        Ok(self.ring.push(payload, weight).0)
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R, n: usize) -> Result<Vec<Sampled<P>>, ReplayError> {
        if n == 0 {
            return Err(ReplayError::invalid("sample count must be positive"));
        }
        if self.ring.len() == 0 {
            return Err(ReplayError::invalid("cannot sample from an empty buffer"));
        }
        Ok((0..n)
            .map(|_| {
                let slot = self.ring.slot(rng.gen_range(0..self.ring.len()));
                Sampled {
                    payload: slot.payload.clone(),
                    weight: 1.0,
                    id: slot.id,
                }
            })
            .collect())
    }

    fn update_weights_by_id(&mut self, ids: &[u64], weights: &[f64]) -> Result<(), ReplayError> {
        if ids.len() != weights.len() {
            return Err(ReplayError::invalid(format!(
                "{} samples but {} weights",
                ids.len(),
                weights.len()
            )));
        }
        for &weight in weights {
            check_weight(weight)?;
        }
        for (&id, &weight) in ids.iter().zip(weights) {
            if let Some(index) = self.ring.index_of(id) {
                self.ring.slot_mut(index).raw_weight = weight;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashMap;

    #[test]
    fn samples_evenly_with_unit_weight() {
        let mut buf = UniformReplayBuffer::new(4).unwrap();
        for i in 0..6u32 {
            buf.add_sample(i, None).unwrap();
        }
        assert_eq!(buf.len(), 4);

        let mut rng = StdRng::seed_from_u64(7);
        let mut counts: HashMap<u32, usize> = HashMap::new();
        for sample in buf.sample(&mut rng, 40_000).unwrap() {
            assert_eq!(sample.weight, 1.0);
            *counts.entry(sample.payload).or_default() += 1;
        }
        assert_eq!(counts.len(), 4);
        assert!(!counts.contains_key(&0) && !counts.contains_key(&1));
        for count in counts.values() {
            let frac = *count as f64 / 40_000.0;
            assert!((0.23..0.27).contains(&frac), "frac {frac}");
        }
    }

    #[test]
    fn updates_record_weight() {
        let mut buf = UniformReplayBuffer::new(2).unwrap();
        let id = buf.add_sample("x", None).unwrap();
        buf.update_weights_by_id(&[id, 99], &[3.0, 1.0]).unwrap();
        assert_eq!(buf.raw_weight(id), Some(3.0));
        assert!(buf.update_weights_by_id(&[id], &[]).is_err());
        assert!(UniformReplayBuffer::<u8>::new(0).is_err());
    }
}
