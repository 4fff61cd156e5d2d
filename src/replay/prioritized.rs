use rand::Rng;
use tracing::debug;

use super::config::ReplayConfig;
use super::errors::{ReplayError, check_weight};
use super::ring::Ring;
use super::sum_tree::SumTree;
use super::traits::{ReplayBuffer, Sampled};

/// Prioritized experience replay.
///
/// A sample with raw weight `w` gets priority `(w + epsilon)^alpha` and is
/// drawn with probability `priority / total`. Each draw carries the weight
/// `(N * P_i)^-beta` divided by the largest such factor over the live
/// samples, where `N` is the number of live samples.
#[derive(Debug, Clone)]
pub struct PrioritizedReplayBuffer<P> {
    ring: Ring<P>,
    tree: SumTree,
    alpha: f64,
    beta: f64,
    epsilon: f64,
    max_weight: f64,
}

impl<P: Clone> PrioritizedReplayBuffer<P> {
    pub fn new(capacity: usize, alpha: f64, beta: f64) -> Result<Self, ReplayError> {
        Self::from_config(&ReplayConfig::new(capacity, alpha, beta))
    }

    pub fn from_config(config: &ReplayConfig) -> Result<Self, ReplayError> {
        config.validate()?;
        debug!(
            capacity = config.capacity,
            alpha = config.alpha,
            beta = config.beta,
            epsilon = config.epsilon,
            "prioritized replay buffer created"
        );
        Ok(Self {
            ring: Ring::new(config.capacity),
            tree: SumTree::new(config.capacity),
            alpha: config.alpha,
            beta: config.beta,
            epsilon: config.epsilon,
            max_weight: config.first_max,
        })
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Changes the importance-sampling exponent, e.g. to anneal it.
    pub fn set_beta(&mut self, beta: f64) -> Result<(), ReplayError> {
        if !(beta.is_finite() && beta >= 0.0) {
            return Err(ReplayError::invalid(format!(
                "beta must be non-negative, got {beta}"
            )));
        }
        self.beta = beta;
        Ok(())
    }

    /// Raw weight last reported for a live id.
    pub fn raw_weight(&self, id: u64) -> Option<f64> {
        self.ring
            .index_of(id)
            .map(|index| self.ring.slot(index).raw_weight)
    }

    /// Sampling probability of a live id.
    pub fn probability(&self, id: u64) -> Option<f64> {
        self.ring
            .index_of(id)
            .map(|index| self.tree.get(index) / self.tree.total())
    }

    /// Priority for a raw weight. It must be strictly positive, and small
    /// enough that a full buffer of such priorities still sums to a finite
    /// total.
    fn priority(&self, weight: f64) -> Result<f64, ReplayError> {
        check_weight(weight)?;
        let priority = (weight + self.epsilon).powf(self.alpha);
        let ceiling = f64::MAX / self.ring.capacity() as f64;
        if priority > 0.0 && priority <= ceiling {
            Ok(priority)
        } else {
            Err(ReplayError::invalid(format!(
                "weight {weight} gives priority {priority} outside (0, {ceiling:e}]"
            )))
        }
    }
}

impl<P: Clone> ReplayBuffer for PrioritizedReplayBuffer<P> {
    type Payload = P;

    fn len(&self) -> usize {
        self.ring.len()
    }

    fn capacity(&self) -> usize {
        self.ring.capacity()
    }

    fn add_sample(&mut self, payload: P, init_weight: Option<f64>) -> Result<u64, ReplayError> {
        let weight = init_weight.unwrap_or(self.max_weight);
        let priority = self.priority(weight)?;
        let (id, index) = self.ring.push(payload, weight);
        self.tree.set(index, priority);
        self.max_weight = self.max_weight.max(weight);
        Ok(id)
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R, n: usize) -> Result<Vec<Sampled<P>>, ReplayError> {
        if n == 0 {
            return Err(ReplayError::invalid("sample count must be positive"));
        }
        if self.ring.len() == 0 {
            return Err(ReplayError::invalid("cannot sample from an empty buffer"));
        }

        // (N * P_i)^-beta / (N * P_min)^-beta reduces to (p_i / p_min)^-beta,
        // which stays in (0, 1] without forming the raw factors.
        let total = self.tree.total();
        let min = self.tree.min();
        let last = self.ring.len() - 1;

        Ok((0..n)
            .map(|_| {
                let index = self.tree.find(rng.gen_range(0.0..total)).min(last);
                let slot = self.ring.slot(index);
                Sampled {
                    payload: slot.payload.clone(),
                    weight: (self.tree.get(index) / min).powf(-self.beta),
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
        let priorities = weights
            .iter()
            .map(|&weight| self.priority(weight))
            .collect::<Result<Vec<_>, _>>()?;

        let mut stale = 0;
        for ((&id, &weight), priority) in ids.iter().zip(weights).zip(priorities) {
            let Some(index) = self.ring.index_of(id) else {
                stale += 1;
                continue;
            };
            self.ring.slot_mut(index).raw_weight = weight;
            self.tree.set(index, priority);
            self.max_weight = self.max_weight.max(weight);
        }
        if stale > 0 {
            debug!(stale, "skipped weight updates for overwritten samples");
        }
        Ok(())
    }
}
