use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rollstore::replay::DEFAULT_EPSILON;
use rollstore::testing::{SimpleEnv, SimpleModel};
use rollstore::{
    BasicRoller, PrioritizedReplayBuffer, ReplayBuffer, ReplayConfig, ReplayError, Roller,
    Transition,
};

#[derive(Debug, Clone, PartialEq)]
struct Payload {
    idx: usize,
}

fn payload(idx: usize) -> Payload {
    Payload { idx }
}

fn buffer(capacity: usize, alpha: f64, beta: f64, epsilon: f64) -> PrioritizedReplayBuffer<Payload> {
    PrioritizedReplayBuffer::from_config(
        &ReplayConfig::new(capacity, alpha, beta).with_epsilon(epsilon),
    )
    .unwrap()
}

/// `((N * P_i)^-beta) / max_j((N * P_j)^-beta)` for the given raw weights.
fn closed_form_weights(raw: &[f64], alpha: f64, beta: f64, epsilon: f64) -> Vec<f64> {
    let priorities: Vec<f64> = raw.iter().map(|w| (w + epsilon).powf(alpha)).collect();
    let total: f64 = priorities.iter().sum();
    let n = raw.len() as f64;
    let factors: Vec<f64> = priorities
        .iter()
        .map(|p| (n * p / total).powf(-beta))
        .collect();
    let max = factors.iter().cloned().fold(f64::MIN, f64::max);
    factors.iter().map(|f| f / max).collect()
}

#[test]
fn alpha_zero_samples_uniformly() {
    let mut rng = StdRng::seed_from_u64(1337);
    let mut buf = buffer(10, 0.0, 1.0, DEFAULT_EPSILON);
    for i in 0..10 {
        buf.add_sample(payload(i), None).unwrap();
    }

    let mut counts = vec![0usize; 10];
    let mut drawn = 0;
    for _ in 0..10_000 {
        let samples = buf.sample(&mut rng, 3).unwrap();
        for sample in &samples {
            counts[sample.payload.idx] += 1;
            assert!((sample.weight - 1.0).abs() < 1e-12);
        }
        drawn += samples.len();
        let weights: Vec<f64> = samples.iter().map(|s| s.payload.idx as f64).collect();
        buf.update_weights(&samples, &weights).unwrap();
    }

    for count in counts {
        let frac = count as f64 / drawn as f64;
        assert!(frac > 0.09 && frac < 0.11, "frac {frac}");
    }
}

#[test]
fn sampling_follows_priorities() {
    let (alpha, epsilon) = (1.5, 0.5);
    let mut rng = StdRng::seed_from_u64(1337);
    let mut buf = buffer(10, alpha, 1.0, epsilon);
    for i in 0..10 {
        buf.add_sample(payload(i), Some(i as f64)).unwrap();
    }

    let mut counts = vec![0usize; 10];
    let mut drawn = 0;
    for _ in 0..50_000 {
        for sample in buf.sample(&mut rng, 3).unwrap() {
            counts[sample.payload.idx] += 1;
            drawn += 1;
        }
    }

    let priorities: Vec<f64> = (0..10).map(|i| (i as f64 + epsilon).powf(alpha)).collect();
    let total: f64 = priorities.iter().sum();
    for (i, p) in priorities.iter().enumerate() {
        let prob = p / total;
        let frac = counts[i] as f64 / drawn as f64;
        assert!((frac - prob).abs() < 0.01, "slot {i}: {frac} vs {prob}");
    }
}

#[test]
fn importance_weights_match_closed_form() {
    let (alpha, beta, epsilon) = (1.5, 1.3, 0.5);
    let mut rng = StdRng::seed_from_u64(1337);
    let mut buf = buffer(10, alpha, beta, epsilon);
    for i in 0..10 {
        buf.add_sample(payload(i), Some(i as f64)).unwrap();
    }

    let raw: Vec<f64> = (0..10).map(|i| i as f64).collect();
    let expected = closed_form_weights(&raw, alpha, beta, epsilon);
    for _ in 0..1000 {
        for sample in buf.sample(&mut rng, 3).unwrap() {
            assert!((expected[sample.payload.idx] - sample.weight).abs() < 1e-9);
            assert!(sample.weight <= 1.0);
        }
    }
}

#[test]
fn weights_stay_consistent_under_online_updates() {
    let (capacity, alpha, beta, epsilon) = (10, 1.5, 0.5, 0.5);
    let mut rng = StdRng::seed_from_u64(42);
    let mut buf = buffer(capacity, alpha, beta, epsilon);
    let mut raw: HashMap<u64, f64> = HashMap::new();
    let mut next_idx = 0;

    let mut add = |buf: &mut PrioritizedReplayBuffer<Payload>,
                   raw: &mut HashMap<u64, f64>,
                   rng: &mut StdRng| {
        let weight = rng.gen_range(0.0..3.0);
        let id = buf.add_sample(payload(next_idx), Some(weight)).unwrap();
        next_idx += 1;
        raw.insert(id, weight);
        raw.retain(|&live, _| live + capacity as u64 > id);
    };

    for _ in 0..5 {
        add(&mut buf, &mut raw, &mut rng);
    }
    for _ in 0..1000 {
        let mut ids: Vec<u64> = raw.keys().copied().collect();
        ids.sort_unstable();
        let weights: Vec<f64> = ids.iter().map(|id| raw[id]).collect();
        let expected = closed_form_weights(&weights, alpha, beta, epsilon);
        let by_id: HashMap<u64, f64> = ids.iter().copied().zip(expected).collect();

        let samples = buf.sample(&mut rng, 3).unwrap();
        let mut new_weights = Vec::new();
        for sample in &samples {
            assert!((by_id[&sample.id] - sample.weight).abs() < 1e-9);
            assert_eq!(buf.raw_weight(sample.id), Some(raw[&sample.id]));
            let weight = rng.gen_range(0.0..3.0);
            raw.insert(sample.id, weight);
            new_weights.push(weight);
        }
        buf.update_weights(&samples, &new_weights).unwrap();
        add(&mut buf, &mut raw, &mut rng);
    }
    assert_eq!(buf.len(), capacity);
    assert_eq!(raw.len(), capacity);
}

#[test]
fn invalid_arguments_leave_buffer_untouched() {
    let mut rng = StdRng::seed_from_u64(0);
    let mut buf = buffer(3, 1.0, 1.0, 0.1);
    assert!(matches!(
        buf.sample(&mut rng, 2),
        Err(ReplayError::InvalidArgument(_))
    ));

    let id = buf.add_sample(payload(0), Some(2.0)).unwrap();
    let samples = buf.sample(&mut rng, 2).unwrap();
    assert!(buf.update_weights(&samples, &[1.0]).is_err());
    assert!(buf.sample(&mut rng, 0).is_err());
    assert_eq!(buf.raw_weight(id), Some(2.0));
    assert_eq!(buf.len(), 1);
}

#[test]
fn stores_rollout_transitions() {
    let model = SimpleModel::new(2, true, false);
    let rollouts = BasicRoller::new(SimpleEnv::new(9, 4), &model, 3)
        .rollouts()
        .unwrap();

    let mut buf = PrioritizedReplayBuffer::<Transition<Vec<u8>, Vec<u8>>>::new(16, 0.6, 0.4).unwrap();
    let mut stored = 0;
    for rollout in &rollouts {
        for transition in rollout.transitions() {
            buf.add_sample(transition, None).unwrap();
            stored += 1;
        }
    }
    assert_eq!(buf.len(), stored.min(16));

    let mut rng = StdRng::seed_from_u64(5);
    let batch = buf.sample(&mut rng, 8).unwrap();
    assert_eq!(batch.len(), 8);
    for sample in &batch {
        assert!(sample.weight > 0.0 && sample.weight <= 1.0);
        assert_eq!(sample.payload.action.len(), 2);
    }
}
