use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Source of uniform draws for the simulators.
pub trait RandomSource: Send + Sync {
    /// Uniform value in `[0, 1)`.
    fn next_unit(&self) -> f64;

    /// Uniform index in `[0, upper)`. `upper` must be non-zero.
    fn next_index(&self, upper: usize) -> usize {
        let index = (self.next_unit() * upper as f64) as usize;
        index.min(upper.saturating_sub(1))
    }
}

pub fn pick<'a, T>(random: &dyn RandomSource, items: &'a [T]) -> &'a T {
    &items[random.next_index(items.len())]
}

#[derive(Debug, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_unit(&self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }

    fn next_index(&self, upper: usize) -> usize {
        rand::thread_rng().gen_range(0..upper)
    }
}

pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_unit(&self) -> f64 {
        self.rng
            .lock()
            .map(|mut rng| rng.gen::<f64>())
            .unwrap_or_default()
    }
}

/// Replays a fixed list of unit draws in a loop.
pub struct SequenceRandom {
    values: Vec<f64>,
    cursor: AtomicUsize,
}

impl SequenceRandom {
    pub fn new(values: Vec<f64>) -> Self {
        Self {
            values,
            cursor: AtomicUsize::new(0),
        }
    }
}

impl RandomSource for SequenceRandom {
    fn next_unit(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let at = self.cursor.fetch_add(1, Ordering::SeqCst) % self.values.len();
        self.values[at].clamp(0.0, 0.999_999)
    }
}

pub fn from_seed(seed: Option<u64>) -> Arc<dyn RandomSource> {
    match seed {
        Some(seed) => Arc::new(SeededRandom::new(seed)),
        None => Arc::new(ThreadRandom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_maps_draws_to_indices() {
        let random = SequenceRandom::new(vec![0.0, 0.5, 0.99]);
        assert_eq!(random.next_index(5), 0);
        assert_eq!(random.next_index(5), 2);
        assert_eq!(random.next_index(5), 4);
        assert_eq!(random.next_index(5), 0);
    }

    #[test]
    fn test_seeded_sources_repeat() {
        let first = SeededRandom::new(11);
        let second = SeededRandom::new(11);
        for _ in 0..8 {
            assert_eq!(first.next_index(5), second.next_index(5));
        }
    }

    #[test]
    fn test_thread_random_stays_in_range() {
        let random = ThreadRandom;
        for _ in 0..100 {
            assert!(random.next_index(5) < 5);
            let unit = random.next_unit();
            assert!((0.0..1.0).contains(&unit));
        }
    }
}
