//! Injectable randomness.

use std::sync::atomic::{AtomicUsize, Ordering};

use rand::Rng;

/// Source of uniformly distributed integers.
pub trait RandomSource: Send + Sync {
    /// A value in `[low, high)`. Callers guarantee `low < high`.
    fn next_int(&self, low: i32, high: i32) -> i32;
}

/// Thread-local `rand` generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_int(&self, low: i32, high: i32) -> i32 {
        rand::thread_rng().gen_range(low..high)
    }
}

/// Replays a fixed sequence, cycling when exhausted.
///
/// Values are folded into the requested range, so in-range values come back
/// unchanged.
#[derive(Debug)]
pub struct SequenceRandom {
    values: Vec<i32>,
    cursor: AtomicUsize,
}

impl SequenceRandom {
    pub fn new(values: Vec<i32>) -> Self {
        Self {
            values,
            cursor: AtomicUsize::new(0),
        }
    }
}

impl RandomSource for SequenceRandom {
    fn next_int(&self, low: i32, high: i32) -> i32 {
        if self.values.is_empty() {
            return low;
        }
        let i = self.cursor.fetch_add(1, Ordering::Relaxed) % self.values.len();
        let span = i64::from(high) - i64::from(low);
        let offset = (i64::from(self.values[i]) - i64::from(low)).rem_euclid(span);
        (i64::from(low) + offset) as i32
    }
}
