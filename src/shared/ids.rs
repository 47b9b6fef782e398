//! Time-derived identifiers.
//!
//! Ids are the creation time in epoch milliseconds. When two ids are requested
//! within the same millisecond (or the clock steps back) the previous value is
//! bumped by one, so ids from one generator are strictly increasing.

use std::sync::atomic::{AtomicI64, Ordering};

#[derive(Debug, Default)]
pub struct IdGenerator {
    last: AtomicI64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self, now_millis: i64) -> i64 {
        let mut current = self.last.load(Ordering::SeqCst);
        loop {
            let candidate = now_millis.max(current + 1);
            match self.last.compare_exchange(
                current,
                candidate,
                Ordering::SeqCst,
                Ordering::SeqCst,
            ) {
                Ok(_) => return candidate,
                Err(observed) => current = observed,
            }
        }
    }

    pub fn next_string(&self, now_millis: i64) -> String {
        self.next(now_millis).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_millisecond_is_bumped() {
        let ids = IdGenerator::new();
        assert_eq!(ids.next(1_000), 1_000);
        assert_eq!(ids.next(1_000), 1_001);
        assert_eq!(ids.next(999), 1_002);
        assert_eq!(ids.next(5_000), 5_000);
    }

    #[test]
    fn test_string_form_is_plain_digits() {
        let ids = IdGenerator::new();
        assert_eq!(ids.next_string(1_700_000_000_000), "1700000000000");
    }
}
