//! Snowflake-style ID generation
//!
//! Process-unique, roughly time-sorted i64 IDs:
//! 41 bits millisecond timestamp, 10 bits worker, 12 bits sequence.

use std::sync::atomic::{AtomicI64, Ordering};

/// Custom epoch: 2024-01-01T00:00:00Z in Unix milliseconds
const EPOCH: i64 = 1_704_067_200_000;

/// Thread-safe generator for post and user IDs
pub struct IdGenerator {
    worker_id: u16,
    state: AtomicI64,
}

impl IdGenerator {
    /// Create a new generator with the given worker ID
    ///
    /// # Panics
    /// Panics if worker_id >= 1024
    pub fn new(worker_id: u16) -> Self {
        assert!(worker_id < 1024, "worker ID must be < 1024");
        Self {
            worker_id,
            state: AtomicI64::new(0),
        }
    }

    /// Generate a new unique ID
    pub fn generate(&self) -> i64 {
        loop {
            let now = Self::current_timestamp();
            let prev = self.state.load(Ordering::Acquire);
            let (prev_ts, prev_seq) = (prev >> 12, prev & 0xFFF);

            let (ts, seq) = if now > prev_ts {
                (now, 0)
            } else if prev_seq < 0xFFF {
                (prev_ts, prev_seq + 1)
            } else {
                // Sequence exhausted for this millisecond, wait it out
                while Self::current_timestamp() <= prev_ts {
                    std::hint::spin_loop();
                }
                continue;
            };

            let next = (ts << 12) | seq;
            if self
                .state
                .compare_exchange(prev, next, Ordering::Release, Ordering::Relaxed)
                .is_ok()
            {
                return (ts << 22) | (i64::from(self.worker_id) << 12) | seq;
            }
        }
    }

    fn current_timestamp() -> i64 {
        use std::time::{SystemTime, UNIX_EPOCH};
        let since_epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        since_epoch.as_millis() as i64 - EPOCH
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_ids_are_positive_and_unique() {
        let gen = IdGenerator::new(1);
        let mut seen = HashSet::new();
        for _ in 0..10_000 {
            let id = gen.generate();
            assert!(id > 0);
            assert!(seen.insert(id), "duplicate id: {id}");
        }
    }

    #[test]
    fn test_ids_are_roughly_ordered() {
        let gen = IdGenerator::new(0);
        let a = gen.generate();
        let b = gen.generate();
        assert!(b > a);
    }

    #[test]
    fn test_concurrent_generation_is_unique() {
        let gen = Arc::new(IdGenerator::new(2));
        let mut handles = Vec::new();
        for _ in 0..4 {
            let gen = Arc::clone(&gen);
            handles.push(thread::spawn(move || {
                (0..1000).map(|_| gen.generate()).collect::<Vec<_>>()
            }));
        }

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id), "duplicate id: {id}");
            }
        }
    }
}
