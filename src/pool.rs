//! Reusable batch freelist shared by readers and aggregators.

use std::sync::Mutex;

/// Addresses a batch accumulates before it is handed to an aggregator.
pub(crate) const BATCH_SIZE: usize = 32 * 1024;

/// A freelist of address batches. Readers `get`, aggregators `put`; in
/// steady state neither call allocates.
pub(crate) struct BatchPool {
    free: Mutex<Vec<Vec<u32>>>,
}

impl BatchPool {
    pub(crate) fn new() -> Self {
        Self {
            free: Mutex::new(Vec::new()),
        }
    }

    /// Hands out an empty batch with `BATCH_SIZE` capacity.
    pub(crate) fn get(&self) -> Vec<u32> {
        match self.free.lock().unwrap().pop() {
            Some(batch) => batch,
            None => Vec::with_capacity(BATCH_SIZE),
        }
    }

    /// Returns a consumed batch to the freelist.
    pub(crate) fn put(&self, mut batch: Vec<u32>) {
        batch.clear();
        self.free.lock().unwrap().push(batch);
    }
}

#[cfg(test)]
mod tests {
    use super::{BatchPool, BATCH_SIZE};

    #[test]
    fn get_yields_empty_batch_with_capacity() {
        let pool = BatchPool::new();
        let batch = pool.get();
        assert!(batch.is_empty());
        assert_eq!(batch.capacity(), BATCH_SIZE);
    }

    #[test]
    fn put_recycles_the_allocation() {
        let pool = BatchPool::new();
        let mut batch = pool.get();
        batch.extend([1, 2, 3]);
        let ptr = batch.as_ptr();
        pool.put(batch);

        let again = pool.get();
        assert!(again.is_empty());
        assert_eq!(again.as_ptr(), ptr);
    }

    #[test]
    fn concurrent_get_put() {
        use std::sync::Arc;
        use std::thread;

        let pool = Arc::new(BatchPool::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let pool = Arc::clone(&pool);
                thread::spawn(move || {
                    for i in 0..1000u32 {
                        let mut b = pool.get();
                        b.push(i);
                        pool.put(b);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
    }
}
