//! Ring Buffer Implementation

use serde::{Deserialize, Serialize};

/// Fixed-capacity ring buffer, oldest sample evicted on overflow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RingBuffer<T> {
    /// Pre-allocated storage
    storage: Vec<Option<T>>,
    /// Next write position
    head: usize,
    /// Number of valid samples
    len: usize,
}

impl<T> RingBuffer<T> {
    /// Create a new ring buffer with given capacity
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Ring buffer capacity must be > 0");
        let storage = (0..capacity).map(|_| None).collect();
        Self {
            storage,
            head: 0,
            len: 0,
        }
    }

    /// Push a sample into the buffer (overwrites oldest if full)
    pub fn push(&mut self, item: T) {
        let capacity = self.capacity();
        self.storage[self.head] = Some(item);
        self.head = (self.head + 1) % capacity;
        self.len = (self.len + 1).min(capacity);
    }

    /// Get the number of samples currently in the buffer
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if buffer is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Check if buffer is full
    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    /// Get the buffer capacity
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Iterate over the last N samples (most recent first)
    pub fn iter_last(&self, count: usize) -> impl Iterator<Item = &T> + '_ {
        let capacity = self.capacity();
        let count = count.min(self.len);
        (0..count).filter_map(move |i| {
            let idx = (self.head + capacity - 1 - i) % capacity;
            self.storage[idx].as_ref()
        })
    }

    /// Clear the buffer
    pub fn clear(&mut self) {
        self.storage.iter_mut().for_each(|slot| *slot = None);
        self.head = 0;
        self.len = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn last(buffer: &RingBuffer<i32>, count: usize) -> Vec<i32> {
        buffer.iter_last(count).copied().collect()
    }

    #[test]
    fn test_push_and_read() {
        let mut buffer = RingBuffer::new(10);

        for i in 0..5 {
            buffer.push(i * 100);
        }

        assert_eq!(buffer.len(), 5);
        assert_eq!(last(&buffer, 3), vec![400, 300, 200]); // Most recent first
    }

    #[test]
    fn test_overwrite_oldest() {
        let mut buffer = RingBuffer::new(5);

        // Fill beyond capacity
        for i in 0..10 {
            buffer.push(i);
        }

        assert_eq!(buffer.len(), 5);
        assert!(buffer.is_full());

        // Oldest should be overwritten
        assert_eq!(last(&buffer, 10), vec![9, 8, 7, 6, 5]);
    }

    #[test]
    fn test_clear_resets_fill() {
        let mut buffer = RingBuffer::new(4);
        for i in 0..4 {
            buffer.push(i);
        }
        assert!(buffer.is_full());

        buffer.clear();
        assert!(buffer.is_empty());
        assert_eq!(buffer.iter_last(4).count(), 0);

        buffer.push(7);
        assert_eq!(last(&buffer, 4), vec![7]);
    }

    proptest! {
        #[test]
        fn prop_len_never_exceeds_capacity(capacity in 1usize..64, pushes in 0usize..256) {
            let mut buffer = RingBuffer::new(capacity);
            for i in 0..pushes {
                buffer.push(i);
            }
            prop_assert_eq!(buffer.len(), pushes.min(capacity));
            if let Some(latest) = buffer.iter_last(1).next() {
                prop_assert_eq!(*latest, pushes - 1);
            };
        }
    }
}
