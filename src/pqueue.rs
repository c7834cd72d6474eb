use std::collections::VecDeque;

/// A bucketed priority queue keyed by small integer costs.
///
/// Items of equal priority come out in insertion order. Buckets are allocated
/// on demand, so there is no fixed ceiling on priorities, and an occupancy
/// bitmap keeps pop-min from scanning empty buckets one by one.
pub struct PriorityQueue<T> {
    buckets: Vec<VecDeque<T>>,
    bitmap: Vec<u64>,
    len: usize,
}

impl<T> PriorityQueue<T> {
    pub fn new() -> Self {
        Self {
            buckets: Vec::new(),
            bitmap: Vec::new(),
            len: 0,
        }
    }

    pub fn push(&mut self, priority: usize, item: T) {
        if priority >= self.buckets.len() {
            self.buckets.resize_with(priority + 1, VecDeque::new);
            self.bitmap.resize(priority / 64 + 1, 0);
        }
        self.buckets[priority].push_back(item);
        self.bitmap[priority / 64] |= 1u64 << (priority % 64);
        self.len += 1;
    }

    pub fn pop_min(&mut self) -> Option<T> {
        let word_idx = self.bitmap.iter().position(|&word| word != 0)?;
        let bit_idx = self.bitmap[word_idx].trailing_zeros() as usize;
        let priority = word_idx * 64 + bit_idx;

        let item = self.buckets[priority].pop_front()?;
        if self.buckets[priority].is_empty() {
            self.bitmap[word_idx] &= !(1u64 << bit_idx);
        }
        self.len -= 1;

        Some(item)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<T> Default for PriorityQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_pop_single() {
        let mut pq = PriorityQueue::new();
        pq.push(10, "hello");
        assert_eq!(pq.len(), 1);
        assert_eq!(pq.pop_min(), Some("hello"));
        assert_eq!(pq.pop_min(), None);
        assert_eq!(pq.len(), 0);
    }

    #[test]
    fn test_push_pop_ordered() {
        let mut pq = PriorityQueue::new();
        pq.push(10, "low");
        pq.push(5, "lower");
        pq.push(15, "high");

        assert_eq!(pq.pop_min(), Some("lower"));
        assert_eq!(pq.pop_min(), Some("low"));
        assert_eq!(pq.pop_min(), Some("high"));
        assert_eq!(pq.pop_min(), None);
    }

    #[test]
    fn test_same_priority_is_fifo() {
        let mut pq = PriorityQueue::new();
        pq.push(0, "first");
        pq.push(0, "second");
        pq.push(0, "third");

        assert_eq!(pq.pop_min(), Some("first"));
        assert_eq!(pq.pop_min(), Some("second"));
        assert_eq!(pq.pop_min(), Some("third"));
        assert_eq!(pq.pop_min(), None);
    }

    #[test]
    fn test_push_while_popping() {
        // The search pushes successors at the current tier or the next one.
        let mut pq = PriorityQueue::new();
        pq.push(0, 'a');
        assert_eq!(pq.pop_min(), Some('a'));
        pq.push(1, 'c');
        pq.push(0, 'b');
        assert_eq!(pq.pop_min(), Some('b'));
        pq.push(1, 'd');
        assert_eq!(pq.pop_min(), Some('c'));
        assert_eq!(pq.pop_min(), Some('d'));
        assert_eq!(pq.len(), 0);
    }

    #[test]
    fn test_grows_past_word_boundaries() {
        let mut pq = PriorityQueue::new();
        pq.push(10_000, "far");
        pq.push(63, "word0_last");
        pq.push(64, "word1_first");
        pq.push(0, "word0_first");

        assert_eq!(pq.len(), 4);
        assert_eq!(pq.pop_min(), Some("word0_first"));
        assert_eq!(pq.pop_min(), Some("word0_last"));
        assert_eq!(pq.pop_min(), Some("word1_first"));
        assert_eq!(pq.pop_min(), Some("far"));
        assert_eq!(pq.pop_min(), None);
    }

    #[test]
    fn test_empty_queue() {
        let mut pq: PriorityQueue<i32> = PriorityQueue::new();
        assert_eq!(pq.len(), 0);
        assert!(pq.is_empty());
        assert_eq!(pq.pop_min(), None);
    }

    #[test]
    fn test_is_empty_tracks_len() {
        let mut pq = PriorityQueue::new();
        pq.push(3, "a");
        pq.push(70, "b");
        assert!(!pq.is_empty());
        pq.pop_min();
        assert!(!pq.is_empty());
        pq.pop_min();
        assert!(pq.is_empty());
    }
}
