use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

/// A fixed-capacity map that forgets its least recently set entry.
///
/// Recency is tracked by insertion only: `get` does not promote a key.
#[derive(Clone, Debug)]
pub struct RecencyCache<K, V> {
    capacity: usize,
    order: VecDeque<K>,
    values: HashMap<K, V>,
}

impl<K: Clone + Eq + Hash, V> RecencyCache<K, V> {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "cache capacity must be positive");

        Self {
            capacity,
            order: VecDeque::with_capacity(capacity),
            values: HashMap::with_capacity(capacity),
        }
    }

    /// Store `value` under `key`, making `key` the most recent entry.
    pub fn set(&mut self, key: K, value: V) {
        if self.values.contains_key(&key) {
            if let Some(pos) = self.order.iter().position(|k| *k == key) {
                self.order.remove(pos);
            }
        }

        self.order.push_back(key.clone());
        self.values.insert(key, value);

        while self.order.len() > self.capacity {
            if let Some(old) = self.order.pop_front() {
                self.values.remove(&old);
            }
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.values.get(key)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Keys from least to most recent.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.order.iter()
    }
}
