pub use fixed_map::Key;
use fixed_map::Map as FixedMap;

use crate::membership::Shape;

/// The linguistic terms of one variable, keyed by a `#[derive(Key)]` enum.
pub struct Terms<K: Key>(pub(crate) FixedMap<K, Shape>);

impl<K: Key> Terms<K> {
    pub fn new() -> Self {
        Self(FixedMap::new())
    }

    pub fn insert(&mut self, key: K, shape: Shape) {
        self.0.insert(key, shape);
    }

    pub fn with(mut self, key: K, shape: Shape) -> Self {
        self.insert(key, shape);
        self
    }

    pub fn get(&self, key: K) -> Option<&Shape> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Key> Default for Terms<K> {
    fn default() -> Self {
        Self::new()
    }
}
