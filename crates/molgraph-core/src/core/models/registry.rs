use super::ids::ModelId;
use slotmap::{Key, SlotMap};
use std::collections::HashMap;

/// Implemented by the top-level entities a model registers.
pub(crate) trait Registered {
    fn registry_id(&self) -> Option<&str>;
    fn registry_name(&self) -> Option<&str>;
    fn set_model(&mut self, model: Option<ModelId>);
}

/// Slot map storage with an ID index, giving O(1) uniqueness checks and lookups.
///
/// Entities without an ID are stored but never indexed, so they never collide.
#[derive(Debug)]
pub(crate) struct Registry<K: Key, T> {
    entries: SlotMap<K, T>,
    index: HashMap<String, K>,
}

impl<K: Key, T> Default for Registry<K, T> {
    fn default() -> Self {
        Self {
            entries: SlotMap::with_key(),
            index: HashMap::new(),
        }
    }
}

impl<K: Key, T: Registered> Registry<K, T> {
    pub fn contains_id(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn contains_key(&self, key: K) -> bool {
        self.entries.contains_key(key)
    }

    /// Registers `item` and points its back-reference at `model`.
    ///
    /// On an ID collision nothing is stored and the colliding ID is returned.
    pub fn insert(&mut self, mut item: T, model: ModelId) -> Result<K, String> {
        if let Some(id) = item.registry_id() {
            if self.index.contains_key(id) {
                return Err(id.to_string());
            }
        }
        item.set_model(Some(model));
        let id = item.registry_id().map(str::to_string);
        let key = self.entries.insert(item);
        if let Some(id) = id {
            self.index.insert(id, key);
        }
        Ok(key)
    }

    /// Unregisters the entity and clears its back-reference.
    pub fn remove(&mut self, key: K) -> Option<T> {
        let mut item = self.entries.remove(key)?;
        if let Some(id) = item.registry_id() {
            self.index.remove(id);
        }
        item.set_model(None);
        Some(item)
    }

    pub fn get(&self, key: K) -> Option<&T> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: K) -> Option<&mut T> {
        self.entries.get_mut(key)
    }

    pub fn find_by_id(&self, id: &str) -> Option<K> {
        self.index.get(id).copied()
    }

    pub fn find_by_name(&self, name: &str) -> Option<K> {
        self.iter()
            .find(|(_, item)| item.registry_name() == Some(name))
            .map(|(key, _)| key)
    }

    pub fn find_all_by_name(&self, name: &str) -> Vec<K> {
        self.iter()
            .filter(|(_, item)| item.registry_name() == Some(name))
            .map(|(key, _)| key)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (K, &T)> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (K, &mut T)> {
        self.entries.iter_mut()
    }
}
