use std::collections::HashMap;

use kbe_shared::SpaceId;

/// Key/value metadata the server attaches to each space
#[derive(Debug, Default, Clone)]
pub struct SpaceDataStore {
    spaces: HashMap<SpaceId, HashMap<String, String>>,
}

impl SpaceDataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces everything known about a space
    pub fn init(&mut self, space_id: SpaceId, pairs: impl IntoIterator<Item = (String, String)>) {
        self.spaces.insert(space_id, pairs.into_iter().collect());
    }

    pub fn set(&mut self, space_id: SpaceId, key: impl Into<String>, value: impl Into<String>) {
        self.spaces
            .entry(space_id)
            .or_default()
            .insert(key.into(), value.into());
    }

    pub fn del(&mut self, space_id: SpaceId, key: &str) -> Option<String> {
        self.spaces.get_mut(&space_id)?.remove(key)
    }

    pub fn get(&self, space_id: SpaceId, key: &str) -> Option<&str> {
        self.spaces.get(&space_id)?.get(key).map(String::as_str)
    }

    pub fn space(&self, space_id: SpaceId) -> Option<&HashMap<String, String>> {
        self.spaces.get(&space_id)
    }

    pub fn clear_space(&mut self, space_id: SpaceId) {
        self.spaces.remove(&space_id);
    }
}
