pub mod alias_table;
pub mod entity;
pub mod entity_component;
pub mod entity_manager;
pub mod entity_script;
pub mod error;
pub mod space_data;
pub mod stream_data;

use std::sync::Arc;

use kbe_shared::Protocol;

use crate::client_config::ServerSettings;

use self::{entity_manager::EntityManager, space_data::SpaceDataStore, stream_data::StreamDataStore};

/// Everything the client replicates from the server
pub struct World {
    pub entities: EntityManager,
    pub spaces: SpaceDataStore,
    pub streams: StreamDataStore,
}

impl World {
    pub fn new(protocol: Arc<Protocol>, settings: ServerSettings) -> Self {
        Self {
            entities: EntityManager::new(protocol, settings),
            spaces: SpaceDataStore::new(),
            streams: StreamDataStore::new(),
        }
    }
}
