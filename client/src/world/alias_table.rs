use log::{debug, warn};

use kbe_shared::EntityId;

use crate::world::error::EntityError;

/// Largest table that one-byte aliases can index
pub const MAX_ALIASES: usize = u8::MAX as usize;

/// Entity ids in enter-world order. The server mirrors this table and sends the index of an
/// entry instead of the full id while the table fits in one byte.
///
/// Once more than [`MAX_ALIASES`] entities have been tracked at once, aliasing stays off for
/// the rest of the session.
#[derive(Debug, Default, Clone)]
pub struct AliasTable {
    ids: Vec<EntityId>,
    saturated: bool,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entity_id: EntityId) {
        if self.saturated || self.ids.contains(&entity_id) {
            return;
        }
        self.ids.push(entity_id);
        if self.ids.len() > MAX_ALIASES {
            warn!(
                "alias table exceeded {} entries, entity ids are sent in full from now on",
                MAX_ALIASES
            );
            self.saturated = true;
        }
    }

    pub fn remove(&mut self, entity_id: EntityId) {
        if let Some(index) = self.ids.iter().position(|id| *id == entity_id) {
            self.ids.remove(index);
            debug!("alias {} released by entity {}", index, entity_id);
        }
    }

    pub fn resolve(&self, alias: u8) -> Result<EntityId, EntityError> {
        self.ids
            .get(usize::from(alias))
            .copied()
            .ok_or(EntityError::AliasOutOfBounds {
                alias,
                len: self.ids.len(),
            })
    }

    pub fn can_use_alias(&self) -> bool {
        !self.saturated
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
