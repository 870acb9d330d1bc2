use std::{
    collections::{HashMap, VecDeque},
    sync::Arc,
};

use log::{debug, info, warn};

use kbe_shared::{
    message_ids::baseapp, ByteWriter, EntityClassDescriptor, EntityDefError, EntityId, Message,
    MethodContext, Protocol, Value,
};

use crate::{
    client_config::ServerSettings,
    world::{
        alias_table::AliasTable,
        entity::Entity,
        entity_component::EntityComponent,
        entity_script::{EntityScript, NoopScript, ScriptFactory},
        error::EntityError,
    },
};

/// Owns every replica known to the client, the alias table and the player slot.
///
/// Entities are created on first reference as placeholders. Messages naming a placeholder are
/// queued on it and handed back, in arrival order, for replay once its class is known.
pub struct EntityManager {
    protocol: Arc<Protocol>,
    settings: ServerSettings,
    entities: HashMap<EntityId, Entity>,
    aliases: AliasTable,
    player_id: Option<EntityId>,
    scripts: HashMap<String, ScriptFactory>,
    replay: VecDeque<Message>,
    outbox: VecDeque<Message>,
}

impl EntityManager {
    pub fn new(protocol: Arc<Protocol>, settings: ServerSettings) -> Self {
        Self {
            protocol,
            settings,
            entities: HashMap::new(),
            aliases: AliasTable::new(),
            player_id: None,
            scripts: HashMap::new(),
            replay: VecDeque::new(),
            outbox: VecDeque::new(),
        }
    }

    pub fn protocol(&self) -> &Arc<Protocol> {
        &self.protocol
    }

    pub fn settings(&self) -> &ServerSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: ServerSettings) {
        self.settings = settings;
    }

    /// Installs the script factory used for every entity of `class_name` initialized afterwards
    pub fn register_script<F>(&mut self, class_name: impl Into<String>, factory: F)
    where
        F: Fn(EntityId) -> Box<dyn EntityScript> + Send + Sync + 'static,
    {
        self.scripts.insert(class_name.into(), Box::new(factory));
    }

    // Entities

    /// Never fails: an unknown id gets a placeholder replica
    pub fn get_entity(&mut self, entity_id: EntityId) -> &mut Entity {
        self.entities.entry(entity_id).or_insert_with(|| {
            debug!("placeholder created for entity {}", entity_id);
            Entity::placeholder(entity_id)
        })
    }

    pub fn entity(&self, entity_id: EntityId) -> Option<&Entity> {
        self.entities.get(&entity_id)
    }

    pub fn entity_mut(&mut self, entity_id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&entity_id)
    }

    pub fn has_entity(&self, entity_id: EntityId) -> bool {
        self.entities.contains_key(&entity_id)
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    // Aliases

    /// Whether the next entity id on the wire is a one-byte alias. Re-evaluated for every
    /// message, since the table can saturate mid-session.
    pub fn can_use_alias_for_entity_id(&self) -> bool {
        self.settings.alias_entity_id && self.aliases.can_use_alias()
    }

    pub fn resolve_alias(&self, alias: u8) -> Result<EntityId, EntityError> {
        self.aliases.resolve(alias).map_err(|err| {
            warn!("{}", err);
            err
        })
    }

    pub fn get_entity_by_alias(&mut self, alias: u8) -> Result<&mut Entity, EntityError> {
        let entity_id = self.resolve_alias(alias)?;
        Ok(self.get_entity(entity_id))
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    // Lifecycle

    /// Gives a replica its class. Messages queued while it was a placeholder move to the replay
    /// queue; returns how many.
    ///
    /// A live replica is left untouched. A destroyed one is replaced by a fresh replica.
    pub fn initialize_entity(
        &mut self,
        entity_id: EntityId,
        class_name: &str,
    ) -> Result<usize, EntityError> {
        let class = self
            .protocol
            .entity_defs
            .class_by_name(class_name)
            .map_err(|_| EntityError::UnknownEntityClass {
                entity_id,
                class_name: class_name.to_string(),
            })?
            .clone();

        if let Some(existing) = self.entities.get(&entity_id) {
            if existing.is_initialized() {
                warn!(
                    "entity {} is already initialized as {}",
                    entity_id,
                    existing.class_name().unwrap_or("?")
                );
                return Ok(0);
            }
            if existing.is_destroyed() {
                debug!("entity {} recreated after destruction", entity_id);
                self.entities.insert(entity_id, Entity::placeholder(entity_id));
            }
        }

        let components = self.build_components(entity_id, &class)?;
        let script = self.make_script(entity_id, class.name());
        let pending = self
            .get_entity(entity_id)
            .initialize(class, components, script);
        let count = pending.len();
        debug!(
            "entity {} initialized as {}, {} message(s) to replay",
            entity_id, class_name, count
        );
        self.replay.extend(pending);
        Ok(count)
    }

    fn build_components(
        &self,
        entity_id: EntityId,
        class: &EntityClassDescriptor,
    ) -> Result<Vec<EntityComponent>, EntityError> {
        let mut components = Vec::new();
        for property in class.properties() {
            let Some(component_class) = &property.component_class else {
                continue;
            };
            let component_class = self.protocol.entity_defs.class_by_name(component_class)?;
            components.push(EntityComponent::new(
                entity_id,
                property.name.clone(),
                component_class.clone(),
            ));
        }
        Ok(components)
    }

    fn make_script(&self, entity_id: EntityId, class_name: &str) -> Box<dyn EntityScript> {
        match self.scripts.get(class_name) {
            Some(factory) => factory(entity_id),
            None => Box::new(NoopScript),
        }
    }

    /// Idempotent. Returns true when the replica transitioned to destroyed.
    pub fn destroy_entity(&mut self, entity_id: EntityId) -> bool {
        self.aliases.remove(entity_id);
        let Some(entity) = self.entities.get_mut(&entity_id) else {
            debug!("destroy of unknown entity {}", entity_id);
            return false;
        };
        if entity.is_destroyed() {
            return false;
        }
        let dropped = entity.mark_destroyed();
        if dropped > 0 {
            warn!(
                "entity {} destroyed with {} queued message(s) never replayed",
                entity_id, dropped
            );
        }
        debug!("entity {} destroyed", entity_id);
        true
    }

    pub fn enter_world(&mut self, entity_id: EntityId, is_on_ground: bool) {
        self.aliases.push(entity_id);
        self.get_entity(entity_id).enter_world(is_on_ground);
    }

    /// Removes the entity from the alias table. Entities other than the player are destroyed.
    pub fn leave_world(&mut self, entity_id: EntityId) {
        if let Some(entity) = self.entities.get_mut(&entity_id) {
            if !entity.is_destroyed() {
                entity.leave_world();
            }
        }
        self.aliases.remove(entity_id);
        if !self.is_player(entity_id) {
            self.destroy_entity(entity_id);
        }
    }

    // Player

    /// Set once per session
    pub fn set_player(&mut self, entity_id: EntityId) -> Result<(), EntityError> {
        match self.player_id {
            Some(current) if current != entity_id => Err(EntityError::PlayerAlreadySet {
                current,
                entity_id,
            }),
            Some(_) => Ok(()),
            None => {
                info!("player entity is {}", entity_id);
                self.player_id = Some(entity_id);
                Ok(())
            }
        }
    }

    pub fn is_player(&self, entity_id: EntityId) -> bool {
        self.player_id == Some(entity_id)
    }

    pub fn player_id(&self) -> Option<EntityId> {
        self.player_id
    }

    pub fn player(&self) -> Option<&Entity> {
        self.player_id.and_then(|id| self.entities.get(&id))
    }

    // Replay

    pub(crate) fn take_replay(&mut self) -> Option<Message> {
        self.replay.pop_front()
    }

    pub fn replay_len(&self) -> usize {
        self.replay.len()
    }

    // Outbound calls

    /// Queues a message for the server
    pub fn remote_call(&mut self, message: Message) {
        debug!("queued outgoing {}", message.name());
        self.outbox.push_back(message);
    }

    pub fn take_outbox(&mut self) -> Vec<Message> {
        self.outbox.drain(..).collect()
    }

    /// Calls a method on the base part of an entity
    pub fn call_base_method(
        &mut self,
        entity_id: EntityId,
        method: &str,
        args: &[Value],
    ) -> Result<(), EntityError> {
        self.call_method(
            MethodContext::Base,
            baseapp::ON_REMOTE_METHOD_CALL,
            entity_id,
            method,
            args,
        )
    }

    /// Calls a method on the cell part of an entity, relayed through the base app
    pub fn call_cell_method(
        &mut self,
        entity_id: EntityId,
        method: &str,
        args: &[Value],
    ) -> Result<(), EntityError> {
        self.call_method(
            MethodContext::Cell,
            baseapp::ON_REMOTE_CALL_CELL_METHOD_FROM_CLIENT,
            entity_id,
            method,
            args,
        )
    }

    fn call_method(
        &mut self,
        context: MethodContext,
        message_id: u16,
        entity_id: EntityId,
        method: &str,
        args: &[Value],
    ) -> Result<(), EntityError> {
        let entity = self
            .entities
            .get(&entity_id)
            .ok_or(EntityError::NotInitialized { entity_id })?;
        if entity.is_destroyed() {
            return Err(EntityError::Destroyed { entity_id });
        }
        let class = entity
            .class()
            .ok_or(EntityError::NotInitialized { entity_id })?;
        let descriptor = class.method_by_name(context, method)?;
        if descriptor.args.len() != args.len() {
            return Err(EntityDefError::ArgumentCount {
                class: class.name().to_string(),
                method: method.to_string(),
                expected: descriptor.args.len(),
                found: args.len(),
            }
            .into());
        }

        let mut writer = ByteWriter::new();
        writer.write_i32(entity_id);
        // component property uid, zero for the entity itself
        writer.write_u16(0);
        writer.write_u16(descriptor.uid);
        for (value, wire_type) in args.iter().zip(&descriptor.args) {
            wire_type
                .encode(value, &mut writer)
                .map_err(|source| EntityError::EncodeCall {
                    method: method.to_string(),
                    source,
                })?;
        }

        let spec = self
            .protocol
            .messages
            .get(message_id)
            .ok_or(EntityError::MissingMessageSpec { id: message_id })?
            .clone();
        let message = Message::from_payload(spec, writer.to_bytes())?;
        self.remote_call(message);
        Ok(())
    }
}
