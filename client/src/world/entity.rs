use std::{collections::HashMap, fmt, sync::Arc};

use glam::Vec3;
use log::{debug, warn};

use kbe_shared::{EntityClassDescriptor, EntityId, Message, SpaceId, Value};

use crate::world::{
    entity_component::EntityComponent,
    entity_script::{EntityScript, NoopScript},
};

pub const POSITION: &str = "position";
pub const DIRECTION: &str = "direction";

/// Lifecycle of a replica
#[derive(Debug, Clone, PartialEq)]
pub enum EntityState {
    /// Referenced before its class is known; holds the messages that named it
    Placeholder { pending: Vec<Message> },
    Live,
    /// Terminal
    Destroyed,
}

/// The client-side replica of a server entity
pub struct Entity {
    id: EntityId,
    state: EntityState,
    class: Option<Arc<EntityClassDescriptor>>,
    position: Vec3,
    /// x = roll, y = pitch, z = yaw
    direction: Vec3,
    space_id: Option<SpaceId>,
    is_on_ground: bool,
    is_controlled: bool,
    in_world: bool,
    properties: HashMap<String, Value>,
    components: HashMap<String, EntityComponent>,
    script: Box<dyn EntityScript>,
}

impl Entity {
    pub(crate) fn placeholder(id: EntityId) -> Self {
        Self {
            id,
            state: EntityState::Placeholder {
                pending: Vec::new(),
            },
            class: None,
            position: Vec3::ZERO,
            direction: Vec3::ZERO,
            space_id: None,
            is_on_ground: false,
            is_controlled: false,
            in_world: false,
            properties: HashMap::new(),
            components: HashMap::new(),
            script: Box::new(NoopScript),
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn state(&self) -> &EntityState {
        &self.state
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self.state, EntityState::Placeholder { .. })
    }

    pub fn is_initialized(&self) -> bool {
        self.state == EntityState::Live
    }

    pub fn is_destroyed(&self) -> bool {
        self.state == EntityState::Destroyed
    }

    pub fn class(&self) -> Option<&Arc<EntityClassDescriptor>> {
        self.class.as_ref()
    }

    pub fn class_name(&self) -> Option<&str> {
        self.class.as_ref().map(|class| class.name())
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn space_id(&self) -> Option<SpaceId> {
        self.space_id
    }

    pub fn is_on_ground(&self) -> bool {
        self.is_on_ground
    }

    pub fn is_controlled(&self) -> bool {
        self.is_controlled
    }

    pub fn in_world(&self) -> bool {
        self.in_world
    }

    /// A declared property, or `position` / `direction`
    pub fn property(&self, name: &str) -> Option<Value> {
        match name {
            POSITION => Some(Value::Vector3(self.position)),
            DIRECTION => Some(Value::Vector3(self.direction)),
            _ => self.properties.get(name).cloned(),
        }
    }

    pub fn component(&self, name: &str) -> Option<&EntityComponent> {
        self.components.get(name)
    }

    pub(crate) fn component_mut(&mut self, name: &str) -> Option<&mut EntityComponent> {
        if self.is_destroyed() {
            return None;
        }
        self.components.get_mut(name)
    }

    pub fn pending_len(&self) -> usize {
        match &self.state {
            EntityState::Placeholder { pending } => pending.len(),
            _ => 0,
        }
    }

    /// Queues a message naming this entity. Returns false unless the entity is a placeholder.
    pub(crate) fn queue(&mut self, message: Message) -> bool {
        match &mut self.state {
            EntityState::Placeholder { pending } => {
                debug!(
                    "queued {} for placeholder entity {} ({} pending)",
                    message.name(),
                    self.id,
                    pending.len() + 1
                );
                pending.push(message);
                true
            }
            _ => false,
        }
    }

    /// Turns a placeholder live, returning the messages it queued
    pub(crate) fn initialize(
        &mut self,
        class: Arc<EntityClassDescriptor>,
        components: Vec<EntityComponent>,
        script: Box<dyn EntityScript>,
    ) -> Vec<Message> {
        let pending = match std::mem::replace(&mut self.state, EntityState::Live) {
            EntityState::Placeholder { pending } => pending,
            _ => Vec::new(),
        };
        for property in class.properties() {
            if !property.is_component() {
                self.properties
                    .entry(property.name.clone())
                    .or_insert_with(|| property.wire_type.default_value());
            }
        }
        for component in components {
            self.components.insert(component.name().to_string(), component);
        }
        self.class = Some(class);
        self.script = script;
        self.script.on_initialized(self.id);
        pending
    }

    /// Applies named property values in order
    pub fn update_properties(&mut self, updates: impl IntoIterator<Item = (String, Value)>) {
        for (name, value) in updates {
            self.set_property(&name, value);
        }
    }

    /// Sets one property and notifies the script. Destroyed entities are left untouched.
    pub fn set_property(&mut self, name: &str, value: Value) -> bool {
        if self.is_destroyed() {
            warn!("ignoring update of {} on destroyed entity {}", name, self.id);
            return false;
        }
        let old = match name {
            POSITION | DIRECTION => {
                let Some(vector) = value.as_vector3() else {
                    warn!(
                        "entity {} {} must be a Vector3, got {}",
                        self.id,
                        name,
                        value.kind_name()
                    );
                    return false;
                };
                let slot = if name == POSITION {
                    &mut self.position
                } else {
                    &mut self.direction
                };
                Some(Value::Vector3(std::mem::replace(slot, vector)))
            }
            _ => self.properties.insert(name.to_string(), value.clone()),
        };
        match old {
            Some(old) if old != value => self.script.on_property_changed(name, &old, &value),
            Some(_) => {}
            None => debug!("entity {} gained undeclared property {}", self.id, name),
        }
        true
    }

    /// Merges the given axes into the current position; missing axes keep their value
    pub fn merge_position(&mut self, x: Option<f32>, y: Option<f32>, z: Option<f32>) -> bool {
        let merged = Vec3::new(
            x.unwrap_or(self.position.x),
            y.unwrap_or(self.position.y),
            z.unwrap_or(self.position.z),
        );
        self.set_property(POSITION, Value::Vector3(merged))
    }

    /// Merges the given angles into the current direction; missing angles keep their value
    pub fn merge_direction(
        &mut self,
        yaw: Option<f32>,
        pitch: Option<f32>,
        roll: Option<f32>,
    ) -> bool {
        let merged = Vec3::new(
            roll.unwrap_or(self.direction.x),
            pitch.unwrap_or(self.direction.y),
            yaw.unwrap_or(self.direction.z),
        );
        self.set_property(DIRECTION, Value::Vector3(merged))
    }

    pub(crate) fn invoke_method(&mut self, method: &str, args: &[Value]) {
        self.script.on_remote_method(method, args);
    }

    pub(crate) fn invoke_component_method(
        &mut self,
        component: &str,
        method: &str,
        args: &[Value],
    ) {
        self.script.on_component_method(component, method, args);
    }

    pub(crate) fn enter_world(&mut self, is_on_ground: bool) {
        self.in_world = true;
        self.is_on_ground = is_on_ground;
        self.script.on_enter_world();
    }

    pub(crate) fn leave_world(&mut self) {
        self.in_world = false;
        self.script.on_leave_world();
    }

    pub(crate) fn enter_space(&mut self, space_id: SpaceId, is_on_ground: Option<bool>) {
        self.space_id = Some(space_id);
        if let Some(is_on_ground) = is_on_ground {
            self.is_on_ground = is_on_ground;
        }
        self.script.on_enter_space(space_id);
    }

    pub(crate) fn leave_space(&mut self) {
        if let Some(space_id) = self.space_id.take() {
            self.script.on_leave_space(space_id);
        }
    }

    pub(crate) fn set_controlled(&mut self, is_controlled: bool) {
        self.is_controlled = is_controlled;
        self.script.on_control(is_controlled);
    }

    /// Returns the number of queued messages dropped with it
    pub(crate) fn mark_destroyed(&mut self) -> usize {
        let dropped = self.pending_len();
        self.state = EntityState::Destroyed;
        self.in_world = false;
        self.script.on_destroyed();
        dropped
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("id", &self.id)
            .field("class", &self.class_name())
            .field("state", &self.state)
            .field("position", &self.position)
            .field("direction", &self.direction)
            .field("properties", &self.properties)
            .finish()
    }
}
