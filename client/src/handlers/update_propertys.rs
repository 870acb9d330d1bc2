use std::sync::Arc;

use log::{debug, trace};

use kbe_shared::{EntityClassDescriptor, EntityComponentHeader, EntityId, Message, Value};

use crate::{
    handlers::{error::HandlerError, live_entity, target, HandlerResult, Payload},
    world::{entity::Entity, error::EntityError, World},
};

/// Property bag update: (component uid, property uid, value) triples to the end of the payload
pub(crate) fn on_update_propertys(
    world: &mut World,
    message: &Message,
    optimized: bool,
) -> Result<HandlerResult, HandlerError> {
    let entities = &mut world.entities;
    let settings = *entities.settings();
    let mut payload = Payload::new(message);
    let entity_id = if optimized {
        payload.entity_id(entities)?
    } else {
        payload.i32()?
    };

    let entity = live_entity!(target(entities, entity_id, message), message, entity_id);
    let class = entity
        .class()
        .cloned()
        .ok_or(EntityError::NotInitialized { entity_id })?;
    let aliased = class.uses_property_alias(settings.entity_def_alias_id);

    // decode everything first; a failing triple leaves the entity untouched
    let mut updates = Vec::new();
    while !payload.is_empty() {
        let component_uid = payload.uid(aliased)?;
        let property_uid = payload.uid(aliased)?;
        let id = effective_property_id(entity_id, component_uid, property_uid)?;
        let property = class.resolve_property(id, aliased)?;
        let value = payload.value(&property.wire_type)?;
        trace!("entity {} {} = {:?}", entity_id, property.name, value);

        match value {
            Value::EntityComponent(header) if property.is_component() => {
                let component_class = entity
                    .component(&property.name)
                    .map(|component| component.class().clone())
                    .ok_or_else(|| HandlerError::NotAComponent {
                        entity_id,
                        property: property.name.clone(),
                    })?;
                let children = decode_component(
                    &mut payload,
                    entity_id,
                    &property.name,
                    header.property_count,
                    &component_class,
                    settings.entity_def_alias_id,
                )?;
                updates.push(PropertyUpdate::Component {
                    name: property.name.clone(),
                    header,
                    children,
                });
            }
            value => updates.push(PropertyUpdate::Property {
                name: property.name.clone(),
                value,
            }),
        }
    }

    let updated = updates.len() as u32;
    for update in updates {
        match update {
            PropertyUpdate::Property { name, value } => {
                entity.set_property(&name, value);
            }
            PropertyUpdate::Component {
                name,
                header,
                children,
            } => apply_component(entity, &name, header, children),
        }
    }
    Ok(HandlerResult::ok_with(Value::UInt32(updated)))
}

enum PropertyUpdate {
    Property {
        name: String,
        value: Value,
    },
    Component {
        name: String,
        header: EntityComponentHeader,
        children: Vec<(String, Value)>,
    },
}

/// Exactly one id of the pair names the property
fn effective_property_id(
    entity_id: EntityId,
    component_uid: u16,
    property_uid: u16,
) -> Result<u16, HandlerError> {
    match (component_uid, property_uid) {
        (0, 0) => Err(HandlerError::EmptyPropertyId { entity_id }),
        (id, 0) | (0, id) => Ok(id),
        (component_uid, property_uid) => Err(HandlerError::AmbiguousPropertyId {
            entity_id,
            component_uid,
            property_uid,
        }),
    }
}

/// The properties that follow a component header, resolved against the component's own class
fn decode_component(
    payload: &mut Payload,
    entity_id: EntityId,
    property: &str,
    declared: u16,
    class: &Arc<EntityClassDescriptor>,
    entity_def_alias_id: bool,
) -> Result<Vec<(String, Value)>, HandlerError> {
    let aliased = class.uses_property_alias(entity_def_alias_id);
    let mut children = Vec::with_capacity(usize::from(declared));
    for decoded in 0..declared {
        if payload.is_empty() {
            return Err(HandlerError::ComponentTruncated {
                entity_id,
                property: property.to_string(),
                declared,
                decoded,
            });
        }
        let component_uid = payload.uid(aliased)?;
        let property_uid = payload.uid(aliased)?;
        let id = effective_property_id(entity_id, component_uid, property_uid)?;
        let child = class.resolve_property(id, aliased)?;
        let value = payload.value(&child.wire_type)?;
        children.push((child.name.clone(), value));
    }
    Ok(children)
}

fn apply_component(
    entity: &mut Entity,
    name: &str,
    header: EntityComponentHeader,
    children: Vec<(String, Value)>,
) {
    let entity_id = entity.id();
    let Some(component) = entity.component_mut(name) else {
        return;
    };
    component.set_header(header);
    for (child, value) in children {
        component.set_property(&child, value);
    }
    debug!(
        "entity {} component {} updated ({} properties)",
        entity_id, name, header.property_count
    );
}
