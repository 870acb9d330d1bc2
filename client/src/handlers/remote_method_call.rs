use log::trace;

use kbe_shared::{Message, Value};

use crate::{
    handlers::{error::HandlerError, live_entity, target, HandlerResult, Payload},
    world::{error::EntityError, World},
};

/// Entity id, component property id (zero for the entity itself), method id, then arguments
pub(crate) fn on_remote_method_call(
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

    let component_uid = payload.uid(class.uses_property_alias(settings.entity_def_alias_id))?;
    let (component, target_class) = if component_uid == 0 {
        (None, class)
    } else {
        let property = class.resolve_property(
            component_uid,
            class.uses_property_alias(settings.entity_def_alias_id),
        )?;
        let component = entity
            .component(&property.name)
            .ok_or_else(|| HandlerError::NotAComponent {
                entity_id,
                property: property.name.clone(),
            })?;
        (Some(property.name.clone()), component.class().clone())
    };

    let method_id = payload.uid(target_class.uses_method_alias(settings.entity_def_alias_id))?;
    let method = target_class.resolve_client_method(
        method_id,
        target_class.uses_method_alias(settings.entity_def_alias_id),
    )?;
    let args = method
        .args
        .iter()
        .map(|wire_type| payload.value(wire_type))
        .collect::<Result<Vec<Value>, HandlerError>>()?;

    trace!("entity {} calls {} with {:?}", entity_id, method.name, args);
    match &component {
        Some(component) => entity.invoke_component_method(component, &method.name, &args),
        None => entity.invoke_method(&method.name, &args),
    }
    Ok(HandlerResult::ok_with(Value::Array(args)).with_text(method.name.clone()))
}
