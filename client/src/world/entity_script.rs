use kbe_shared::{EntityId, SpaceId, Value};

/// Application hooks for one entity replica. Every method has an empty default.
pub trait EntityScript: Send {
    fn on_initialized(&mut self, _entity_id: EntityId) {}

    fn on_property_changed(&mut self, _name: &str, _old: &Value, _new: &Value) {}

    /// A client method called by the server
    fn on_remote_method(&mut self, _method: &str, _args: &[Value]) {}

    /// A client method of an embedded component called by the server
    fn on_component_method(&mut self, _component: &str, _method: &str, _args: &[Value]) {}

    fn on_enter_world(&mut self) {}

    fn on_leave_world(&mut self) {}

    fn on_enter_space(&mut self, _space_id: SpaceId) {}

    fn on_leave_space(&mut self, _space_id: SpaceId) {}

    fn on_control(&mut self, _is_controlled: bool) {}

    fn on_destroyed(&mut self) {}
}

/// Script used for classes without a registered factory
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopScript;

impl EntityScript for NoopScript {}

/// Builds the script of a newly initialized entity
pub type ScriptFactory = Box<dyn Fn(EntityId) -> Box<dyn EntityScript> + Send + Sync>;
