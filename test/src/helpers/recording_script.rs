use std::sync::{Arc, Mutex};

use kbe_client::EntityScript;
use kbe_shared::{EntityId, SpaceId, Value};

/// Shared log of every script hook fired, in order
#[derive(Clone, Default)]
pub struct ScriptLog {
    events: Arc<Mutex<Vec<String>>>,
}

impl ScriptLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A factory for `EntityManager::register_script` whose scripts write here
    pub fn factory(&self) -> impl Fn(EntityId) -> Box<dyn EntityScript> + Send + Sync + 'static {
        let log = self.clone();
        move |entity_id| {
            Box::new(RecordingScript {
                entity_id,
                log: log.clone(),
            }) as Box<dyn EntityScript>
        }
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().expect("script log poisoned").clone()
    }

    pub fn contains(&self, event: &str) -> bool {
        self.events().iter().any(|recorded| recorded == event)
    }

    fn push(&self, event: String) {
        self.events.lock().expect("script log poisoned").push(event);
    }
}

struct RecordingScript {
    entity_id: EntityId,
    log: ScriptLog,
}

impl EntityScript for RecordingScript {
    fn on_initialized(&mut self, entity_id: EntityId) {
        self.log.push(format!("{} initialized", entity_id));
    }

    fn on_property_changed(&mut self, name: &str, _old: &Value, new: &Value) {
        self.log.push(format!("{} {} = {:?}", self.entity_id, name, new));
    }

    fn on_remote_method(&mut self, method: &str, args: &[Value]) {
        self.log.push(format!("{} {}{:?}", self.entity_id, method, args));
    }

    fn on_component_method(&mut self, component: &str, method: &str, args: &[Value]) {
        self.log
            .push(format!("{} {}.{}{:?}", self.entity_id, component, method, args));
    }

    fn on_enter_world(&mut self) {
        self.log.push(format!("{} entered world", self.entity_id));
    }

    fn on_leave_world(&mut self) {
        self.log.push(format!("{} left world", self.entity_id));
    }

    fn on_enter_space(&mut self, space_id: SpaceId) {
        self.log.push(format!("{} entered space {}", self.entity_id, space_id));
    }

    fn on_destroyed(&mut self) {
        self.log.push(format!("{} destroyed", self.entity_id));
    }
}
