use std::sync::Arc;

use log::{debug, warn};

use kbe_shared::{Framer, Message, Protocol};

use crate::{
    client_config::ServerSettings,
    handlers::{HandlerKind, HandlerResult},
    session::Session,
    world::World,
};

/// Turns inbound bytes into messages and applies them, one at a time, to the world.
///
/// Messages replayed from a placeholder go through the same path as live traffic, right after
/// the message that initialized the entity.
pub struct Dispatcher {
    protocol: Arc<Protocol>,
    framer: Framer,
    world: World,
    session: Session,
}

impl Dispatcher {
    pub fn new(protocol: Arc<Protocol>, settings: ServerSettings) -> Self {
        Self {
            world: World::new(protocol.clone(), settings),
            protocol,
            framer: Framer::new(),
            session: Session::new(),
        }
    }

    pub fn protocol(&self) -> &Arc<Protocol> {
        &self.protocol
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Feeds a chunk of the byte stream. Returns the complete messages it contained, each
    /// already dispatched; a trailing partial frame waits for the next chunk.
    pub fn receive_bytes(&mut self, chunk: &[u8]) -> Vec<Message> {
        let decoded = self.framer.push(&self.protocol.messages, chunk);
        for message in &decoded.messages {
            self.dispatch(message);
        }
        decoded.messages
    }

    /// Drops any partial frame buffered from a previous stream
    pub fn reset_stream(&mut self) {
        if self.framer.pending_len() > 0 {
            warn!("discarding {} bytes of an unfinished frame", self.framer.pending_len());
        }
        self.framer.clear();
    }

    /// Returns true when a handler exists for the message
    pub fn on_receive_msg(&mut self, message: &Message) -> bool {
        self.dispatch(message).is_some()
    }

    /// Applies `message`, then replays any messages it released. Returns None for message ids
    /// without a handler.
    pub fn dispatch(&mut self, message: &Message) -> Option<HandlerResult> {
        let result = self.dispatch_one(message)?;
        while let Some(queued) = self.world.entities.take_replay() {
            let replayed = self.dispatch_one(&queued);
            debug!(
                "replayed {}: {}",
                queued.name(),
                replayed.map_or_else(|| "unhandled".to_string(), |result| result.text)
            );
        }
        Some(result)
    }

    fn dispatch_one(&mut self, message: &Message) -> Option<HandlerResult> {
        let Some(kind) = HandlerKind::for_id(message.id()) else {
            warn!("no handler for {} ({}), dropped", message.name(), message.id());
            return None;
        };
        Some(kind.handle(&mut self.world, &mut self.session, message))
    }

    /// Messages queued for the server by entity calls
    pub fn take_outgoing(&mut self) -> Vec<Message> {
        self.world.entities.take_outbox()
    }
}
