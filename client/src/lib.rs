//! # KBE Client
//! A client for the KBEngine wire protocol: logs in, decodes the server's message stream and
//! keeps a pool of replicated entities in sync with the server.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

pub use kbe_shared as shared;

mod client;
mod client_config;
mod command;
mod connection;
mod dispatcher;
mod error;
mod handlers;
mod keep_alive;
mod session;
mod world;

pub use client::Client;
pub use client_config::{
    AppAddr, ClientConfig, ServerSettings, DEFAULT_ENV_PREFIX, DEFAULT_LOGINAPP_HOST,
    DEFAULT_LOGINAPP_PORT,
};
pub use command::{Commands, PendingReply};
pub use connection::{Connection, Connector, TcpConnector};
pub use dispatcher::Dispatcher;
pub use error::{ClientError, CommandError, ConnectionError};
pub use handlers::{error::HandlerError, HandlerKind, HandlerResult};
pub use keep_alive::KeepAlive;
pub use session::Session;
pub use world::{
    alias_table::{AliasTable, MAX_ALIASES},
    entity::{Entity, EntityState, DIRECTION, POSITION},
    entity_component::EntityComponent,
    entity_manager::EntityManager,
    entity_script::{EntityScript, NoopScript, ScriptFactory},
    error::EntityError,
    space_data::SpaceDataStore,
    stream_data::{CompletedStream, StreamDataStore, StreamType},
    World,
};
