use std::{io, time::Duration};

use thiserror::Error;

use kbe_shared::{FrameError, ProtocolError};

use crate::world::error::EntityError;

/// Errors raised by the byte stream to a login or base app
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("Failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to send to the server: {0}")]
    Send(#[source] io::Error),

    #[error("Connection is closed")]
    Closed,

    #[error(transparent)]
    Frame(#[from] FrameError),
}

/// Errors raised while waiting for the reply to a request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// No reply arrived within the configured window. The connection is left open.
    #[error("No reply among {expected:?} within {timeout:?}")]
    Timeout {
        expected: Vec<u16>,
        timeout: Duration,
    },

    /// The connection dropped the waiter before a reply arrived
    #[error("Connection closed while waiting for {expected:?}")]
    Cancelled { expected: Vec<u16> },
}

/// Errors surfaced to the application by the client
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid value {value:?} for configuration key {key}")]
    InvalidConfig { key: String, value: String },

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error(transparent)]
    Command(#[from] CommandError),

    #[error(transparent)]
    Frame(#[from] FrameError),

    #[error(transparent)]
    Entity(#[from] EntityError),

    #[error("Server rejected client version; it runs {server_version}")]
    VersionNotMatch { server_version: String },

    #[error("Server rejected script version; it runs {server_version}")]
    ScriptVersionNotMatch { server_version: String },

    #[error("Login failed with server error code {code}")]
    LoginFailed { code: u16 },

    #[error("Base app login failed with server error code {code}")]
    LoginBaseappFailed { code: u16 },

    /// A reply carried a message the flow did not expect
    #[error("Unexpected reply {name} ({id}) while {stage}")]
    UnexpectedReply {
        id: u16,
        name: String,
        stage: &'static str,
    },

    #[error("Reply {name} is malformed: {reason}")]
    MalformedReply { name: String, reason: String },

    #[error("No message spec is registered for id {id}")]
    MissingMessageSpec { id: u16 },

    #[error("Client is not logged in")]
    NotLoggedIn,
}
