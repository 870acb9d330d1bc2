use std::{env, fmt, time::Duration};

use crate::error::ClientError;

pub const DEFAULT_LOGINAPP_HOST: &str = "127.0.0.1";
pub const DEFAULT_LOGINAPP_PORT: u16 = 20013;
pub const DEFAULT_ENV_PREFIX: &str = "KBE";

/// Host and port of a login or base app
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AppAddr {
    pub host: String,
    pub port: u16,
}

impl AppAddr {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Reads `KBE_LOGINAPP_HOST` and `KBE_LOGINAPP_PORT`
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_env_with_prefix(DEFAULT_ENV_PREFIX)
    }

    /// Reads `{prefix}_LOGINAPP_HOST` and `{prefix}_LOGINAPP_PORT`, falling back to the
    /// defaults when unset
    pub fn from_env_with_prefix(prefix: &str) -> Result<Self, ClientError> {
        let host_key = format!("{}_LOGINAPP_HOST", prefix);
        let port_key = format!("{}_LOGINAPP_PORT", prefix);
        let host = env::var(&host_key).unwrap_or_else(|_| DEFAULT_LOGINAPP_HOST.to_string());
        let port = match env::var(&port_key) {
            Ok(raw) => raw.trim().parse::<u16>().map_err(|_| ClientError::InvalidConfig {
                key: port_key,
                value: raw,
            })?,
            Err(_) => DEFAULT_LOGINAPP_PORT,
        };
        Ok(Self { host, port })
    }
}

impl Default for AppAddr {
    fn default() -> Self {
        Self::new(DEFAULT_LOGINAPP_HOST, DEFAULT_LOGINAPP_PORT)
    }
}

impl fmt::Display for AppAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Wire optimisations negotiated with the server
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ServerSettings {
    /// Entity ids may be sent as one-byte indices into the alias table
    pub alias_entity_id: bool,
    /// Property, method and class ids may be sent as one-byte aliases
    pub entity_def_alias_id: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            alias_entity_id: true,
            entity_def_alias_id: true,
        }
    }
}

/// Contains Config properties which will be used by a Client
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub loginapp: AppAddr,
    /// Reported to the login app; 5 is a native client
    pub client_type: i8,
    pub client_data: Vec<u8>,
    pub client_version: String,
    pub script_version: String,
    /// How long to wait for the reply to a request before giving up
    pub command_timeout: Duration,
    /// Interval between active ticks sent to the base app
    pub keep_alive_interval: Duration,
    pub server_settings: ServerSettings,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            loginapp: AppAddr::default(),
            client_type: 5,
            client_data: Vec::new(),
            client_version: "2.5.0".to_string(),
            script_version: "0.1.0".to_string(),
            command_timeout: Duration::from_secs(10),
            keep_alive_interval: Duration::from_secs(15),
            server_settings: ServerSettings::default(),
        }
    }
}

impl ClientConfig {
    /// Default config with the login app address taken from the environment
    pub fn from_env() -> Result<Self, ClientError> {
        Ok(Self {
            loginapp: AppAddr::from_env()?,
            ..Self::default()
        })
    }
}
