use std::time::Instant;

use crate::client_config::AppAddr;

/// What the server told us about itself and our account
#[derive(Clone, Debug, Default)]
pub struct Session {
    pub server_version: Option<String>,
    pub server_script_version: Option<String>,
    pub protocol_digest: Option<String>,
    pub entity_def_digest: Option<String>,
    pub component_type: Option<i32>,
    pub account: Option<String>,
    /// Base app handed out by the login app
    pub baseapp: Option<AppAddr>,
    pub baseapp_udp_port: Option<u16>,
    pub server_data: Vec<u8>,
    /// Key used to reconnect to the base app without a new login
    pub relogin_key: Option<u64>,
    pub last_error_code: Option<u16>,
    pub kicked: bool,
    pub last_active_tick_ack: Option<Instant>,
    pub create_account_result: Option<(u16, Vec<u8>)>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_logged_in(&self) -> bool {
        self.baseapp.is_some() && !self.kicked
    }
}
