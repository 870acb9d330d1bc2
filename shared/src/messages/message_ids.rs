//! Message ids pinned by the server protocol version this client speaks.

/// Messages the client receives
pub mod client {
    pub const ON_RELOGIN_BASEAPP_FAILED: u16 = 501;
    pub const ON_LOGIN_SUCCESSFULLY: u16 = 502;
    pub const ON_LOGIN_FAILED: u16 = 503;
    pub const ON_CREATED_PROXIES: u16 = 504;
    pub const ON_LOGIN_BASEAPP_FAILED: u16 = 505;
    pub const ON_REMOTE_METHOD_CALL: u16 = 506;
    pub const ON_ENTITY_ENTER_WORLD: u16 = 507;
    pub const ON_ENTITY_LEAVE_WORLD: u16 = 508;
    pub const ON_ENTITY_LEAVE_WORLD_OPTIMIZED: u16 = 509;
    pub const ON_ENTITY_ENTER_SPACE: u16 = 510;
    pub const ON_UPDATE_PROPERTYS: u16 = 511;
    pub const ON_UPDATE_PROPERTYS_OPTIMIZED: u16 = 512;
    pub const ON_ENTITY_LEAVE_SPACE: u16 = 513;
    pub const ON_ENTITY_DESTROYED: u16 = 514;
    pub const ON_REMOTE_METHOD_CALL_OPTIMIZED: u16 = 515;
    pub const ON_KICKED: u16 = 516;
    pub const ON_CREATE_ACCOUNT_RESULT: u16 = 517;
    pub const ON_STREAM_DATA_STARTED: u16 = 518;
    pub const ON_STREAM_DATA_RECV: u16 = 519;
    pub const ON_STREAM_DATA_COMPLETED: u16 = 520;
    pub const ON_HELLO_CB: u16 = 521;
    pub const ON_SCRIPT_VERSION_NOT_MATCH: u16 = 522;
    pub const ON_VERSION_NOT_MATCH: u16 = 523;
    pub const ON_APP_ACTIVE_TICK_CB: u16 = 524;
    pub const ON_RELOGIN_BASEAPP_SUCCESSFULLY: u16 = 525;
    pub const INIT_SPACE_DATA: u16 = 526;
    pub const SET_SPACE_DATA: u16 = 527;
    pub const DEL_SPACE_DATA: u16 = 528;
    pub const ON_UPDATE_BASE_POS: u16 = 529;
    pub const ON_UPDATE_BASE_POS_XZ: u16 = 530;
    pub const ON_UPDATE_BASE_DIR: u16 = 531;
    pub const ON_SET_ENTITY_POS_AND_DIR: u16 = 532;
    pub const ON_CONTROL_ENTITY: u16 = 533;

    /// `onUpdateData` and its 23 position/direction variants occupy this range
    pub const ON_UPDATE_DATA: u16 = 534;
    pub const ON_UPDATE_DATA_LAST: u16 = 557;
}

/// Messages the client sends to the login app
pub mod loginapp {
    pub const REQ_CREATE_ACCOUNT: u16 = 2;
    pub const LOGIN: u16 = 3;
    pub const HELLO: u16 = 4;
    pub const ON_CLIENT_ACTIVE_TICK: u16 = 5;
}

/// Messages the client sends to the base app
pub mod baseapp {
    pub const LOGOUT_BASEAPP: u16 = 24;
    pub const HELLO: u16 = 200;
    pub const LOGIN_BASEAPP: u16 = 202;
    pub const ON_CLIENT_ACTIVE_TICK: u16 = 203;
    pub const RELOGIN_BASEAPP: u16 = 204;
    pub const ON_REMOTE_CALL_CELL_METHOD_FROM_CLIENT: u16 = 205;
    pub const ON_REMOTE_METHOD_CALL: u16 = 302;
}
