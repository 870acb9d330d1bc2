pub mod frames;
mod recording_script;

pub use recording_script::ScriptLog;

use kbe_client::{Dispatcher, ServerSettings};

use crate::test_protocol::protocol;

/// A dispatcher over the test protocol with default server settings
pub fn dispatcher() -> Dispatcher {
    Dispatcher::new(protocol(), ServerSettings::default())
}

pub fn init_logging() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init()
        .ok();
}
