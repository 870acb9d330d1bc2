pub mod helpers;
pub mod local_socket;
pub mod test_protocol;

pub use helpers::*;
pub use local_socket::{DuplexConnector, FakeServer};
pub use test_protocol::protocol;
