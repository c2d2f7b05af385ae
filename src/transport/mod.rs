pub mod provider;
pub mod providers;
pub mod types;

pub use provider::{Transport, TransportError};
pub use providers::{EchoTransport, HttpTransport};
pub use types::{SendRequest, StreamChunk};
