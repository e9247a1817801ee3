//! WebSocket push transport.

pub mod transport;

pub use transport::WsPushTransport;
