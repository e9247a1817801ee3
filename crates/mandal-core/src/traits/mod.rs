//! Traits implemented by the hosted-provider adapters.
//!
//! The traits are defined here in `mandal-core` and implemented in
//! `mandal-provider` (HTTP/WebSocket for the hosted service, in-memory
//! for tests). Upstream crates depend only on these seams.

pub mod auth;
pub mod functions;
pub mod push;
pub mod rows;
pub mod storage;

pub use auth::AuthApi;
pub use functions::FunctionsApi;
pub use push::PushTransport;
pub use rows::RowStore;
pub use storage::ObjectStore;
