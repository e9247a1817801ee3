//! In-memory provider implementations.
//!
//! Behaviorally faithful stand-ins for the hosted service, used by tests
//! across the workspace. Each one honors the same contract as its HTTP
//! counterpart, including the sign-up identity-links rule and the
//! subscribe-acknowledgment semantics.

pub mod auth;
pub mod functions;
pub mod push;
pub mod rows;
pub mod storage;

pub use auth::MemoryAuthApi;
pub use functions::MemoryFunctionsApi;
pub use push::MemoryPushTransport;
pub use rows::MemoryRowStore;
pub use storage::MemoryObjectStore;
