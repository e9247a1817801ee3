//! HTTP adapters for the hosted service.

pub mod auth;
pub mod client;
pub mod functions;
pub mod rows;
pub mod session_cache;
pub mod storage;

pub use auth::HttpAuthApi;
pub use functions::HttpFunctionsApi;
pub use rows::HttpRowStore;
pub use storage::HttpObjectStore;
