//! # mandal-core
//!
//! Core building blocks shared by every Mandal Hub crate: the unified
//! error type, configuration schemas, domain ID newtypes, session and
//! identity types, and the traits implemented by the hosted-provider
//! adapters in `mandal-provider`.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
