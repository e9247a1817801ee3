//! # mandal-auth
//!
//! The authentication core: a process-wide [`session::SessionStore`]
//! holding the current identity and status flags, the
//! [`operations::AuthOperations`] that mutate it, and the
//! [`guard::RouteGuard`] that gates navigation on it.

pub mod guard;
pub mod operations;
pub mod session;

pub use guard::{RouteDecision, RouteGuard};
pub use operations::{AuthOperations, SignUpStatus};
pub use session::SessionStore;
