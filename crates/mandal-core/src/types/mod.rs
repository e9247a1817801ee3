//! Shared domain types.

pub mod auth;
pub mod filter;
pub mod id;
pub mod row;
pub mod session;
