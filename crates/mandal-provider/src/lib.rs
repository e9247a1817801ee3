//! # mandal-provider
//!
//! Implementations of the `mandal-core` provider traits.
//!
//! The `http` and `ws` modules talk to the hosted service; the `memory`
//! module is a faithful stand-in used by tests across the workspace.
//! Response-shape translation happens here and nowhere else: every
//! provider error leaves this crate as an [`mandal_core::AppError`]
//! carrying the provider's message verbatim.

pub mod http;
pub mod memory;
pub mod ws;

pub use http::client::ProviderClient;
