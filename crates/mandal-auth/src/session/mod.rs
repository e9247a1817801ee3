//! Session state: the single shared cache of who is signed in.

pub mod store;

pub use store::SessionStore;
