//! # mandal-service
//!
//! Screen-facing services over the provider traits: chat history and
//! sending, contribution records with the online payment flow, and
//! gallery uploads. All persistence is delegated to the hosted store;
//! these services only add the community's business rules.

pub mod chat;
pub mod contributions;
pub mod gallery;

pub use chat::ChatService;
pub use contributions::ContributionService;
pub use gallery::GalleryService;
