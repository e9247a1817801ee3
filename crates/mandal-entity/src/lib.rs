//! # mandal-entity
//!
//! Typed row models for the community tables. The relational schema is
//! owned by the hosted store; these structs only decode what it returns.

pub mod chat;
pub mod contribution;
pub mod event;
pub mod expense;
pub mod gallery;
pub mod notification;

pub use chat::ChatMessage;
pub use contribution::{Contribution, ContributionMethod, ContributionStatus};
pub use event::Event;
pub use expense::Expense;
pub use gallery::GalleryItem;
pub use notification::Notification;
