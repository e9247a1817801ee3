//! # mandal-realtime
//!
//! Converts the hosted service's push feed into local, renderable state:
//! the [`bridge::EventBridge`] seeds a feed from the row store and then
//! streams insert events into it, each feed owned by one
//! [`handle::SubscriptionHandle`] whose release is guaranteed on
//! teardown.

pub mod bridge;
pub mod feed;
pub mod handle;

pub use bridge::EventBridge;
pub use feed::{FeedState, ToastBuffer};
pub use handle::{HandleState, SubscriptionHandle};
