//! Single-value observable stores.
//!
//! A [`Store`] holds one value and a set of subscribers that are called
//! synchronously whenever the value changes.

mod store;

pub use store::{Store, Subscription, SubscriptionGuard};
