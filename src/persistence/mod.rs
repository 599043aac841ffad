//! Durable key-value records and their formats

pub mod snapshot;
pub mod store;

pub use snapshot::{InventorySnapshot, SlotRecord};
pub use store::{KeyValueStore, PrefsStore, SharedStore};
