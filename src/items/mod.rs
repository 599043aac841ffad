//! Item catalog and the player's inventory

pub mod catalog;
pub mod inventory;

pub use catalog::{ItemCatalog, ItemDefinition, ItemKind};
pub use inventory::{Inventory, InventorySlot};
