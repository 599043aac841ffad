//! Inventory - fixed slot array with stacking
//!
//! Additions and removals are all-or-nothing: a request that cannot be
//! satisfied in full leaves every slot untouched. Every successful mutation
//! is written through to the store before returning.

use std::sync::Arc;

use crate::items::catalog::{ItemCatalog, ItemDefinition};
use crate::persistence::snapshot::{InventorySnapshot, SlotRecord};
use crate::persistence::store::{SharedStore, INVENTORY_KEY};
use crate::pet::needs::NeedsState;

fn same_item(a: &ItemDefinition, b: &ItemDefinition) -> bool {
    a.name == b.name
}

/// One inventory cell
///
/// Holds an item iff its quantity is positive.
#[derive(Debug, Clone, Default)]
pub struct InventorySlot {
    item: Option<Arc<ItemDefinition>>,
    quantity: u32,
}

impl InventorySlot {
    pub fn is_empty(&self) -> bool {
        self.item.is_none()
    }

    pub fn item(&self) -> Option<&Arc<ItemDefinition>> {
        self.item.as_ref()
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn holds(&self, item: &ItemDefinition) -> bool {
        self.item.as_deref().is_some_and(|held| same_item(held, item))
    }

    /// Units of `item` this slot could still take
    pub fn space_for(&self, item: &ItemDefinition) -> u32 {
        match &self.item {
            None => item.stack_cap(),
            Some(held) if same_item(held, item) => held.stack_cap().saturating_sub(self.quantity),
            Some(_) => 0,
        }
    }

    /// Place up to `amount` units; returns the units that did not fit
    fn add(&mut self, item: &Arc<ItemDefinition>, amount: u32) -> u32 {
        let placed = amount.min(self.space_for(item));
        if placed > 0 {
            if self.item.is_none() {
                self.item = Some(item.clone());
            }
            self.quantity += placed;
        }
        amount - placed
    }

    /// Take up to `amount` units; returns the units taken
    fn remove(&mut self, amount: u32) -> u32 {
        let taken = amount.min(self.quantity);
        self.quantity -= taken;
        if self.quantity == 0 {
            self.item = None;
        }
        taken
    }

    fn clear(&mut self) {
        self.item = None;
        self.quantity = 0;
    }
}

#[derive(Debug)]
pub struct Inventory {
    slots: Vec<InventorySlot>,
    store: SharedStore,
}

impl Inventory {
    pub fn new(slot_count: usize, store: SharedStore) -> Self {
        Self {
            slots: vec![InventorySlot::default(); slot_count],
            store,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(InventorySlot::is_empty)
    }

    pub fn slots(&self) -> &[InventorySlot] {
        &self.slots
    }

    pub fn slot(&self, index: usize) -> Option<&InventorySlot> {
        self.slots.get(index)
    }

    pub fn has_space(&self) -> bool {
        self.slots.iter().any(InventorySlot::is_empty)
    }

    pub fn item_count(&self, item: &ItemDefinition) -> u64 {
        self.slots
            .iter()
            .filter(|s| s.holds(item))
            .map(|s| u64::from(s.quantity))
            .sum()
    }

    /// Total units of `item` that would fit right now
    pub fn capacity_for(&self, item: &ItemDefinition) -> u64 {
        self.slots.iter().map(|s| s.space_for(item) as u64).sum()
    }

    /// Add `quantity` units, topping up existing stacks before opening new ones
    ///
    /// Returns false without touching any slot if the full quantity does not
    /// fit or is zero.
    pub fn add_item(&mut self, item: &Arc<ItemDefinition>, quantity: u32) -> bool {
        if quantity == 0 {
            return false;
        }
        if self.capacity_for(item) < quantity as u64 {
            tracing::debug!("No room for {} x {}", quantity, item.name);
            return false;
        }

        let mut remaining = quantity;
        for slot in self.slots.iter_mut().filter(|s| s.holds(item)) {
            if remaining == 0 {
                break;
            }
            remaining = slot.add(item, remaining);
        }
        for slot in self.slots.iter_mut().filter(|s| s.is_empty()) {
            if remaining == 0 {
                break;
            }
            remaining = slot.add(item, remaining);
        }
        debug_assert_eq!(remaining, 0);

        self.save();
        true
    }

    /// Remove `quantity` units, lowest slots first
    ///
    /// Returns false without touching any slot if fewer are held.
    pub fn remove_item(&mut self, item: &ItemDefinition, quantity: u32) -> bool {
        if quantity == 0 || self.item_count(item) < u64::from(quantity) {
            return false;
        }

        let mut remaining = quantity;
        for slot in self.slots.iter_mut() {
            if remaining == 0 {
                break;
            }
            if slot.holds(item) {
                remaining -= slot.remove(remaining);
            }
        }

        self.save();
        true
    }

    /// Consume one unit from a slot and apply its effect to `target`
    pub fn use_item(&mut self, slot_index: usize, target: &mut NeedsState) -> bool {
        let Some(slot) = self.slots.get_mut(slot_index) else {
            return false;
        };
        let Some(item) = slot.item.clone() else {
            return false;
        };

        target.restore(item.restore_deltas());
        slot.remove(1);
        tracing::info!("Used {} ({})", item.name, item.effect_summary());

        self.save();
        true
    }

    /// Empty every slot
    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(InventorySlot::clear);
        self.save();
        tracing::info!("Inventory cleared");
    }

    pub fn snapshot(&self) -> InventorySnapshot {
        InventorySnapshot {
            slots: self
                .slots
                .iter()
                .map(|s| match &s.item {
                    Some(item) => SlotRecord { item_name: item.name.clone(), quantity: s.quantity },
                    None => SlotRecord::empty(),
                })
                .collect(),
        }
    }

    /// Replace slot contents from a snapshot, position by position
    ///
    /// Names missing from the catalog are dropped with a warning; quantities
    /// above the stack cap are clamped. Records past the slot count are
    /// ignored. Returns the number of records dropped.
    pub fn restore_snapshot(&mut self, snapshot: &InventorySnapshot, catalog: &ItemCatalog) -> usize {
        self.slots.iter_mut().for_each(InventorySlot::clear);

        let mut dropped = 0;
        for (slot, record) in self.slots.iter_mut().zip(snapshot.slots.iter()) {
            if record.is_empty() {
                continue;
            }
            let Some(item) = catalog.get(&record.item_name) else {
                tracing::warn!("Saved item '{}' is not in the catalog; dropping it", record.item_name);
                dropped += 1;
                continue;
            };
            let cap = item.stack_cap();
            if record.quantity > cap {
                tracing::warn!(
                    "Saved stack of {} x {} exceeds cap {}; clamping",
                    record.quantity,
                    item.name,
                    cap
                );
            }
            slot.add(&item, record.quantity.min(cap));
        }
        if snapshot.slots.len() > self.slots.len() {
            tracing::warn!(
                "Saved inventory has {} slots but only {} exist",
                snapshot.slots.len(),
                self.slots.len()
            );
        }
        dropped
    }

    /// Load the saved snapshot; a missing record leaves the inventory empty
    pub fn load(&mut self, catalog: &ItemCatalog) {
        let Some(value) = self.store.get(INVENTORY_KEY) else {
            tracing::info!("No saved inventory found");
            return;
        };
        match serde_json::from_value::<InventorySnapshot>(value) {
            Ok(snapshot) => {
                self.restore_snapshot(&snapshot, catalog);
                tracing::info!("Inventory loaded");
            }
            Err(e) => tracing::warn!("Saved inventory is unreadable: {}", e),
        }
    }

    pub fn save(&self) {
        match serde_json::to_value(self.snapshot()) {
            Ok(value) => {
                self.store.put(INVENTORY_KEY, value);
            }
            Err(e) => tracing::error!("Failed to serialize inventory: {}", e),
        }
    }

    pub fn clear_saved(&self) {
        self.store.delete(INVENTORY_KEY);
        tracing::info!("Saved inventory cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::catalog::ItemKind;
    use crate::pet::needs::NeedType;

    fn apple() -> Arc<ItemDefinition> {
        Arc::new(
            ItemDefinition::new("Apple", ItemKind::Food)
                .with_restore(20, 0, 0, 0)
                .with_max_stack(10),
        )
    }

    fn ball() -> Arc<ItemDefinition> {
        Arc::new(ItemDefinition::new("Ball", ItemKind::Toy).unstackable())
    }

    fn inventory(slots: usize) -> Inventory {
        Inventory::new(slots, SharedStore::in_memory())
    }

    #[test]
    fn test_overflowing_one_stack_opens_a_second() {
        let mut inv = inventory(4);
        let apple = apple();

        assert!(inv.add_item(&apple, 11));

        assert_eq!(inv.slot(0).unwrap().quantity(), 10);
        assert_eq!(inv.slot(1).unwrap().quantity(), 1);
        assert!(inv.slot(2).unwrap().is_empty());
        assert_eq!(inv.item_count(&apple), 11);
    }

    #[test]
    fn test_counts_past_a_single_stack_limit() {
        let mut inv = inventory(2);
        let sand = Arc::new(ItemDefinition::new("Sand", ItemKind::Toy).with_max_stack(u32::MAX));

        assert!(inv.add_item(&sand, u32::MAX));
        assert!(inv.add_item(&sand, 5));
        assert_eq!(inv.item_count(&sand), u64::from(u32::MAX) + 5);

        assert!(inv.remove_item(&sand, u32::MAX));
        assert_eq!(inv.item_count(&sand), 5);
    }

    #[test]
    fn test_tops_up_existing_stack_before_empty_slots() {
        let mut inv = inventory(3);
        let apple = apple();
        let ball = ball();

        assert!(inv.add_item(&ball, 1));
        assert!(inv.add_item(&apple, 4));
        assert!(inv.add_item(&apple, 5));

        assert!(inv.slot(0).unwrap().holds(&ball));
        assert_eq!(inv.slot(1).unwrap().quantity(), 9);
        assert!(inv.slot(2).unwrap().is_empty());
    }

    #[test]
    fn test_existing_stack_preferred_over_lower_empty_slot() {
        let mut inv = inventory(3);
        let apple = apple();
        assert!(inv.add_item(&apple, 15));
        assert!(inv.remove_item(&apple, 12));
        // slot 0 emptied, slot 1 holds 3
        assert!(inv.add_item(&apple, 2));
        assert_eq!(inv.slot(0).unwrap().quantity(), 0);
        assert_eq!(inv.slot(1).unwrap().quantity(), 5);
    }

    #[test]
    fn test_unstackable_items_take_one_slot_each() {
        let mut inv = inventory(3);
        let ball = ball();
        assert!(inv.add_item(&ball, 2));
        assert_eq!(inv.slot(0).unwrap().quantity(), 1);
        assert_eq!(inv.slot(1).unwrap().quantity(), 1);
        assert!(inv.slot(2).unwrap().is_empty());
    }

    #[test]
    fn test_add_is_all_or_nothing() {
        let mut inv = inventory(2);
        let apple = apple();
        let ball = ball();
        assert!(inv.add_item(&ball, 1));

        assert!(!inv.add_item(&apple, 11));
        assert_eq!(inv.item_count(&apple), 0);
        assert!(inv.slot(1).unwrap().is_empty());

        assert!(!inv.add_item(&apple, 0));
    }

    #[test]
    fn test_remove_is_all_or_nothing() {
        let mut inv = inventory(3);
        let apple = apple();
        inv.add_item(&apple, 5);

        assert!(!inv.remove_item(&apple, 6));
        assert_eq!(inv.item_count(&apple), 5);

        assert!(inv.remove_item(&apple, 5));
        assert!(inv.is_empty());
    }

    #[test]
    fn test_remove_spans_slots_low_to_high() {
        let mut inv = inventory(3);
        let apple = apple();
        inv.add_item(&apple, 14);

        assert!(inv.remove_item(&apple, 12));
        assert!(inv.slot(0).unwrap().is_empty());
        assert_eq!(inv.slot(1).unwrap().quantity(), 2);
    }

    #[test]
    fn test_use_item_restores_and_consumes() {
        let mut inv = inventory(2);
        let apple = apple();
        inv.add_item(&apple, 2);
        let mut needs = NeedsState::default().with_value(NeedType::Hunger, 50.0);

        assert!(inv.use_item(0, &mut needs));
        assert_eq!(needs.get(NeedType::Hunger), 70.0);
        assert_eq!(inv.slot(0).unwrap().quantity(), 1);

        assert!(inv.use_item(0, &mut needs));
        assert!(inv.slot(0).unwrap().is_empty());
        assert!(inv.slot(0).unwrap().item().is_none());
    }

    #[test]
    fn test_use_item_rejects_bad_slots() {
        let mut inv = inventory(2);
        let mut needs = NeedsState::default().with_value(NeedType::Hunger, 50.0);
        assert!(!inv.use_item(5, &mut needs));
        assert!(!inv.use_item(0, &mut needs));
        assert_eq!(needs.get(NeedType::Hunger), 50.0);
    }

    #[test]
    fn test_has_space() {
        let mut inv = inventory(1);
        assert!(inv.has_space());
        inv.add_item(&ball(), 1);
        assert!(!inv.has_space());
    }

    #[test]
    fn test_save_and_load_preserves_positions() {
        let store = SharedStore::in_memory();
        let catalog = ItemCatalog::with_defaults();
        let apple = catalog.get("Apple").unwrap();
        let soap = catalog.get("Soap").unwrap();

        let mut inv = Inventory::new(4, store.clone());
        inv.add_item(&apple, 3);
        inv.add_item(&soap, 2);
        inv.remove_item(&apple, 3);

        let mut reloaded = Inventory::new(4, store);
        reloaded.load(&catalog);
        assert!(reloaded.slot(0).unwrap().is_empty());
        assert!(reloaded.slot(1).unwrap().holds(&soap));
        assert_eq!(reloaded.slot(1).unwrap().quantity(), 2);
    }

    #[test]
    fn test_restore_drops_unknown_and_clamps() {
        let catalog = ItemCatalog::with_defaults();
        let snapshot = InventorySnapshot {
            slots: vec![
                SlotRecord { item_name: "Mystery Meat".into(), quantity: 2 },
                SlotRecord { item_name: "Soap".into(), quantity: 500 },
                SlotRecord::empty(),
            ],
        };
        let mut inv = inventory(3);

        assert_eq!(inv.restore_snapshot(&snapshot, &catalog), 1);
        assert!(inv.slot(0).unwrap().is_empty());
        assert_eq!(inv.slot(1).unwrap().quantity(), 20);
    }

    #[test]
    fn test_load_without_save_is_empty() {
        let mut inv = inventory(3);
        inv.load(&ItemCatalog::with_defaults());
        assert!(inv.is_empty());
    }

    #[test]
    fn test_clear_and_clear_saved() {
        let store = SharedStore::in_memory();
        let mut inv = Inventory::new(2, store.clone());
        inv.add_item(&apple(), 3);
        assert!(store.has_key(INVENTORY_KEY));

        inv.clear();
        assert!(inv.is_empty());

        inv.clear_saved();
        assert!(!store.has_key(INVENTORY_KEY));
    }
}
