//! Save-data record formats

use serde::{Deserialize, Serialize};

/// One inventory slot as written to save data
///
/// Empty slots are kept as `{ item_name: "", quantity: 0 }` so slot
/// positions survive a reload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotRecord {
    pub item_name: String,
    pub quantity: u32,
}

impl SlotRecord {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.item_name.is_empty() || self.quantity == 0
    }
}

/// Ordered slot list, one record per inventory slot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySnapshot {
    #[serde(default)]
    pub slots: Vec<SlotRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_json_keeps_placeholders() {
        let snapshot = InventorySnapshot {
            slots: vec![
                SlotRecord { item_name: "Apple".into(), quantity: 3 },
                SlotRecord::empty(),
            ],
        };
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "slots": [
                    { "item_name": "Apple", "quantity": 3 },
                    { "item_name": "", "quantity": 0 }
                ]
            })
        );
        let back: InventorySnapshot = serde_json::from_value(json).unwrap();
        assert_eq!(back, snapshot);
        assert!(back.slots[1].is_empty());
    }
}
