//! Item definitions - what each consumable does and costs
//!
//! Definitions are authored up front (built-in defaults or a TOML file) and
//! never change at runtime. Inventory slots and shop offers hold shared
//! references into the catalog.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::error::{PetError, Result};
use crate::pet::needs::NeedDeltas;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Food,
    Drink,
    Toy,
    Medicine,
    Cleaning,
}

fn default_stackable() -> bool {
    true
}

fn default_max_stack() -> u32 {
    99
}

fn default_price() -> u32 {
    1
}

/// Immutable description of one kind of item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDefinition {
    /// Unique key; also the identifier written to save data
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub kind: ItemKind,
    #[serde(default)]
    pub hunger_restore: u32,
    #[serde(default)]
    pub thirst_restore: u32,
    #[serde(default)]
    pub cleanliness_restore: u32,
    #[serde(default)]
    pub energy_restore: u32,
    #[serde(default = "default_stackable")]
    pub stackable: bool,
    #[serde(default = "default_max_stack")]
    pub max_stack: u32,
    /// Catalog price; shop offers may override it
    #[serde(default = "default_price")]
    pub price: u32,
}

impl ItemDefinition {
    pub fn new(name: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            kind,
            hunger_restore: 0,
            thirst_restore: 0,
            cleanliness_restore: 0,
            energy_restore: 0,
            stackable: default_stackable(),
            max_stack: default_max_stack(),
            price: default_price(),
        }
    }

    pub fn with_restore(mut self, hunger: u32, thirst: u32, cleanliness: u32, energy: u32) -> Self {
        self.hunger_restore = hunger;
        self.thirst_restore = thirst;
        self.cleanliness_restore = cleanliness;
        self.energy_restore = energy;
        self
    }

    pub fn with_price(mut self, price: u32) -> Self {
        self.price = price;
        self
    }

    pub fn with_max_stack(mut self, max_stack: u32) -> Self {
        self.max_stack = max_stack;
        self
    }

    pub fn unstackable(mut self) -> Self {
        self.stackable = false;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Most units one slot can hold
    pub fn stack_cap(&self) -> u32 {
        if self.stackable {
            self.max_stack.max(1)
        } else {
            1
        }
    }

    pub fn restore_deltas(&self) -> NeedDeltas {
        NeedDeltas::new(
            self.hunger_restore as f32,
            self.thirst_restore as f32,
            self.cleanliness_restore as f32,
            self.energy_restore as f32,
        )
    }

    /// Short effect line for tooltips, e.g. "+20 Food +10 Energy"
    pub fn effect_summary(&self) -> String {
        [
            (self.hunger_restore, "Food"),
            (self.thirst_restore, "Water"),
            (self.cleanliness_restore, "Clean"),
            (self.energy_restore, "Energy"),
        ]
        .iter()
        .filter(|(amount, _)| *amount > 0)
        .map(|(amount, label)| format!("+{} {}", amount, label))
        .collect::<Vec<_>>()
        .join(" ")
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    items: Vec<ItemDefinition>,
}

/// Catalog of all known items, indexed by name
#[derive(Debug, Clone, Default)]
pub struct ItemCatalog {
    items: Vec<Arc<ItemDefinition>>,
    by_name: AHashMap<String, usize>,
}

impl ItemCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in pet shop assortment
    pub fn with_defaults() -> Self {
        let mut catalog = Self::new();
        let defaults = [
            ItemDefinition::new("Apple", ItemKind::Food)
                .with_restore(20, 0, 0, 0)
                .with_price(5)
                .with_description("A crunchy snack"),
            ItemDefinition::new("Kibble", ItemKind::Food)
                .with_restore(35, 0, 0, 5)
                .with_price(12)
                .with_description("A full bowl of dry food"),
            ItemDefinition::new("Water Bottle", ItemKind::Drink)
                .with_restore(0, 25, 0, 0)
                .with_price(4),
            ItemDefinition::new("Juice", ItemKind::Drink)
                .with_restore(0, 15, 0, 10)
                .with_price(8),
            ItemDefinition::new("Soap", ItemKind::Cleaning)
                .with_restore(0, 0, 40, 0)
                .with_price(10)
                .with_max_stack(20),
            ItemDefinition::new("Energy Treat", ItemKind::Food)
                .with_restore(5, 0, 0, 30)
                .with_price(15),
            ItemDefinition::new("Vitamins", ItemKind::Medicine)
                .with_restore(10, 10, 10, 10)
                .with_price(30)
                .with_max_stack(10),
            ItemDefinition::new("Ball", ItemKind::Toy)
                .with_restore(0, 0, 0, 15)
                .with_price(25)
                .unstackable(),
        ];
        for item in defaults {
            // Built-in names are distinct
            let _ = catalog.add(item);
        }
        catalog
    }

    /// Parse a catalog from TOML `[[items]]` tables
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(content)?;
        let mut catalog = Self::new();
        for item in file.items {
            catalog.add(item)?;
        }
        Ok(catalog)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn add(&mut self, item: ItemDefinition) -> Result<Arc<ItemDefinition>> {
        if item.name.is_empty() {
            return Err(PetError::InvalidConfig("item name must not be empty".into()));
        }
        if self.by_name.contains_key(&item.name) {
            return Err(PetError::DuplicateItem(item.name));
        }
        let item = Arc::new(item);
        self.by_name.insert(item.name.clone(), self.items.len());
        self.items.push(item.clone());
        Ok(item)
    }

    pub fn get(&self, name: &str) -> Option<Arc<ItemDefinition>> {
        self.by_name.get(name).map(|&idx| self.items[idx].clone())
    }

    /// Like `get` but an unknown name is an error
    pub fn require(&self, name: &str) -> Result<Arc<ItemDefinition>> {
        self.get(name).ok_or_else(|| PetError::UnknownItem(name.to_owned()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<ItemDefinition>> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
