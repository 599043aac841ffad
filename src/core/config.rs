//! Game configuration with documented constants
//!
//! All tuning numbers are collected here with explanations of their purpose
//! and how they interact with each other. Every section falls back to its
//! defaults when omitted from a TOML file.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{PetError, Result};

/// Configuration for the whole simulation core
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub needs: NeedsConfig,
    pub inventory: InventoryConfig,
    pub wallet: WalletConfig,
    pub shop: ShopConfig,
    pub minigame: MiniGameConfig,
}

/// Decay rates for the four pet needs
///
/// Needs live in [0, 100] where 100 is fully satisfied. Rates are points lost
/// per real second, so at the default hunger rate (0.5) a full pet is starving
/// after a bit more than three minutes of play.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NeedsConfig {
    pub hunger_decay_rate: f32,
    /// Thirst is the fastest need so drinks are the most frequent purchase
    pub thirst_decay_rate: f32,
    pub cleanliness_decay_rate: f32,
    pub energy_decay_rate: f32,

    /// Value at or below which a need counts as critical
    ///
    /// Crossing this line (either way) raises a notification.
    pub critical_threshold: f32,
}

impl Default for NeedsConfig {
    fn default() -> Self {
        Self {
            hunger_decay_rate: 0.5,
            thirst_decay_rate: 0.7,
            cleanliness_decay_rate: 0.3,
            energy_decay_rate: 0.4,
            critical_threshold: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryConfig {
    /// Fixed number of slots; never grows at runtime
    pub slot_count: usize,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self { slot_count: 20 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalletConfig {
    pub currency_label: String,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self { currency_label: "Coins".into() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShopConfig {
    /// Units added to every limited offer by a restock-all
    pub restock_amount: u32,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self { restock_amount: 10 }
    }
}

/// Upper bound on mini-game target spawns per second
pub const MAX_SPAWN_RATE: f32 = 100.0;

/// Tuning for the clicker mini-game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MiniGameConfig {
    /// Length of one round in seconds
    pub duration: f32,
    pub points_per_click: u32,

    /// Spawn opportunities per second
    ///
    /// One opportunity is skipped whenever `max_targets` are already live.
    pub spawn_rate: f32,
    pub max_targets: usize,

    /// Seconds a target stays clickable before it silently expires
    pub target_lifetime: f32,

    /// Minimum distance between live targets (best effort, see placement)
    pub min_spacing: f32,
    pub area_width: f32,
    pub area_height: f32,

    /// Candidate positions tried before the last one is accepted anyway
    pub placement_attempts: u32,

    /// Coins paid at the end of every round regardless of score
    pub base_reward: u32,

    /// Coins per point on top of `base_reward`
    ///
    /// reward = round(base_reward + score * per_point_rate)
    pub per_point_rate: f32,
}

impl Default for MiniGameConfig {
    fn default() -> Self {
        Self {
            duration: 30.0,
            points_per_click: 10,
            spawn_rate: 1.0,
            max_targets: 5,
            target_lifetime: 3.0,
            min_spacing: 100.0,
            area_width: 800.0,
            area_height: 600.0,
            placement_attempts: 10,
            base_reward: 50,
            per_point_rate: 0.5,
        }
    }
}

impl GameConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML text and validate it
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: GameConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file from disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        let n = &self.needs;
        let rates = [
            n.hunger_decay_rate,
            n.thirst_decay_rate,
            n.cleanliness_decay_rate,
            n.energy_decay_rate,
        ];
        if rates.iter().any(|r| !r.is_finite() || *r <= 0.0) {
            return Err(PetError::InvalidConfig("decay rates must be positive".into()));
        }
        if !(0.0..=100.0).contains(&n.critical_threshold) {
            return Err(PetError::InvalidConfig(format!(
                "critical_threshold ({}) must be within [0, 100]",
                n.critical_threshold
            )));
        }

        if self.inventory.slot_count == 0 {
            return Err(PetError::InvalidConfig("inventory needs at least one slot".into()));
        }

        let m = &self.minigame;
        if [m.duration, m.spawn_rate, m.target_lifetime]
            .iter()
            .any(|v| !v.is_finite() || *v <= 0.0)
        {
            return Err(PetError::InvalidConfig(
                "mini-game duration, spawn_rate and target_lifetime must be positive".into(),
            ));
        }
        if m.spawn_rate > MAX_SPAWN_RATE {
            return Err(PetError::InvalidConfig(format!(
                "spawn_rate ({}) must not exceed {} per second",
                m.spawn_rate, MAX_SPAWN_RATE
            )));
        }
        if [m.min_spacing, m.per_point_rate, m.area_width, m.area_height]
            .iter()
            .any(|v| !v.is_finite() || *v < 0.0)
        {
            return Err(PetError::InvalidConfig(
                "min_spacing, per_point_rate and the spawn area must be finite and non-negative".into(),
            ));
        }
        // Targets are kept half a spacing away from the edges
        if m.area_width <= m.min_spacing || m.area_height <= m.min_spacing {
            return Err(PetError::InvalidConfig(format!(
                "spawn area ({}x{}) must be larger than min_spacing ({})",
                m.area_width, m.area_height, m.min_spacing
            )));
        }
        if m.placement_attempts == 0 {
            return Err(PetError::InvalidConfig("placement_attempts must be at least 1".into()));
        }

        Ok(())
    }
}
