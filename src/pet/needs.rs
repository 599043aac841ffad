//! The four decaying pet needs

use serde::{Deserialize, Serialize};

use crate::core::config::NeedsConfig;

pub const NEED_MIN: f32 = 0.0;
pub const NEED_MAX: f32 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NeedType {
    Hunger,
    Thirst,
    Cleanliness,
    Energy,
}

impl NeedType {
    pub const ALL: [NeedType; 4] = [
        NeedType::Hunger,
        NeedType::Thirst,
        NeedType::Cleanliness,
        NeedType::Energy,
    ];

    pub fn index(self) -> usize {
        match self {
            NeedType::Hunger => 0,
            NeedType::Thirst => 1,
            NeedType::Cleanliness => 2,
            NeedType::Energy => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            NeedType::Hunger => "Hunger",
            NeedType::Thirst => "Thirst",
            NeedType::Cleanliness => "Cleanliness",
            NeedType::Energy => "Energy",
        }
    }
}

/// Restoration amounts, one per need
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NeedDeltas {
    #[serde(default)]
    pub hunger: f32,
    #[serde(default)]
    pub thirst: f32,
    #[serde(default)]
    pub cleanliness: f32,
    #[serde(default)]
    pub energy: f32,
}

impl NeedDeltas {
    pub fn new(hunger: f32, thirst: f32, cleanliness: f32, energy: f32) -> Self {
        Self { hunger, thirst, cleanliness, energy }
    }

    pub fn get(&self, need: NeedType) -> f32 {
        match need {
            NeedType::Hunger => self.hunger,
            NeedType::Thirst => self.thirst,
            NeedType::Cleanliness => self.cleanliness,
            NeedType::Energy => self.energy,
        }
    }
}

/// Current need levels with their decay rates
///
/// 100 = fully satisfied, 0 = neglected. Every mutation clamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeedsState {
    values: [f32; 4],
    decay_rates: [f32; 4],
}

impl Default for NeedsState {
    fn default() -> Self {
        Self::new(&NeedsConfig::default())
    }
}

impl NeedsState {
    /// Fresh pet with every need full
    pub fn new(config: &NeedsConfig) -> Self {
        Self {
            values: [NEED_MAX; 4],
            decay_rates: [
                config.hunger_decay_rate,
                config.thirst_decay_rate,
                config.cleanliness_decay_rate,
                config.energy_decay_rate,
            ],
        }
    }

    /// Builder for tests and loaded state
    pub fn with_value(mut self, need: NeedType, value: f32) -> Self {
        self.set(need, value);
        self
    }

    pub fn get(&self, need: NeedType) -> f32 {
        self.values[need.index()]
    }

    pub fn decay_rate(&self, need: NeedType) -> f32 {
        self.decay_rates[need.index()]
    }

    pub fn set(&mut self, need: NeedType, value: f32) {
        let value = if value.is_nan() { NEED_MIN } else { value };
        self.values[need.index()] = value.clamp(NEED_MIN, NEED_MAX);
    }

    /// Decay every need by `dt * rate`
    ///
    /// Also used once at startup with the whole offline gap; the result is
    /// the same as replaying each missed tick because decay is linear up to
    /// the floor.
    pub fn advance_time(&mut self, dt: f32) {
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }
        for (value, rate) in self.values.iter_mut().zip(self.decay_rates.iter()) {
            *value = (*value - dt * rate).max(NEED_MIN);
        }
    }

    /// Add positive deltas, capped at the maximum
    ///
    /// Zero, negative and NaN components are ignored: restoring never lowers
    /// a need.
    pub fn restore(&mut self, deltas: NeedDeltas) {
        for need in NeedType::ALL {
            let amount = deltas.get(need);
            if amount > 0.0 {
                let slot = &mut self.values[need.index()];
                *slot = (*slot + amount).min(NEED_MAX);
            }
        }
    }

    /// Lowest need and its value
    pub fn most_urgent(&self) -> (NeedType, f32) {
        NeedType::ALL
            .into_iter()
            .map(|n| (n, self.get(n)))
            .fold((NeedType::Hunger, f32::INFINITY), |best, cur| {
                if cur.1 < best.1 { cur } else { best }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_full() {
        let needs = NeedsState::default();
        for n in NeedType::ALL {
            assert_eq!(needs.get(n), NEED_MAX);
        }
    }

    #[test]
    fn test_advance_time_uses_per_need_rates() {
        let mut needs = NeedsState::default();
        needs.advance_time(10.0);

        assert!((needs.get(NeedType::Hunger) - 95.0).abs() < 1e-4);
        assert!((needs.get(NeedType::Thirst) - 93.0).abs() < 1e-4);
        assert!((needs.get(NeedType::Cleanliness) - 97.0).abs() < 1e-4);
        assert!((needs.get(NeedType::Energy) - 96.0).abs() < 1e-4);
    }

    #[test]
    fn test_catch_up_decay_floors_at_zero() {
        let mut needs = NeedsState::default();
        needs.advance_time(86_400.0);
        for n in NeedType::ALL {
            assert_eq!(needs.get(n), NEED_MIN);
        }
    }

    #[test]
    fn test_advance_time_ignores_bad_input() {
        let mut needs = NeedsState::default();
        needs.advance_time(-5.0);
        needs.advance_time(f32::NAN);
        needs.advance_time(f32::INFINITY);
        assert_eq!(needs, NeedsState::default());
    }

    #[test]
    fn test_restore_clamps_and_skips_non_positive() {
        let mut needs = NeedsState::default()
            .with_value(NeedType::Hunger, 40.0)
            .with_value(NeedType::Thirst, 95.0)
            .with_value(NeedType::Energy, 30.0);

        needs.restore(NeedDeltas::new(25.0, 20.0, -50.0, 0.0));

        assert_eq!(needs.get(NeedType::Hunger), 65.0);
        assert_eq!(needs.get(NeedType::Thirst), NEED_MAX);
        assert_eq!(needs.get(NeedType::Cleanliness), NEED_MAX);
        assert_eq!(needs.get(NeedType::Energy), 30.0);
    }

    #[test]
    fn test_set_clamps() {
        let mut needs = NeedsState::default();
        needs.set(NeedType::Energy, 250.0);
        assert_eq!(needs.get(NeedType::Energy), NEED_MAX);
        needs.set(NeedType::Energy, -1.0);
        assert_eq!(needs.get(NeedType::Energy), NEED_MIN);
    }

    #[test]
    fn test_most_urgent() {
        let needs = NeedsState::default()
            .with_value(NeedType::Cleanliness, 12.0)
            .with_value(NeedType::Hunger, 50.0);
        assert_eq!(needs.most_urgent(), (NeedType::Cleanliness, 12.0));
    }
}
