//! Persisted mini-game records

use serde_json::json;

use crate::core::types::Coins;
use crate::persistence::store::{SharedStore, BEST_SCORE_KEY, TOTAL_EARNED_KEY};

#[derive(Debug)]
pub struct GameStats {
    best_score: u32,
    total_earned: Coins,
    store: SharedStore,
}

impl GameStats {
    pub fn new(store: SharedStore) -> Self {
        Self { best_score: 0, total_earned: 0, store }
    }

    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    pub fn total_earned(&self) -> Coins {
        self.total_earned
    }

    pub fn load(&mut self) {
        self.best_score = self
            .store
            .get_int(BEST_SCORE_KEY)
            .and_then(|v| u32::try_from(v).ok())
            .unwrap_or(0);
        self.total_earned = self.store.get_int(TOTAL_EARNED_KEY).unwrap_or(0).max(0);
    }

    /// Fold in a finished round; returns true on a new best score
    pub fn record(&mut self, score: u32, reward: Coins) -> bool {
        let new_best = score > self.best_score;
        if new_best {
            self.best_score = score;
        }
        self.total_earned = self.total_earned.saturating_add(reward.max(0));
        self.save();
        new_best
    }

    pub fn reset(&mut self) {
        self.best_score = 0;
        self.total_earned = 0;
        self.save();
    }

    fn save(&self) {
        self.store.put(BEST_SCORE_KEY, json!(self.best_score));
        self.store.put(TOTAL_EARNED_KEY, json!(self.total_earned));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_best_score_only_rises() {
        let mut stats = GameStats::new(SharedStore::in_memory());
        assert!(stats.record(40, 70));
        assert!(!stats.record(30, 65));
        assert!(!stats.record(40, 70));
        assert_eq!(stats.best_score(), 40);
        assert_eq!(stats.total_earned(), 205);
    }

    #[test]
    fn test_stats_survive_reload() {
        let store = SharedStore::in_memory();
        let mut stats = GameStats::new(store.clone());
        stats.record(90, 95);

        let mut reloaded = GameStats::new(store);
        reloaded.load();
        assert_eq!(reloaded.best_score(), 90);
        assert_eq!(reloaded.total_earned(), 95);

        reloaded.reset();
        assert_eq!(reloaded.best_score(), 0);
    }
}
