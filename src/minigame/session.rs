//! Clicker mini-game - timed scoring loop
//!
//! `Idle -> Running -> Ended -> Idle`, restartable at any point. The host
//! drives everything through [`MiniGameSession::tick`]; there are no
//! background tasks.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::core::config::MiniGameConfig;
use crate::core::timer::{Countdown, Interval};
use crate::core::types::{Coins, TargetId, Vec2};
use crate::economy::wallet::Wallet;
use crate::minigame::placement::{pick_position, SpawnArea};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Running,
    Ended,
}

/// A clickable target on the play field
#[derive(Debug, Clone)]
pub struct Target {
    pub id: TargetId,
    pub position: Vec2,
    pub points: u32,
    lifetime: Countdown,
}

impl Target {
    pub fn time_left(&self) -> f32 {
        self.lifetime.remaining()
    }
}

/// Final numbers of a finished round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameResult {
    pub score: u32,
    pub reward: Coins,
}

/// reward = round(base + score * rate), ties to even
pub fn compute_reward(config: &MiniGameConfig, score: u32) -> Coins {
    let raw = config.base_reward as f64 + score as f64 * config.per_point_rate as f64;
    raw.round_ties_even() as Coins
}

pub struct MiniGameSession {
    config: MiniGameConfig,
    state: SessionState,
    score: u32,
    clock: Countdown,
    spawn_loop: Interval,
    targets: Vec<Target>,
    next_target: u32,
    last_result: Option<GameResult>,
    rng: ChaCha8Rng,
}

impl MiniGameSession {
    pub fn new(config: MiniGameConfig, seed: u64) -> Self {
        Self {
            config,
            state: SessionState::Idle,
            score: 0,
            clock: Countdown::default(),
            spawn_loop: Interval::default(),
            targets: Vec::new(),
            next_target: 0,
            last_result: None,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &MiniGameConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SessionState::Running
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn time_remaining(&self) -> f32 {
        self.clock.remaining()
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn last_result(&self) -> Option<GameResult> {
        self.last_result
    }

    pub fn spawn_loop_running(&self) -> bool {
        self.spawn_loop.is_running()
    }

    /// Begin a fresh round, discarding anything left from the previous one
    pub fn start(&mut self) {
        self.score = 0;
        self.targets.clear();
        self.last_result = None;
        self.clock = Countdown::new(self.config.duration);
        self.spawn_loop = Interval::new(1.0 / self.config.spawn_rate);
        self.state = SessionState::Running;
        tracing::debug!("Mini-game started ({}s)", self.config.duration);

        // First spawn is immediate; the interval governs the rest
        self.try_spawn();
    }

    pub fn restart(&mut self) {
        self.start();
    }

    /// Advance the round by `dt` seconds
    ///
    /// Returns the result on the tick the round ends; the reward has already
    /// been credited to `wallet` at that point.
    pub fn tick(&mut self, dt: f32, wallet: &mut Wallet) -> Option<GameResult> {
        if !self.is_running() || !dt.is_finite() || dt <= 0.0 {
            return None;
        }

        self.targets.retain_mut(|t| !t.lifetime.advance(dt));

        if self.clock.advance(dt) {
            return Some(self.finish(wallet));
        }

        // Spawns beyond the live-target cap would be refused anyway
        let due = self.spawn_loop.advance(dt).min(self.config.max_targets as u32);
        for _ in 0..due {
            self.try_spawn();
        }
        None
    }

    /// Register a click; returns the points awarded
    ///
    /// Ignored outside a running round or for targets that already expired.
    pub fn click_target(&mut self, id: TargetId) -> Option<u32> {
        if !self.is_running() {
            return None;
        }
        let idx = self.targets.iter().position(|t| t.id == id)?;
        let target = self.targets.swap_remove(idx);
        self.score = self.score.saturating_add(target.points);
        Some(target.points)
    }

    /// Stop spawning new targets; returns false if already stopped
    pub fn stop_spawn_loop(&mut self) -> bool {
        self.spawn_loop.stop()
    }

    /// Abandon a running round with no reward
    pub fn abort(&mut self) {
        if self.state != SessionState::Running {
            return;
        }
        self.halt();
        self.state = SessionState::Idle;
        tracing::debug!("Mini-game aborted at score {}", self.score);
    }

    /// Leave the results screen
    pub fn dismiss(&mut self) {
        if self.state == SessionState::Ended {
            self.state = SessionState::Idle;
        }
    }

    fn try_spawn(&mut self) -> Option<TargetId> {
        if self.targets.len() >= self.config.max_targets {
            return None;
        }
        let occupied: Vec<Vec2> = self.targets.iter().map(|t| t.position).collect();
        let position = pick_position(
            &mut self.rng,
            SpawnArea::new(self.config.area_width, self.config.area_height),
            self.config.min_spacing,
            &occupied,
            self.config.placement_attempts,
        );

        let id = TargetId(self.next_target);
        self.next_target = self.next_target.wrapping_add(1);
        self.targets.push(Target {
            id,
            position,
            points: self.config.points_per_click,
            lifetime: Countdown::new(self.config.target_lifetime),
        });
        Some(id)
    }

    fn halt(&mut self) {
        self.spawn_loop.stop();
        self.clock.stop();
        self.targets.clear();
    }

    fn finish(&mut self, wallet: &mut Wallet) -> GameResult {
        self.halt();
        self.state = SessionState::Ended;

        let result = GameResult { score: self.score, reward: compute_reward(&self.config, self.score) };
        wallet.add(result.reward);
        self.last_result = Some(result);
        tracing::info!("Mini-game ended - score: {}, reward: {}", result.score, result.reward);
        result
    }
}

impl std::fmt::Debug for MiniGameSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MiniGameSession")
            .field("state", &self.state)
            .field("score", &self.score)
            .field("time_remaining", &self.clock.remaining())
            .field("targets", &self.targets.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::store::SharedStore;

    fn wallet() -> Wallet {
        Wallet::new("Coins", SharedStore::in_memory())
    }

    fn session() -> MiniGameSession {
        MiniGameSession::new(MiniGameConfig::default(), 11)
    }

    #[test]
    fn test_reward_formula() {
        let config = MiniGameConfig::default();
        assert_eq!(compute_reward(&config, 20), 60);
        assert_eq!(compute_reward(&config, 0), 50);
        // 50 + 5 * 0.5 = 52.5 rounds to even
        assert_eq!(compute_reward(&config, 5), 52);
        assert_eq!(compute_reward(&config, 7), 54);
    }

    #[test]
    fn test_start_resets_and_spawns() {
        let mut s = session();
        assert_eq!(s.state(), SessionState::Idle);
        s.start();
        assert!(s.is_running());
        assert_eq!(s.score(), 0);
        assert_eq!(s.time_remaining(), 30.0);
        assert_eq!(s.targets().len(), 1);
    }

    #[test]
    fn test_spawns_up_to_cap() {
        let mut s = session();
        let mut w = wallet();
        s.start();
        for _ in 0..20 {
            s.tick(0.25, &mut w);
        }
        // Lifetime 3s at 1 spawn/s keeps at most 3-4 alive; never above the cap
        assert!(s.targets().len() <= s.config().max_targets);
        assert!(s.targets().len() >= 2);
    }

    #[test]
    fn test_targets_expire_without_points() {
        let mut config = MiniGameConfig::default();
        config.spawn_rate = 0.01;
        let mut s = MiniGameSession::new(config, 5);
        let mut w = wallet();
        s.start();
        let id = s.targets()[0].id;

        s.tick(3.5, &mut w);
        assert!(s.targets().is_empty());
        assert_eq!(s.click_target(id), None);
        assert_eq!(s.score(), 0);
    }

    #[test]
    fn test_click_scores_and_despawns() {
        let mut s = session();
        s.start();
        let id = s.targets()[0].id;

        assert_eq!(s.click_target(id), Some(10));
        assert_eq!(s.click_target(id), None);
        assert_eq!(s.score(), 10);
        assert!(s.targets().is_empty());
    }

    #[test]
    fn test_end_credits_once() {
        let mut s = session();
        let mut w = wallet();
        s.start();
        let id = s.targets()[0].id;
        s.click_target(id);

        let mut results = Vec::new();
        for _ in 0..40 {
            if let Some(r) = s.tick(1.0, &mut w) {
                results.push(r);
            }
        }

        assert_eq!(results, vec![GameResult { score: 10, reward: 55 }]);
        assert_eq!(w.balance(), 55);
        assert_eq!(s.state(), SessionState::Ended);
        assert!(s.targets().is_empty());
        assert_eq!(s.time_remaining(), 0.0);
        assert!(!s.spawn_loop_running());
        assert_eq!(s.last_result(), Some(GameResult { score: 10, reward: 55 }));
    }

    #[test]
    fn test_clicks_ignored_after_end() {
        let mut s = session();
        let mut w = wallet();
        s.start();
        let id = s.targets()[0].id;
        s.tick(30.0, &mut w);
        assert_eq!(s.click_target(id), None);
    }

    #[test]
    fn test_extreme_spawn_rate_tick_returns() {
        let mut config = MiniGameConfig::default();
        config.spawn_rate = 1e10;
        let mut s = MiniGameSession::new(config, 3);
        let mut w = wallet();
        s.start();

        assert_eq!(s.tick(0.1, &mut w), None);
        assert_eq!(s.targets().len(), s.config().max_targets);
        assert!(s.is_running());
    }

    #[test]
    fn test_stop_spawn_loop_is_idempotent() {
        let mut s = session();
        let mut w = wallet();
        s.start();
        assert!(s.stop_spawn_loop());
        assert!(!s.stop_spawn_loop());

        s.tick(2.0, &mut w);
        assert_eq!(s.targets().len(), 1);
        assert!(s.is_running());
    }

    #[test]
    fn test_restart_clears_previous_round() {
        let mut s = session();
        let mut w = wallet();
        s.start();
        let id = s.targets()[0].id;
        s.click_target(id);
        s.tick(31.0, &mut w);
        s.dismiss();
        assert_eq!(s.state(), SessionState::Idle);

        s.restart();
        assert_eq!(s.score(), 0);
        assert!(s.last_result().is_none());
        assert!(s.is_running());
    }

    #[test]
    fn test_abort_pays_nothing() {
        let mut s = session();
        let mut w = wallet();
        s.start();
        s.abort();
        s.abort();
        assert_eq!(s.state(), SessionState::Idle);
        assert_eq!(s.tick(40.0, &mut w), None);
        assert_eq!(w.balance(), 0);
    }
}
