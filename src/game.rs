//! PetGame - composition root
//!
//! Builds every component once and hands collaborators to each other
//! explicitly. The host calls [`PetGame::tick`] once per frame with the real
//! elapsed time; everything else is a direct response to a player action.

use std::sync::Arc;

use crate::core::clock::{Clock, TimeSource};
use crate::core::config::GameConfig;
use crate::core::error::Result;
use crate::core::types::{Coins, SubscriptionId, TargetId};
use crate::economy::shop::{PurchaseError, PurchaseReceipt, Shop};
use crate::economy::wallet::Wallet;
use crate::events::{Notification, Observers};
use crate::items::catalog::ItemCatalog;
use crate::items::inventory::Inventory;
use crate::minigame::session::{GameResult, MiniGameSession};
use crate::minigame::stats::GameStats;
use crate::persistence::store::SharedStore;
use crate::pet::monitor::{CriticalMonitor, NeedTransition};
use crate::pet::needs::NeedsState;

pub struct PetGame {
    config: GameConfig,
    catalog: Arc<ItemCatalog>,
    needs: NeedsState,
    monitor: CriticalMonitor,
    inventory: Inventory,
    wallet: Wallet,
    shop: Shop,
    minigame: MiniGameSession,
    stats: GameStats,
    clock: Clock,
    store: SharedStore,
    notifications: Observers<Notification>,
}

impl PetGame {
    pub fn new(
        config: GameConfig,
        catalog: ItemCatalog,
        store: SharedStore,
        time: Box<dyn TimeSource>,
        seed: u64,
    ) -> Result<Self> {
        config.validate()?;
        let shop = Shop::from_catalog("Pet Shop", &catalog, config.shop.restock_amount);

        Ok(Self {
            needs: NeedsState::new(&config.needs),
            monitor: CriticalMonitor::new(config.needs.critical_threshold),
            inventory: Inventory::new(config.inventory.slot_count, store.clone()),
            wallet: Wallet::new(config.wallet.currency_label.clone(), store.clone()),
            shop,
            minigame: MiniGameSession::new(config.minigame.clone(), seed),
            stats: GameStats::new(store.clone()),
            clock: Clock::new(time, store.clone()),
            catalog: Arc::new(catalog),
            store,
            notifications: Observers::new(),
            config,
        })
    }

    /// Replace the default catalog-wide shop
    pub fn with_shop(mut self, shop: Shop) -> Self {
        self.shop = shop;
        self
    }

    /// Load saved state and apply decay for the time spent away
    pub fn start_session(&mut self) {
        self.wallet.load();
        self.inventory.load(&self.catalog);
        self.stats.load();

        match self.clock.elapsed_since_last_session() {
            Some(elapsed) if elapsed > 0.0 => {
                tracing::info!("Applying {:.0}s of offline decay", elapsed);
                self.needs.advance_time(elapsed as f32);
            }
            Some(_) => {}
            None => tracing::info!("First session"),
        }
        self.check_needs();
    }

    /// Record the close time and flush every store write
    pub fn end_session(&mut self) -> Result<()> {
        self.minigame.abort();
        self.clock.record_session_close();
        self.wallet.save();
        self.inventory.save();
        self.store.flush()?;
        tracing::info!("Session saved");
        Ok(())
    }

    /// Advance the simulation by `dt` real seconds
    pub fn tick(&mut self, dt: f32) {
        self.needs.advance_time(dt);
        self.check_needs();

        if let Some(result) = self.minigame.tick(dt, &mut self.wallet) {
            self.on_game_ended(result);
        }
    }

    pub fn use_item(&mut self, slot: usize) -> bool {
        let used = self.inventory.use_item(slot, &mut self.needs);
        if used {
            self.check_needs();
        }
        used
    }

    pub fn purchase(&mut self, offer: usize, quantity: u32) -> std::result::Result<PurchaseReceipt, PurchaseError> {
        let outcome = self.shop.purchase(offer, quantity, &mut self.wallet, &mut self.inventory);
        let notification = match &outcome {
            Ok(receipt) => {
                let message = receipt.message(self.wallet.currency_label());
                tracing::info!("{}", message);
                Notification::PurchaseResult { success: true, message }
            }
            Err(reason) => {
                tracing::info!("Purchase failed: {}", reason);
                Notification::PurchaseResult { success: false, message: reason.to_string() }
            }
        };
        self.notifications.notify(&notification);
        outcome
    }

    pub fn restock_shop(&mut self) {
        self.shop.restock_all();
    }

    pub fn start_minigame(&mut self) {
        self.minigame.start();
    }

    pub fn click_target(&mut self, id: TargetId) -> Option<u32> {
        self.minigame.click_target(id)
    }

    pub fn stop_spawn_loop(&mut self) -> bool {
        self.minigame.stop_spawn_loop()
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&Notification) + 'static) -> SubscriptionId {
        self.notifications.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.notifications.unsubscribe(id)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn catalog(&self) -> &ItemCatalog {
        &self.catalog
    }

    pub fn needs(&self) -> &NeedsState {
        &self.needs
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn wallet(&self) -> &Wallet {
        &self.wallet
    }

    /// For balance subscriptions and admin adjustments
    pub fn wallet_mut(&mut self) -> &mut Wallet {
        &mut self.wallet
    }

    pub fn balance(&self) -> Coins {
        self.wallet.balance()
    }

    pub fn shop(&self) -> &Shop {
        &self.shop
    }

    pub fn minigame(&self) -> &MiniGameSession {
        &self.minigame
    }

    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    fn check_needs(&mut self) {
        for transition in self.monitor.check(&self.needs) {
            let notification = match transition {
                NeedTransition::EnteredCritical(need) => {
                    tracing::warn!("{} is critical", need.label());
                    Notification::NeedCritical(need)
                }
                NeedTransition::Recovered(need) => {
                    tracing::info!("{} recovered", need.label());
                    Notification::NeedRecovered(need)
                }
            };
            self.notifications.notify(&notification);
        }
    }

    fn on_game_ended(&mut self, result: GameResult) {
        let new_best = self.stats.record(result.score, result.reward);
        if new_best {
            tracing::info!("New best score: {}", result.score);
        }
        self.notifications.notify(&Notification::MiniGameEnded {
            score: result.score,
            reward: result.reward,
            new_best,
        });
    }
}

impl std::fmt::Debug for PetGame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PetGame")
            .field("needs", &self.needs)
            .field("balance", &self.wallet.balance())
            .field("minigame", &self.minigame)
            .finish_non_exhaustive()
    }
}
