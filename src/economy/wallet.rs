//! Wallet - the player's coin balance
//!
//! Every change is persisted before observers hear about it, so a listener
//! reacting to `BalanceChanged` always sees durable state.

use serde_json::json;

use crate::core::types::{Coins, SubscriptionId};
use crate::events::{BalanceChanged, Observers};
use crate::persistence::store::{SharedStore, MONEY_KEY};

#[derive(Debug)]
pub struct Wallet {
    balance: Coins,
    currency_label: String,
    store: SharedStore,
    observers: Observers<BalanceChanged>,
}

impl Wallet {
    /// Empty wallet; call [`Wallet::load`] to pick up the saved balance
    pub fn new(currency_label: impl Into<String>, store: SharedStore) -> Self {
        Self {
            balance: 0,
            currency_label: currency_label.into(),
            store,
            observers: Observers::new(),
        }
    }

    pub fn balance(&self) -> Coins {
        self.balance
    }

    pub fn currency_label(&self) -> &str {
        &self.currency_label
    }

    pub fn set_currency_label(&mut self, label: impl Into<String>) {
        self.currency_label = label.into();
    }

    pub fn can_afford(&self, amount: Coins) -> bool {
        self.balance >= amount
    }

    /// Deduct `amount`; fails closed with no change if the balance is short
    pub fn spend(&mut self, amount: Coins) -> bool {
        if amount < 0 {
            tracing::warn!("Refusing to spend a negative amount ({})", amount);
            return false;
        }
        if !self.can_afford(amount) {
            tracing::info!(
                "Not enough {}: need {}, have {}",
                self.currency_label,
                amount,
                self.balance
            );
            return false;
        }

        self.balance -= amount;
        self.commit();
        tracing::info!("Spent {} {}. Remaining: {}", amount, self.currency_label, self.balance);
        true
    }

    /// Credit `amount`; negative amounts are rejected
    pub fn add(&mut self, amount: Coins) -> bool {
        if amount < 0 {
            tracing::warn!("Refusing to add a negative amount ({})", amount);
            return false;
        }

        self.balance = self.balance.saturating_add(amount);
        self.commit();
        tracing::info!("Received {} {}. Total: {}", amount, self.currency_label, self.balance);
        true
    }

    /// Overwrite the balance; negative input becomes zero
    pub fn set(&mut self, amount: Coins) {
        if amount < 0 {
            tracing::warn!("Refusing to set a negative balance ({}); using 0", amount);
        }
        self.balance = amount.max(0);
        self.commit();
        tracing::info!("Balance set to {} {}", self.balance, self.currency_label);
    }

    pub fn reset(&mut self) {
        self.set(0);
    }

    /// Pick up the saved balance, defaulting to zero on first run
    pub fn load(&mut self) {
        self.balance = match self.store.get_int(MONEY_KEY) {
            Some(saved) if saved >= 0 => saved,
            Some(saved) => {
                tracing::warn!("Saved balance {} is negative; using 0", saved);
                0
            }
            None => 0,
        };
        self.observers.notify(&BalanceChanged { balance: self.balance });
        tracing::info!("Balance loaded: {} {}", self.balance, self.currency_label);
    }

    pub fn save(&self) {
        self.store.put(MONEY_KEY, json!(self.balance));
        tracing::debug!("Balance saved: {} {}", self.balance, self.currency_label);
    }

    pub fn clear_saved(&self) {
        self.store.delete(MONEY_KEY);
        tracing::info!("Saved balance cleared");
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&BalanceChanged) + 'static) -> SubscriptionId {
        self.observers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    fn commit(&mut self) {
        self.save();
        self.observers.notify(&BalanceChanged { balance: self.balance });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn wallet_with(balance: Coins) -> Wallet {
        let mut wallet = Wallet::new("Coins", SharedStore::in_memory());
        wallet.set(balance);
        wallet
    }

    #[test]
    fn test_spend_fails_closed() {
        let mut wallet = wallet_with(20);
        assert!(!wallet.spend(21));
        assert_eq!(wallet.balance(), 20);
        assert!(wallet.spend(20));
        assert_eq!(wallet.balance(), 0);
    }

    #[test]
    fn test_negative_amounts_rejected() {
        let mut wallet = wallet_with(10);
        assert!(!wallet.add(-5));
        assert!(!wallet.spend(-5));
        assert_eq!(wallet.balance(), 10);

        wallet.set(-40);
        assert_eq!(wallet.balance(), 0);
    }

    #[test]
    fn test_spend_then_add_restores_balance() {
        let mut wallet = wallet_with(75);
        assert!(wallet.spend(30));
        assert!(wallet.add(30));
        assert_eq!(wallet.balance(), 75);
    }

    #[test]
    fn test_changes_are_durable() {
        let store = SharedStore::in_memory();
        let mut wallet = Wallet::new("Coins", store.clone());
        wallet.add(120);
        wallet.spend(20);

        let mut reloaded = Wallet::new("Coins", store);
        reloaded.load();
        assert_eq!(reloaded.balance(), 100);
    }

    #[test]
    fn test_first_run_loads_zero() {
        let mut wallet = Wallet::new("Coins", SharedStore::in_memory());
        wallet.load();
        assert_eq!(wallet.balance(), 0);
    }

    #[test]
    fn test_observers_see_persisted_balance() {
        let store = SharedStore::in_memory();
        let mut wallet = Wallet::new("Coins", store.clone());
        let seen = Rc::new(RefCell::new(Vec::new()));

        let log = seen.clone();
        let probe = store.clone();
        let id = wallet.subscribe(move |change| {
            log.borrow_mut().push((change.balance, probe.get_int(MONEY_KEY)));
        });

        wallet.add(50);
        wallet.spend(10);
        assert!(!wallet.spend(1_000));
        assert!(wallet.unsubscribe(id));
        wallet.add(1);

        assert_eq!(*seen.borrow(), vec![(50, Some(50)), (40, Some(40))]);
    }

    #[test]
    fn test_reset_and_clear_saved() {
        let store = SharedStore::in_memory();
        let mut wallet = Wallet::new("Gems", store.clone());
        wallet.add(9);
        wallet.reset();
        assert_eq!(wallet.balance(), 0);
        assert_eq!(wallet.currency_label(), "Gems");

        wallet.clear_saved();
        assert!(!store.has_key(MONEY_KEY));
    }
}
