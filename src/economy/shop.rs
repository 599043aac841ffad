//! Shop - priced offers and the purchase transaction
//!
//! A purchase touches three things: the wallet, the inventory and the
//! offer's stock. Either all three change consistently or none does.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::types::Coins;
use crate::economy::wallet::Wallet;
use crate::items::catalog::{ItemCatalog, ItemDefinition};
use crate::items::inventory::Inventory;

/// Why a purchase did not happen; `Display` is the player-facing message
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PurchaseError {
    #[error("Invalid offer!")]
    InvalidOffer(usize),

    #[error("Pick at least one item!")]
    InvalidQuantity,

    #[error("{item} is sold out!")]
    SoldOut { item: String },

    #[error("Only {available} x {item} left in stock!")]
    InsufficientStock { item: String, available: u32 },

    #[error("Not enough money! Need: {needed}")]
    InsufficientFunds { needed: Coins, balance: Coins },

    #[error("That order is too large!")]
    PriceOverflow,

    #[error("Not enough room in the inventory for {item}!")]
    InventoryFull { item: String },
}

/// Units an offer can still sell
///
/// Stored as -1 for unlimited, matching the save/config format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum Stock {
    Unlimited,
    Limited(u32),
}

impl From<i64> for Stock {
    fn from(raw: i64) -> Self {
        if raw < 0 {
            Stock::Unlimited
        } else {
            Stock::Limited(raw.min(u32::MAX as i64) as u32)
        }
    }
}

impl From<Stock> for i64 {
    fn from(stock: Stock) -> Self {
        match stock {
            Stock::Unlimited => -1,
            Stock::Limited(n) => n as i64,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ShopOffer {
    pub item: Arc<ItemDefinition>,
    pub price: u32,
    pub stock: Stock,
    pub available: bool,
}

impl ShopOffer {
    pub fn new(item: Arc<ItemDefinition>, price: u32, stock: Stock) -> Self {
        let available = stock != Stock::Limited(0);
        Self { item, price, stock, available }
    }

    /// Offer at the item's catalog price with no stock limit
    pub fn unlimited(item: Arc<ItemDefinition>) -> Self {
        let price = item.price;
        Self::new(item, price, Stock::Unlimited)
    }

    pub fn total_cost(&self, quantity: u32) -> Option<Coins> {
        Coins::from(self.price).checked_mul(Coins::from(quantity))
    }

    /// Availability, then stock, then affordability
    pub fn can_purchase(&self, balance: Coins, quantity: u32) -> Result<Coins, PurchaseError> {
        if !self.available {
            return Err(PurchaseError::SoldOut { item: self.item.name.clone() });
        }
        if let Stock::Limited(left) = self.stock {
            if left < quantity {
                return Err(PurchaseError::InsufficientStock {
                    item: self.item.name.clone(),
                    available: left,
                });
            }
        }
        let cost = self.total_cost(quantity).ok_or(PurchaseError::PriceOverflow)?;
        if balance < cost {
            return Err(PurchaseError::InsufficientFunds { needed: cost, balance });
        }
        Ok(cost)
    }

    fn record_sale(&mut self, quantity: u32) {
        if let Stock::Limited(left) = self.stock {
            let left = left.saturating_sub(quantity);
            self.stock = Stock::Limited(left);
            if left == 0 {
                self.available = false;
            }
        }
    }

    /// Add stock to a limited offer and re-enable it
    pub fn restock(&mut self, amount: u32) -> bool {
        match self.stock {
            Stock::Unlimited => false,
            Stock::Limited(left) => {
                self.stock = Stock::Limited(left.saturating_add(amount));
                self.available = left.saturating_add(amount) > 0;
                true
            }
        }
    }
}

/// Successful purchase summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseReceipt {
    pub item_name: String,
    pub quantity: u32,
    pub total_cost: Coins,
}

impl PurchaseReceipt {
    pub fn message(&self, currency_label: &str) -> String {
        format!(
            "Bought {} x {} for {} {}!",
            self.quantity, self.item_name, self.total_cost, currency_label
        )
    }
}

#[derive(Debug, Clone)]
pub struct Shop {
    name: String,
    offers: Vec<ShopOffer>,
    restock_amount: u32,
}

impl Shop {
    pub fn new(name: impl Into<String>, restock_amount: u32) -> Self {
        Self { name: name.into(), offers: Vec::new(), restock_amount }
    }

    /// One unlimited offer per catalog item at catalog price
    pub fn from_catalog(name: impl Into<String>, catalog: &ItemCatalog, restock_amount: u32) -> Self {
        let mut shop = Self::new(name, restock_amount);
        for item in catalog.iter() {
            shop.add_offer(ShopOffer::unlimited(item.clone()));
        }
        shop
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn offers(&self) -> &[ShopOffer] {
        &self.offers
    }

    pub fn offer(&self, index: usize) -> Option<&ShopOffer> {
        self.offers.get(index)
    }

    pub fn add_offer(&mut self, offer: ShopOffer) {
        self.offers.push(offer);
    }

    pub fn remove_offer(&mut self, index: usize) -> Option<ShopOffer> {
        (index < self.offers.len()).then(|| self.offers.remove(index))
    }

    pub fn restock(&mut self, index: usize, amount: u32) -> bool {
        self.offers.get_mut(index).is_some_and(|offer| offer.restock(amount))
    }

    /// Top up every limited offer by the configured amount
    pub fn restock_all(&mut self) {
        let amount = self.restock_amount;
        for offer in self.offers.iter_mut() {
            offer.restock(amount);
        }
        tracing::info!("{} restocked (+{} per limited offer)", self.name, amount);
    }

    /// Buy `quantity` units of offer `index`
    ///
    /// The wallet is charged first; if the inventory then refuses the goods
    /// the charge is refunded, leaving balance and inventory as they were.
    /// Stock only moves on full success.
    pub fn purchase(
        &mut self,
        index: usize,
        quantity: u32,
        wallet: &mut Wallet,
        inventory: &mut Inventory,
    ) -> Result<PurchaseReceipt, PurchaseError> {
        let offer = self.offers.get_mut(index).ok_or(PurchaseError::InvalidOffer(index))?;
        if quantity == 0 {
            return Err(PurchaseError::InvalidQuantity);
        }

        let cost = offer.can_purchase(wallet.balance(), quantity)?;

        if !wallet.spend(cost) {
            return Err(PurchaseError::InsufficientFunds { needed: cost, balance: wallet.balance() });
        }
        if !inventory.add_item(&offer.item, quantity) {
            wallet.add(cost);
            tracing::info!("Refunded {} after inventory rejected {}", cost, offer.item.name);
            return Err(PurchaseError::InventoryFull { item: offer.item.name.clone() });
        }

        offer.record_sale(quantity);
        Ok(PurchaseReceipt {
            item_name: offer.item.name.clone(),
            quantity,
            total_cost: cost,
        })
    }
}
