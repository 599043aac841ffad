//! Coins and the shop that turns them into items

pub mod shop;
pub mod wallet;

pub use shop::{PurchaseError, PurchaseReceipt, Shop, ShopOffer, Stock};
pub use wallet::Wallet;
