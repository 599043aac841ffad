//! Pet Haven - virtual pet simulation core
//!
//! Needs decay, items and inventory, a coin economy with a shop, and a timed
//! clicker mini-game. Everything is wired together by [`game::PetGame`].

pub mod core;
pub mod economy;
pub mod events;
pub mod game;
pub mod items;
pub mod minigame;
pub mod persistence;
pub mod pet;

pub use game::PetGame;
