//! Core game logic. Keep this crate free of IO and platform concerns.

pub mod cards;
pub mod clicker;
pub mod config;
pub mod content;
pub mod currency;
pub mod deck;
pub mod effects;
pub mod events;
pub mod hand;
pub mod hooks;
pub mod hub;
pub mod inventory;
pub mod jokers;
pub mod letters;
pub mod progression;
pub mod rewards;
pub mod rng;
pub mod run;
pub mod save;
pub mod scoring;
pub mod shop;
pub mod state;
pub mod tiles;
pub mod upgrades;
pub mod wager;
pub mod words;

pub use cards::*;
pub use clicker::*;
pub use config::*;
pub use content::*;
pub use currency::*;
pub use deck::*;
pub use effects::*;
pub use events::*;
pub use hand::*;
pub use hooks::*;
pub use hub::*;
pub use inventory::*;
pub use jokers::*;
pub use letters::*;
pub use progression::*;
pub use rewards::*;
pub use rng::*;
pub use run::*;
pub use save::*;
pub use scoring::*;
pub use shop::*;
pub use state::*;
pub use tiles::*;
pub use upgrades::*;
pub use wager::*;
pub use words::*;
