//! Core game logic. Keep this crate free of IO and platform concerns.

pub mod bank;
pub mod cards;
pub mod catalog;
pub mod config;
pub mod deck;
pub mod events;
pub mod rng;
pub mod run;
pub mod shop;
pub mod snapshot;
pub mod state;
pub mod transform;

pub use bank::*;
pub use cards::*;
pub use catalog::*;
pub use config::*;
pub use deck::*;
pub use events::*;
pub use rng::*;
pub use run::*;
pub use shop::*;
pub use snapshot::*;
pub use state::*;
pub use transform::*;
