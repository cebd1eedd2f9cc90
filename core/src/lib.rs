//! Rules engines for a color matching puzzle and a color memory game.
//!
//! Everything here is clock-free and single threaded: hosts feed input and ticks, engines mutate
//! their own state and publish snapshots. Randomness, persistence and remote sync come in through
//! the [`ColorSource`], [`KeyValueStore`] and [`RemoteSync`] traits.

#![no_std]

extern crate alloc;

pub use color::*;
pub use config::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use records::*;
pub use scoring::ScoreDelta;
pub use store::*;
pub use sync::*;
pub use tile::*;
pub use timer::*;
pub use types::*;

mod color;
mod config;
mod engine;
mod error;
pub mod generator;
pub mod records;
pub mod rules;
pub mod scoring;
pub mod store;
pub mod sync;
mod tile;
mod timer;
mod types;
