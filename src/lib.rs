//! Encounter engine for a turn-based hero card battler
//!
//! Heroes are placed into a three-slot playfield and spend action points to
//! attack, heal and support while a single scripted enemy answers each round.
//! The core state machine lives in [`game`]; [`session`] wraps it for a
//! presentation layer, and [`loader`] reads the JSON catalog.

pub mod core;
pub mod error;
pub mod game;
pub mod hand;
pub mod loader;
pub mod session;

pub use error::{ActionError, ActionResult, EncounterError, Result};
