//! Catalog loading
//!
//! Reads the JSON hero, enemy and summon records from a data directory.

pub mod catalog;

pub use catalog::Catalog;
