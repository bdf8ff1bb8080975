//! Arknights adapter for the character resource sync engine.

pub mod adapter;
pub mod tables;
pub mod transliterate;

pub use adapter::{ArknightsAdapter, SERIES};
