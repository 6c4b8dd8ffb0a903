//! Data models for the card catalog.
//!
//! Field names follow the collection layout written by the browser client, so existing
//! collections load unchanged.

mod card;

pub use card::*;
