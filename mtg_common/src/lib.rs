//! Shared types for MTG tooling
//!
//! Scryfall wire types and the error taxonomy for talking to Scryfall.

pub mod error;
pub mod scryfall;

pub use error::FetchError;
pub use scryfall::{ApiErrorBody, KnownCard, ScryfallCard, SearchPage};
