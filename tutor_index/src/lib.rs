//! Tutor Index - which tutors can find the cards in a deck
//!
//! Builds a reverse index of card -> tutors from Scryfall's related searches
//! and ranks tutors for arbitrary decklists.

pub mod cache;
pub mod config;
pub mod decklist;
pub mod discover;
pub mod error;
pub mod fetcher;
pub mod index;
pub mod merge;
pub mod models;
pub mod pipeline;
pub mod resolver;
pub mod scrape;
pub mod store;
pub mod web;

pub use cache::QueryCache;
pub use config::{DataPaths, Settings};
pub use decklist::{parse_decklist, parse_line, rank_tutors, resolve_decklist, TutorCoverage};
pub use error::{Error, Result};
pub use fetcher::{Fetched, Fetcher};
pub use index::{build_reverse_index, ReverseIndex, ReverseIndexEntry};
pub use merge::merge_overrides;
pub use models::{OverrideRecord, ResolvedSearches, TutorMap, TutorRecord};
