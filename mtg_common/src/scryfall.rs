//! Scryfall wire types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A card object as returned by the Scryfall search API.
///
/// Only the fields we work with are typed; everything else is kept in
/// `extra` so cached results round-trip without losing data.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ScryfallCard {
    pub name: String,
    /// Detail page for the card, used to scrape related searches
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scryfall_uri: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ScryfallCard {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scryfall_uri: None,
            extra: Map::new(),
        }
    }
}

/// One page of a paginated `/cards/search` response
#[derive(Debug, Deserialize)]
pub struct SearchPage {
    #[serde(default)]
    pub data: Vec<ScryfallCard>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_page: Option<String>,
    #[serde(default)]
    pub total_cards: Option<u64>,
}

impl SearchPage {
    /// URL of the following page, if Scryfall says there is one
    pub fn next_url(&self) -> Option<&str> {
        if self.has_more {
            self.next_page.as_deref()
        } else {
            None
        }
    }
}

/// Scryfall API error response
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub status: u16,
    pub code: String,
    pub details: String,
}

/// Entry of a Scryfall bulk-data card dump. Only the name matters here.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct KnownCard {
    pub name: String,
}
