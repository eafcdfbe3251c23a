//! Decklist parsing and tutor ranking
//!
//! A decklist line looks like `1x Demonic Tutor (LEA) 55 *F* [Combo]`: a
//! quantity token, the card name, then optional set code, collector number,
//! foil marker and tags. Lines are tokenized on single spaces and walked by a
//! small state machine; anything that doesn't yield a name is skipped.

use crate::index::{ReverseIndex, ReverseIndexEntry};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Foil marker used by common decklist exports
pub const FOIL_MARKER: &str = "*F*";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineState {
    Quantity,
    Name,
    Metadata,
}

/// Whether a token ends the card name: set code `(…)`, collector number,
/// foil marker or tag `[…]`
pub fn is_metadata_token(token: &str) -> bool {
    token.starts_with('(')
        || (!token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()))
        || token == FOIL_MARKER
        || token.starts_with('[')
}

/// Parse one decklist line into a card name.
///
/// The first token is always dropped as the quantity, whatever it is. Lines
/// with fewer than two tokens yield nothing.
pub fn parse_line(line: &str) -> Option<String> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    let tokens: Vec<&str> = trimmed.split(' ').collect();
    if tokens.len() < 2 {
        return None;
    }

    let mut state = LineState::Quantity;
    let mut name = Vec::new();
    for token in tokens {
        state = match state {
            LineState::Quantity => LineState::Name,
            LineState::Name if is_metadata_token(token) => LineState::Metadata,
            LineState::Name => {
                name.push(token);
                LineState::Name
            }
            LineState::Metadata => break,
        };
    }

    let name = name.join(" ");
    (!name.is_empty()).then_some(name)
}

/// Card names of every parseable line, in order, duplicates kept
pub fn parse_decklist(text: &str) -> Vec<String> {
    text.split('\n')
        .filter_map(|line| {
            let parsed = parse_line(line);
            if parsed.is_none() && !line.trim().is_empty() {
                log::debug!("Skipping decklist line: {}", line.trim());
            }
            parsed
        })
        .collect()
}

/// Read access to "which tutors find this card"
pub trait TutoredByLookup {
    fn tutored_by(&self, card: &str) -> Option<&[String]>;
}

impl TutoredByLookup for ReverseIndex {
    fn tutored_by(&self, card: &str) -> Option<&[String]> {
        self.get(card).map(|entry| entry.tutored_by.as_slice())
    }
}

impl TutoredByLookup for BTreeMap<String, ReverseIndexEntry> {
    fn tutored_by(&self, card: &str) -> Option<&[String]> {
        self.get(card).map(|entry| entry.tutored_by.as_slice())
    }
}

impl TutoredByLookup for HashMap<String, ReverseIndexEntry> {
    fn tutored_by(&self, card: &str) -> Option<&[String]> {
        self.get(card).map(|entry| entry.tutored_by.as_slice())
    }
}

/// Deck cards a tutor can find
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TutorCoverage {
    pub tutor: String,
    /// Deduplicated, sorted deck cards
    pub tutored_cards: Vec<String>,
    pub count: usize,
}

/// Rank tutors by how many distinct deck cards they find.
///
/// Cards missing from the index are logged and contribute nothing. Ties on
/// `count` are broken alphabetically by tutor name.
pub fn rank_tutors<L>(deck_cards: &[String], index: &L) -> Vec<TutorCoverage>
where
    L: TutoredByLookup + ?Sized,
{
    let mut by_tutor: BTreeMap<&str, Vec<&str>> = BTreeMap::new();

    for card in deck_cards {
        let Some(tutors) = index.tutored_by(card) else {
            log::info!("Tutor index is missing {}", card);
            continue;
        };
        for tutor in tutors {
            by_tutor.entry(tutor.as_str()).or_default().push(card.as_str());
        }
    }

    let mut ranked: Vec<TutorCoverage> = by_tutor
        .into_iter()
        .map(|(tutor, mut cards)| {
            cards.sort_unstable();
            cards.dedup();
            TutorCoverage {
                tutor: tutor.to_string(),
                count: cards.len(),
                tutored_cards: cards.into_iter().map(str::to_string).collect(),
            }
        })
        .collect();

    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tutor.cmp(&b.tutor)));
    ranked
}

/// Parse a decklist and rank tutors against the index
pub fn resolve_decklist<L>(text: &str, index: &L) -> Vec<TutorCoverage>
where
    L: TutoredByLookup + ?Sized,
{
    let deck_cards = parse_decklist(text);
    log::debug!("Parsed {} card entries from decklist", deck_cards.len());
    rank_tutors(&deck_cards, index)
}

#[cfg(test)]
#[path = "decklist_tests.rs"]
mod tests;
