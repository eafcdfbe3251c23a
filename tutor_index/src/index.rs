//! Card -> tutors reverse index
//!
//! Built once from the resolved tutor records and the known-card universe,
//! then persisted and only read afterwards.

use crate::models::{ResolvedSearches, TutorMap};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Tutors able to find one card
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReverseIndexEntry {
    /// Deduplicated, sorted tutor names
    #[serde(rename = "tutoredBy", default)]
    pub tutored_by: Vec<String>,
}

/// Card name -> [`ReverseIndexEntry`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReverseIndex {
    entries: BTreeMap<String, ReverseIndexEntry>,
}

impl ReverseIndex {
    pub fn get(&self, card: &str) -> Option<&ReverseIndexEntry> {
        self.entries.get(card)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ReverseIndexEntry)> {
        self.entries.iter().map(|(card, entry)| (card.as_str(), entry))
    }
}

impl<K: Into<String>> FromIterator<(K, ReverseIndexEntry)> for ReverseIndex {
    fn from_iter<T: IntoIterator<Item = (K, ReverseIndexEntry)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Invert tutor -> fragment -> cards into card -> tutors.
///
/// Every known card gets an entry even when nothing tutors it. Cards found
/// by a tutor but missing from `known_cards` get an entry too. Each
/// `tutoredBy` list ends up deduplicated and sorted, so the result does not
/// depend on the order tutors are visited in.
pub fn build_reverse_index<'a, T, K>(tutors: T, known_cards: K) -> ReverseIndex
where
    T: IntoIterator<Item = (&'a str, &'a ResolvedSearches)>,
    K: IntoIterator,
    K::Item: Into<String>,
{
    let mut entries: BTreeMap<String, ReverseIndexEntry> = known_cards
        .into_iter()
        .map(|name| (name.into(), ReverseIndexEntry::default()))
        .collect();

    for (tutor, searches) in tutors {
        let tutored: BTreeSet<&str> = searches.card_names().collect();
        for card in tutored {
            entries
                .entry(card.to_string())
                .or_default()
                .tutored_by
                .push(tutor.to_string());
        }
    }

    for entry in entries.values_mut() {
        entry.tutored_by.sort();
        entry.tutored_by.dedup();
    }

    ReverseIndex { entries }
}

/// [`build_reverse_index`] over a resolved tutor map
pub fn build_from_records<K>(tutors: &TutorMap<ResolvedSearches>, known_cards: K) -> ReverseIndex
where
    K: IntoIterator,
    K::Item: Into<String>,
{
    build_reverse_index(
        tutors
            .iter()
            .map(|(name, record)| (name.as_str(), &record.related_searches)),
        known_cards,
    )
}
