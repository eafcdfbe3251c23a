//! Data types flowing through the tutor pipeline
//!
//! A tutor's related searches start out as a list of query fragments
//! (scraped or overridden by hand) and end up as an ordered mapping of
//! fragment to the card names Scryfall returned for it.

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A tutor's related searches, keyed by tutor card name.
///
/// `S` is the related-search payload: `Vec<String>` of query fragments
/// before resolution, [`ResolvedSearches`] after.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "S: Deserialize<'de> + Default"))]
pub struct TutorRecord<S> {
    /// Provenance: the tutor's Scryfall detail page, if known
    #[serde(default)]
    pub scryfall_uri: Option<String>,
    #[serde(rename = "relatedSearches", default)]
    pub related_searches: S,
}

/// Hand-curated related searches for one tutor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "S: Deserialize<'de> + Default"))]
pub struct OverrideRecord<S> {
    #[serde(rename = "relatedSearches", default)]
    pub related_searches: S,
}

/// Tutor record before resolution
pub type TutorQueries = TutorRecord<Vec<String>>;

/// Tutor record after resolution
pub type ResolvedTutor = TutorRecord<ResolvedSearches>;

/// Tutor name -> record
pub type TutorMap<S> = BTreeMap<String, TutorRecord<S>>;

/// Tutor name -> override
pub type OverrideMap<S> = BTreeMap<String, OverrideRecord<S>>;

/// Query fragment -> card names, in the order the fragments were resolved.
///
/// Serialized as a JSON object whose keys keep that order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedSearches(Vec<(String, Vec<String>)>);

impl ResolvedSearches {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cards for a fragment. Re-inserting a fragment replaces its
    /// cards in place.
    pub fn insert(&mut self, fragment: impl Into<String>, cards: Vec<String>) {
        let fragment = fragment.into();
        match self.0.iter_mut().find(|(f, _)| *f == fragment) {
            Some(slot) => slot.1 = cards,
            None => self.0.push((fragment, cards)),
        }
    }

    pub fn get(&self, fragment: &str) -> Option<&[String]> {
        self.0
            .iter()
            .find(|(f, _)| f == fragment)
            .map(|(_, cards)| cards.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(f, cards)| (f.as_str(), cards.as_slice()))
    }

    /// Query fragments in resolution order
    pub fn fragments(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(f, _)| f.as_str())
    }

    /// Every card name across all fragments, duplicates included
    pub fn card_names(&self) -> impl Iterator<Item = &str> {
        self.0
            .iter()
            .flat_map(|(_, cards)| cards.iter().map(String::as_str))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<F: Into<String>> FromIterator<(F, Vec<String>)> for ResolvedSearches {
    fn from_iter<T: IntoIterator<Item = (F, Vec<String>)>>(iter: T) -> Self {
        let mut searches = Self::new();
        for (fragment, cards) in iter {
            searches.insert(fragment, cards);
        }
        searches
    }
}

impl Serialize for ResolvedSearches {
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (fragment, cards) in &self.0 {
            map.serialize_entry(fragment, cards)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ResolvedSearches {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedVisitor;

        impl<'de> Visitor<'de> for OrderedVisitor {
            type Value = ResolvedSearches;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of query fragment to card names")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut searches = ResolvedSearches::new();
                while let Some((fragment, cards)) = access.next_entry::<String, Vec<String>>()? {
                    searches.insert(fragment, cards);
                }
                Ok(searches)
            }
        }

        deserializer.deserialize_map(OrderedVisitor)
    }
}
