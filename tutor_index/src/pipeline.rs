//! Pipeline stages: collect -> merge -> resolve -> build-index
//!
//! Each stage reads its inputs from the data directory and writes its output
//! back there, so stages can also be run one at a time.

use crate::config::{DataPaths, Settings};
use crate::decklist::{resolve_decklist, TutorCoverage};
use crate::discover::collect_tutors;
use crate::error::{Error, Result};
use crate::index::{build_from_records, ReverseIndex};
use crate::merge::merge_overrides;
use crate::models::{OverrideMap, ResolvedSearches, TutorMap};
use crate::resolver::resolve_all;
use crate::store::{read_json, read_json_optional, write_json};
use mtg_common::{KnownCard, ScryfallCard};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// Discover tutors and scrape their related searches
pub async fn collect(settings: &Settings) -> Result<TutorMap<Vec<String>>> {
    let mut fetcher = settings.fetcher();
    let tutors = collect_tutors(&mut fetcher, &settings.format).await?;
    write_json(&settings.paths.scraped_tutors(), &tutors)?;
    log::info!("Collected {} tutors", tutors.len());
    Ok(tutors)
}

/// Apply the optional override file to the scraped tutors
pub fn merge(paths: &DataPaths) -> Result<TutorMap<Vec<String>>> {
    let scraped: TutorMap<Vec<String>> = read_json(&paths.scraped_tutors())?;

    let overrides_path = paths.overrides();
    let overrides = match read_json_optional::<OverrideMap<Vec<String>>>(&overrides_path) {
        Ok(Some(overrides)) => overrides,
        Ok(None) => {
            log::warn!(
                "No {} found, proceeding without overrides.",
                overrides_path.display()
            );
            OverrideMap::new()
        }
        Err(e @ (Error::MissingInput { .. } | Error::InvalidInput { .. })) => {
            log::warn!("{}, proceeding without overrides.", e);
            OverrideMap::new()
        }
        Err(e) => return Err(e),
    };

    let merged = merge_overrides(&scraped, &overrides);
    write_json(&paths.merged_tutors(), &merged)?;
    log::info!(
        "Merged {} overrides into {} tutors",
        overrides.len(),
        merged.len()
    );
    Ok(merged)
}

/// Run every merged tutor's related searches through Scryfall
pub async fn resolve(settings: &Settings) -> Result<TutorMap<ResolvedSearches>> {
    let tutors: TutorMap<Vec<String>> = read_json(&settings.paths.merged_tutors())?;
    let mut fetcher = settings.fetcher();
    let resolved = resolve_all(&mut fetcher, &settings.format, &tutors).await;
    write_json(&settings.paths.resolved_tutors(), &resolved)?;
    Ok(resolved)
}

/// Build and persist the reverse index from resolved tutors and bulk data
pub fn build_index(paths: &DataPaths) -> Result<ReverseIndex> {
    let resolved: TutorMap<ResolvedSearches> = read_json(&paths.resolved_tutors())?;
    let bulk: Vec<KnownCard> = read_json(&paths.bulk_cards())?;

    let index = build_from_records(&resolved, bulk.into_iter().map(|card| card.name));
    write_json(&paths.reverse_index(), &index)?;
    log::info!("Saved tutoredByMap for {} cards", index.len());
    Ok(index)
}

/// Every stage in order
pub async fn run_all(settings: &Settings) -> Result<ReverseIndex> {
    collect(settings).await?;
    merge(&settings.paths)?;
    resolve(settings).await?;
    build_index(&settings.paths)
}

/// Load the persisted reverse index
pub fn load_index(paths: &DataPaths) -> Result<ReverseIndex> {
    let index: ReverseIndex = read_json(&paths.reverse_index())?;
    log::info!("Loaded tutor index with {} cards", index.len());
    Ok(index)
}

/// Rank tutors for the decklist stored at `deck_path`
pub fn resolve_deck_file(index: &ReverseIndex, deck_path: &Path) -> Result<Vec<TutorCoverage>> {
    let text = std::fs::read_to_string(deck_path).map_err(|source| Error::MissingInput {
        path: deck_path.to_path_buf(),
        source,
    })?;
    Ok(resolve_decklist(&text, index))
}

/// Run a single Scryfall query, optionally saving the card records
pub async fn fetch_query(
    settings: &Settings,
    query: &str,
    output: Option<&Path>,
) -> Result<Vec<ScryfallCard>> {
    let mut fetcher = settings.fetcher();
    let cards = fetcher.fetch(query).await?.value;
    if let Some(output) = output {
        write_json(output, &cards)?;
    }
    Ok(cards)
}

/// How many tutors have at least one related search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchStats {
    pub with_searches: usize,
    pub total: usize,
}

/// Count tutors whose `relatedSearches` is a non-empty list. Works on any
/// tutor file; resolved files (where the searches are a mapping) count zero.
pub fn count_related_searches(path: &Path) -> Result<SearchStats> {
    let tutors: BTreeMap<String, Value> = read_json(path)?;
    Ok(SearchStats {
        with_searches: tutors
            .values()
            .filter(|record| {
                record
                    .get("relatedSearches")
                    .and_then(Value::as_array)
                    .is_some_and(|searches| !searches.is_empty())
            })
            .count(),
        total: tutors.len(),
    })
}
