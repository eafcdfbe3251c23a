//! Resolves each tutor's related-search fragments into card names

use crate::fetcher::Fetcher;
use crate::models::{ResolvedSearches, ResolvedTutor, TutorMap, TutorQueries};

/// Scope a query fragment to the format the tutors are tracked for
pub fn scoped_query(format: &str, fragment: &str) -> String {
    format!("f:{} {}", format, fragment)
}

/// Resolve every fragment of one tutor.
///
/// Fragments keep their input order. A fragment whose fetch fails is
/// recorded with no cards; it never stops the remaining fragments.
pub async fn resolve_tutor(
    fetcher: &mut Fetcher,
    format: &str,
    tutor: &str,
    record: &TutorQueries,
) -> ResolvedTutor {
    let mut related_searches = ResolvedSearches::new();

    for fragment in &record.related_searches {
        let query = scoped_query(format, fragment);
        log::info!("Tutor: {} | Query: {}", tutor, query);

        let cards = match fetcher.fetch(&query).await {
            Ok(fetched) => {
                let names: Vec<String> = fetched.value.into_iter().map(|card| card.name).collect();
                log::info!("Found {} cards", names.len());
                names
            }
            Err(e) => {
                log::warn!("Error fetching cards for query \"{}\": {}", query, e);
                Vec::new()
            }
        };
        related_searches.insert(fragment.as_str(), cards);
    }

    ResolvedTutor {
        scryfall_uri: record.scryfall_uri.clone(),
        related_searches,
    }
}

/// Resolve all tutors one after another
pub async fn resolve_all(
    fetcher: &mut Fetcher,
    format: &str,
    tutors: &TutorMap<Vec<String>>,
) -> TutorMap<ResolvedSearches> {
    let mut resolved = TutorMap::new();
    for (tutor, record) in tutors {
        let record = resolve_tutor(fetcher, format, tutor, record).await;
        resolved.insert(tutor.clone(), record);
    }
    log::info!("Resolved related searches for {} tutors", resolved.len());
    resolved
}
