//! Tutor discovery: which cards are tutors, and what do they search for

use crate::fetcher::Fetcher;
use crate::models::{TutorMap, TutorRecord};
use crate::scrape::scrape_related_searches;
use mtg_common::FetchError;

/// Scryfall query listing every tutor legal in `format`
pub fn discovery_query(format: &str) -> String {
    format!("otag:tutor f:{}", format)
}

/// Fetch all tutors for `format` and scrape each one's related searches.
///
/// Failing to fetch the tutor list is fatal; a tutor whose page cannot be
/// scraped simply ends up with no related searches.
pub async fn collect_tutors(
    fetcher: &mut Fetcher,
    format: &str,
) -> Result<TutorMap<Vec<String>>, FetchError> {
    let query = discovery_query(format);
    log::info!("Fetching cards for query: {}", query);
    let tutors = fetcher.fetch(&query).await?.value;

    log::info!("Scraping related searches for {} cards...", tutors.len());
    let mut results = TutorMap::new();

    for card in tutors {
        let related_searches = match card.scryfall_uri.as_deref() {
            Some(uri) => {
                log::info!("Scraping related searches for card: {}", card.name);
                scrape_related_searches(fetcher, uri).await.value
            }
            None => {
                log::warn!("{} has no Scryfall page, skipping scrape", card.name);
                Vec::new()
            }
        };

        results.insert(
            card.name,
            TutorRecord {
                scryfall_uri: card.scryfall_uri,
                related_searches,
            },
        );
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{QueryCache, DEFAULT_TTL};
    use std::time::Duration;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_discovery_query() {
        assert_eq!(discovery_query("commander"), "otag:tutor f:commander");
    }

    #[tokio::test]
    async fn test_collect_tutors_scrapes_each_page() {
        let server = MockServer::start().await;
        let page_uri = format!("{}/card/lea/99/demonic-tutor", server.uri());

        Mock::given(method("GET"))
            .and(path("/cards/search"))
            .and(query_param("q", "otag:tutor f:commander"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "has_more": false,
                "data": [
                    { "name": "Demonic Tutor", "scryfall_uri": page_uri },
                    { "name": "Pageless Tutor" }
                ]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/card/lea/99/demonic-tutor"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<div class="related-search-string">t:sorcery</div>"#,
            ))
            .mount(&server)
            .await;

        let temp_dir = TempDir::new().unwrap();
        let cache = QueryCache::new(temp_dir.path(), DEFAULT_TTL);
        let mut fetcher = Fetcher::new(server.uri(), cache, Duration::ZERO);

        let tutors = collect_tutors(&mut fetcher, "commander").await.unwrap();

        assert_eq!(tutors.len(), 2);
        let demonic = &tutors["Demonic Tutor"];
        assert_eq!(demonic.scryfall_uri.as_deref(), Some(page_uri.as_str()));
        assert_eq!(demonic.related_searches, vec!["t:sorcery"]);
        assert!(tutors["Pageless Tutor"].related_searches.is_empty());
    }

    #[tokio::test]
    async fn test_collect_tutors_fails_when_listing_fails() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let temp_dir = TempDir::new().unwrap();
        let cache = QueryCache::new(temp_dir.path(), DEFAULT_TTL);
        let mut fetcher = Fetcher::new(server.uri(), cache, Duration::ZERO);

        assert!(collect_tutors(&mut fetcher, "commander").await.is_err());
    }
}
