//! Related-search scraping from Scryfall card detail pages
//!
//! A card page lists "related searches" as `div.related-search-string`
//! elements. Their text is what the resolver later runs against the search
//! API.

use crate::cache::slugify;
use crate::fetcher::{Fetched, Fetcher};
use scraper::{Html, Selector};
use std::sync::LazyLock;

static RELATED_SEARCH: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("div.related-search-string").expect("valid related-search selector")
});

/// Extract the related-search strings from a card detail page, in document
/// order. The text of nested markup is kept, entities are decoded and empty
/// entries dropped.
pub fn extract_related_searches(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    document
        .select(&RELATED_SEARCH)
        .filter_map(|element| {
            let text: String = element.text().collect();
            let text = text.trim();
            (!text.is_empty()).then(|| text.to_string())
        })
        .collect()
}

/// Scrape a card page for related searches, checking the cache first.
///
/// Never fails: a page that cannot be fetched is logged and yields an empty
/// list, which is not cached.
pub async fn scrape_related_searches(fetcher: &mut Fetcher, page_url: &str) -> Fetched<Vec<String>> {
    let key = slugify(page_url);

    if let Some(searches) = fetcher.cache().get::<Vec<String>>(&key) {
        log::info!("Using cached scrape results for {}", page_url);
        return Fetched {
            value: searches,
            from_cache: true,
        };
    }

    let html = match fetcher.get_text(page_url).await {
        Ok(html) => html,
        Err(e) => {
            log::error!("Error fetching related searches from {}: {}", page_url, e);
            return Fetched {
                value: Vec::new(),
                from_cache: false,
            };
        }
    };

    let searches = extract_related_searches(&html);
    match fetcher.cache().put(&key, &searches) {
        Ok(()) => {
            fetcher.cache().invalidate_siblings(&key);
        }
        Err(e) => log::warn!("Failed to cache scrape results for {}: {}", page_url, e),
    }

    log::info!("Found {} related searches.", searches.len());
    Fetched {
        value: searches,
        from_cache: false,
    }
}
