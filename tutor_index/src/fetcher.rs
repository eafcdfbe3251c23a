//! Rate-limited Scryfall client
//!
//! Every network request goes through one [`RateLimiter`], so the courtesy
//! delay is a global limit across pages, queries and tutors. Results served
//! from the [`QueryCache`] never touch the network or the limiter.

use crate::cache::{slugify, QueryCache};
use mtg_common::{FetchError, ScryfallCard, SearchPage};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio::time::Instant;

/// Scryfall API base URL
pub const SCRYFALL_API: &str = "https://api.scryfall.com";

/// Courtesy delay between requests Scryfall asks clients to respect
pub const DEFAULT_DELAY: Duration = Duration::from_secs(6);

const USER_AGENT: &str = "tutor_index/0.1";
const ACCEPT: &str = "application/json;q=0.9,*/*;q=0.8";

/// A value together with where it came from
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<T> {
    pub value: T,
    pub from_cache: bool,
}

/// Enforces a minimum interval between consecutive requests
#[derive(Debug)]
pub struct RateLimiter {
    delay: Duration,
    last_request: Option<Instant>,
}

impl RateLimiter {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            last_request: None,
        }
    }

    /// Wait until `delay` has passed since the previous request, then mark a
    /// new request as started.
    pub async fn wait(&mut self) {
        if let Some(last) = self.last_request {
            let ready = last + self.delay;
            let now = Instant::now();
            if ready > now {
                log::info!(
                    "Waiting {:.1} seconds before next request...",
                    (ready - now).as_secs_f64()
                );
                tokio::time::sleep_until(ready).await;
            }
        }
        self.last_request = Some(Instant::now());
    }
}

/// Cache-backed, rate-limited client for the Scryfall search API
pub struct Fetcher {
    http: reqwest::Client,
    api_base: String,
    cache: QueryCache,
    limiter: RateLimiter,
}

impl Fetcher {
    pub fn new(api_base: impl Into<String>, cache: QueryCache, delay: Duration) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: api_base.into(),
            cache,
            limiter: RateLimiter::new(delay),
        }
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// URL of the first search page for `query`
    pub fn search_url(&self, query: &str) -> String {
        format!(
            "{}/cards/search?q={}",
            self.api_base.trim_end_matches('/'),
            urlencoding::encode(query)
        )
    }

    /// Run a Scryfall search and return every card across all pages.
    ///
    /// A fresh cache entry is returned as-is. Otherwise all pages are fetched
    /// and the complete result is cached once, after which older cache files
    /// sharing the key prefix are purged. Any failed page aborts the whole
    /// fetch and nothing is cached.
    pub async fn fetch(&mut self, query: &str) -> Result<Fetched<Vec<ScryfallCard>>, FetchError> {
        let key = slugify(query);

        if let Some(cards) = self.cache.get::<Vec<ScryfallCard>>(&key) {
            log::info!("Using cached results for query \"{}\"", query);
            return Ok(Fetched {
                value: cards,
                from_cache: true,
            });
        }

        let mut cards = Vec::new();
        let mut next = Some(self.search_url(query));

        while let Some(url) = next.take() {
            let page: SearchPage = self.get_json(&url).await?;
            if page.data.is_empty() {
                log::debug!("No more cards found.");
                break;
            }
            next = page.next_url().map(str::to_string);
            cards.extend(page.data);
        }

        match self.cache.put(&key, &cards) {
            Ok(()) => {
                self.cache.invalidate_siblings(&key);
            }
            Err(e) => log::warn!("Failed to cache results for \"{}\": {}", query, e),
        }

        log::info!("Found {} cards for query \"{}\"", cards.len(), query);
        Ok(Fetched {
            value: cards,
            from_cache: false,
        })
    }

    /// GET a URL as text, honouring the courtesy delay
    pub async fn get_text(&mut self, url: &str) -> Result<String, FetchError> {
        self.limiter.wait().await;
        log::info!("Fetching: {}", url);

        let response = self
            .http
            .get(url)
            .header("User-Agent", USER_AGENT)
            .header("Accept", ACCEPT)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            Ok(body)
        } else {
            Err(FetchError::from_status(status, &body))
        }
    }

    async fn get_json<T: DeserializeOwned>(&mut self, url: &str) -> Result<T, FetchError> {
        let body = self.get_text(url).await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
#[path = "fetcher_tests.rs"]
mod tests;
