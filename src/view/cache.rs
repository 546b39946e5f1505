use std::sync::{Arc, OnceLock};

use dashmap::DashMap;
use lazy_static::lazy_static;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("Template not found: {0}")]
    NotFound(String),
    #[error("Failed to fetch template {url}: {message}")]
    Failed { url: String, message: String },
}

/// Loads external template bodies.
#[cfg_attr(test, mockall::automock)]
pub trait TemplateFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

type Slot = Arc<OnceLock<Result<String, FetchError>>>;

lazy_static! {
    static ref TEMPLATE_CACHE: TemplateCache = TemplateCache::new();
}

/// Fetched template bodies by URL.
///
/// A URL is fetched at most once: concurrent callers share one pending slot
/// and wait for its result. Failed fetches are evicted so the next caller
/// tries again.
#[derive(Debug, Default)]
pub struct TemplateCache {
    entries: DashMap<String, Slot>,
}

impl TemplateCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn global() -> &'static TemplateCache {
        &TEMPLATE_CACHE
    }

    pub fn get_or_fetch(
        &self,
        url: &str,
        fetcher: &dyn TemplateFetcher,
    ) -> Result<String, FetchError> {
        let slot: Slot = Arc::clone(&*self.entries.entry(url.to_string()).or_default());

        let result = slot
            .get_or_init(|| {
                debug!("Fetching template {}", url);
                fetcher.fetch(url)
            })
            .clone();

        if let Err(e) = &result {
            warn!("Not caching template {}: {}", url, e);
            self.entries
                .remove_if(url, |_, current| Arc::ptr_eq(current, &slot));
        }
        result
    }

    /// Stores a body without fetching it.
    pub fn insert(&self, url: &str, body: String) {
        let slot = OnceLock::new();
        let _ = slot.set(Ok(body));
        self.entries.insert(url.to_string(), Arc::new(slot));
    }

    /// Whether a fetched body is stored for `url`.
    pub fn contains(&self, url: &str) -> bool {
        self.entries
            .get(url)
            .is_some_and(|slot| matches!(slot.get(), Some(Ok(_))))
    }

    pub fn invalidate(&self, url: &str) -> bool {
        self.entries.remove(url).is_some()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
