//! Cached access to the schema document.
//!
//! Every guessed page starts by consulting the schema, and an admin surface
//! navigates often, so the document is cached for a short TTL instead of
//! being refetched per navigation. There is a single schema per backend, so
//! the cache has exactly one slot.

use async_std::sync::{Mutex, RwLock};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::document::SchemaDocument;
use super::source::{SchemaError, SchemaSource};

/// How long a fetched schema stays fresh by default.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

/// A caching, coalescing front to a [`SchemaSource`].
#[derive(Debug)]
pub struct SchemaRepository<S> {
    source: S,
    ttl: Duration,
    cache: RwLock<Option<CacheEntry>>,
    // Serializes refetches; see `fetch`.
    refresh: Mutex<()>,
}

#[derive(Clone, Debug)]
struct CacheEntry {
    fetched_at: Instant,
    document: Arc<SchemaDocument>,
}

impl<S: SchemaSource> SchemaRepository<S> {
    /// A repository over `source` with the [default TTL](DEFAULT_TTL).
    pub fn new(source: S) -> Self {
        Self::with_ttl(source, DEFAULT_TTL)
    }

    /// A repository over `source` with an explicit TTL.
    pub fn with_ttl(source: S, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            cache: RwLock::new(None),
            refresh: Mutex::new(()),
        }
    }

    /// The schema, from cache when fresh.
    ///
    /// Cold fetches are coalesced: concurrent callers queue on a refresh
    /// lock, and all but the first find the cache repopulated when they
    /// acquire it, so the source sees a single fetch. Errors propagate to
    /// every waiting caller and are never cached.
    pub async fn fetch(&self) -> Result<Arc<SchemaDocument>, SchemaError> {
        if let Some(document) = self.fresh().await {
            return Ok(document);
        }

        let _refresh = self.refresh.lock().await;

        // Whoever held the lock before us may have already refreshed.
        if let Some(document) = self.fresh().await {
            return Ok(document);
        }

        let document = Arc::new(self.source.fetch().await?);
        *self.cache.write().await = Some(CacheEntry {
            fetched_at: Instant::now(),
            document: Arc::clone(&document),
        });
        Ok(document)
    }

    /// The underlying schema source.
    pub fn source(&self) -> &S {
        &self.source
    }

    async fn fresh(&self) -> Option<Arc<SchemaDocument>> {
        self.cache
            .read()
            .await
            .as_ref()
            .filter(|entry| entry.fetched_at.elapsed() < self.ttl)
            .map(|entry| Arc::clone(&entry.document))
    }
}
