#![cfg(any(test, feature = "mocks"))]
//! Mock instantiation of the [`SchemaSource`] seam.
//!
//! Serves a canned document (or a canned failure) and counts how many times
//! it is asked, so cache and coalescing behavior can be asserted in tests.

use async_std::task;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::document::SchemaDocument;
use super::source::{SchemaError, SchemaSource};

/// A schema source backed by a fixed document.
#[derive(Debug, Default)]
pub struct MockSchemaSource {
    document: Option<SchemaDocument>,
    delay: Duration,
    fetches: AtomicUsize,
}

impl MockSchemaSource {
    /// A source that serves `document` on every fetch.
    pub fn new(document: SchemaDocument) -> Self {
        Self {
            document: Some(document),
            delay: Duration::ZERO,
            fetches: AtomicUsize::new(0),
        }
    }

    /// A source that fails every fetch, like a backend without introspection.
    pub fn unavailable() -> Self {
        Self::default()
    }

    /// Delay each fetch, to widen race windows in concurrency tests.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// How many fetches have reached this source.
    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SchemaSource for MockSchemaSource {
    async fn fetch(&self) -> Result<SchemaDocument, SchemaError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            task::sleep(self.delay).await;
        }
        self.document
            .clone()
            .ok_or_else(|| SchemaError::unavailable("the API does not expose an introspection endpoint"))
    }
}
