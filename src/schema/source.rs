//! The seam between the guessers and the data-access layer.
//!
//! The guessers are agnostic to how the schema is obtained; anything that can
//! produce a [`SchemaDocument`] can drive them. Production deployments fetch
//! the document from the backend's introspection endpoint through the REST
//! client; tests use the [mock](super::mock) source.

use async_trait::async_trait;
use snafu::Snafu;
use std::fmt::Display;

use super::document::SchemaDocument;

/// Errors produced while obtaining a schema.
#[derive(Debug, Snafu)]
pub enum SchemaError {
    /// The data source cannot produce a schema, either because the fetch
    /// failed or because the backend has no introspection support.
    #[snafu(display("schema unavailable: {message}"))]
    SchemaUnavailable { message: String },
}

impl SchemaError {
    /// A [`SchemaUnavailable`](Self::SchemaUnavailable) error with the given
    /// message.
    pub fn unavailable(message: impl Display) -> Self {
        Self::SchemaUnavailable {
            message: message.to_string(),
        }
    }
}

/// A provider of the backend's structural schema.
#[async_trait]
pub trait SchemaSource: Send + Sync {
    /// Fetch the schema document.
    ///
    /// The result is idempotent for the lifetime of the backend deployment;
    /// callers are expected to go through a
    /// [`SchemaRepository`](super::repository::SchemaRepository) rather than
    /// fetching on every navigation.
    async fn fetch(&self) -> Result<SchemaDocument, SchemaError>;
}
