//! Fetching, parsing, and caching of the backend's structural schema.

pub mod document;
pub mod mock;
pub mod repository;
pub mod source;

pub use document::{
    foreign_key_target, PathItem, PropertyDescriptor, PropertyType, ResourceDefinition,
    SchemaDocument, FOREIGN_KEY_MARKER,
};
pub use repository::{SchemaRepository, DEFAULT_TTL};
pub use source::{SchemaError, SchemaSource};
