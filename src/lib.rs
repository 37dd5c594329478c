//! Admin Guesser infers an admin UI from a backend's structural schema. It
//! consists of three layers:
//!
//! * A [schema] layer, which fetches the backend's OpenAPI-style schema
//!   document through a pluggable [source](schema::SchemaSource) and caches
//!   it behind a coalescing [repository](schema::SchemaRepository), so that
//!   navigating between pages does not refetch the schema on every mount.
//! * An [inference] engine, which maps each property of a resource to the
//!   most appropriate field kind using an ordered rule chain (identifiers,
//!   foreign keys, to-many columns, well-known names and formats, primitive
//!   types, generic fallback), resolves foreign keys into reference widgets,
//!   and builds an intermediate element tree that can be realized into a
//!   live widget tree or described as deterministic source text.
//! * A [guess] layer, which assembles whole pages (list, show, edit, create)
//!   and discovers which pages each resource supports from the verbs its
//!   path exposes, logging the generated source text once per guesser so a
//!   developer can graduate from guessed pages to hand-written ones.
//!
//! Inference is pure and total: given a schema, any property descriptor maps
//! to an element, with unrecognized shapes degrading to a generic text
//! field. The only hard error below the schema fetch is a foreign key whose
//! target resource the schema does not define.

use std::sync::Once;
use tracing_subscriber::EnvFilter;

pub mod guess;
pub mod inference;
mod inflect;
pub mod prelude;
pub mod schema;

/// Initialize tracing.
pub fn init_logging() {
    static ONCE: Once = Once::new();

    ONCE.call_once(|| {
        color_eyre::install().unwrap();
        tracing_subscriber::fmt()
            .with_ansi(true)
            .with_env_filter(EnvFilter::from_default_env())
            .init();
    });
}
