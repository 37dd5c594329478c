//! Common items that you will always want in scope when guessing an admin.

pub use crate::guess::{AdminGuesser, GuessError, GuessedPage, PageGuesser, PageKind};
pub use crate::inference::{FieldKind, InferredElement, TypeMap, UiNode};
pub use crate::schema::{SchemaDocument, SchemaError, SchemaRepository, SchemaSource};
