//! Data model for the backend's structural schema.
//!
//! The schema is an OpenAPI-style document describing every exposed resource:
//! its properties (with type, format, and description metadata) and the HTTP
//! verbs its path supports. Two backend conventions are encoded in free-form
//! fields and parsed here so the rest of the crate never touches the raw
//! text:
//!
//! * a property whose description starts with [`FOREIGN_KEY_MARKER`] is a
//!   foreign key, with the target resource quoted in backticks;
//! * a property whose format is `tsvector` is a derived full-text-search
//!   column, not user data.

use derive_more::Display;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// The exact prefix the backend uses to flag a foreign key in a property
/// description. Changing this string on the backend side is a breaking
/// change to the schema contract.
pub const FOREIGN_KEY_MARKER: &str = "Note:\nThis is a Foreign Key to";

/// The format string of generated full-text-search columns.
const FULL_TEXT_FORMAT: &str = "tsvector";

/// The root schema artifact, fetched once per session and cached.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct SchemaDocument {
    /// Resource name to definition, in the order the backend declares them.
    #[serde(default)]
    pub definitions: IndexMap<String, ResourceDefinition>,
    /// `/resourceName` to the verbs that path supports.
    #[serde(default)]
    pub paths: IndexMap<String, PathItem>,
}

impl SchemaDocument {
    /// Parse a schema from its JSON representation.
    pub fn from_json(json: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(json)
    }

    /// The definition of the named resource, if the schema declares one.
    pub fn resource(&self, name: &str) -> Option<&ResourceDefinition> {
        self.definitions.get(name)
    }

    /// The path entry for the named resource (keyed `/name` in the document).
    pub fn path(&self, name: &str) -> Option<&PathItem> {
        self.paths.get(&format!("/{name}"))
    }
}

/// The verbs supported by one resource path.
///
/// Only presence matters; the operation objects themselves are opaque.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct PathItem {
    #[serde(default)]
    get: Option<Value>,
    #[serde(default)]
    post: Option<Value>,
    #[serde(default)]
    patch: Option<Value>,
    #[serde(default)]
    delete: Option<Value>,
}

impl PathItem {
    /// Does this path support `GET`?
    pub fn supports_get(&self) -> bool {
        self.get.is_some()
    }

    /// Does this path support `POST`?
    pub fn supports_post(&self) -> bool {
        self.post.is_some()
    }

    /// Does this path support `PATCH`?
    pub fn supports_patch(&self) -> bool {
        self.patch.is_some()
    }

    /// Does this path support `DELETE`?
    pub fn supports_delete(&self) -> bool {
        self.delete.is_some()
    }
}

/// The structure of one resource: its properties and write-time requirements.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ResourceDefinition {
    /// Property name to descriptor, in declared order.
    #[serde(default)]
    pub properties: IndexMap<String, PropertyDescriptor>,
    /// Names of properties that must be present on write.
    #[serde(default)]
    pub required: Vec<String>,
}

impl ResourceDefinition {
    /// Is the named property required on write?
    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|required| required == name)
    }

    /// The first full-text-search column of this resource, if any.
    pub fn full_text_property(&self) -> Option<&str> {
        self.properties
            .iter()
            .find(|(_, descriptor)| descriptor.is_full_text())
            .map(|(name, _)| name.as_str())
    }
}

/// Type, format, and description metadata for one property.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct PropertyDescriptor {
    /// The property's primitive type. Missing, non-string, or unrecognized
    /// types all read as [`PropertyType::String`].
    #[serde(rename = "type", default, deserialize_with = "type_or_default")]
    pub ty: PropertyType,
    /// The backend-specific format, e.g. `timestamp with time zone`.
    #[serde(default)]
    pub format: Option<String>,
    /// Free-form description; may carry the foreign-key convention.
    #[serde(default)]
    pub description: Option<String>,
}

impl PropertyDescriptor {
    /// Is this a generated full-text-search column?
    pub fn is_full_text(&self) -> bool {
        self.format.as_deref() == Some(FULL_TEXT_FORMAT)
    }

    /// The foreign-key target encoded in this property's description, if any.
    pub fn foreign_key_target(&self) -> Option<&str> {
        self.description.as_deref().and_then(foreign_key_target)
    }
}

/// The closed vocabulary of property types.
#[derive(Clone, Copy, Debug, Default, Display, PartialEq, Eq)]
pub enum PropertyType {
    #[default]
    #[display(fmt = "string")]
    String,
    #[display(fmt = "integer")]
    Integer,
    #[display(fmt = "number")]
    Number,
    #[display(fmt = "boolean")]
    Boolean,
    #[display(fmt = "array")]
    Array,
    #[display(fmt = "object")]
    Object,
}

fn type_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<PropertyType, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value.as_str() {
        Some("integer") => PropertyType::Integer,
        Some("number") => PropertyType::Number,
        Some("boolean") => PropertyType::Boolean,
        Some("array") => PropertyType::Array,
        Some("object") => PropertyType::Object,
        _ => PropertyType::String,
    })
}

/// Extract the foreign-key target resource from a property description.
///
/// The description must start with [`FOREIGN_KEY_MARKER`] and quote the
/// target as `` `table.column` ``; the table part names the target resource.
/// Descriptions that carry the marker but no parsable target yield [`None`]
/// so the property falls through to the ordinary inference rules.
pub fn foreign_key_target(description: &str) -> Option<&str> {
    if !description.starts_with(FOREIGN_KEY_MARKER) {
        return None;
    }
    let (_, quoted) = description.split_once('`')?;
    let (target, _) = quoted.split_once('`')?;
    let table = target.split('.').next()?;
    if table.is_empty() {
        None
    } else {
        Some(table)
    }
}
