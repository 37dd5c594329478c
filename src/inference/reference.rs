//! Resolution of foreign-key targets to a human-readable label property.
//!
//! A reference widget needs to display referenced records by something more
//! legible than their id. The resolver picks the target resource's
//! representative property by scanning a fixed candidate list; when none of
//! the candidates exist the reference is still usable, just unlabeled, and a
//! warning tells the developer to pick a label themselves.

use snafu::OptionExt;

use super::{InferenceError, UnknownReferencedResourceSnafu};
use crate::schema::SchemaDocument;

/// Label-candidate properties on a referenced resource, in priority order.
const LABEL_CANDIDATES: [&str; 4] = ["name", "title", "label", "reference"];

/// The outcome of resolving a reference target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReferenceLabel {
    /// The target's representative property, used as the option label in
    /// autocomplete widgets.
    pub option_text: Option<String>,
    /// Set when no representative property could be found.
    pub warning: Option<String>,
}

/// Resolve the representative label property of `target`.
///
/// `property` is the referencing property, used for error and warning text.
/// A target absent from the schema is a hard error: a dangling foreign key
/// means the schema and the data disagree, and degrading silently would mask
/// that. A target with no recognized label property is a soft failure; the
/// caller still builds a usable reference element.
pub fn resolve_reference(
    property: &str,
    target: &str,
    schema: &SchemaDocument,
) -> Result<ReferenceLabel, InferenceError> {
    let definition = schema
        .resource(target)
        .context(UnknownReferencedResourceSnafu {
            property,
            reference: target,
        })?;
    let option_text = LABEL_CANDIDATES
        .iter()
        .find(|candidate| definition.properties.contains_key(**candidate))
        .map(|candidate| candidate.to_string());
    let warning = option_text.is_none().then(|| {
        format!(
            "The resource {target} referenced by {property} has none of the \
             recognized label properties ({}); pass an optionText prop to the \
             generated input manually.",
            LABEL_CANDIDATES.join(", "),
        )
    });
    Ok(ReferenceLabel {
        option_text,
        warning,
    })
}
