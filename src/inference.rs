//! Type-directed inference of UI elements from property descriptors.
//!
//! Given one property of a resource (its name, type, format, and
//! description), [`infer_element`] decides the most appropriate field kind
//! and builds the corresponding [`InferredElement`]. The rules are evaluated
//! in a fixed priority order; that order is part of the contract, not an
//! implementation detail. Two properties of the chain matter to callers:
//!
//! * it is total over descriptors: any combination of type, format, name,
//!   and description produces an element, with unrecognized shapes degrading
//!   to the generic string kind;
//! * the only error it can return is a dangling reference, which indicates a
//!   schema inconsistency the operator must fix rather than something to
//!   paper over.

pub mod element;
pub mod reference;
pub mod types;

pub use element::{InferredElement, PropValue, Props, Representation, UiNode};
pub use reference::{resolve_reference, ReferenceLabel};
pub use types::{
    edit_field_types, list_field_types, show_field_types, FieldKind, FieldType, TypeMap,
};

use snafu::Snafu;

use crate::inflect;
use crate::schema::{PropertyDescriptor, PropertyType, SchemaDocument};

/// Timestamp formats rendered as dates.
const TIMESTAMP_FORMATS: [&str; 2] = ["timestamp with time zone", "timestamp without time zone"];

/// Property-name suffix marking a to-many relationship column.
const TO_MANY_SUFFIX: &str = "_ids";

/// Errors produced by inference.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum InferenceError {
    /// A foreign-key or to-many property points at a resource the schema
    /// does not define.
    #[snafu(display("property {property} references unknown resource {reference}"))]
    UnknownReferencedResource {
        property: String,
        reference: String,
    },
}

/// Everything one inference pass needs besides the property itself.
pub struct InferenceContext<'a> {
    /// The full schema, consulted when resolving references.
    pub schema: &'a SchemaDocument,
    /// The kinds available for the current page purpose.
    pub types: &'a TypeMap,
    /// The owning resource's required property names.
    pub required: &'a [String],
}

/// Infer the element representing one property.
///
/// Decision order, first match wins:
///
/// 1. the `id` property, when the map has an id kind;
/// 2. a foreign key flagged in the description, when the map has a reference
///    kind;
/// 3. a `*_ids` to-many column, targeting the pluralized stem;
/// 4. an array of anything else, as a generic string (array contents are not
///    introspected);
/// 5. strings with a recognized name (`email`, `url`, `website`) or
///    timestamp format;
/// 6. integers, as numbers;
/// 7. any type whose name matches a registered kind exactly;
/// 8. everything else, as a generic string.
///
/// Rules 1 and 5 through 8 attach the required-validation marker when the
/// property is in the required set (the id never is). Rules 2 and 3 delegate
/// to [`resolve_reference`] and are the chain's only source of errors.
pub fn infer_element(
    name: &str,
    descriptor: &PropertyDescriptor,
    ctx: &InferenceContext<'_>,
) -> Result<InferredElement, InferenceError> {
    if name == "id" && ctx.types.has(FieldKind::Id) {
        return Ok(
            InferredElement::new(FieldKind::Id).with_prop("source", PropValue::Str("id".into()))
        );
    }

    if let Some(target) = descriptor.foreign_key_target() {
        if ctx.types.has(FieldKind::Reference) {
            return reference_element(
                FieldKind::Reference,
                FieldKind::AutocompleteInput,
                name,
                target,
                ctx,
            );
        }
    }

    if let Some(stem) = name.strip_suffix(TO_MANY_SUFFIX) {
        if !stem.is_empty() && ctx.types.has(FieldKind::Reference) {
            let target = inflect::pluralize(stem);
            return reference_element(
                FieldKind::ReferenceArray,
                FieldKind::AutocompleteArrayInput,
                name,
                &target,
                ctx,
            );
        }
    }

    if descriptor.ty == PropertyType::Array {
        // Array contents are not introspected further.
        return Ok(InferredElement::new(FieldKind::String)
            .with_prop("source", PropValue::Str(name.into())));
    }

    let required = ctx.required.iter().any(|required| required == name);

    if descriptor.ty == PropertyType::String {
        if name == "email" && ctx.types.has(FieldKind::Email) {
            return Ok(field(FieldKind::Email, name, required));
        }
        if (name == "url" || name == "website") && ctx.types.has(FieldKind::Url) {
            return Ok(field(FieldKind::Url, name, required));
        }
        if let Some(format) = descriptor.format.as_deref() {
            if TIMESTAMP_FORMATS.contains(&format) && ctx.types.has(FieldKind::Date) {
                return Ok(field(FieldKind::Date, name, required));
            }
        }
    }

    if descriptor.ty == PropertyType::Integer && ctx.types.has(FieldKind::Number) {
        return Ok(field(FieldKind::Number, name, required));
    }

    if let Some(kind) = FieldKind::of_type(descriptor.ty) {
        if ctx.types.has(kind) {
            return Ok(field(kind, name, required));
        }
    }

    Ok(field(FieldKind::String, name, required))
}

/// A leaf element for `name`, with the required marker when applicable.
fn field(kind: FieldKind, name: &str, required: bool) -> InferredElement {
    let mut element =
        InferredElement::new(kind).with_prop("source", PropValue::Str(name.into()));
    if required {
        element = element.with_prop("validate", PropValue::Required);
    }
    element
}

/// A reference (or reference-array) element for `name` targeting `target`.
///
/// When the map defines the matching autocomplete kind, the element nests
/// one autocomplete child configured with the target's label property and a
/// filter builder; maps without it (list, show) render the bare reference.
fn reference_element(
    kind: FieldKind,
    child_kind: FieldKind,
    name: &str,
    target: &str,
    ctx: &InferenceContext<'_>,
) -> Result<InferredElement, InferenceError> {
    let label = resolve_reference(name, target, ctx.schema)?;
    let mut element = InferredElement::new(kind)
        .with_prop("source", PropValue::Str(name.into()))
        .with_prop("reference", PropValue::Str(target.into()));
    if ctx.types.has(child_kind) {
        let mut child = InferredElement::new(child_kind);
        if let Some(option_text) = &label.option_text {
            child = child
                .with_prop("optionText", PropValue::Str(option_text.clone()))
                .with_prop(
                    "filterToQuery",
                    PropValue::FilterToQuery {
                        option_text: option_text.clone(),
                    },
                );
        }
        element = element.with_child(child);
    }
    if let Some(warning) = label.warning {
        element = element.with_warning(warning);
    }
    Ok(element)
}

#[cfg(test)]
mod test {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn descriptor(ty: PropertyType) -> PropertyDescriptor {
        PropertyDescriptor {
            ty,
            format: None,
            description: None,
        }
    }

    fn empty_schema() -> SchemaDocument {
        SchemaDocument::default()
    }

    fn infer(
        name: &str,
        descriptor: &PropertyDescriptor,
        schema: &SchemaDocument,
        types: &TypeMap,
        required: &[String],
    ) -> Result<InferredElement, InferenceError> {
        infer_element(
            name,
            descriptor,
            &InferenceContext {
                schema,
                types,
                required,
            },
        )
    }

    #[test]
    fn test_id_kind_and_never_required() {
        let schema = empty_schema();
        let types = list_field_types();
        let element = infer(
            "id",
            &descriptor(PropertyType::Integer),
            &schema,
            &types,
            &["id".into()],
        )
        .unwrap();
        assert_eq!(element.kind(), FieldKind::Id);
        assert_eq!(element.props().get("validate"), None);
    }

    #[test]
    fn test_email_name_beats_generic_string() {
        let schema = empty_schema();
        let types = list_field_types();
        let element = infer(
            "email",
            &descriptor(PropertyType::String),
            &schema,
            &types,
            &[],
        )
        .unwrap();
        assert_eq!(element.kind(), FieldKind::Email);
    }

    #[test]
    fn test_email_without_registered_kind_degrades() {
        let schema = empty_schema();
        let types = TypeMap::new(FieldType {
            component: "TextField",
            represent: types::represent_leaf,
        });
        let element = infer(
            "email",
            &descriptor(PropertyType::String),
            &schema,
            &types,
            &[],
        )
        .unwrap();
        assert_eq!(element.kind(), FieldKind::String);
    }

    #[test]
    fn test_required_marker_propagates() {
        let schema = empty_schema();
        let types = edit_field_types();
        let required = vec!["first_name".to_string()];
        let marked = infer(
            "first_name",
            &descriptor(PropertyType::String),
            &schema,
            &types,
            &required,
        )
        .unwrap();
        assert_eq!(marked.props().get("validate"), Some(&PropValue::Required));

        let unmarked = infer(
            "last_name",
            &descriptor(PropertyType::String),
            &schema,
            &types,
            &required,
        )
        .unwrap();
        assert_eq!(unmarked.props().get("validate"), None);
    }

    #[test]
    fn test_timestamp_formats_infer_dates() {
        let schema = empty_schema();
        let types = list_field_types();
        for format in ["timestamp with time zone", "timestamp without time zone"] {
            let descriptor = PropertyDescriptor {
                ty: PropertyType::String,
                format: Some(format.into()),
                description: None,
            };
            let element = infer("created_at", &descriptor, &schema, &types, &[]).unwrap();
            assert_eq!(element.kind(), FieldKind::Date);
        }
    }

    #[test]
    fn test_integer_infers_number() {
        let schema = empty_schema();
        let types = list_field_types();
        let element = infer(
            "count",
            &descriptor(PropertyType::Integer),
            &schema,
            &types,
            &[],
        )
        .unwrap();
        assert_eq!(element.kind(), FieldKind::Number);
    }

    #[test]
    fn test_boolean_matches_type_name() {
        let schema = empty_schema();
        let types = list_field_types();
        let element = infer(
            "archived",
            &descriptor(PropertyType::Boolean),
            &schema,
            &types,
            &[],
        )
        .unwrap();
        assert_eq!(element.kind(), FieldKind::Boolean);
    }

    #[test]
    fn test_foreign_key_builds_reference_with_autocomplete() {
        let schema = SchemaDocument::from_json(json!({
            "definitions": {
                "companies": { "properties": { "name": { "type": "string" } } },
            },
        }))
        .unwrap();
        let types = edit_field_types();
        let descriptor = PropertyDescriptor {
            ty: PropertyType::Integer,
            format: None,
            description: Some(
                "Note:\nThis is a Foreign Key to `companies.id`.<fk table='companies' column='id'/>"
                    .into(),
            ),
        };
        let element = infer("company_id", &descriptor, &schema, &types, &[]).unwrap();
        assert_eq!(element.kind(), FieldKind::Reference);
        assert_eq!(
            element.props().get("reference"),
            Some(&PropValue::Str("companies".into()))
        );
        let child = &element.children()[0];
        assert_eq!(child.kind(), FieldKind::AutocompleteInput);
        assert_eq!(
            child.props().get("optionText"),
            Some(&PropValue::Str("name".into()))
        );
        assert!(element.warning().is_none());
    }

    #[test]
    fn test_foreign_key_on_list_map_has_no_child() {
        let schema = SchemaDocument::from_json(json!({
            "definitions": {
                "companies": { "properties": { "name": { "type": "string" } } },
            },
        }))
        .unwrap();
        let types = list_field_types();
        let descriptor = PropertyDescriptor {
            ty: PropertyType::Integer,
            format: None,
            description: Some("Note:\nThis is a Foreign Key to `companies.id`.".into()),
        };
        let element = infer("company_id", &descriptor, &schema, &types, &[]).unwrap();
        assert_eq!(element.kind(), FieldKind::Reference);
        assert!(element.children().is_empty());
    }

    #[test]
    fn test_ids_suffix_beats_array_fallback() {
        let schema = SchemaDocument::from_json(json!({
            "definitions": {
                "managers": { "properties": { "name": { "type": "string" } } },
            },
        }))
        .unwrap();
        let types = edit_field_types();
        let element = infer(
            "manager_ids",
            &descriptor(PropertyType::Array),
            &schema,
            &types,
            &[],
        )
        .unwrap();
        assert_eq!(element.kind(), FieldKind::ReferenceArray);
        assert_eq!(
            element.props().get("reference"),
            Some(&PropValue::Str("managers".into()))
        );
        assert_eq!(
            element.children()[0].kind(),
            FieldKind::AutocompleteArrayInput
        );
    }

    #[test]
    fn test_ids_suffix_pluralizes_y_stems() {
        let schema = SchemaDocument::from_json(json!({
            "definitions": {
                "companies": { "properties": { "name": { "type": "string" } } },
            },
        }))
        .unwrap();
        let types = edit_field_types();
        let element = infer(
            "company_ids",
            &descriptor(PropertyType::Array),
            &schema,
            &types,
            &[],
        )
        .unwrap();
        assert_eq!(
            element.props().get("reference"),
            Some(&PropValue::Str("companies".into()))
        );
    }

    #[test]
    fn test_plain_array_falls_back_to_string() {
        let schema = empty_schema();
        let types = list_field_types();
        let element = infer(
            "tags",
            &descriptor(PropertyType::Array),
            &schema,
            &types,
            &["tags".into()],
        )
        .unwrap();
        assert_eq!(element.kind(), FieldKind::String);
        // Arrays never carry the required marker.
        assert_eq!(element.props().get("validate"), None);
    }

    #[test]
    fn test_dangling_reference_is_fatal() {
        let schema = empty_schema();
        let types = edit_field_types();
        let descriptor = PropertyDescriptor {
            ty: PropertyType::Integer,
            format: None,
            description: Some("Note:\nThis is a Foreign Key to `companies.id`.".into()),
        };
        let err = infer("company_id", &descriptor, &schema, &types, &[]).unwrap_err();
        assert!(matches!(
            err,
            InferenceError::UnknownReferencedResource { .. }
        ));
    }

    #[test]
    fn test_unlabeled_reference_warns_but_builds() {
        let schema = SchemaDocument::from_json(json!({
            "definitions": {
                "companies": { "properties": { "code": { "type": "string" } } },
            },
        }))
        .unwrap();
        let types = edit_field_types();
        let descriptor = PropertyDescriptor {
            ty: PropertyType::Integer,
            format: None,
            description: Some("Note:\nThis is a Foreign Key to `companies.id`.".into()),
        };
        let element = infer("company_id", &descriptor, &schema, &types, &[]).unwrap();
        assert_eq!(element.kind(), FieldKind::Reference);
        assert!(element.warning().unwrap().contains("companies"));
        let child = &element.children()[0];
        assert_eq!(child.props().get("optionText"), None);
    }

    #[test]
    fn test_malformed_foreign_key_description_degrades() {
        let schema = empty_schema();
        let types = edit_field_types();
        let descriptor = PropertyDescriptor {
            ty: PropertyType::String,
            format: None,
            description: Some("Note:\nThis is a Foreign Key to nowhere in particular".into()),
        };
        let element = infer("company_id", &descriptor, &schema, &types, &[]).unwrap();
        assert_eq!(element.kind(), FieldKind::String);
    }

    fn property_type() -> impl Strategy<Value = PropertyType> {
        prop_oneof![
            Just(PropertyType::String),
            Just(PropertyType::Integer),
            Just(PropertyType::Number),
            Just(PropertyType::Boolean),
            Just(PropertyType::Array),
            Just(PropertyType::Object),
        ]
    }

    proptest! {
        // Inference is total: any descriptor either infers an element or
        // reports a dangling reference; it never panics.
        #[test]
        fn test_infer_is_total(
            name in "\\PC{0,24}",
            ty in property_type(),
            format in proptest::option::of("\\PC{0,24}"),
            description in proptest::option::of("\\PC{0,48}"),
        ) {
            let schema = empty_schema();
            let descriptor = PropertyDescriptor { ty, format, description };
            for types in [list_field_types(), edit_field_types(), show_field_types()] {
                let result = infer(&name, &descriptor, &schema, &types, &[]);
                if let Err(err) = result {
                    prop_assert!(
                        matches!(
                            err,
                            InferenceError::UnknownReferencedResource { .. }
                        ),
                        "expected UnknownReferencedResource, got {:?}",
                        err
                    );
                }
            }
        }
    }
}
