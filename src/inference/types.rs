//! The registry mapping field kinds to components and representations.
//!
//! Each page purpose (list, edit, show) supplies its own [`TypeMap`]: the
//! same property infers to a `TextField` on a list page and a `TextInput` on
//! a form. New kinds are added by registering a table entry, not by patching
//! inference logic.

use derive_more::Display;
use itertools::Itertools;
use std::collections::HashMap;

use super::element::Representation;
use crate::schema::PropertyType;

/// The semantic kind of an inferred element.
///
/// The display form is the kind's name in the backend type vocabulary, where
/// it has one.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash)]
pub enum FieldKind {
    #[display(fmt = "id")]
    Id,
    #[display(fmt = "reference")]
    Reference,
    #[display(fmt = "referenceArray")]
    ReferenceArray,
    #[display(fmt = "email")]
    Email,
    #[display(fmt = "url")]
    Url,
    #[display(fmt = "date")]
    Date,
    #[display(fmt = "number")]
    Number,
    #[display(fmt = "boolean")]
    Boolean,
    #[display(fmt = "string")]
    String,
    #[display(fmt = "autocompleteInput")]
    AutocompleteInput,
    #[display(fmt = "autocompleteArrayInput")]
    AutocompleteArrayInput,
    #[display(fmt = "searchInput")]
    SearchInput,
    #[display(fmt = "table")]
    Table,
    #[display(fmt = "form")]
    Form,
    #[display(fmt = "show")]
    Show,
}

impl FieldKind {
    /// The kind whose name matches a schema type exactly, if there is one.
    ///
    /// `integer` deliberately has no entry here; it is handled by its own
    /// inference rule, which maps it to [`Number`](Self::Number).
    pub(crate) fn of_type(ty: PropertyType) -> Option<Self> {
        match ty {
            PropertyType::String => Some(Self::String),
            PropertyType::Number => Some(Self::Number),
            PropertyType::Boolean => Some(Self::Boolean),
            PropertyType::Integer | PropertyType::Array | PropertyType::Object => None,
        }
    }
}

/// One registry entry: the widget bound to a kind and the function that
/// renders its source-text representation.
#[derive(Clone, Copy, Debug)]
pub struct FieldType {
    /// The concrete widget instantiated on realization.
    pub component: &'static str,
    /// Renders the element (and its pre-rendered children) as source text.
    pub represent: fn(&Representation<'_>) -> String,
}

/// The kinds available to one inference pass, keyed by [`FieldKind`].
///
/// Every map carries a generic string entry, supplied at construction, so
/// [`field_type`](Self::field_type) is total: a kind with no registered
/// entry degrades to the string rendering rather than failing.
#[derive(Debug)]
pub struct TypeMap {
    string: FieldType,
    kinds: HashMap<FieldKind, FieldType>,
}

impl TypeMap {
    /// A map whose generic string kind renders as `string`.
    pub fn new(string: FieldType) -> Self {
        Self {
            string,
            kinds: HashMap::new(),
        }
    }

    /// Register `field_type` under `kind`.
    pub fn with(mut self, kind: FieldKind, field_type: FieldType) -> Self {
        self.kinds.insert(kind, field_type);
        self
    }

    /// Does this map define `kind`?
    pub fn has(&self, kind: FieldKind) -> bool {
        kind == FieldKind::String || self.kinds.contains_key(&kind)
    }

    /// The entry for `kind`, or the generic string entry when `kind` is not
    /// registered.
    pub fn field_type(&self, kind: FieldKind) -> &FieldType {
        self.kinds.get(&kind).unwrap_or(&self.string)
    }
}

/// Renders a childless element: `<Component prop="value" />`.
pub fn represent_leaf(repr: &Representation<'_>) -> String {
    format!(
        "{}<{}{} />",
        repr.indent,
        repr.component,
        repr.props.attributes()
    )
}

/// Renders an element around its children; collapses to a leaf when there
/// are none.
pub fn represent_container(repr: &Representation<'_>) -> String {
    if repr.children.is_empty() {
        return represent_leaf(repr);
    }
    format!(
        "{indent}<{component}{attributes}>\n{children}\n{indent}</{component}>",
        indent = repr.indent,
        component = repr.component,
        attributes = repr.props.attributes(),
        children = repr.children.iter().join("\n"),
    )
}

fn leaf(component: &'static str) -> FieldType {
    FieldType {
        component,
        represent: represent_leaf,
    }
}

fn container(component: &'static str) -> FieldType {
    FieldType {
        component,
        represent: represent_container,
    }
}

/// The kinds available when guessing a list page.
pub fn list_field_types() -> TypeMap {
    TypeMap::new(leaf("TextField"))
        .with(FieldKind::Table, container("Datagrid"))
        .with(FieldKind::Id, leaf("TextField"))
        .with(FieldKind::Reference, container("ReferenceField"))
        .with(FieldKind::ReferenceArray, container("ReferenceArrayField"))
        .with(FieldKind::Email, leaf("EmailField"))
        .with(FieldKind::Url, leaf("UrlField"))
        .with(FieldKind::Date, leaf("DateField"))
        .with(FieldKind::Number, leaf("NumberField"))
        .with(FieldKind::Boolean, leaf("BooleanField"))
        .with(FieldKind::SearchInput, leaf("SearchInput"))
}

/// The kinds available when guessing an edit or create form.
pub fn edit_field_types() -> TypeMap {
    TypeMap::new(leaf("TextInput"))
        .with(FieldKind::Form, container("SimpleForm"))
        .with(FieldKind::Id, leaf("TextInput"))
        .with(FieldKind::Reference, container("ReferenceInput"))
        .with(FieldKind::ReferenceArray, container("ReferenceArrayInput"))
        .with(FieldKind::AutocompleteInput, leaf("AutocompleteInput"))
        .with(
            FieldKind::AutocompleteArrayInput,
            leaf("AutocompleteArrayInput"),
        )
        .with(FieldKind::Email, leaf("TextInput"))
        .with(FieldKind::Url, leaf("TextInput"))
        .with(FieldKind::Date, leaf("DateInput"))
        .with(FieldKind::Number, leaf("NumberInput"))
        .with(FieldKind::Boolean, leaf("BooleanInput"))
}

/// The kinds available when guessing a show page.
pub fn show_field_types() -> TypeMap {
    TypeMap::new(leaf("TextField"))
        .with(FieldKind::Show, container("SimpleShowLayout"))
        .with(FieldKind::Id, leaf("TextField"))
        .with(FieldKind::Reference, container("ReferenceField"))
        .with(FieldKind::ReferenceArray, container("ReferenceArrayField"))
        .with(FieldKind::Email, leaf("EmailField"))
        .with(FieldKind::Url, leaf("UrlField"))
        .with(FieldKind::Date, leaf("DateField"))
        .with(FieldKind::Number, leaf("NumberField"))
        .with(FieldKind::Boolean, leaf("BooleanField"))
}
