//! The intermediate element tree produced by inference.
//!
//! An [`InferredElement`] records what inference decided for one property: a
//! [field kind](FieldKind), rendering parameters, optional child elements
//! (a reference input nests its autocomplete; containers hold a page's
//! fields), and an optional warning when something could not be fully
//! resolved. The tree can be [realized](InferredElement::realize) into the
//! widget tree handed to the admin shell, or
//! [described](InferredElement::describe) as deterministic source text for a
//! developer to copy into a permanent definition.

use std::collections::BTreeSet;

use super::types::{FieldKind, TypeMap};

/// A rendering parameter attached to an inferred element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PropValue {
    /// A plain string value.
    Str(String),
    /// A boolean flag; `true` renders as a bare attribute, `false` is
    /// omitted.
    Flag(bool),
    /// The required-validation marker.
    Required,
    /// The autocomplete filter builder: matches `{option_text}@ilike`
    /// against the search text.
    FilterToQuery { option_text: String },
}

impl PropValue {
    /// The filter entry this prop contributes for a search string, if it is
    /// a filter builder: the `{option_text}@ilike` key paired with the
    /// wildcarded search text.
    pub fn filter_for(&self, search: &str) -> Option<(String, String)> {
        match self {
            Self::FilterToQuery { option_text } => {
                Some((format!("{option_text}@ilike"), format!("%{search}%")))
            }
            _ => None,
        }
    }

    /// Source-text attribute form, or [`None`] when the prop is omitted.
    fn attribute(&self, key: &str) -> Option<String> {
        match self {
            Self::Str(value) => Some(format!("{key}=\"{value}\"")),
            Self::Flag(true) => Some(key.to_string()),
            Self::Flag(false) => None,
            Self::Required => Some(format!("{key}={{required()}}")),
            Self::FilterToQuery { option_text } => Some(format!(
                "{key}={{searchText => ({{ '{option_text}@ilike': `%${{searchText}}%` }})}}"
            )),
        }
    }
}

/// An open, insertion-ordered set of rendering parameters.
///
/// Insertion order is the render order, which keeps
/// [`describe`](InferredElement::describe) deterministic.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Props(Vec<(&'static str, PropValue)>);

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key`, replacing any existing value in place.
    pub fn set(&mut self, key: &'static str, value: PropValue) {
        match self.0.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, existing)) => *existing = value,
            None => self.0.push((key, value)),
        }
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, key: &'static str, value: PropValue) -> Self {
        self.set(key, value);
        self
    }

    /// The value of `key`, if set.
    pub fn get(&self, key: &str) -> Option<&PropValue> {
        self.0
            .iter()
            .find(|(existing, _)| *existing == key)
            .map(|(_, value)| value)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &PropValue)> {
        self.0.iter().map(|(key, value)| (*key, value))
    }

    /// All props as source-text attributes, each preceded by a space.
    pub(crate) fn attributes(&self) -> String {
        self.0
            .iter()
            .filter_map(|(key, value)| value.attribute(key))
            .map(|attribute| format!(" {attribute}"))
            .collect()
    }
}

/// Inputs to a field kind's representation function.
pub struct Representation<'a> {
    /// The component bound to the element's kind.
    pub component: &'static str,
    /// The element's props.
    pub props: &'a Props,
    /// Already-rendered child representations, one level deeper.
    pub children: Vec<String>,
    /// Leading whitespace for this element's line.
    pub indent: String,
}

/// A node of the inferred element tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InferredElement {
    kind: FieldKind,
    props: Props,
    children: Vec<InferredElement>,
    warning: Option<String>,
}

impl InferredElement {
    pub fn new(kind: FieldKind) -> Self {
        Self {
            kind,
            props: Props::new(),
            children: vec![],
            warning: None,
        }
    }

    pub fn with_prop(mut self, key: &'static str, value: PropValue) -> Self {
        self.props.set(key, value);
        self
    }

    pub fn with_child(mut self, child: InferredElement) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: Vec<InferredElement>) -> Self {
        self.children = children;
        self
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warning = Some(warning.into());
        self
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn props(&self) -> &Props {
        &self.props
    }

    pub fn children(&self) -> &[InferredElement] {
        &self.children
    }

    pub fn warning(&self) -> Option<&str> {
        self.warning.as_deref()
    }

    /// Instantiate the widget tree for this element.
    ///
    /// The element's kind selects a component from `types`; children are
    /// realized recursively, in order. A kind missing from the map falls
    /// back to the map's generic string entry, so realization is total.
    pub fn realize(&self, types: &TypeMap) -> UiNode {
        let field_type = types.field_type(self.kind);
        UiNode {
            component: field_type.component,
            props: self.props.clone(),
            children: self
                .children
                .iter()
                .map(|child| child.realize(types))
                .collect(),
        }
    }

    /// Deterministic source text for this element and its children.
    ///
    /// Identical trees describe identically; the output depends only on the
    /// tree and the type map.
    pub fn describe(&self, types: &TypeMap) -> String {
        self.describe_at(types, 0)
    }

    /// [`describe`](Self::describe), indented `depth` levels deep.
    pub(crate) fn describe_at(&self, types: &TypeMap, depth: usize) -> String {
        let field_type = types.field_type(self.kind);
        let children = self
            .children
            .iter()
            .map(|child| child.describe_at(types, depth + 1))
            .collect();
        (field_type.represent)(&Representation {
            component: field_type.component,
            props: &self.props,
            children,
            indent: "    ".repeat(depth),
        })
    }

    /// The distinct component names used across this subtree.
    pub fn components(&self, types: &TypeMap) -> BTreeSet<&'static str> {
        let mut components = BTreeSet::new();
        self.collect_components(types, &mut components);
        components
    }

    fn collect_components(&self, types: &TypeMap, into: &mut BTreeSet<&'static str>) {
        into.insert(types.field_type(self.kind).component);
        for child in &self.children {
            child.collect_components(types, into);
        }
    }

    /// Every warning in this subtree, in tree order.
    pub fn warnings(&self) -> Vec<&str> {
        let mut warnings = vec![];
        self.collect_warnings(&mut warnings);
        warnings
    }

    fn collect_warnings<'a>(&'a self, into: &mut Vec<&'a str>) {
        if let Some(warning) = self.warning.as_deref() {
            into.push(warning);
        }
        for child in &self.children {
            child.collect_warnings(into);
        }
    }
}

/// A realized widget node, handed to the surrounding admin shell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UiNode {
    /// The concrete widget to instantiate.
    pub component: &'static str,
    /// Rendering parameters for the widget.
    pub props: Props,
    /// Child widgets, in order.
    pub children: Vec<UiNode>,
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::inference::types::list_field_types;

    fn sample_tree() -> InferredElement {
        InferredElement::new(FieldKind::Table).with_children(vec![
            InferredElement::new(FieldKind::Id).with_prop("source", PropValue::Str("id".into())),
            InferredElement::new(FieldKind::String)
                .with_prop("source", PropValue::Str("name".into()))
                .with_prop("validate", PropValue::Required),
        ])
    }

    #[test]
    fn test_describe_is_deterministic() {
        let tree = sample_tree();
        let types = list_field_types();
        assert_eq!(tree.describe(&types), tree.describe(&types));
    }

    #[test]
    fn test_describe_renders_nested_source() {
        let tree = sample_tree();
        let types = list_field_types();
        assert_eq!(
            tree.describe(&types),
            "<Datagrid>\n    <TextField source=\"id\" />\n    <TextField source=\"name\" validate={required()} />\n</Datagrid>"
        );
    }

    #[test]
    fn test_realize_preserves_order_and_components() {
        let tree = sample_tree();
        let node = tree.realize(&list_field_types());
        assert_eq!(node.component, "Datagrid");
        assert_eq!(node.children.len(), 2);
        assert_eq!(node.children[0].component, "TextField");
        assert_eq!(
            node.children[0].props.get("source"),
            Some(&PropValue::Str("id".into()))
        );
    }

    #[test]
    fn test_components_are_distinct_and_sorted() {
        let tree = sample_tree();
        let components = tree.components(&list_field_types());
        assert_eq!(
            components.into_iter().collect::<Vec<_>>(),
            ["Datagrid", "TextField"]
        );
    }

    #[test]
    fn test_filter_for() {
        let filter = PropValue::FilterToQuery {
            option_text: "name".into(),
        };
        assert_eq!(
            filter.filter_for("acme"),
            Some(("name@ilike".into(), "%acme%".into()))
        );
        assert_eq!(PropValue::Required.filter_for("acme"), None);
    }

    #[test]
    fn test_warnings_in_tree_order() {
        let tree = InferredElement::new(FieldKind::Table)
            .with_warning("outer")
            .with_child(InferredElement::new(FieldKind::String).with_warning("inner"));
        assert_eq!(tree.warnings(), ["outer", "inner"]);
    }
}
