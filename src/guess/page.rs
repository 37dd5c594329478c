//! Guessing a single admin page from the schema.
//!
//! A [`PageGuesser`] assembles one page (list, show, edit, or create) for one
//! resource: it fetches the schema, infers an element per property, and wraps
//! the elements in the purpose's container. Assembly is pure given a schema;
//! the guesser adds caching (via the repository) and a one-shot developer log
//! of the generated source text on first success.

use itertools::Itertools;
use snafu::{OptionExt, Snafu};
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

use crate::inference::{
    infer_element, FieldKind, InferenceContext, InferenceError, InferredElement, PropValue,
    TypeMap, UiNode,
};
use crate::inflect;
use crate::schema::{SchemaDocument, SchemaError, SchemaRepository, SchemaSource};

/// Errors produced while guessing a page.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum GuessError {
    /// The schema could not be fetched.
    #[snafu(context(false))]
    #[snafu(display("{source}"))]
    Schema { source: SchemaError },

    /// The requested resource is not in the schema, or has no properties.
    #[snafu(display("the resource {resource} is not defined in the schema"))]
    UnknownResource { resource: String },

    /// A property could not be inferred.
    #[snafu(context(false))]
    #[snafu(display("{source}"))]
    Inference { source: InferenceError },
}

/// The purpose of a guessed page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PageKind {
    List,
    Show,
    Edit,
    Create,
}

impl PageKind {
    /// The type map this purpose infers against. Edit and create share one
    /// map; they differ only in the surrounding page chrome.
    pub fn field_types(&self) -> TypeMap {
        match self {
            Self::List => crate::inference::list_field_types(),
            Self::Show => crate::inference::show_field_types(),
            Self::Edit | Self::Create => crate::inference::edit_field_types(),
        }
    }

    /// The container kind wrapping this purpose's fields.
    fn container(&self) -> FieldKind {
        match self {
            Self::List => FieldKind::Table,
            Self::Show => FieldKind::Show,
            Self::Edit | Self::Create => FieldKind::Form,
        }
    }

    /// The page component wrapping the generated source text.
    pub fn wrapper(&self) -> &'static str {
        match self {
            Self::List => "List",
            Self::Show => "Show",
            Self::Edit => "Edit",
            Self::Create => "Create",
        }
    }
}

/// The result of one successful page assembly.
#[derive(Debug)]
pub struct GuessedPage {
    resource: String,
    kind: PageKind,
    types: TypeMap,
    tree: InferredElement,
    filters: Vec<InferredElement>,
    code: String,
    warnings: Vec<String>,
}

impl GuessedPage {
    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn kind(&self) -> PageKind {
        self.kind
    }

    /// The inferred element tree, rooted at the purpose's container.
    pub fn tree(&self) -> &InferredElement {
        &self.tree
    }

    /// Filter inputs synthesized alongside the page (list pages only).
    pub fn filters(&self) -> &[InferredElement] {
        &self.filters
    }

    /// The generated source text a developer can copy into a permanent
    /// definition.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Inference warnings, in tree order.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Instantiate the page's widget tree.
    pub fn realize(&self) -> UiNode {
        self.tree.realize(&self.types)
    }

    /// Instantiate the synthesized filter widgets.
    pub fn realize_filters(&self) -> Vec<UiNode> {
        self.filters
            .iter()
            .map(|filter| filter.realize(&self.types))
            .collect()
    }

    /// The developer-log text: the generated code, then any warnings.
    pub fn log_text(&self) -> String {
        let mut text = format!("Guessed {}:\n\n{}", self.kind.wrapper(), self.code);
        if !self.warnings.is_empty() {
            text.push_str("\n\n");
            text.push_str(&self.warnings.join("\n"));
        }
        text
    }
}

/// Assemble a page from an already-fetched schema.
///
/// Properties are inferred in schema-declared order. Full-text-search columns
/// are generated data, not user fields, so they are excluded from the page;
/// on list pages the first one instead becomes an always-on search filter
/// keyed `{property}@fts`.
pub fn assemble_page(
    schema: &SchemaDocument,
    resource: &str,
    kind: PageKind,
) -> Result<GuessedPage, GuessError> {
    let definition = schema
        .resource(resource)
        .filter(|definition| !definition.properties.is_empty())
        .context(UnknownResourceSnafu { resource })?;
    let types = kind.field_types();
    let ctx = InferenceContext {
        schema,
        types: &types,
        required: &definition.required,
    };

    let mut fields = Vec::new();
    for (name, descriptor) in &definition.properties {
        if descriptor.is_full_text() {
            continue;
        }
        fields.push(infer_element(name, descriptor, &ctx)?);
    }
    let tree = InferredElement::new(kind.container()).with_children(fields);

    let filters = if kind == PageKind::List {
        definition
            .full_text_property()
            .map(|property| {
                InferredElement::new(FieldKind::SearchInput)
                    .with_prop("source", PropValue::Str(format!("{property}@fts")))
                    .with_prop("alwaysOn", PropValue::Flag(true))
            })
            .into_iter()
            .collect()
    } else {
        vec![]
    };

    let code = generated_code(resource, kind, &types, &tree, &filters);
    let warnings = tree
        .warnings()
        .into_iter()
        .chain(filters.iter().flat_map(InferredElement::warnings))
        .map(String::from)
        .collect();

    Ok(GuessedPage {
        resource: resource.into(),
        kind,
        types,
        tree,
        filters,
        code,
        warnings,
    })
}

/// Render the copy-pasteable page definition.
///
/// The import list is the sorted set of distinct components used anywhere in
/// the page, including the wrapper and any filters. The page is named after
/// the singularized resource.
fn generated_code(
    resource: &str,
    kind: PageKind,
    types: &TypeMap,
    tree: &InferredElement,
    filters: &[InferredElement],
) -> String {
    let mut components: BTreeSet<&'static str> = tree.components(types);
    for filter in filters {
        components.extend(filter.components(types));
    }
    components.insert(kind.wrapper());
    let imports = components.into_iter().join(", ");

    let name = format!(
        "{}{}",
        inflect::pascal(&inflect::singularize(resource)),
        kind.wrapper()
    );
    let body = tree.describe_at(types, 2);

    let mut code = format!("import {{ {imports} }} from 'react-admin';\n\n");
    let open = if filters.is_empty() {
        format!("<{}>", kind.wrapper())
    } else {
        let entries = filters
            .iter()
            .map(|filter| format!("{},", filter.describe_at(types, 1)))
            .join("\n");
        code.push_str(&format!("const filters = [\n{entries}\n];\n\n"));
        format!("<{} filters={{filters}}>", kind.wrapper())
    };
    code.push_str(&format!(
        "export const {name} = () => (\n    {open}\n{body}\n    </{close}>\n);",
        close = kind.wrapper(),
    ));
    code
}

/// Guesses one resource+purpose page, logging its generated code once.
///
/// The log latch is owned by the guesser instance, so two guessers for the
/// same resource (or a fresh mount of the same page) each log independently,
/// and tests never bleed state into each other. Dropping the guesser, or the
/// future returned by [`assemble`](Self::assemble), before the schema fetch
/// resolves has no side effects.
pub struct PageGuesser<S> {
    repository: Arc<SchemaRepository<S>>,
    resource: String,
    kind: PageKind,
    logged: AtomicBool,
}

impl<S: SchemaSource> PageGuesser<S> {
    pub fn new(
        repository: Arc<SchemaRepository<S>>,
        resource: impl Into<String>,
        kind: PageKind,
    ) -> Self {
        Self {
            repository,
            resource: resource.into(),
            kind,
            logged: AtomicBool::new(false),
        }
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn kind(&self) -> PageKind {
        self.kind
    }

    /// Has this guesser already logged its generated code?
    pub fn has_logged(&self) -> bool {
        self.logged.load(Ordering::SeqCst)
    }

    /// Fetch the schema and assemble the page.
    ///
    /// The first successful assembly logs the generated code and warnings at
    /// info level; later calls are silent.
    pub async fn assemble(&self) -> Result<GuessedPage, GuessError> {
        let schema = self.repository.fetch().await?;
        let page = assemble_page(&schema, &self.resource, self.kind)?;
        if !self.logged.swap(true, Ordering::SeqCst) {
            info!(resource = %self.resource, "{}", page.log_text());
        }
        Ok(page)
    }
}
