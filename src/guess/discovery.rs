//! Discovery of guessable resources and their page capabilities.
//!
//! Which pages a resource gets is read off the verbs its path exposes: a
//! readable path gets list and show pages, a postable one a create page, a
//! patchable one an edit page. Resources are reported in schema-declared
//! order so the generated admin shell is stable across runs.

use itertools::Itertools;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

use crate::schema::{SchemaDocument, SchemaError, SchemaRepository, SchemaSource};

/// The pages one resource supports.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceCapabilities {
    pub name: String,
    pub list: bool,
    pub show: bool,
    pub edit: bool,
    pub create: bool,
}

impl ResourceCapabilities {
    /// Does this resource get any page at all?
    pub fn is_guessable(&self) -> bool {
        self.list || self.show || self.edit || self.create
    }
}

/// Map every resource in `schema` to its page capabilities.
///
/// A resource with no path entry (or a path with no recognized verbs) is
/// still reported, with every capability off, so callers see the full
/// resource list.
pub fn discover(schema: &SchemaDocument) -> Vec<ResourceCapabilities> {
    schema
        .definitions
        .keys()
        .map(|name| {
            let path = schema.path(name);
            let readable = path.is_some_and(|path| path.supports_get());
            ResourceCapabilities {
                name: name.clone(),
                list: readable,
                show: readable,
                edit: path.is_some_and(|path| path.supports_patch()),
                create: path.is_some_and(|path| path.supports_post()),
            }
        })
        .collect()
}

/// Render the copy-pasteable admin shell wiring every discovered resource to
/// its guessed pages.
pub fn admin_code(resources: &[ResourceCapabilities]) -> String {
    let entries = resources
        .iter()
        .map(|resource| {
            let mut attributes = String::new();
            if resource.list {
                attributes.push_str(" list={ListGuesser}");
            }
            if resource.edit {
                attributes.push_str(" edit={EditGuesser}");
            }
            if resource.create {
                attributes.push_str(" create={CreateGuesser}");
            }
            if resource.show {
                attributes.push_str(" show={ShowGuesser}");
            }
            format!("        <Resource name=\"{}\"{attributes} />", resource.name)
        })
        .join("\n");
    format!(
        "\
import {{ Admin, Resource }} from 'react-admin';
import {{ CreateGuesser, EditGuesser, ListGuesser, ShowGuesser }} from './guessers';

export const App = () => (
    <Admin dataProvider={{dataProvider}}>
{entries}
    </Admin>
);"
    )
}

/// Discovers the admin surface, logging its generated shell once.
///
/// The counterpart of [`PageGuesser`](super::PageGuesser) one level up: where
/// a page guesser infers the fields of one page, the admin guesser infers
/// which pages exist. The same one-shot latch rules apply.
pub struct AdminGuesser<S> {
    repository: Arc<SchemaRepository<S>>,
    logged: AtomicBool,
}

impl<S: SchemaSource> AdminGuesser<S> {
    pub fn new(repository: Arc<SchemaRepository<S>>) -> Self {
        Self {
            repository,
            logged: AtomicBool::new(false),
        }
    }

    /// Has this guesser already logged its generated shell?
    pub fn has_logged(&self) -> bool {
        self.logged.load(Ordering::SeqCst)
    }

    /// Fetch the schema and discover every resource's capabilities.
    ///
    /// The first successful discovery that finds at least one resource logs
    /// the generated admin shell at info level.
    pub async fn resources(&self) -> Result<Vec<ResourceCapabilities>, SchemaError> {
        let schema = self.repository.fetch().await?;
        let resources = discover(&schema);
        if !resources.is_empty() && !self.logged.swap(true, Ordering::SeqCst) {
            info!("Guessed Admin:\n\n{}", admin_code(&resources));
        }
        Ok(resources)
    }
}
