//! Page and admin guessers built on top of schema inference.

pub mod discovery;
pub mod page;

pub use discovery::{admin_code, discover, AdminGuesser, ResourceCapabilities};
pub use page::{assemble_page, GuessError, GuessedPage, PageGuesser, PageKind};
