//! String inflection for resource and component naming.
//!
//! The backend exposes snake case, plural resource names (`companies`,
//! `contact_notes`). The guessers need to go both ways: a to-many column like
//! `company_ids` names its target by pluralizing the stem, and a generated
//! page component names itself after the PascalCase singular
//! (`ContactNoteList`). The rules here cover regular English plurals only,
//! which is what database naming conventions produce in practice.

use convert_case::{Case, Casing};

/// Pluralize the final word of a snake case name.
pub(crate) fn pluralize(word: &str) -> String {
    if let Some(stem) = word.strip_suffix('y') {
        if !stem.ends_with(['a', 'e', 'i', 'o', 'u']) {
            return format!("{stem}ies");
        }
    }
    if ["s", "sh", "ch", "x", "z"]
        .iter()
        .any(|suffix| word.ends_with(suffix))
    {
        return format!("{word}es");
    }
    format!("{word}s")
}

/// Undo [`pluralize`]. Words that do not look plural come back unchanged.
pub(crate) fn singularize(word: &str) -> String {
    if let Some(stem) = word.strip_suffix("ies") {
        return format!("{stem}y");
    }
    for suffix in ["ses", "shes", "ches", "xes", "zes"] {
        if word.ends_with(suffix) {
            return word[..word.len() - 2].to_string();
        }
    }
    match word.strip_suffix('s') {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => word.to_string(),
    }
}

/// PascalCase form of a snake case name, for component identifiers.
pub(crate) fn pascal(word: &str) -> String {
    word.to_case(Case::Pascal)
}
