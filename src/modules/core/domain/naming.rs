//! Naming rules for custom collections, custom fields and default records

use once_cell::sync::Lazy;
use regex::Regex;

/// Custom collections and fields must carry this prefix on the server
const CUSTOM_PREFIX: &str = "x_";

/// A prefixed name needs at least one character after `x_`
static CUSTOM_NAME_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^x_.+").unwrap());

/// Returns true if `name` already is a custom technical name
pub fn has_custom_prefix(name: &str) -> bool {
    CUSTOM_NAME_PATTERN.is_match(name)
}

/// Prefix `name` with `x_` unless it already carries the prefix
pub fn ensure_custom_prefix(name: &str) -> String {
    if has_custom_prefix(name) {
        name.to_string()
    } else {
        format!("{}{}", CUSTOM_PREFIX, name)
    }
}

/// Technical name of a custom collection: `"My Model"` becomes `x_my_model`
pub fn technical_name(model_name: &str) -> String {
    ensure_custom_prefix(&model_name.to_lowercase().replace(' ', "_"))
}

/// Name given to a record created without any values.
///
/// Uses the collection root (the part before the first `.`), so
/// `product.template` yields `"New Product"`.
pub fn default_record_name(collection: &str) -> String {
    let root = collection.split('.').next().unwrap_or(collection);
    format!("New {}", capitalize(root))
}

/// Upper-case the first character, lower-case the rest
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
