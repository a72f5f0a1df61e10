//! Naming boundary and casing helpers.
//!
//! Pluralization is an injected service with no production default; casing
//! is fully specified and implemented here. Wire field keys lower-case the
//! first letter of the declared field name and change nothing else, while
//! default resource type names are dasherized after pluralization.

/// Pluralizes a noun when computing default resource type names.
pub trait NamingService: Send + Sync {
    /// Returns the plural form of `word`.
    fn pluralize(&self, word: &str) -> String;
}

/// Lower-case the first letter of a name, leaving the rest untouched.
pub fn lower_camel(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Convert a camel- or snake-cased name to kebab-case.
///
/// A dash is inserted before each upper-case hump; underscores and spaces
/// become dashes.
pub fn dasherize(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for (i, ch) in name.chars().enumerate() {
        if ch == '_' || ch == ' ' {
            if !out.ends_with('-') {
                out.push('-');
            }
        } else if ch.is_uppercase() {
            if i > 0 && !out.ends_with('-') {
                out.push('-');
            }
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}
