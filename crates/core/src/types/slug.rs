//! Slug and product-name derivation.
//!
//! Slugs are used as URL handles and as the client-side uniqueness attempt
//! for bulk-created products. The backend does not enforce uniqueness, so
//! bulk upload appends a timestamp+index suffix via [`unique_slug`].

/// Derive a URL slug from a display name.
///
/// Output is lowercase, contains only `[a-z0-9_-]`, and never contains
/// consecutive hyphens. Whitespace runs become a single hyphen; every other
/// disallowed character is dropped.
#[must_use]
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());

    for ch in name.to_lowercase().chars() {
        let mapped = if ch.is_whitespace() {
            Some('-')
        } else if ch.is_ascii_alphanumeric() || ch == '_' || ch == '-' {
            Some(ch)
        } else {
            None
        };

        if let Some(c) = mapped {
            if c == '-' && slug.ends_with('-') {
                continue;
            }
            slug.push(c);
        }
    }

    slug
}

/// Derive a slug expected to be unique within a bulk-upload run.
///
/// Appends the run timestamp (epoch milliseconds) and the file's sequence
/// index to the name-derived slug.
#[must_use]
pub fn unique_slug(name: &str, run_millis: i64, index: usize) -> String {
    format!("{}-{run_millis}{index}", slugify(name))
}

/// Derive a human-readable product name from an image file name.
///
/// Strips the extension, replaces `-` and `_` separators with spaces, and
/// title-cases the first letter of every word.
///
/// `"blue_leather-bag.JPG"` becomes `"Blue Leather Bag"`.
#[must_use]
pub fn product_name_from_file(file_name: &str) -> String {
    let stem = file_name.rfind('.').map_or(file_name, |i| {
        file_name.get(..i).unwrap_or(file_name)
    });

    let mut name = String::with_capacity(stem.len());
    let mut at_word_start = true;

    for ch in stem.chars() {
        let ch = if ch == '-' || ch == '_' { ' ' } else { ch };

        if at_word_start && ch.is_alphanumeric() {
            name.extend(ch.to_uppercase());
            at_word_start = false;
        } else {
            at_word_start = !ch.is_alphanumeric();
            name.push(ch);
        }
    }

    name
}
