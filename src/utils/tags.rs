//! Path-derived tags
//!
//! A tag encodes the full directory ancestry of an image plus its file
//! stem, joined with `_`: `Nature/Mountains/peak.jpg` becomes
//! `Nature_Mountains_peak`.

use std::path::Path;

pub const UNCATEGORIZED_TAG: &str = "uncategorized";
pub const TAG_DELIMITER: char = '_';

/// Derive the tag for a `/`-separated path relative to the catalog root
pub fn extract_tag(relative_path: &str) -> String {
    let mut parts: Vec<&str> = relative_path.split('/').collect();
    let file_name = parts.pop().unwrap_or_default();

    let mut tags: Vec<&str> = parts.into_iter().filter(|part| !part.is_empty()).collect();

    if !file_name.is_empty() {
        let stem = Path::new(file_name)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or(file_name);
        if !stem.is_empty() {
            tags.push(stem);
        }
    }

    if tags.is_empty() {
        UNCATEGORIZED_TAG.to_string()
    } else {
        tags.join("_")
    }
}

/// Loose category membership: equality, substring containment, or
/// prefix followed by the delimiter.
///
/// Containment subsumes the other two; all three are spelled out because
/// they are the documented policy. An id that happens to appear inside an
/// unrelated tag matches too.
pub fn loose_tag_match(tag: &str, category_id: &str) -> bool {
    tag == category_id
        || tag.contains(category_id)
        || tag.starts_with(&format!("{category_id}{TAG_DELIMITER}"))
}
