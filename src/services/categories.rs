//! Category aggregation over the current records
//!
//! Categories are recomputed from scratch on every request and never cached.

use std::collections::{BTreeSet, HashSet};

use crate::models::{Category, CategoryKind, ImageRecord};
use crate::utils::{TAG_DELIMITER, loose_tag_match};

/// Derive the category listing from the records' tags.
///
/// Distinct tags are visited in sorted order. A composite tag contributes
/// its first segment as a folder category (once); a single-segment tag is a
/// file category of its own. Counts use [`loose_tag_match`].
pub fn aggregate_categories(records: &[ImageRecord]) -> Vec<Category> {
    let tags: BTreeSet<&str> = records.iter().map(|record| record.tag.as_str()).collect();

    let mut seen_folders = HashSet::new();
    let mut categories = Vec::new();

    for tag in tags {
        let mut parts = tag.split(TAG_DELIMITER);
        let head = parts.next().unwrap_or(tag);

        let (id, kind) = if parts.next().is_some() {
            if !seen_folders.insert(head) {
                continue;
            }
            (head, CategoryKind::Folder)
        } else {
            (tag, CategoryKind::File)
        };

        categories.push(Category {
            id: id.to_string(),
            name: id.to_string(),
            kind,
            count: count_matching(records, id),
        });
    }

    categories
}

pub fn count_matching(records: &[ImageRecord], category_id: &str) -> usize {
    records
        .iter()
        .filter(|record| loose_tag_match(&record.tag, category_id))
        .count()
}
