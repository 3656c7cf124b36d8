//! # Tag Normalization
//!
//! Free-text tag entry is messy: padding, duplicate spellings, empty
//! strings. The name is the canonical identity; ids are derived slugs, so
//! no tag ever reaches the store with an empty id.

use domains::Tag;

/// Lowercased, hyphen-joined alphanumeric runs: "C++ / Rust FFI" -> "c-rust-ffi".
pub fn slug(name: &str) -> String {
    name.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Trim each entry, drop empties, dedupe case-insensitively (the first
/// spelling wins), and derive slug ids.
pub fn normalize<I, S>(names: I) -> Vec<Tag>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    // Tag lists are a handful of entries; a Vec scan beats a set here.
    let mut seen: Vec<String> = Vec::new();
    let mut tags = Vec::new();
    for name in names {
        let name = name.as_ref().trim();
        if name.is_empty() {
            continue;
        }
        let key = name.to_lowercase();
        if seen.contains(&key) {
            continue;
        }
        let id = slug(name);
        if id.is_empty() {
            // Punctuation-only entries carry no identity.
            continue;
        }
        seen.push(key);
        tags.push(Tag {
            id,
            name: name.to_string(),
        });
    }
    tags
}
