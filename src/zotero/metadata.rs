//! Normalized bibliographic metadata extracted from raw Zotero items.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Creator roles that are listed as authors.
const AUTHOR_ROLES: [&str; 2] = ["author", "editor"];

/// Normalized metadata for one bibliographic item.
///
/// Text fields that are absent upstream are empty strings; identifiers and
/// timestamps that are absent are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemMetadata {
    pub key: Option<String>,
    pub version: Option<i64>,
    pub title: String,
    pub item_type: Option<String>,
    /// `"First Last"` display names, in upstream order.
    pub authors: Vec<String>,
    #[serde(rename = "abstract")]
    pub abstract_note: String,
    pub publication: String,
    /// Text before the first `-` of the item's date.
    pub year: Option<String>,
    pub doi: String,
    pub url: String,
    /// Tag labels, in upstream order.
    pub tags: Vec<String>,
    pub date_added: Option<String>,
    pub date_modified: Option<String>,
}

/// Projects a raw item record into [`ItemMetadata`].
///
/// Pure and total: unexpected shapes or missing fields yield defaults, never
/// a panic.
#[must_use]
pub fn extract_item_metadata(item: &Value) -> ItemMetadata {
    let data = item.get("data").unwrap_or(&Value::Null);
    let text = |field: &str| data.get(field).and_then(Value::as_str).map(str::to_string);

    ItemMetadata {
        key: item.get("key").and_then(Value::as_str).map(str::to_string),
        version: item.get("version").and_then(Value::as_i64),
        title: text("title").unwrap_or_default(),
        item_type: text("itemType"),
        authors: authors(data),
        abstract_note: text("abstractNote").unwrap_or_default(),
        publication: text("publicationTitle").unwrap_or_default(),
        year: text("date")
            .filter(|date| !date.is_empty())
            .and_then(|date| date.split('-').next().map(str::to_string)),
        doi: text("DOI").unwrap_or_default(),
        url: text("url").unwrap_or_default(),
        tags: tags(data),
        date_added: text("dateAdded"),
        date_modified: text("dateModified"),
    }
}

fn authors(data: &Value) -> Vec<String> {
    let Some(creators) = data.get("creators").and_then(Value::as_array) else {
        return Vec::new();
    };

    creators
        .iter()
        .filter(|creator| {
            creator
                .get("creatorType")
                .and_then(Value::as_str)
                .is_some_and(|role| AUTHOR_ROLES.contains(&role))
        })
        .map(|creator| {
            let first = creator.get("firstName").and_then(Value::as_str).unwrap_or("");
            let last = creator.get("lastName").and_then(Value::as_str).unwrap_or("");
            format!("{first} {last}").trim().to_string()
        })
        .collect()
}

fn tags(data: &Value) -> Vec<String> {
    data.get("tags")
        .and_then(Value::as_array)
        .map(|tags| {
            tags.iter()
                .filter_map(|tag| tag.get("tag").and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
