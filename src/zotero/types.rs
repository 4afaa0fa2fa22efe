//! Shapes returned by the Zotero client.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Item type tag used by Zotero for attachment records.
pub(crate) const ATTACHMENT_ITEM_TYPE: &str = "attachment";

/// Link modes whose file content is stored in Zotero and can be downloaded.
const STORED_LINK_MODES: [&str; 2] = ["imported_file", "imported_url"];

/// A named grouping of items within a library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    /// Opaque collection key.
    pub key: String,
    pub name: String,
    /// Key of the parent collection, `None` for top-level collections.
    pub parent_collection: Option<String>,
    /// Library version at which the collection last changed.
    pub version: i64,
}

/// Raw collection record as returned by `GET .../collections`.
#[derive(Debug, Deserialize)]
pub(crate) struct RawCollection {
    pub key: String,
    pub version: i64,
    pub data: RawCollectionData,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawCollectionData {
    pub name: String,
    /// Zotero sends `false` for top-level collections.
    #[serde(default, deserialize_with = "parent_collection_key")]
    pub parent_collection: Option<String>,
}

fn parent_collection_key<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(key) if !key.is_empty() => Some(key),
        _ => None,
    })
}

impl From<RawCollection> for Collection {
    fn from(raw: RawCollection) -> Self {
        Self {
            key: raw.key,
            name: raw.data.name,
            parent_collection: raw.data.parent_collection,
            version: raw.version,
        }
    }
}

/// Outcome of [`super::ZoteroClient::download_attachment`].
///
/// Downloads never return an error; callers treat anything other than
/// `Found` as "skip this attachment".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachmentDownload {
    /// PDF bytes.
    Found(Vec<u8>),
    /// The file exists but its content type is not a PDF.
    NotPdf {
        /// The content type reported by the storage host.
        content_type: String,
    },
    /// Transport failure or non-success status.
    Unavailable {
        /// Human-readable failure description.
        reason: String,
    },
}

impl AttachmentDownload {
    /// Returns the PDF bytes, if any.
    #[must_use]
    pub fn into_pdf(self) -> Option<Vec<u8>> {
        match self {
            Self::Found(bytes) => Some(bytes),
            Self::NotPdf { .. } | Self::Unavailable { .. } => None,
        }
    }

    #[must_use]
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// Returns true when a raw item record is an attachment.
#[must_use]
pub fn is_attachment(item: &Value) -> bool {
    item.pointer("/data/itemType").and_then(Value::as_str) == Some(ATTACHMENT_ITEM_TYPE)
}

/// Content metadata of an attachment item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentInfo {
    pub key: String,
    /// Key of the bibliographic item this attachment belongs to.
    pub parent_item: Option<String>,
    pub title: String,
    pub content_type: Option<String>,
    pub link_mode: Option<String>,
    pub filename: Option<String>,
}

impl AttachmentInfo {
    /// Projects attachment fields out of a raw item record.
    ///
    /// Returns `None` when the record is not an attachment.
    #[must_use]
    pub fn from_raw(item: &Value) -> Option<Self> {
        if !is_attachment(item) {
            return None;
        }
        let data = item.get("data");
        let text = |field: &str| {
            data.and_then(|d| d.get(field))
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        Some(Self {
            key: item
                .get("key")
                .and_then(Value::as_str)
                .map(str::to_string)
                .or_else(|| text("key"))
                .unwrap_or_default(),
            parent_item: text("parentItem"),
            title: text("title").unwrap_or_default(),
            content_type: text("contentType"),
            link_mode: text("linkMode"),
            filename: text("filename"),
        })
    }

    /// True when the declared content type is a PDF.
    #[must_use]
    pub fn is_pdf(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.to_ascii_lowercase().contains("pdf"))
    }

    /// True when the file is stored in Zotero (not a link to an external file).
    #[must_use]
    pub fn is_stored_file(&self) -> bool {
        self.link_mode
            .as_deref()
            .is_some_and(|mode| STORED_LINK_MODES.contains(&mode))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_collection_from_raw_top_level_false_parent() {
        let raw: RawCollection = serde_json::from_value(json!({
            "key": "ABCD1234",
            "version": 17,
            "data": {"key": "ABCD1234", "name": "Papers", "parentCollection": false}
        }))
        .unwrap();

        let collection = Collection::from(raw);
        assert_eq!(collection.key, "ABCD1234");
        assert_eq!(collection.name, "Papers");
        assert_eq!(collection.parent_collection, None);
        assert_eq!(collection.version, 17);
    }

    #[test]
    fn test_collection_from_raw_nested() {
        let raw: RawCollection = serde_json::from_value(json!({
            "key": "CHILD001",
            "version": 3,
            "data": {"name": "Sub", "parentCollection": "ABCD1234"}
        }))
        .unwrap();

        assert_eq!(
            Collection::from(raw).parent_collection.as_deref(),
            Some("ABCD1234")
        );
    }

    #[test]
    fn test_collection_missing_parent_field() {
        let raw: RawCollection = serde_json::from_value(json!({
            "key": "K", "version": 1, "data": {"name": "N"}
        }))
        .unwrap();
        assert!(Collection::from(raw).parent_collection.is_none());
    }

    #[test]
    fn test_attachment_info_from_raw() {
        let item = json!({
            "key": "ATT00001",
            "data": {
                "itemType": "attachment",
                "parentItem": "PARENT01",
                "title": "Full Text PDF",
                "contentType": "application/pdf",
                "linkMode": "imported_url",
                "filename": "paper.pdf"
            }
        });

        let info = AttachmentInfo::from_raw(&item).unwrap();
        assert_eq!(info.key, "ATT00001");
        assert_eq!(info.parent_item.as_deref(), Some("PARENT01"));
        assert!(info.is_pdf());
        assert!(info.is_stored_file());
    }

    #[test]
    fn test_attachment_info_linked_file_not_stored() {
        let item = json!({
            "key": "ATT2",
            "data": {"itemType": "attachment", "contentType": "text/html", "linkMode": "linked_url"}
        });
        let info = AttachmentInfo::from_raw(&item).unwrap();
        assert!(!info.is_pdf());
        assert!(!info.is_stored_file());
    }

    #[test]
    fn test_attachment_info_rejects_non_attachment() {
        let item = json!({"key": "X", "data": {"itemType": "journalArticle"}});
        assert!(AttachmentInfo::from_raw(&item).is_none());
        assert!(!is_attachment(&json!({"key": "no-data"})));
    }

    #[test]
    fn test_attachment_download_into_pdf() {
        assert_eq!(
            AttachmentDownload::Found(b"%PDF".to_vec()).into_pdf(),
            Some(b"%PDF".to_vec())
        );
        assert!(
            AttachmentDownload::NotPdf {
                content_type: "text/html".to_string()
            }
            .into_pdf()
            .is_none()
        );
        assert!(
            !AttachmentDownload::Unavailable {
                reason: "timeout".to_string()
            }
            .is_found()
        );
    }
}
