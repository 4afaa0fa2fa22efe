//! Saves the PDF attachments of a Zotero collection to disk.
//!
//! Each downloaded PDF is written as `{attachment_key}.pdf` with a
//! `{attachment_key}.json` metadata file next to it describing the parent
//! bibliographic item. Existing PDFs are left untouched, so re-running an
//! export only fetches what is missing. A PDF found without its metadata file
//! gets the metadata file rewritten from the listing.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::zotero::{
    AttachmentDownload, AttachmentInfo, ItemMetadata, MAX_PAGE_SIZE, ZoteroClient, ZoteroError,
    extract_item_metadata,
};

/// Errors produced while exporting a collection.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Listing the collection failed.
    #[error(transparent)]
    Zotero(#[from] ZoteroError),

    /// I/O error writing into the output directory.
    #[error("I/O error writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Metadata serialization error.
    #[error("JSON serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Counts for one export run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExportSummary {
    /// Attachment records found in the collection.
    pub attachments: usize,
    /// PDFs downloaded and written in this run.
    pub downloaded: usize,
    /// PDFs already present in the output directory.
    pub already_present: usize,
    /// Present PDFs whose missing metadata file was rewritten.
    pub metadata_restored: usize,
    /// Attachments skipped because they are not stored PDFs.
    pub not_pdf: usize,
    /// Attachments whose download failed.
    pub unavailable: usize,
}

/// Metadata file written next to each PDF.
#[derive(Debug, Serialize)]
struct ExportRecord<'a> {
    pdf_file: &'a str,
    attachment: &'a AttachmentInfo,
    item: &'a ItemMetadata,
}

/// Downloads every stored PDF attachment of `collection_key` into `output_dir`.
///
/// The collection listing is read page by page until a short page, so
/// collections larger than one API page are exported completely.
/// Attachments whose download comes back as not-a-PDF or unavailable are
/// counted and skipped; they never abort the export.
///
/// # Errors
///
/// Returns [`ExportError`] if the collection cannot be listed or the output
/// directory cannot be written.
#[instrument(skip(client, output_dir), fields(output_dir = %output_dir.display()))]
pub async fn export_collection_pdfs(
    client: &ZoteroClient,
    collection_key: &str,
    output_dir: &Path,
) -> Result<ExportSummary, ExportError> {
    tokio::fs::create_dir_all(output_dir)
        .await
        .map_err(|source| ExportError::Io {
            path: output_dir.to_path_buf(),
            source,
        })?;

    let items = list_all_items(client, collection_key).await?;
    let by_key: HashMap<&str, &Value> = items
        .iter()
        .filter_map(|item| item.get("key").and_then(Value::as_str).map(|k| (k, item)))
        .collect();

    let mut summary = ExportSummary::default();

    for attachment in items.iter().filter_map(AttachmentInfo::from_raw) {
        summary.attachments += 1;

        if !attachment.is_stored_file() || !attachment.is_pdf() {
            debug!(
                key = %attachment.key,
                content_type = ?attachment.content_type,
                link_mode = ?attachment.link_mode,
                "Skipping attachment that is not a stored PDF"
            );
            summary.not_pdf += 1;
            continue;
        }

        let stem = file_stem(&attachment.key);
        let pdf_path = output_dir.join(format!("{stem}.pdf"));
        let json_path = output_dir.join(format!("{stem}.json"));
        if file_exists(&pdf_path).await {
            summary.already_present += 1;
            if file_exists(&json_path).await {
                debug!(path = %pdf_path.display(), "PDF already present");
            } else {
                let item = parent_metadata(client, &attachment, &by_key).await;
                write_record(&pdf_path, &json_path, &attachment, &item).await?;
                info!(key = %attachment.key, "Restored missing metadata file");
                summary.metadata_restored += 1;
            }
            continue;
        }

        let bytes = match client.download_attachment(&attachment.key).await {
            AttachmentDownload::Found(bytes) => bytes,
            AttachmentDownload::NotPdf { content_type } => {
                warn!(key = %attachment.key, %content_type, "Attachment content is not a PDF");
                summary.not_pdf += 1;
                continue;
            }
            AttachmentDownload::Unavailable { reason } => {
                warn!(key = %attachment.key, %reason, "Attachment unavailable");
                summary.unavailable += 1;
                continue;
            }
        };

        let item = parent_metadata(client, &attachment, &by_key).await;
        write_file(&pdf_path, &bytes).await?;
        write_record(&pdf_path, &json_path, &attachment, &item).await?;

        info!(key = %attachment.key, title = %item.title, "Saved PDF");
        summary.downloaded += 1;
    }

    info!(
        attachments = summary.attachments,
        downloaded = summary.downloaded,
        already_present = summary.already_present,
        metadata_restored = summary.metadata_restored,
        not_pdf = summary.not_pdf,
        unavailable = summary.unavailable,
        "Collection export finished"
    );
    Ok(summary)
}

/// Reads every page of a collection's items.
async fn list_all_items(
    client: &ZoteroClient,
    collection_key: &str,
) -> Result<Vec<Value>, ZoteroError> {
    let mut items = Vec::new();
    loop {
        let page = client
            .list_collection_items_page(collection_key, true, items.len(), MAX_PAGE_SIZE)
            .await?;
        let last = page.len() < MAX_PAGE_SIZE;
        items.extend(page);
        if last {
            break;
        }
    }
    debug!(count = items.len(), "Listed all collection items");
    Ok(items)
}

/// Metadata of the attachment's parent item: from the listing when present,
/// otherwise fetched; falls back to the attachment's own record.
async fn parent_metadata(
    client: &ZoteroClient,
    attachment: &AttachmentInfo,
    by_key: &HashMap<&str, &Value>,
) -> ItemMetadata {
    let own = || {
        by_key
            .get(attachment.key.as_str())
            .map(|item| extract_item_metadata(item))
            .unwrap_or_default()
    };

    let Some(parent_key) = attachment.parent_item.as_deref() else {
        return own();
    };
    if let Some(parent) = by_key.get(parent_key) {
        return extract_item_metadata(parent);
    }

    match client.get_item(parent_key).await {
        Ok(Some(parent)) => extract_item_metadata(&parent),
        Ok(None) => own(),
        Err(e) => {
            warn!(parent_key, error = %e, "Could not fetch parent item metadata");
            own()
        }
    }
}

/// Reduces a key to characters safe in a file name.
fn file_stem(key: &str) -> String {
    let stem: String = key
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();
    if stem.is_empty() {
        "attachment".to_string()
    } else {
        stem
    }
}

async fn file_exists(path: &Path) -> bool {
    tokio::fs::try_exists(path).await.unwrap_or(false)
}

async fn write_record(
    pdf_path: &Path,
    json_path: &Path,
    attachment: &AttachmentInfo,
    item: &ItemMetadata,
) -> Result<(), ExportError> {
    let pdf_file = pdf_path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();
    let record = ExportRecord {
        pdf_file,
        attachment,
        item,
    };
    write_file(json_path, &serde_json::to_vec_pretty(&record)?).await
}

async fn write_file(path: &Path, contents: &[u8]) -> Result<(), ExportError> {
    tokio::fs::write(path, contents)
        .await
        .map_err(|source| ExportError::Io {
            path: path.to_path_buf(),
            source,
        })
}
