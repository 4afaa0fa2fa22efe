//! Zotero command handlers: read-only library access from the terminal.

use anyhow::{Context, Result};
use refshelf_core::zotero::AttachmentInfo;
use refshelf_core::{export_collection_pdfs, extract_item_metadata};

use super::print_json;
use crate::cli::{ZoteroArgs, ZoteroCommand};

pub async fn run_zotero_command(args: &ZoteroArgs) -> Result<()> {
    let client = args
        .settings
        .client()
        .context("Zotero is not configured")?;

    match &args.command {
        ZoteroCommand::Collections => print_json(&client.list_collections().await?),
        ZoteroCommand::Items {
            collection_key,
            no_attachments,
        } => {
            let items = client
                .list_collection_items(collection_key, !no_attachments)
                .await?;
            let metadata: Vec<_> = items.iter().map(extract_item_metadata).collect();
            print_json(&metadata)
        }
        ZoteroCommand::Item { item_key } => {
            let item = client
                .get_item(item_key)
                .await?
                .with_context(|| format!("item {item_key} not found"))?;
            print_json(&extract_item_metadata(&item))
        }
        ZoteroCommand::Attachments { item_key } => {
            let children = client.list_item_children(item_key).await?;
            let attachments: Vec<_> = children.iter().filter_map(AttachmentInfo::from_raw).collect();
            print_json(&attachments)
        }
        ZoteroCommand::Download {
            collection_key,
            output,
        } => {
            let summary = export_collection_pdfs(&client, collection_key, output).await?;
            print_json(&summary)
        }
    }
}
