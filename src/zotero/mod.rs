//! Zotero Web API v3 client.
//!
//! This module wraps the small part of the Zotero REST surface needed to pull
//! research papers out of a reference library: listing collections, listing
//! the items of a collection, fetching single items and their attachments,
//! and downloading stored PDF files.
//!
//! # Architecture
//!
//! - [`LibraryIdentity`] - Validated API key plus personal/group library id
//! - [`ZoteroClient`] - Authenticated, stateless request/response operations
//! - [`extract_item_metadata`] - Pure projection of a raw item into [`ItemMetadata`]
//! - [`AttachmentDownload`] - Outcome of a file download (found, not a PDF, unavailable)
//!
//! # Example
//!
//! ```no_run
//! use refshelf_core::zotero::{LibraryIdentity, ZoteroClient, extract_item_metadata};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let identity = LibraryIdentity::new("api-key", Some("12345".to_string()), None)?;
//! let client = ZoteroClient::new(identity)?;
//!
//! for collection in client.list_collections().await? {
//!     for item in client.list_collection_items(&collection.key, true).await? {
//!         let metadata = extract_item_metadata(&item);
//!         println!("{}: {}", collection.name, metadata.title);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod http_client;
mod identity;
mod metadata;
mod types;

pub use client::{DEFAULT_BASE_URL, MAX_PAGE_SIZE, ZOTERO_API_VERSION, ZoteroClient};
pub use error::ZoteroError;
pub use identity::{LibraryIdentity, LibraryScope};
pub use metadata::{ItemMetadata, extract_item_metadata};
pub use types::{AttachmentDownload, AttachmentInfo, Collection, is_attachment};
