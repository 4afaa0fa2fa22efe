//! Refshelf Core Library
//!
//! Backing library for the `refshelf` tool, which serves dashboard statistics
//! for a research knowledge base and pulls papers out of Zotero libraries.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`db`] - `SQLite` connection and schema management
//! - [`stats`] - Section-isolated dashboard statistics aggregation
//! - [`zotero`] - Zotero Web API v3 client and metadata extraction
//! - [`export`] - Saving a collection's PDF attachments to disk
//! - [`server`] - HTTP API routes
//! - [`config`] - Flag/environment settings shared by the entry points

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod db;
pub mod export;
pub mod server;
pub mod stats;
mod user_agent;
pub mod zotero;

// Re-export commonly used types
pub use config::{FeatureSettings, ZoteroSettings, parse_feature_flag};
pub use db::{Database, DbError};
pub use export::{ExportError, ExportSummary, export_collection_pdfs};
pub use server::{AppState, create_router};
pub use stats::{DashboardStats, SqliteStatsSource, StatsConfig, StatsSource, get_dashboard_stats};
pub use zotero::{
    AttachmentDownload, Collection, ItemMetadata, LibraryIdentity, LibraryScope, ZoteroClient,
    ZoteroError, extract_item_metadata,
};
