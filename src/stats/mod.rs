//! Dashboard statistics aggregation.
//!
//! Counts projects, tasks and knowledge-base rows into a single
//! [`DashboardStats`] summary. Each section is read independently so that one
//! failing query degrades only its own section.
//!
//! # Architecture
//!
//! - [`StatsSource`] - Async data-access seam over the backing tables
//! - [`SqliteStatsSource`] - `SQLite` implementation on top of [`crate::Database`]
//! - [`get_dashboard_stats`] - Section-isolated aggregation entry point
//! - [`StatsError`] - Typed database failures

mod aggregator;
mod error;
mod model;
mod repository;

pub use aggregator::{get_dashboard_stats, tally_projects, tally_tasks};
pub use error::{StatsDbErrorKind, StatsError};
pub use model::{
    DashboardStats, INACTIVE_PROJECT_STATUSES, KnowledgeStats, ProjectStats, StatsConfig,
    TaskRow, TaskStats,
};
pub use repository::{KnowledgeTable, SqliteStatsSource, StatsSource};
