//! Response and row types for dashboard statistics.

use serde::{Deserialize, Serialize};

/// Project statuses that do not count towards `projects.active`.
pub const INACTIVE_PROJECT_STATUSES: [&str; 2] = ["archived", "completed"];

/// Injected configuration for a statistics request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsConfig {
    /// Whether project and task sections are computed at all.
    pub projects_enabled: bool,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            projects_enabled: true,
        }
    }
}

/// Project counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectStats {
    pub total: u64,
    pub active: u64,
}

/// Task counts by status bucket.
///
/// `total` covers every row read, including archived rows and rows whose
/// status is not one of the known buckets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStats {
    pub todo: u64,
    pub doing: u64,
    pub review: u64,
    pub done: u64,
    pub archived: u64,
    pub total: u64,
}

/// Knowledge-base row counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeStats {
    pub sources: u64,
    pub documents: u64,
    pub code_examples: u64,
}

/// Dashboard summary returned by `GET /api/dashboard/stats`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub projects: ProjectStats,
    pub tasks: TaskStats,
    pub knowledge: KnowledgeStats,
    pub projects_enabled: bool,
}

/// A task row as read for aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRow {
    pub id: String,
    pub status: Option<String>,
    pub project_id: Option<String>,
    pub archived: bool,
}

impl TaskRow {
    /// Builds an unarchived row with the given status.
    #[must_use]
    pub fn new(id: impl Into<String>, status: Option<&str>) -> Self {
        Self {
            id: id.into(),
            status: status.map(str::to_string),
            project_id: None,
            archived: false,
        }
    }

    /// Marks the row archived.
    #[must_use]
    pub fn archived(mut self) -> Self {
        self.archived = true;
        self
    }
}
