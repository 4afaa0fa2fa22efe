//! Data-access seam for dashboard statistics.
//!
//! The aggregator depends on [`StatsSource`] rather than on a concrete pool so
//! that section isolation can be exercised with failing fakes.

use async_trait::async_trait;
use sqlx::Row;
use tracing::instrument;

use super::{StatsError, TaskRow};
use crate::Database;

/// Knowledge-base tables counted by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnowledgeTable {
    /// Crawled or uploaded knowledge sources.
    Sources,
    /// Documents (crawled pages).
    Documents,
    /// Extracted code examples.
    CodeExamples,
}

impl KnowledgeTable {
    /// All tables, in response order.
    pub const ALL: [Self; 3] = [Self::Sources, Self::Documents, Self::CodeExamples];

    /// Backing table name.
    #[must_use]
    pub fn table_name(self) -> &'static str {
        match self {
            Self::Sources => "sources",
            Self::Documents => "crawled_pages",
            Self::CodeExamples => "code_examples",
        }
    }
}

/// Read-only data-access contract for dashboard statistics.
#[async_trait]
pub trait StatsSource: Send + Sync {
    /// Verifies the store can be reached before any section is read.
    async fn check_connection(&self) -> Result<(), StatsError>;

    /// Returns the status of every project row.
    async fn project_statuses(&self) -> Result<Vec<Option<String>>, StatsError>;

    /// Returns task rows, restricted to one project when `project_id` is set.
    async fn task_rows(&self, project_id: Option<&str>) -> Result<Vec<TaskRow>, StatsError>;

    /// Returns the exact row count of a knowledge table.
    async fn count_rows(&self, table: KnowledgeTable) -> Result<u64, StatsError>;
}

/// [`StatsSource`] backed by the `SQLite` schema in `migrations/`.
#[derive(Debug, Clone)]
pub struct SqliteStatsSource {
    db: Database,
}

impl SqliteStatsSource {
    #[must_use]
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl StatsSource for SqliteStatsSource {
    #[instrument(skip(self))]
    async fn check_connection(&self) -> Result<(), StatsError> {
        let conn = self.db.pool().acquire().await?;
        drop(conn);
        Ok(())
    }

    #[instrument(skip(self))]
    async fn project_statuses(&self) -> Result<Vec<Option<String>>, StatsError> {
        let rows = sqlx::query("SELECT status FROM projects")
            .fetch_all(self.db.pool())
            .await?;

        rows.iter()
            .map(|row| {
                row.try_get::<Option<String>, _>("status")
                    .map_err(StatsError::from)
            })
            .collect()
    }

    #[instrument(skip(self))]
    async fn task_rows(&self, project_id: Option<&str>) -> Result<Vec<TaskRow>, StatsError> {
        let rows = match project_id {
            Some(project_id) => {
                sqlx::query(
                    r"SELECT id, status, project_id, archived FROM tasks
                      WHERE project_id = ?",
                )
                .bind(project_id)
                .fetch_all(self.db.pool())
                .await?
            }
            None => {
                sqlx::query("SELECT id, status, project_id, archived FROM tasks")
                    .fetch_all(self.db.pool())
                    .await?
            }
        };

        rows.iter()
            .map(|row| -> Result<TaskRow, StatsError> {
                Ok(TaskRow {
                    id: row.try_get("id")?,
                    status: row.try_get("status")?,
                    project_id: row.try_get("project_id")?,
                    archived: row.try_get("archived")?,
                })
            })
            .collect()
    }

    #[instrument(skip(self), fields(table = table.table_name()))]
    async fn count_rows(&self, table: KnowledgeTable) -> Result<u64, StatsError> {
        // Table names come from the closed KnowledgeTable set, never from input.
        let sql = format!("SELECT COUNT(*) AS count FROM {}", table.table_name());
        let row = sqlx::query(&sql).fetch_one(self.db.pool()).await?;
        let count: i64 = row.try_get("count")?;
        Ok(u64::try_from(count).unwrap_or_default())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    async fn seeded_source() -> SqliteStatsSource {
        let db = Database::new_in_memory().await.unwrap();
        sqlx::query("INSERT INTO projects (id, title, status) VALUES ('p1', 'One', 'active'), ('p2', 'Two', NULL)")
            .execute(db.pool())
            .await
            .unwrap();
        sqlx::query(
            "INSERT INTO tasks (id, project_id, status, archived) VALUES
             ('t1', 'p1', 'todo', 0), ('t2', 'p1', NULL, 1), ('t3', 'p2', 'done', 0)",
        )
        .execute(db.pool())
        .await
        .unwrap();
        SqliteStatsSource::new(db)
    }

    #[test]
    fn test_knowledge_table_names() {
        let names: Vec<_> = KnowledgeTable::ALL
            .iter()
            .map(|table| table.table_name())
            .collect();
        assert_eq!(names, ["sources", "crawled_pages", "code_examples"]);
    }

    #[tokio::test]
    async fn test_project_statuses_reads_nulls() {
        let source = seeded_source().await;
        let mut statuses = source.project_statuses().await.unwrap();
        statuses.sort();
        assert_eq!(statuses, vec![None, Some("active".to_string())]);
    }

    #[tokio::test]
    async fn test_task_rows_filter_by_project() {
        let source = seeded_source().await;

        let all = source.task_rows(None).await.unwrap();
        assert_eq!(all.len(), 3);

        let p1 = source.task_rows(Some("p1")).await.unwrap();
        assert_eq!(p1.len(), 2);
        assert!(p1.iter().all(|row| row.project_id.as_deref() == Some("p1")));
        assert!(p1.iter().any(|row| row.archived && row.status.is_none()));
    }

    #[tokio::test]
    async fn test_count_rows_empty_tables() {
        let source = seeded_source().await;
        for table in KnowledgeTable::ALL {
            assert_eq!(source.count_rows(table).await.unwrap(), 0);
        }
    }

    #[tokio::test]
    async fn test_check_connection_fails_after_close() {
        let db = Database::new_in_memory().await.unwrap();
        let source = SqliteStatsSource::new(db.clone());
        assert!(source.check_connection().await.is_ok());

        db.close().await;
        let err = source.check_connection().await.unwrap_err();
        assert_eq!(
            err.database_kind(),
            Some(crate::stats::StatsDbErrorKind::PoolClosed)
        );
    }
}
