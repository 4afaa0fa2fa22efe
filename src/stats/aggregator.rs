//! Section-isolated dashboard aggregation.

use tracing::{debug, error, info, instrument};

use super::{
    DashboardStats, INACTIVE_PROJECT_STATUSES, KnowledgeStats, KnowledgeTable, ProjectStats,
    StatsConfig, StatsError, StatsSource, TaskRow, TaskStats,
};

/// Computes a fresh [`DashboardStats`] snapshot.
///
/// Project and task sections are only read when `config.projects_enabled` is
/// set; knowledge counts are always read. A failure inside one section is
/// logged and leaves that section at its zero defaults. An empty `project_id`
/// is treated as no filter.
///
/// # Errors
///
/// Returns [`StatsError`] only when `source` cannot be reached at all.
#[instrument(skip(source), fields(projects_enabled = config.projects_enabled))]
pub async fn get_dashboard_stats<S>(
    source: &S,
    config: &StatsConfig,
    project_id: Option<&str>,
) -> Result<DashboardStats, StatsError>
where
    S: StatsSource + ?Sized,
{
    info!("Getting dashboard statistics");
    source.check_connection().await?;

    let project_id = project_id.filter(|id| !id.is_empty());

    let mut projects = ProjectStats::default();
    let mut tasks = TaskStats::default();

    if config.projects_enabled {
        match source.project_statuses().await {
            Ok(statuses) => {
                projects = tally_projects(&statuses);
                info!(
                    total = projects.total,
                    active = projects.active,
                    "Projects counted"
                );
            }
            Err(e) => error!(error = %e, "Failed to get projects stats"),
        }

        if let Some(project_id) = project_id {
            debug!(project_id, "Filtering tasks by project");
        }
        match source.task_rows(project_id).await {
            Ok(rows) => {
                tasks = tally_tasks(&rows);
                info!(
                    todo = tasks.todo,
                    doing = tasks.doing,
                    review = tasks.review,
                    done = tasks.done,
                    archived = tasks.archived,
                    total = tasks.total,
                    "Tasks counted"
                );
            }
            Err(e) => error!(error = %e, "Failed to get tasks stats"),
        }
    }

    let knowledge = KnowledgeStats {
        sources: count_or_zero(source, KnowledgeTable::Sources).await,
        documents: count_or_zero(source, KnowledgeTable::Documents).await,
        code_examples: count_or_zero(source, KnowledgeTable::CodeExamples).await,
    };

    info!(
        projects_total = projects.total,
        tasks_total = tasks.total,
        knowledge_sources = knowledge.sources,
        "Dashboard statistics retrieved"
    );

    Ok(DashboardStats {
        projects,
        tasks,
        knowledge,
        projects_enabled: config.projects_enabled,
    })
}

async fn count_or_zero<S>(source: &S, table: KnowledgeTable) -> u64
where
    S: StatsSource + ?Sized,
{
    match source.count_rows(table).await {
        Ok(count) => count,
        Err(e) => {
            error!(table = table.table_name(), error = %e, "Failed to count knowledge rows");
            0
        }
    }
}

/// Counts all projects and those not in [`INACTIVE_PROJECT_STATUSES`].
#[must_use]
pub fn tally_projects(statuses: &[Option<String>]) -> ProjectStats {
    let active = statuses
        .iter()
        .filter(|status| {
            !status
                .as_deref()
                .is_some_and(|s| INACTIVE_PROJECT_STATUSES.contains(&s))
        })
        .count();

    ProjectStats {
        total: statuses.len() as u64,
        active: active as u64,
    }
}

/// Buckets task rows by status.
///
/// Archived rows only count as `archived`. A missing or empty status counts
/// as `todo`; unknown statuses only count towards `total`.
#[must_use]
pub fn tally_tasks(rows: &[TaskRow]) -> TaskStats {
    let mut stats = TaskStats {
        total: rows.len() as u64,
        ..TaskStats::default()
    };

    for row in rows {
        if row.archived {
            stats.archived += 1;
            continue;
        }

        match row.status.as_deref().filter(|s| !s.is_empty()).unwrap_or("todo") {
            "todo" => stats.todo += 1,
            "doing" => stats.doing += 1,
            "review" => stats.review += 1,
            "done" => stats.done += 1,
            other => debug!(task_id = %row.id, status = other, "Unrecognized task status"),
        }
    }

    stats
}
