//! Integration tests for dashboard statistics over a file-backed SQLite database.

use refshelf_core::stats::{StatsError, TaskStats};
use refshelf_core::{Database, SqliteStatsSource, StatsConfig, get_dashboard_stats};
use tempfile::TempDir;

async fn open_db(dir: &TempDir) -> Database {
    Database::new(&dir.path().join("refshelf.db")).await.unwrap()
}

async fn insert_project(db: &Database, id: &str, status: Option<&str>) {
    sqlx::query("INSERT INTO projects (id, title, status) VALUES (?, ?, ?)")
        .bind(id)
        .bind(format!("Project {id}"))
        .bind(status)
        .execute(db.pool())
        .await
        .unwrap();
}

async fn insert_task(
    db: &Database,
    id: &str,
    project_id: Option<&str>,
    status: Option<&str>,
    archived: bool,
) {
    sqlx::query("INSERT INTO tasks (id, project_id, title, status, archived) VALUES (?, ?, ?, ?, ?)")
        .bind(id)
        .bind(project_id)
        .bind(format!("Task {id}"))
        .bind(status)
        .bind(archived)
        .execute(db.pool())
        .await
        .unwrap();
}

async fn insert_knowledge(db: &Database, sources: usize, pages: usize, examples: usize) {
    for i in 0..sources {
        sqlx::query("INSERT INTO sources (source_id, title) VALUES (?, ?)")
            .bind(format!("src-{i}"))
            .bind(format!("Source {i}"))
            .execute(db.pool())
            .await
            .unwrap();
    }
    for i in 0..pages {
        sqlx::query("INSERT INTO crawled_pages (source_id, url, content) VALUES (NULL, ?, 'text')")
            .bind(format!("https://example.org/{i}"))
            .execute(db.pool())
            .await
            .unwrap();
    }
    for i in 0..examples {
        sqlx::query("INSERT INTO code_examples (source_id, url, content) VALUES (NULL, ?, 'fn main() {}')")
            .bind(format!("https://example.org/code/{i}"))
            .execute(db.pool())
            .await
            .unwrap();
    }
}

/// Twelve tasks: 3 todo (one with no status), 2 doing, 1 review, 4 done, 2 archived.
async fn seed_tasks(db: &Database) {
    insert_project(db, "p1", Some("active")).await;
    insert_project(db, "p2", Some("archived")).await;
    insert_project(db, "p3", None).await;

    insert_task(db, "t1", Some("p1"), Some("todo"), false).await;
    insert_task(db, "t2", Some("p1"), Some("todo"), false).await;
    insert_task(db, "t3", None, None, false).await;
    insert_task(db, "t4", Some("p1"), Some("doing"), false).await;
    insert_task(db, "t5", Some("p2"), Some("doing"), false).await;
    insert_task(db, "t6", Some("p1"), Some("review"), false).await;
    insert_task(db, "t7", Some("p1"), Some("done"), false).await;
    insert_task(db, "t8", Some("p2"), Some("done"), false).await;
    insert_task(db, "t9", Some("p2"), Some("done"), false).await;
    insert_task(db, "t10", None, Some("done"), false).await;
    insert_task(db, "t11", Some("p1"), Some("done"), true).await;
    insert_task(db, "t12", Some("p1"), Some("todo"), true).await;
}

#[tokio::test]
async fn test_full_snapshot_from_sqlite() {
    let dir = TempDir::new().unwrap();
    let db = open_db(&dir).await;
    seed_tasks(&db).await;
    insert_knowledge(&db, 3, 5, 2).await;

    let source = SqliteStatsSource::new(db.clone());
    let stats = get_dashboard_stats(&source, &StatsConfig::default(), None)
        .await
        .unwrap();

    assert!(stats.projects_enabled);
    assert_eq!(stats.projects.total, 3);
    assert_eq!(stats.projects.active, 2);
    assert_eq!(
        stats.tasks,
        TaskStats {
            todo: 3,
            doing: 2,
            review: 1,
            done: 4,
            archived: 2,
            total: 12,
        }
    );
    assert_eq!(stats.knowledge.sources, 3);
    assert_eq!(stats.knowledge.documents, 5);
    assert_eq!(stats.knowledge.code_examples, 2);

    db.close().await;
}

#[tokio::test]
async fn test_project_filter_restricts_tasks_only() {
    let dir = TempDir::new().unwrap();
    let db = open_db(&dir).await;
    seed_tasks(&db).await;

    let source = SqliteStatsSource::new(db.clone());
    let stats = get_dashboard_stats(&source, &StatsConfig::default(), Some("p2"))
        .await
        .unwrap();

    assert_eq!(stats.tasks.doing, 1);
    assert_eq!(stats.tasks.done, 2);
    assert_eq!(stats.tasks.total, 3);
    assert_eq!(stats.projects.total, 3);

    let unfiltered = get_dashboard_stats(&source, &StatsConfig::default(), Some(""))
        .await
        .unwrap();
    assert_eq!(unfiltered.tasks.total, 12);
}

#[tokio::test]
async fn test_projects_disabled_reports_zero_sections() {
    let dir = TempDir::new().unwrap();
    let db = open_db(&dir).await;
    seed_tasks(&db).await;
    insert_knowledge(&db, 1, 1, 1).await;

    let source = SqliteStatsSource::new(db.clone());
    let config = StatsConfig {
        projects_enabled: false,
    };
    let stats = get_dashboard_stats(&source, &config, None).await.unwrap();

    assert!(!stats.projects_enabled);
    assert_eq!(stats.projects.total, 0);
    assert_eq!(stats.tasks, TaskStats::default());
    assert_eq!(stats.knowledge.sources, 1);
}

#[tokio::test]
async fn test_empty_database_is_all_zero() {
    let dir = TempDir::new().unwrap();
    let db = open_db(&dir).await;

    let source = SqliteStatsSource::new(db);
    let stats = get_dashboard_stats(&source, &StatsConfig::default(), None)
        .await
        .unwrap();

    assert_eq!(stats.projects.total, 0);
    assert_eq!(stats.tasks.total, 0);
    assert_eq!(stats.knowledge.documents, 0);
}

#[tokio::test]
async fn test_closed_database_fails_whole_request() {
    let dir = TempDir::new().unwrap();
    let db = open_db(&dir).await;
    let source = SqliteStatsSource::new(db.clone());
    db.close().await;

    let err = get_dashboard_stats(&source, &StatsConfig::default(), None)
        .await
        .unwrap_err();
    assert!(matches!(err, StatsError::Database { .. }), "got {err:?}");
}
