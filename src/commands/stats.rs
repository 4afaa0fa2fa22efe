//! Stats command handler: one-shot dashboard snapshot.

use anyhow::{Context, Result};
use refshelf_core::{Database, SqliteStatsSource, get_dashboard_stats};
use tracing::debug;

use super::print_json;
use crate::cli::StatsArgs;

pub async fn run_stats_command(args: &StatsArgs) -> Result<()> {
    let db = Database::new(&args.database.db_path)
        .await
        .with_context(|| format!("opening {}", args.database.db_path.display()))?;
    let source = SqliteStatsSource::new(db.clone());
    let config = args.features.stats_config();
    debug!(?config, project_id = ?args.project_id, "Computing dashboard stats");

    let result = get_dashboard_stats(&source, &config, args.project_id.as_deref()).await;
    db.close().await;

    print_json(&result.context("failed to get dashboard statistics")?)
}
