//! Serve command handler: runs the HTTP API until interrupted.

use std::sync::Arc;

use anyhow::{Context, Result};
use refshelf_core::{AppState, Database, SqliteStatsSource, server};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::cli::ServeArgs;

pub async fn run_serve_command(args: &ServeArgs) -> Result<()> {
    let db = Database::new(&args.database.db_path)
        .await
        .with_context(|| format!("opening {}", args.database.db_path.display()))?;
    let source = Arc::new(SqliteStatsSource::new(db.clone()));
    let mut state = AppState::new(source, args.features.stats_config());

    if args.zotero.is_present() {
        match args.zotero.client() {
            Ok(client) => {
                info!(scope = %client.identity().scope(), "Zotero integration enabled");
                state = state.with_zotero(client);
            }
            Err(e) => warn!(error = %e, "Zotero settings are invalid; integration disabled"),
        }
    }

    let addr = format!("{}:{}", args.host, args.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;

    server::serve(listener, state).await?;
    db.close().await;
    Ok(())
}
