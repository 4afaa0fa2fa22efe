//! Request handlers.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use super::{ApiError, AppState};
use crate::stats::{self, DashboardStats};
use crate::zotero::Collection;

/// Query parameters for `GET /api/dashboard/stats`.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    /// Restricts task counts to one project.
    pub project_id: Option<String>,
}

/// Body of `GET /api/zotero/collections`.
#[derive(Debug, Serialize, Deserialize)]
pub struct CollectionsResponse {
    pub collections: Vec<Collection>,
}

/// `GET /api/dashboard/stats`
pub async fn get_dashboard_stats(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<DashboardStats>, ApiError> {
    let stats = stats::get_dashboard_stats(
        state.stats_source.as_ref(),
        &state.stats_config,
        query.project_id.as_deref(),
    )
    .await
    .map_err(|e| {
        error!(error = %e, "Error getting dashboard stats");
        ApiError::internal("Failed to get dashboard statistics", e)
    })?;

    Ok(Json(stats))
}

/// `GET /api/zotero/collections`
pub async fn list_zotero_collections(
    State(state): State<AppState>,
) -> Result<Json<CollectionsResponse>, ApiError> {
    let Some(client) = state.zotero.as_ref() else {
        return Err(ApiError::not_configured(
            "Zotero is not configured",
            "set ZOTERO_API_KEY and one of ZOTERO_USER_ID or ZOTERO_GROUP_ID",
        ));
    };

    let collections = client.list_collections().await.map_err(|e| {
        error!(error = %e, "Failed to fetch Zotero collections");
        ApiError::upstream("Failed to fetch Zotero collections", e)
    })?;
    info!(count = collections.len(), "Listed Zotero collections");

    Ok(Json(CollectionsResponse { collections }))
}
