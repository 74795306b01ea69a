use axum::{extract::State, http::StatusCode, Json};
use tracing::info;

use crate::{error::AppResult, store::CategoryCounts, AppState};

/// Product count per category over the whole store.
pub async fn category_stats(
    State(state): State<AppState>,
) -> AppResult<(StatusCode, Json<CategoryCounts>)> {
    let counts = state.store.read().await.category_counts();

    info!(categories = counts.len(), "Computed category stats");

    Ok((StatusCode::OK, Json(counts)))
}
