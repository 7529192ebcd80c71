use crate::error::Result;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::Json;
use tether_core::AnalyticsReport;

pub async fn analytics_handler(
    Path(short_code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<AnalyticsReport>> {
    let report = state.engine().report(&short_code).await?;
    Ok(Json(report))
}
