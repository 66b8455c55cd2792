use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};

use crate::AppState;
use crate::db::repositories::InfluencerRepository;
use crate::error::AppError;
use crate::models::requests::{AnalyticsParams, ListingSource};
use crate::models::responses::AnalyticsOverview;
use crate::search::{CreatorSearchSource, InfluencerTableSource, QueryExecutor, RemoteDataSource};
use crate::services::analytics;

/// Rows considered per overview.
const SAMPLE_SIZE: u32 = 100;

#[utoipa::path(
    get,
    path = "/api/v1/analytics/overview",
    params(AnalyticsParams),
    responses(
        (status = 200, body = AnalyticsOverview, description = "Aggregates over the listing"),
        (status = 503, body = crate::error::ErrorBody, description = "Data source unavailable"),
    ),
    tag = "Analytics"
)]
pub async fn overview(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AnalyticsParams>,
) -> Result<Json<AnalyticsOverview>, AppError> {
    let source: Arc<dyn RemoteDataSource> = match params.source {
        ListingSource::Influencers => Arc::new(InfluencerTableSource::new(
            InfluencerRepository::new(state.db.pool.clone()),
        )),
        ListingSource::Creators => Arc::new(CreatorSearchSource::new(state.creators.clone())),
    };

    let mut executor = QueryExecutor::new(source, SAMPLE_SIZE);
    executor.run_query(&params.query).await?;

    Ok(Json(analytics::summarize(&executor.state().items)))
}
