use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};

use crate::AppState;
use crate::error::AppError;
use crate::models::entities::Influencer;
use crate::models::requests::CreatorSearchParams;
use crate::models::responses::CreatorSearchResponse;

const MAX_PAGE_SIZE: u32 = 100;

#[utoipa::path(
    get,
    path = "/api/v1/creators/search",
    params(CreatorSearchParams),
    responses(
        (status = 200, body = CreatorSearchResponse, description = "Creators matching the query"),
        (status = 503, body = crate::error::ErrorBody, description = "Creator search unavailable"),
    ),
    tag = "Creators"
)]
pub async fn search_creators(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CreatorSearchParams>,
) -> Result<Json<CreatorSearchResponse>, AppError> {
    let limit = params.limit(state.settings.search_page_size, MAX_PAGE_SIZE);
    let query = params.to_query(limit);

    let page = state.creators.search_creators(&query).await?;

    Ok(Json(CreatorSearchResponse {
        creators: page
            .creators
            .into_iter()
            .map(|c| c.into_influencer())
            .collect(),
        query: query.query,
        total: page.total,
        has_next: page.has_next,
        cursor: page.cursor,
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/creators/{creator_id}",
    params(("creator_id" = String, Path, description = "Creator id")),
    responses(
        (status = 200, body = Influencer, description = "Creator profile as an influencer"),
        (status = 404, body = crate::error::ErrorBody, description = "Creator not found"),
    ),
    tag = "Creators"
)]
pub async fn get_creator(
    State(state): State<Arc<AppState>>,
    Path(creator_id): Path<String>,
) -> Result<Json<Influencer>, AppError> {
    let creator = state.creators.get_creator(&creator_id).await?;
    Ok(Json(creator.into_influencer()))
}
