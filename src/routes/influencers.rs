use std::collections::BTreeMap;
use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use chrono::Timelike;
use validator::Validate;

use crate::AppState;
use crate::auth::AuthenticatedUser;
use crate::db::repositories::InfluencerRepository;
use crate::error::AppError;
use crate::models::entities::{Influencer, PlatformAccount};
use crate::models::requests::{CreateInfluencerRequest, ListInfluencersParams};
use crate::models::responses::ListInfluencersResponse;
use crate::search::{InfluencerTableSource, QueryExecutor, RemoteDataSource, SearchRequest};

const MAX_PAGE_SIZE: u32 = 100;

/// Influencer listing. Without a cursor, the first page is built the way a
/// search session builds it: server matches plus every tag-only match. A cursor
/// continues with server matches only; tag-only rows were all on the first page,
/// and `total` counts them on every page.
#[utoipa::path(
    get,
    path = "/api/v1/influencers",
    params(ListInfluencersParams),
    responses(
        (status = 200, body = ListInfluencersResponse, description = "Influencer listing"),
        (status = 400, body = crate::error::ErrorBody, description = "Malformed cursor"),
        (status = 503, body = crate::error::ErrorBody, description = "Data source unavailable"),
    ),
    tag = "Influencers"
)]
pub async fn list_influencers(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListInfluencersParams>,
) -> Result<Json<ListInfluencersResponse>, AppError> {
    let source = Arc::new(InfluencerTableSource::new(InfluencerRepository::new(
        state.db.pool.clone(),
    )));
    let limit = params.limit(state.settings.search_page_size, MAX_PAGE_SIZE);
    let query = params.search().to_string();

    if let Some(cursor) = params.cursor.clone() {
        if cursor.parse::<u64>().is_err() {
            return Err(AppError::bad_request(format!("Invalid cursor '{cursor}'")));
        }
        let request = SearchRequest {
            query: query.clone(),
            limit,
            cursor: Some(cursor),
        };
        let (page, tag_only) = tokio::try_join!(
            source.search(&request),
            source.tag_only_matches(&query),
        )?;
        let tag_only = tag_only.map_or(0, |rows| rows.len() as u64);

        return Ok(Json(ListInfluencersResponse {
            influencers: page.items,
            query,
            total: page.total + tag_only,
            has_next: page.has_next,
            cursor: page.cursor,
        }));
    }

    let mut executor = QueryExecutor::new(source, limit);
    executor.run_query(&query).await?;

    let listing = executor.state().clone();
    Ok(Json(ListInfluencersResponse {
        influencers: listing.items,
        query: listing.committed_query,
        total: listing.total,
        has_next: listing.has_next,
        cursor: listing.cursor,
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/influencers/{influencer_id}",
    params(("influencer_id" = String, Path, description = "Influencer id")),
    responses(
        (status = 200, body = Influencer, description = "Influencer details"),
        (status = 404, body = crate::error::ErrorBody, description = "Influencer not found"),
    ),
    tag = "Influencers"
)]
pub async fn get_influencer(
    State(state): State<Arc<AppState>>,
    Path(influencer_id): Path<String>,
) -> Result<Json<Influencer>, AppError> {
    let repo = InfluencerRepository::new(state.db.pool.clone());

    let influencer = repo
        .get_by_id(&influencer_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Influencer '{influencer_id}' not found")))?;

    Ok(Json(influencer))
}

#[utoipa::path(
    post,
    path = "/api/v1/influencers",
    request_body = CreateInfluencerRequest,
    responses(
        (status = 201, body = Influencer, description = "Influencer created"),
        (status = 401, body = crate::error::ErrorBody, description = "Missing or invalid token"),
        (status = 422, body = crate::error::ErrorBody, description = "Validation failed"),
    ),
    security(("BearerAuth" = [])),
    tag = "Influencers"
)]
pub async fn create_influencer(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    Json(body): Json<CreateInfluencerRequest>,
) -> Result<(StatusCode, Json<Influencer>), AppError> {
    let body = body.normalized();
    body.validate()?;
    let category = body.parsed_category().map_err(AppError::validation_error)?;

    let handle = body.handle().to_string();
    let mut platforms = BTreeMap::new();
    platforms.insert(
        "instagram".to_string(),
        PlatformAccount {
            handle,
            url: body.profile_url.clone(),
            followers: 0,
            verified: false,
        },
    );

    let now = chrono::Utc::now().naive_utc();
    let influencer = Influencer {
        id: uuid::Uuid::new_v4().to_string(),
        tags: body.normalized_tags(),
        name: body.name,
        email: body.email,
        bio: body.bio,
        category: category.map(|c| c.to_string()),
        location: body.location,
        platforms,
        // Stored at second precision.
        created_at: now.with_nanosecond(0).unwrap_or(now),
        creator_stats: None,
    };

    let repo = InfluencerRepository::new(state.db.pool.clone());
    repo.create(&influencer).await?;

    tracing::info!(
        user_id = %user.user_id,
        influencer_id = %influencer.id,
        "Influencer added"
    );

    Ok((StatusCode::CREATED, Json(influencer)))
}
