use std::sync::Arc;

use async_trait::async_trait;

use super::source::{RemoteDataSource, SearchPage, SearchRequest, SourceError};
use crate::db::repositories::InfluencerRepository;
use crate::models::entities::Influencer;
use crate::services::creator_directory::{CreatorDirectory, CreatorQuery};

/// The persisted `influencers` table, filtered server-side on its scalar columns.
///
/// Cursors are row offsets rendered as strings; callers treat them as opaque.
pub struct InfluencerTableSource {
    repo: InfluencerRepository,
}

impl InfluencerTableSource {
    pub fn new(repo: InfluencerRepository) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl RemoteDataSource for InfluencerTableSource {
    fn name(&self) -> &'static str {
        "influencers"
    }

    async fn search(&self, request: &SearchRequest) -> Result<SearchPage, SourceError> {
        let offset = match request.cursor.as_deref() {
            Some(cursor) => cursor
                .parse::<i64>()
                .ok()
                .filter(|o| *o >= 0)
                .ok_or_else(|| SourceError::Schema(format!("Invalid cursor '{cursor}'")))?,
            None => 0,
        };
        let limit = i64::from(request.limit);

        let (items, total) = tokio::try_join!(
            self.repo.search(&request.query, limit, offset),
            self.repo.count(&request.query),
        )?;

        let next_offset = offset + items.len() as i64;
        let has_next = next_offset < total;

        Ok(SearchPage {
            items,
            total: total.max(0) as u64,
            has_next,
            cursor: has_next.then(|| next_offset.to_string()),
        })
    }

    async fn tag_only_matches(&self, query: &str) -> Result<Option<Vec<Influencer>>, SourceError> {
        Ok(Some(self.repo.tag_only_matches(query).await?))
    }
}

/// Creator search, with every creator transformed into an influencer view model.
pub struct CreatorSearchSource {
    directory: Arc<dyn CreatorDirectory>,
    filters: CreatorQuery,
}

impl CreatorSearchSource {
    pub fn new(directory: Arc<dyn CreatorDirectory>) -> Self {
        Self::with_filters(directory, CreatorQuery::default())
    }

    /// `filters` supplies everything but the query text, limit and cursor.
    pub fn with_filters(directory: Arc<dyn CreatorDirectory>, filters: CreatorQuery) -> Self {
        Self { directory, filters }
    }
}

#[async_trait]
impl RemoteDataSource for CreatorSearchSource {
    fn name(&self) -> &'static str {
        "creators"
    }

    async fn search(&self, request: &SearchRequest) -> Result<SearchPage, SourceError> {
        let query = CreatorQuery {
            query: request.query.clone(),
            limit: Some(request.limit),
            cursor: request.cursor.clone(),
            ..self.filters.clone()
        };

        let page = self.directory.search_creators(&query).await?;

        Ok(SearchPage {
            items: page
                .creators
                .into_iter()
                .map(|c| c.into_influencer())
                .collect(),
            total: page.total,
            has_next: page.has_next,
            cursor: page.cursor,
        })
    }

    // Creators arrive without tags, so nothing can match on tags alone.
    async fn tag_only_matches(&self, _query: &str) -> Result<Option<Vec<Influencer>>, SourceError> {
        Ok(Some(Vec::new()))
    }
}
