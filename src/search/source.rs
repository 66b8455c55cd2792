use async_trait::async_trait;
use serde::Serialize;

use crate::models::entities::Influencer;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub limit: u32,
    /// Opaque continuation token, passed back exactly as the source returned it.
    pub cursor: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchPage {
    pub items: Vec<Influencer>,
    pub total: u64,
    pub has_next: bool,
    pub cursor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SourceError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Unexpected response: {0}")]
    Schema(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            SourceError::Schema(err.to_string())
        } else {
            SourceError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Schema(err.to_string())
    }
}

impl From<sqlx::Error> for SourceError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!(error = %err, "Database error in data source");
        SourceError::Database(err.to_string())
    }
}

/// Anything reachable over the network that returns influencer-shaped rows.
#[async_trait]
pub trait RemoteDataSource: Send + Sync {
    fn name(&self) -> &'static str;

    async fn search(&self, request: &SearchRequest) -> Result<SearchPage, SourceError>;

    /// Every row whose tags contain `query` but which `search` would not return,
    /// across all pages. `None` when the source keeps no tag index; callers then
    /// refilter against rows they have already loaded.
    async fn tag_only_matches(&self, _query: &str) -> Result<Option<Vec<Influencer>>, SourceError> {
        Ok(None)
    }
}
