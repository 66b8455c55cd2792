use std::sync::Arc;

use async_trait::async_trait;

use super::insightiq::InsightIqClient;
use super::mock_creators::MockCreatorDirectory;
use crate::config::{CreatorSearchMode, Settings};
use crate::models::entities::Creator;
use crate::search::SourceError;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreatorQuery {
    pub query: String,
    pub limit: Option<u32>,
    pub cursor: Option<String>,
    /// Lowercase platform names; empty means any.
    pub platforms: Vec<String>,
    pub min_followers: Option<u64>,
    pub max_followers: Option<u64>,
    pub location: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreatorSearchPage {
    pub creators: Vec<Creator>,
    pub total: u64,
    pub has_next: bool,
    pub cursor: Option<String>,
}

/// Creator-search backend. Exactly one implementation is chosen at startup.
#[async_trait]
pub trait CreatorDirectory: Send + Sync {
    fn mode(&self) -> CreatorSearchMode;

    async fn search_creators(&self, query: &CreatorQuery) -> Result<CreatorSearchPage, SourceError>;

    async fn get_creator(&self, creator_id: &str) -> Result<Creator, SourceError>;
}

pub fn build_creator_directory(
    settings: &Settings,
    http: reqwest::Client,
) -> Arc<dyn CreatorDirectory> {
    match (settings.creator_search_mode, &settings.insightiq_api_key) {
        (CreatorSearchMode::Live, Some(api_key)) => {
            tracing::info!(base = %settings.insightiq_api_base, "Creator search: live InsightIQ API");
            Arc::new(InsightIqClient::new(
                http,
                &settings.insightiq_api_base,
                api_key,
                settings.insightiq_timeout,
            ))
        }
        (CreatorSearchMode::Live, None) => {
            tracing::warn!("CREATOR_SEARCH_MODE=live without INSIGHTIQ_API_KEY, using mock data");
            Arc::new(MockCreatorDirectory::new(settings.mock_latency()))
        }
        (CreatorSearchMode::Mock, _) => {
            tracing::info!(
                latency_ms = settings.mock_latency_ms,
                "Creator search: mock directory"
            );
            Arc::new(MockCreatorDirectory::new(settings.mock_latency()))
        }
    }
}
