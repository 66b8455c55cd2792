use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::Serialize;
use utoipa::ToSchema;

use super::entities::Influencer;

#[derive(Debug, Serialize, ToSchema)]
pub struct ListInfluencersResponse {
    pub influencers: Vec<Influencer>,
    pub query: String,
    pub total: u64,
    pub has_next: bool,
    pub cursor: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreatorSearchResponse {
    pub creators: Vec<Influencer>,
    pub query: String,
    pub total: u64,
    pub has_next: bool,
    pub cursor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CategoryShare {
    pub category: String,
    pub count: u64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct AnalyticsOverview {
    pub total_reach: u64,
    pub total_engagement: u64,
    /// Mean engagement rate, in percent.
    pub avg_engagement_rate: f64,
    pub active_influencers: u64,
    pub verified_influencers: u64,
    pub top_categories: Vec<CategoryShare>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceHealth {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: NaiveDateTime,
    pub services: HashMap<String, ServiceHealth>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SystemStatistics {
    pub total_influencers: i64,
    pub active_search_sessions: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StatusResponse {
    pub service: String,
    pub version: String,
    pub environment: String,
    pub uptime_seconds: u64,
    pub creator_search_mode: String,
    pub statistics: SystemStatistics,
    pub timestamp: NaiveDateTime,
}
