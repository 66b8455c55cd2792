use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime};
use serde::Deserialize;

use super::creator_directory::{CreatorDirectory, CreatorQuery, CreatorSearchPage};
use crate::config::CreatorSearchMode;
use crate::models::entities::Creator;
use crate::search::SourceError;

/// Live creator search backed by the InsightIQ social API.
#[derive(Clone)]
pub struct InsightIqClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

/// Creator record as the API returns it. Every field is optional on the wire;
/// conversion into [`Creator`] rejects records without an id or username.
#[derive(Debug, Default, Deserialize)]
struct CreatorRecord {
    id: Option<String>,
    username: Option<String>,
    #[serde(alias = "name")]
    display_name: Option<String>,
    bio: Option<String>,
    platform: Option<String>,
    followers_count: Option<f64>,
    following_count: Option<f64>,
    posts_count: Option<f64>,
    #[serde(alias = "profile_pic_url")]
    profile_image_url: Option<String>,
    verified: Option<bool>,
    category: Option<String>,
    location: Option<String>,
    #[serde(alias = "url")]
    external_url: Option<String>,
    created_at: Option<String>,
    engagement_rate: Option<f64>,
    avg_views: Option<f64>,
    avg_likes: Option<f64>,
    avg_comments: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchEnvelope {
    #[serde(alias = "data")]
    results: Option<Vec<CreatorRecord>>,
    #[serde(alias = "total")]
    total_count: Option<u64>,
    has_next: Option<bool>,
    #[serde(alias = "cursor")]
    next_cursor: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorEnvelope {
    message: Option<String>,
    error: Option<String>,
}

fn count(value: Option<f64>) -> u64 {
    value.filter(|v| v.is_finite() && *v > 0.0).unwrap_or(0.0) as u64
}

fn parse_created_at(raw: &str) -> Option<NaiveDateTime> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.naive_utc())
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .ok()
}

impl TryFrom<CreatorRecord> for Creator {
    type Error = SourceError;

    fn try_from(record: CreatorRecord) -> Result<Self, Self::Error> {
        let id = record
            .id
            .filter(|s| !s.is_empty())
            .ok_or_else(|| SourceError::Schema("creator record without id".into()))?;
        let username = record
            .username
            .filter(|s| !s.is_empty())
            .ok_or_else(|| SourceError::Schema(format!("creator '{id}' without username")))?;

        Ok(Creator {
            display_name: record.display_name.unwrap_or_else(|| username.clone()),
            platform: record
                .platform
                .map(|p| p.to_lowercase())
                .unwrap_or_else(|| "unknown".into()),
            bio: record.bio,
            category: record.category,
            location: record.location,
            external_url: record.external_url,
            profile_image_url: record.profile_image_url,
            created_at: record.created_at.as_deref().and_then(parse_created_at),
            followers_count: count(record.followers_count),
            following_count: count(record.following_count),
            posts_count: count(record.posts_count),
            verified: record.verified.unwrap_or(false),
            engagement_rate: record.engagement_rate.unwrap_or(0.0),
            avg_views: count(record.avg_views),
            avg_likes: count(record.avg_likes),
            avg_comments: count(record.avg_comments),
            id,
            username,
        })
    }
}

impl SearchEnvelope {
    fn into_page(self) -> Result<CreatorSearchPage, SourceError> {
        let creators = self
            .results
            .unwrap_or_default()
            .into_iter()
            .map(Creator::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let total = self.total_count.unwrap_or(creators.len() as u64);

        Ok(CreatorSearchPage {
            creators,
            total,
            has_next: self.has_next.unwrap_or(false),
            cursor: self.next_cursor,
        })
    }
}

fn query_pairs(query: &CreatorQuery) -> Vec<(&'static str, String)> {
    let mut pairs = vec![("query", query.query.clone())];
    pairs.extend(query.platforms.iter().map(|p| ("platforms", p.clone())));
    if let Some(min) = query.min_followers {
        pairs.push(("min_followers", min.to_string()));
    }
    if let Some(max) = query.max_followers {
        pairs.push(("max_followers", max.to_string()));
    }
    if let Some(location) = &query.location {
        pairs.push(("location", location.clone()));
    }
    if let Some(category) = &query.category {
        pairs.push(("category", category.clone()));
    }
    if let Some(limit) = query.limit {
        pairs.push(("limit", limit.to_string()));
    }
    if let Some(cursor) = &query.cursor {
        pairs.push(("cursor", cursor.clone()));
    }
    pairs
}

impl InsightIqClient {
    pub fn new(http: reqwest::Client, base_url: &str, api_key: &str, timeout_secs: u64) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, SourceError> {
        let resp = request
            .header("Authorization", &self.api_key)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        tracing::error!(status = %status, body = %body, "InsightIQ API error");

        let parsed: ErrorEnvelope = serde_json::from_str(&body).unwrap_or_default();
        let message = parsed.message.or(parsed.error).unwrap_or_else(|| {
            format!(
                "InsightIQ API error: {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or_default()
            )
        });

        Err(SourceError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl CreatorDirectory for InsightIqClient {
    fn mode(&self) -> CreatorSearchMode {
        CreatorSearchMode::Live
    }

    async fn search_creators(&self, query: &CreatorQuery) -> Result<CreatorSearchPage, SourceError> {
        let url = format!("{}/social/creator-profile/quick-search", self.base_url);
        tracing::debug!(url = %url, query = %query.query, "InsightIQ creator search");

        let resp = self
            .send(self.http.post(&url).query(&query_pairs(query)))
            .await?;
        let envelope: SearchEnvelope = resp.json().await?;
        envelope.into_page()
    }

    async fn get_creator(&self, creator_id: &str) -> Result<Creator, SourceError> {
        let url = format!("{}/social/creator-profile/{creator_id}", self.base_url);

        let resp = match self.send(self.http.get(&url)).await {
            Err(SourceError::Api { status: 404, .. }) => {
                return Err(SourceError::NotFound(format!(
                    "Creator '{creator_id}' not found"
                )));
            }
            other => other?,
        };
        let record: CreatorRecord = resp.json().await?;
        Creator::try_from(record)
    }
}
