use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::entities::Category;
use crate::services::creator_directory::CreatorQuery;

static USERNAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^@?[A-Za-z0-9._]{1,30}$").unwrap());

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateInfluencerRequest {
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: String,
    #[validate(regex(
        path = *USERNAME_REGEX,
        message = "username must be 1-30 letters, digits, dots or underscores"
    ))]
    pub username: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: Option<String>,
    #[validate(length(max = 1000, message = "bio max 1000 characters"))]
    pub bio: Option<String>,
    pub category: Option<String>,
    #[validate(length(max = 200, message = "location max 200 characters"))]
    pub location: Option<String>,
    #[validate(url(message = "profile_url must be a valid URL"))]
    pub profile_url: Option<String>,
    #[serde(default)]
    #[validate(length(max = 30, message = "at most 30 tags"))]
    pub tags: Vec<String>,
}

impl CreateInfluencerRequest {
    /// Blank optional fields are treated as absent, the way the form submits them.
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.username = self.username.trim().to_string();
        self.email = non_blank(self.email);
        self.bio = non_blank(self.bio);
        self.category = non_blank(self.category);
        self.location = non_blank(self.location);
        self.profile_url = non_blank(self.profile_url);
        self
    }

    pub fn handle(&self) -> &str {
        self.username.trim_start_matches('@')
    }

    pub fn parsed_category(&self) -> Result<Option<Category>, String> {
        self.category
            .as_deref()
            .map(|c| Category::from_str(c).map_err(|_| format!("Unknown category '{c}'")))
            .transpose()
    }

    /// Trimmed, non-empty, first occurrence wins.
    pub fn normalized_tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = Vec::with_capacity(self.tags.len());
        for tag in &self.tags {
            let tag = tag.trim();
            if !tag.is_empty() && !tags.iter().any(|t| t == tag) {
                tags.push(tag.to_string());
            }
        }
        tags
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct ListInfluencersParams {
    /// Free-text search, also accepted from the page URL.
    pub search: Option<String>,
    #[param(default = 50)]
    pub limit: Option<u32>,
    /// Opaque cursor from a previous page.
    pub cursor: Option<String>,
}

impl ListInfluencersParams {
    pub fn search(&self) -> &str {
        self.search.as_deref().unwrap_or("").trim()
    }
    pub fn limit(&self, default: u32, max: u32) -> u32 {
        self.limit.unwrap_or(default).clamp(1, max)
    }
}

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct CreatorSearchParams {
    #[serde(default)]
    pub query: String,
    #[param(default = 20)]
    pub limit: Option<u32>,
    pub cursor: Option<String>,
    /// Comma-separated platform names.
    pub platforms: Option<String>,
    pub min_followers: Option<u64>,
    pub max_followers: Option<u64>,
    pub location: Option<String>,
    pub category: Option<String>,
}

impl CreatorSearchParams {
    pub fn limit(&self, default: u32, max: u32) -> u32 {
        self.limit.unwrap_or(default).clamp(1, max)
    }

    pub fn to_query(&self, limit: u32) -> CreatorQuery {
        CreatorQuery {
            query: self.query.trim().to_string(),
            limit: Some(limit),
            cursor: self.cursor.clone(),
            platforms: self
                .platforms
                .as_deref()
                .map(|p| {
                    p.split(',')
                        .map(|s| s.trim().to_lowercase())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            min_followers: self.min_followers,
            max_followers: self.max_followers,
            location: non_blank(self.location.clone()),
            category: non_blank(self.category.clone()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ListingSource {
    #[default]
    Influencers,
    Creators,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct AnalyticsParams {
    #[serde(default)]
    pub source: ListingSource,
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchSocketParams {
    #[serde(default)]
    pub source: ListingSource,
    pub token: Option<String>,
}
