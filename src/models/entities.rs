use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use utoipa::ToSchema;

// ── Enums ──

/// Categories offered by the add-influencer form.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, Display, EnumString,
    EnumIter, AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum Category {
    Fashion,
    Beauty,
    Lifestyle,
    Fitness,
    Food,
    Travel,
    Technology,
    Gaming,
    Business,
    Entertainment,
    Art,
    Music,
}

pub const UNCATEGORIZED: &str = "Uncategorized";

// ── Entities ──

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PlatformAccount {
    pub handle: String,
    pub url: Option<String>,
    pub followers: u64,
    pub verified: bool,
}

/// Creator aggregates carried on influencer rows built from creator search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CreatorStats {
    pub followers_count: u64,
    pub following_count: u64,
    pub posts_count: u64,
    pub profile_image_url: Option<String>,
    pub verified: bool,
    pub engagement_rate: f64,
    pub avg_views: u64,
    pub avg_likes: u64,
    pub avg_comments: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Influencer {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub platforms: BTreeMap<String, PlatformAccount>,
    pub tags: Vec<String>,
    pub created_at: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator_stats: Option<CreatorStats>,
}

impl Influencer {
    /// Followers summed across every linked platform.
    pub fn total_followers(&self) -> u64 {
        self.platforms.values().map(|p| p.followers).sum()
    }
}

/// A creator profile from the creator-search API, after boundary validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Creator {
    pub id: String,
    pub username: String,
    pub display_name: String,
    pub platform: String,
    pub bio: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub external_url: Option<String>,
    pub profile_image_url: Option<String>,
    pub created_at: Option<NaiveDateTime>,
    pub followers_count: u64,
    pub following_count: u64,
    pub posts_count: u64,
    pub verified: bool,
    pub engagement_rate: f64,
    pub avg_views: u64,
    pub avg_likes: u64,
    pub avg_comments: u64,
}

impl Creator {
    /// Influencer-shaped view model used by every listing.
    pub fn into_influencer(self) -> Influencer {
        let mut platforms = BTreeMap::new();
        platforms.insert(
            self.platform.clone(),
            PlatformAccount {
                handle: self.username.clone(),
                url: self.external_url.clone(),
                followers: self.followers_count,
                verified: self.verified,
            },
        );

        Influencer {
            id: self.id,
            name: self.display_name,
            email: Some(format!("@{}", self.username)),
            bio: self.bio,
            category: Some(self.category.unwrap_or_else(|| UNCATEGORIZED.to_string())),
            location: self.location,
            platforms,
            tags: Vec::new(),
            created_at: self
                .created_at
                .unwrap_or_else(|| chrono::Utc::now().naive_utc()),
            creator_stats: Some(CreatorStats {
                followers_count: self.followers_count,
                following_count: self.following_count,
                posts_count: self.posts_count,
                profile_image_url: self.profile_image_url,
                verified: self.verified,
                engagement_rate: self.engagement_rate,
                avg_views: self.avg_views,
                avg_likes: self.avg_likes,
                avg_comments: self.avg_comments,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn creator() -> Creator {
        Creator {
            id: "c1".into(),
            username: "sarah_tech".into(),
            display_name: "Sarah Tech".into(),
            platform: "youtube".into(),
            bio: Some("Software engineer".into()),
            category: None,
            location: None,
            external_url: Some("https://youtube.com/@sarah_tech".into()),
            profile_image_url: None,
            created_at: None,
            followers_count: 89_000,
            following_count: 800,
            posts_count: 156,
            verified: false,
            engagement_rate: 0.038,
            avg_views: 12_500,
            avg_likes: 3_200,
            avg_comments: 145,
        }
    }

    #[test]
    fn creator_transform_fills_view_model_defaults() {
        let influencer = creator().into_influencer();

        assert_eq!(influencer.name, "Sarah Tech");
        assert_eq!(influencer.email.as_deref(), Some("@sarah_tech"));
        assert_eq!(influencer.category.as_deref(), Some(UNCATEGORIZED));
        assert!(influencer.tags.is_empty());

        let account = &influencer.platforms["youtube"];
        assert_eq!(account.handle, "sarah_tech");
        assert_eq!(account.followers, 89_000);
        assert_eq!(influencer.total_followers(), 89_000);
        assert_eq!(influencer.creator_stats.unwrap().avg_likes, 3_200);
    }

    #[test]
    fn category_parses_form_values() {
        assert_eq!(Category::from_str("fitness").unwrap(), Category::Fitness);
        assert_eq!(Category::Technology.to_string(), "Technology");
        assert!(Category::from_str("Astrology").is_err());
    }
}
