use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};

use super::creator_directory::{CreatorDirectory, CreatorQuery, CreatorSearchPage};
use crate::config::CreatorSearchMode;
use crate::models::entities::Creator;
use crate::search::SourceError;

/// Fixed creator records served when no creator-search API is configured.
pub struct MockCreatorDirectory {
    latency: Duration,
    creators: Vec<Creator>,
}

impl MockCreatorDirectory {
    pub fn new(latency: Duration) -> Self {
        Self {
            latency,
            creators: fixtures(),
        }
    }

    fn matches(creator: &Creator, query: &CreatorQuery) -> bool {
        let needle = query.query.trim().to_lowercase();
        let contains = |field: Option<&str>| {
            field.is_some_and(|value| value.to_lowercase().contains(&needle))
        };

        let text_match = needle.is_empty()
            || contains(Some(&creator.display_name))
            || contains(Some(&creator.username))
            || contains(creator.bio.as_deref())
            || contains(creator.category.as_deref())
            || contains(Some(&creator.platform));

        let platform_match = query.platforms.is_empty()
            || query
                .platforms
                .iter()
                .any(|p| p.eq_ignore_ascii_case(&creator.platform));

        let followers_match = query
            .min_followers
            .is_none_or(|min| creator.followers_count >= min)
            && query
                .max_followers
                .is_none_or(|max| creator.followers_count <= max);

        let location_match = query.location.as_deref().is_none_or(|loc| {
            creator
                .location
                .as_deref()
                .is_some_and(|l| l.to_lowercase().contains(&loc.to_lowercase()))
        });

        let category_match = query.category.as_deref().is_none_or(|cat| {
            creator
                .category
                .as_deref()
                .is_some_and(|c| c.eq_ignore_ascii_case(cat))
        });

        text_match && platform_match && followers_match && location_match && category_match
    }
}

#[async_trait]
impl CreatorDirectory for MockCreatorDirectory {
    fn mode(&self) -> CreatorSearchMode {
        CreatorSearchMode::Mock
    }

    async fn search_creators(&self, query: &CreatorQuery) -> Result<CreatorSearchPage, SourceError> {
        tokio::time::sleep(self.latency).await;

        let mut creators: Vec<Creator> = self
            .creators
            .iter()
            .filter(|c| Self::matches(c, query))
            .cloned()
            .collect();
        let total = creators.len() as u64;

        if let Some(limit) = query.limit {
            creators.truncate(limit as usize);
        }

        tracing::debug!(query = %query.query, total, "Mock creator search");

        Ok(CreatorSearchPage {
            creators,
            total,
            has_next: false,
            cursor: None,
        })
    }

    async fn get_creator(&self, creator_id: &str) -> Result<Creator, SourceError> {
        tokio::time::sleep(self.latency).await;

        self.creators
            .iter()
            .find(|c| c.id == creator_id)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(format!("Creator '{creator_id}' not found")))
    }
}

fn date(year: i32, month: u32, day: u32) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(year, month, day).and_then(|d| d.and_hms_opt(0, 0, 0))
}

#[allow(clippy::too_many_arguments)]
fn creator(
    id: &str,
    username: &str,
    display_name: &str,
    bio: &str,
    platform: &str,
    counts: (u64, u64, u64),
    verified: bool,
    category: &str,
    location: &str,
    external_url: &str,
    profile_image_url: &str,
    created_at: Option<NaiveDateTime>,
    engagement: (f64, u64, u64, u64),
) -> Creator {
    let (followers_count, following_count, posts_count) = counts;
    let (engagement_rate, avg_views, avg_likes, avg_comments) = engagement;
    Creator {
        id: id.into(),
        username: username.into(),
        display_name: display_name.into(),
        platform: platform.into(),
        bio: Some(bio.into()),
        category: Some(category.into()),
        location: Some(location.into()),
        external_url: Some(external_url.into()),
        profile_image_url: Some(profile_image_url.into()),
        created_at,
        followers_count,
        following_count,
        posts_count,
        verified,
        engagement_rate,
        avg_views,
        avg_likes,
        avg_comments,
    }
}

fn fixtures() -> Vec<Creator> {
    vec![
        creator(
            "mock_1",
            "john_fitness",
            "John Fitness",
            "Fitness enthusiast helping people achieve their health goals 💪",
            "instagram",
            (125_000, 1_500, 342),
            true,
            "Fitness",
            "Los Angeles, CA",
            "https://instagram.com/john_fitness",
            "https://images.unsplash.com/photo-1570295999919-56ceb5ecca61?w=150&h=150&fit=crop&crop=face",
            date(2020, 1, 15),
            (0.045, 8_500, 5_600, 230),
        ),
        creator(
            "mock_2",
            "sarah_tech",
            "Sarah Tech",
            "Software engineer sharing coding tips and tech reviews",
            "youtube",
            (89_000, 800, 156),
            false,
            "Technology",
            "San Francisco, CA",
            "https://youtube.com/@sarah_tech",
            "https://images.unsplash.com/photo-1494790108755-2616b7e7fb9c?w=150&h=150&fit=crop&crop=face",
            date(2019, 8, 22),
            (0.038, 12_500, 3_200, 145),
        ),
        creator(
            "mock_3",
            "foodie_mike",
            "Mike's Kitchen",
            "Chef sharing delicious recipes and cooking techniques 👨‍🍳",
            "tiktok",
            (256_000, 2_100, 489),
            true,
            "Food",
            "New York, NY",
            "https://tiktok.com/@foodie_mike",
            "https://images.unsplash.com/photo-1507003211169-0a1dd7228f2d?w=150&h=150&fit=crop&crop=face",
            date(2021, 3, 10),
            (0.067, 15_600, 9_800, 420),
        ),
        creator(
            "mock_4",
            "travel_emma",
            "Emma Explores",
            "Traveling the world one adventure at a time ✈️",
            "instagram",
            (178_000, 3_400, 612),
            true,
            "Travel",
            "Nomad",
            "https://instagram.com/travel_emma",
            "https://images.unsplash.com/photo-1438761681033-6461ffad8d80?w=150&h=150&fit=crop&crop=face",
            date(2018, 11, 5),
            (0.052, 11_200, 7_800, 340),
        ),
        creator(
            "mock_5",
            "business_alex",
            "Alex Business",
            "Entrepreneur sharing business insights and growth strategies",
            "linkedin",
            (45_000, 1_200, 234),
            false,
            "Business",
            "Austin, TX",
            "https://linkedin.com/in/business-alex",
            "https://images.unsplash.com/photo-1472099645785-5658abf4ff4e?w=150&h=150&fit=crop&crop=face",
            date(2020, 6, 18),
            (0.031, 3_400, 1_200, 89),
        ),
    ]
}
