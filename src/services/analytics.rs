use std::collections::BTreeMap;

use crate::models::entities::{Influencer, UNCATEGORIZED};
use crate::models::responses::{AnalyticsOverview, CategoryShare};

const TOP_CATEGORIES: usize = 5;

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Aggregate the overview figures for a listing.
///
/// Engagement figures come from creator stats; rows without stats count toward
/// reach and categories only.
pub fn summarize(rows: &[Influencer]) -> AnalyticsOverview {
    let total_reach = rows.iter().map(Influencer::total_followers).sum();

    let stats: Vec<_> = rows.iter().filter_map(|r| r.creator_stats.as_ref()).collect();
    let total_engagement = stats.iter().map(|s| s.avg_likes + s.avg_comments).sum();
    let avg_engagement_rate = if stats.is_empty() {
        0.0
    } else {
        let mean = stats.iter().map(|s| s.engagement_rate).sum::<f64>() / stats.len() as f64;
        round_to(mean * 100.0, 2)
    };

    let verified_influencers = rows
        .iter()
        .filter(|r| r.platforms.values().any(|p| p.verified))
        .count() as u64;

    let mut by_category: BTreeMap<&str, u64> = BTreeMap::new();
    for row in rows {
        let category = row.category.as_deref().unwrap_or(UNCATEGORIZED);
        *by_category.entry(category).or_default() += 1;
    }

    let mut top_categories: Vec<CategoryShare> = by_category
        .into_iter()
        .map(|(category, count)| CategoryShare {
            category: category.to_string(),
            count,
            percentage: round_to(count as f64 * 100.0 / rows.len() as f64, 1),
        })
        .collect();
    // BTreeMap order already breaks ties by name; the sort is stable.
    top_categories.sort_by(|a, b| b.count.cmp(&a.count));
    top_categories.truncate(TOP_CATEGORIES);

    AnalyticsOverview {
        total_reach,
        total_engagement,
        avg_engagement_rate,
        active_influencers: rows.len() as u64,
        verified_influencers,
        top_categories,
    }
}
