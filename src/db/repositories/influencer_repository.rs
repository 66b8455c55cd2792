use std::collections::BTreeMap;

use sqlx::SqlitePool;

use super::{format_dt, like_pattern, parse_dt};
use crate::models::entities::{Influencer, PlatformAccount};

#[derive(Clone)]
pub struct InfluencerRepository {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct InfluencerRow {
    id: String,
    name: String,
    email: Option<String>,
    bio: Option<String>,
    category: Option<String>,
    location: Option<String>,
    platforms: String,
    tags: String,
    created_at: String,
}

impl From<InfluencerRow> for Influencer {
    fn from(row: InfluencerRow) -> Self {
        let platforms: BTreeMap<String, PlatformAccount> = serde_json::from_str(&row.platforms)
            .unwrap_or_else(|e| {
                tracing::warn!(id = %row.id, error = %e, "Malformed platforms column");
                BTreeMap::new()
            });
        let tags: Vec<String> = serde_json::from_str(&row.tags).unwrap_or_else(|e| {
            tracing::warn!(id = %row.id, error = %e, "Malformed tags column");
            Vec::new()
        });

        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            bio: row.bio,
            category: row.category,
            location: row.location,
            platforms,
            tags,
            created_at: parse_dt(&row.created_at),
            creator_stats: None,
        }
    }
}

const SELECT_COLS: &str = "id, name, email, bio, category, location, platforms, tags, created_at";

// `search_text` and `tag_text` hold Unicode-lowercased copies; terms are
// lowercased the same way before binding.
const SEARCH_FILTER: &str = "(?1 = '' OR search_text LIKE ?2 ESCAPE '\\')";

const FIELD_SEPARATOR: &str = "\u{1f}";

fn search_text(influencer: &Influencer) -> String {
    [
        Some(influencer.name.as_str()),
        influencer.email.as_deref(),
        influencer.bio.as_deref(),
        influencer.category.as_deref(),
        influencer.location.as_deref(),
    ]
    .map(|field| field.unwrap_or_default())
    .join(FIELD_SEPARATOR)
    .to_lowercase()
}

fn tag_text(influencer: &Influencer) -> String {
    influencer
        .tags
        .join(FIELD_SEPARATOR)
        .to_lowercase()
}

impl InfluencerRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, influencer: &Influencer) -> Result<(), sqlx::Error> {
        let platforms = serde_json::to_string(&influencer.platforms).unwrap_or("{}".to_string());
        let tags = serde_json::to_string(&influencer.tags).unwrap_or("[]".to_string());

        sqlx::query(
            "INSERT INTO influencers (
                id, name, email, bio, category, location, platforms, tags, created_at,
                search_text, tag_text
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&influencer.id)
        .bind(&influencer.name)
        .bind(&influencer.email)
        .bind(&influencer.bio)
        .bind(&influencer.category)
        .bind(&influencer.location)
        .bind(&platforms)
        .bind(&tags)
        .bind(format_dt(&influencer.created_at))
        .bind(search_text(influencer))
        .bind(tag_text(influencer))
        .execute(&self.pool)
        .await?;

        tracing::info!(id = %influencer.id, name = %influencer.name, "Influencer created");
        Ok(())
    }

    pub async fn get_by_id(&self, influencer_id: &str) -> Result<Option<Influencer>, sqlx::Error> {
        let sql = format!("SELECT {SELECT_COLS} FROM influencers WHERE id = ?");

        let row = sqlx::query_as::<_, InfluencerRow>(&sql)
            .bind(influencer_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Influencer::from))
    }

    /// Newest first. An empty `term` lists everything.
    pub async fn search(
        &self,
        term: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Influencer>, sqlx::Error> {
        let sql = format!(
            "SELECT {SELECT_COLS}
             FROM influencers
             WHERE {SEARCH_FILTER}
             ORDER BY created_at DESC, rowid DESC
             LIMIT ?3 OFFSET ?4"
        );

        let term = term.to_lowercase();
        let rows = sqlx::query_as::<_, InfluencerRow>(&sql)
            .bind(&term)
            .bind(like_pattern(&term))
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Influencer::from).collect())
    }

    pub async fn count(&self, term: &str) -> Result<i64, sqlx::Error> {
        let sql = format!("SELECT COUNT(*) FROM influencers WHERE {SEARCH_FILTER}");

        let term = term.to_lowercase();
        let count: (i64,) = sqlx::query_as(&sql)
            .bind(&term)
            .bind(like_pattern(&term))
            .fetch_one(&self.pool)
            .await?;
        Ok(count.0)
    }

    /// Every row with a tag containing `term` that `search` would not return,
    /// newest first. Unpaged.
    pub async fn tag_only_matches(&self, term: &str) -> Result<Vec<Influencer>, sqlx::Error> {
        let term = term.to_lowercase();
        if term.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT {SELECT_COLS}
             FROM influencers
             WHERE tag_text LIKE ?1 ESCAPE '\\'
               AND search_text NOT LIKE ?1 ESCAPE '\\'
             ORDER BY created_at DESC, rowid DESC"
        );

        let rows = sqlx::query_as::<_, InfluencerRow>(&sql)
            .bind(like_pattern(&term))
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Influencer::from).collect())
    }

    pub async fn count_all(&self) -> Result<i64, sqlx::Error> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM influencers")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.0)
    }
}
