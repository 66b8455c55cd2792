use serde::Serialize;
use utoipa::ToSchema;

use crate::models::entities::Influencer;

/// What a listing shows while it has nothing to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EmptyState {
    /// No query committed and the unfiltered listing is empty.
    NoQuery,
    /// A query was committed and matched nothing.
    NoResults,
}

/// Per-listing search state. Only the query executor mutates it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct SearchState {
    pub raw_query: String,
    pub committed_query: String,
    pub items: Vec<Influencer>,
    pub loading: bool,
    pub error: Option<String>,
    pub cursor: Option<String>,
    pub has_next: bool,
    pub total: u64,
}

impl SearchState {
    pub fn empty_state(&self) -> Option<EmptyState> {
        if self.loading || self.error.is_some() || !self.items.is_empty() {
            return None;
        }
        if self.committed_query.is_empty() {
            Some(EmptyState::NoQuery)
        } else {
            Some(EmptyState::NoResults)
        }
    }

    pub fn can_load_more(&self) -> bool {
        self.has_next && !self.loading
    }

    pub fn view(&self) -> SearchView {
        SearchView {
            state: self.clone(),
            empty_state: self.empty_state(),
            can_load_more: self.can_load_more(),
        }
    }
}

/// Snapshot sent to clients: the state plus what the UI derives from it.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SearchView {
    #[serde(flatten)]
    pub state: SearchState,
    pub empty_state: Option<EmptyState>,
    pub can_load_more: bool,
}
