//! Query executor: owns a listing's [`SearchState`] and turns committed queries and
//! "load more" requests into remote fetches.
//!
//! Fetching is split in two so callers can run the network call elsewhere:
//! `begin_*` mutates state and hands out a [`Ticket`], [`fetch`] runs it, and
//! [`QueryExecutor::apply`] folds the result back in. Every ticket carries a sequence number; only the
//! response for the most recently issued ticket is applied, so a slow response
//! to a superseded request can never overwrite newer state.

use std::sync::Arc;

use super::refilter::refilter;
use super::source::{RemoteDataSource, SearchPage, SearchRequest, SourceError};
use super::state::SearchState;
use crate::models::entities::Influencer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    /// First page of a committed query; replaces items.
    NewQuery,
    /// Continuation page; appends items.
    LoadMore,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub seq: u64,
    pub kind: FetchKind,
    pub request: SearchRequest,
}

/// What one ticket's fetch produced: the server page plus, for the first page of
/// a non-empty query, the source's tag-only matches when it can supply them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fetched {
    pub page: SearchPage,
    pub tag_only: Option<Vec<Influencer>>,
}

impl From<SearchPage> for Fetched {
    fn from(page: SearchPage) -> Self {
        Self {
            page,
            tag_only: None,
        }
    }
}

/// Run a ticket's request against `source`.
pub async fn fetch(
    source: &dyn RemoteDataSource,
    ticket: &Ticket,
) -> Result<Fetched, SourceError> {
    let request = &ticket.request;
    if ticket.kind == FetchKind::LoadMore || request.query.is_empty() {
        return source.search(request).await.map(Fetched::from);
    }

    let (page, tag_only) = tokio::try_join!(
        source.search(request),
        source.tag_only_matches(&request.query),
    )?;
    Ok(Fetched { page, tag_only })
}

pub struct QueryExecutor {
    source: Arc<dyn RemoteDataSource>,
    page_size: u32,
    state: SearchState,
    /// Accumulated rows of the unfiltered listing; tag refilter candidates for
    /// sources without a tag index.
    baseline: Vec<Influencer>,
    latest_seq: u64,
    /// The request that last failed, kept for `retry`.
    failed: Option<Ticket>,
    /// Whether the committed query has been fetched successfully at least once.
    settled: bool,
}

impl QueryExecutor {
    pub fn new(source: Arc<dyn RemoteDataSource>, page_size: u32) -> Self {
        Self {
            source,
            page_size: page_size.max(1),
            state: SearchState::default(),
            baseline: Vec::new(),
            latest_seq: 0,
            failed: None,
            settled: false,
        }
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn source(&self) -> &Arc<dyn RemoteDataSource> {
        &self.source
    }

    /// Record keystrokes; they only reach the source once committed.
    pub fn set_raw_query(&mut self, raw: impl Into<String>) {
        self.state.raw_query = raw.into();
    }

    /// Commit a query and start fetching its first page.
    ///
    /// Returns `None` when the query is already committed and loaded.
    pub fn begin_query(&mut self, query: &str) -> Option<Ticket> {
        let query = query.trim();
        let changed = query != self.state.committed_query;

        if !changed && self.settled && self.state.error.is_none() && !self.state.loading {
            return None;
        }

        if changed {
            self.state.committed_query = query.to_string();
            self.state.items.clear();
            self.state.cursor = None;
            self.state.has_next = false;
            self.state.total = 0;
            self.settled = false;
        }

        Some(self.issue(FetchKind::NewQuery, None))
    }

    /// Start fetching the next page. No-op without a next page or while loading.
    pub fn begin_load_more(&mut self) -> Option<Ticket> {
        if !self.state.can_load_more() {
            return None;
        }
        let cursor = self.state.cursor.clone();
        Some(self.issue(FetchKind::LoadMore, cursor))
    }

    /// Re-issue the request that last failed, if the listing is in an error state.
    pub fn begin_retry(&mut self) -> Option<Ticket> {
        if self.state.error.is_none() || self.state.loading {
            return None;
        }
        let failed = self.failed.take()?;
        // A query committed after the failure makes the old request moot.
        if failed.request.query != self.state.committed_query {
            let query = self.state.committed_query.clone();
            return self.begin_query(&query);
        }
        Some(self.issue(failed.kind, failed.request.cursor))
    }

    fn issue(&mut self, kind: FetchKind, cursor: Option<String>) -> Ticket {
        self.latest_seq += 1;
        self.state.loading = true;
        self.state.error = None;

        Ticket {
            seq: self.latest_seq,
            kind,
            request: SearchRequest {
                query: self.state.committed_query.clone(),
                limit: self.page_size,
                cursor,
            },
        }
    }

    pub fn is_latest(&self, ticket: &Ticket) -> bool {
        ticket.seq == self.latest_seq
    }

    /// Fold a fetch result into state. Returns `false` if the ticket was superseded.
    pub fn apply<F: Into<Fetched>>(
        &mut self,
        ticket: Ticket,
        result: Result<F, SourceError>,
    ) -> bool {
        let result: Result<Fetched, SourceError> = result.map(Into::into);
        if !self.is_latest(&ticket) {
            // A superseded unfiltered listing is still a valid baseline.
            if let Ok(fetched) = &result
                && ticket.kind == FetchKind::NewQuery
                && ticket.request.query.is_empty()
                && self.baseline.is_empty()
            {
                self.baseline = fetched.page.items.clone();
            }
            tracing::debug!(
                source = self.source.name(),
                seq = ticket.seq,
                latest = self.latest_seq,
                query = %ticket.request.query,
                "Dropping stale search response"
            );
            return false;
        }

        self.state.loading = false;

        match result {
            Ok(fetched) => {
                self.failed = None;
                self.settled = true;
                self.apply_page(ticket.kind, fetched);
            }
            Err(e) => {
                tracing::warn!(
                    source = self.source.name(),
                    query = %ticket.request.query,
                    error = %e,
                    "Search fetch failed"
                );
                self.state.error = Some(e.to_string());
                self.failed = Some(ticket);
            }
        }
        true
    }

    fn apply_page(&mut self, kind: FetchKind, fetched: Fetched) {
        let Fetched { page, tag_only } = fetched;
        let query = self.state.committed_query.clone();
        let unfiltered = query.is_empty();

        match kind {
            FetchKind::NewQuery => {
                if unfiltered {
                    self.baseline = page.items.clone();
                }
                let server_count = page.items.len();
                self.state.items = match &tag_only {
                    Some(rows) => refilter(&query, page.items, rows),
                    None => refilter(&query, page.items, &self.baseline),
                };
                // Tag-only rows arrive whole with the first page, so later pages
                // only add server matches and the total holds across pages.
                let added = (self.state.items.len() - server_count) as u64;
                self.state.total = page.total + added;
            }
            FetchKind::LoadMore => {
                for item in page.items {
                    if unfiltered && !self.baseline.iter().any(|b| b.id == item.id) {
                        self.baseline.push(item.clone());
                    }
                    if !self.state.items.iter().any(|existing| existing.id == item.id) {
                        self.state.items.push(item);
                    }
                }
                self.state.total = self.state.total.max(self.state.items.len() as u64);
            }
        }

        self.state.has_next = page.has_next;
        self.state.cursor = page.cursor;
    }

    async fn execute(&mut self, ticket: Ticket) -> Result<(), SourceError> {
        let result = fetch(self.source.as_ref(), &ticket).await;
        let outcome = result.as_ref().map(|_| ()).map_err(|e| e.clone());
        self.apply(ticket, result);
        outcome
    }

    /// Commit `query` and wait for its first page.
    pub async fn run_query(&mut self, query: &str) -> Result<(), SourceError> {
        match self.begin_query(query) {
            Some(ticket) => self.execute(ticket).await,
            None => Ok(()),
        }
    }

    pub async fn load_more(&mut self) -> Result<(), SourceError> {
        match self.begin_load_more() {
            Some(ticket) => self.execute(ticket).await,
            None => Ok(()),
        }
    }

    pub async fn retry(&mut self) -> Result<(), SourceError> {
        match self.begin_retry() {
            Some(ticket) => self.execute(ticket).await,
            None => Ok(()),
        }
    }
}
