//! One live search session: debounced input, latest-wins fetching and
//! pagination for a single listing, driven by client commands.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use super::debounce::Debouncer;
use super::executor::{Fetched, QueryExecutor, Ticket, fetch};
use super::source::{RemoteDataSource, SourceError};
use super::state::SearchView;
use crate::auth::{SessionContext, SessionState};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum SearchCommand {
    Input(String),
    LoadMore,
    Retry,
    Logout,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum SearchEvent {
    State(SearchView),
    SessionEnded,
}

type FetchResult = (Ticket, Result<Fetched, SourceError>);

pub struct SearchSession {
    executor: QueryExecutor,
    debouncer: Debouncer<String>,
    session: SessionContext,
    fetches: JoinSet<FetchResult>,
}

impl SearchSession {
    pub fn new(
        source: Arc<dyn RemoteDataSource>,
        page_size: u32,
        debounce: Duration,
        session: SessionContext,
    ) -> Self {
        Self {
            executor: QueryExecutor::new(source, page_size),
            debouncer: Debouncer::new(debounce),
            session,
            fetches: JoinSet::new(),
        }
    }

    fn spawn_fetch(&mut self, ticket: Option<Ticket>) -> bool {
        let Some(ticket) = ticket else {
            return false;
        };
        let source = self.executor.source().clone();
        self.fetches.spawn(async move {
            let result = fetch(source.as_ref(), &ticket).await;
            (ticket, result)
        });
        true
    }

    fn emit(&self, events: &mpsc::UnboundedSender<SearchEvent>) -> bool {
        events
            .send(SearchEvent::State(self.executor.state().view()))
            .is_ok()
    }

    /// Drive the session until the client disconnects or the user signs out.
    ///
    /// In-flight fetches are aborted when this returns.
    pub async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<SearchCommand>,
        events: mpsc::UnboundedSender<SearchEvent>,
    ) {
        let mut subscription = self.session.subscribe();
        let source = self.executor.source().name();
        tracing::debug!(source, "Search session started");

        let initial = self.executor.begin_query("");
        self.spawn_fetch(initial);
        if !self.emit(&events) {
            return;
        }

        loop {
            let changed = tokio::select! {
                command = commands.recv() => match command {
                    None => break,
                    Some(SearchCommand::Input(value)) => {
                        self.executor.set_raw_query(value.clone());
                        self.debouncer.push(value);
                        true
                    }
                    Some(SearchCommand::LoadMore) => {
                        let ticket = self.executor.begin_load_more();
                        self.spawn_fetch(ticket)
                    }
                    Some(SearchCommand::Retry) => {
                        let ticket = self.executor.begin_retry();
                        self.spawn_fetch(ticket)
                    }
                    Some(SearchCommand::Logout) => {
                        self.debouncer.cancel();
                        self.session.sign_out();
                        false
                    }
                },
                query = self.debouncer.ready() => {
                    let ticket = self.executor.begin_query(&query);
                    self.spawn_fetch(ticket)
                }
                Some(joined) = self.fetches.join_next() => match joined {
                    Ok((ticket, result)) => self.executor.apply(ticket, result),
                    Err(e) => {
                        tracing::error!(source, error = %e, "Search fetch task failed");
                        false
                    }
                },
                state = subscription.changed() => match state {
                    Some(SessionState::SignedIn { .. }) => false,
                    Some(SessionState::SignedOut) | None => {
                        let _ = events.send(SearchEvent::SessionEnded);
                        break;
                    }
                },
            };

            if changed && !self.emit(&events) {
                break;
            }
        }

        subscription.unsubscribe();
        self.fetches.abort_all();
        tracing::debug!(source, "Search session ended");
    }
}
