use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::response::IntoResponse;
use tokio::sync::mpsc;

use crate::AppState;
use crate::auth::{SessionContext, decode_jwt};
use crate::db::repositories::InfluencerRepository;
use crate::error::AppError;
use crate::models::requests::{ListingSource, SearchSocketParams};
use crate::search::{
    CreatorSearchSource, InfluencerTableSource, RemoteDataSource, SearchCommand, SearchEvent,
    SearchSession,
};

#[utoipa::path(
    get,
    path = "/api/v1/search/ws",
    params(
        ("source" = Option<String>, Query, description = "influencers (default) or creators"),
        ("token" = String, Query, description = "Bearer token for the session"),
    ),
    responses(
        (status = 101, description = "Switching to the search session protocol"),
        (status = 401, body = crate::error::ErrorBody, description = "Missing or invalid token"),
    ),
    tag = "Search"
)]
pub async fn search_ws(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchSocketParams>,
    ws: WebSocketUpgrade,
) -> Result<impl IntoResponse, AppError> {
    let token = params
        .token
        .as_deref()
        .ok_or_else(|| AppError::unauthorized("Missing token"))?;
    let claims = decode_jwt(
        token,
        &state.settings.jwt_secret_key,
        &state.settings.jwt_issuer,
    )?;

    Ok(ws.on_upgrade(move |socket| handle_socket(state, claims.sub, params.source, socket)))
}

fn listing_source(state: &AppState, source: ListingSource) -> Arc<dyn RemoteDataSource> {
    match source {
        ListingSource::Influencers => Arc::new(InfluencerTableSource::new(
            InfluencerRepository::new(state.db.pool.clone()),
        )),
        ListingSource::Creators => Arc::new(CreatorSearchSource::new(state.creators.clone())),
    }
}

async fn handle_socket(
    state: Arc<AppState>,
    user_id: String,
    source: ListingSource,
    mut socket: WebSocket,
) {
    let session_id = state.sessions.register(&user_id);
    tracing::info!(user_id = %user_id, session_id, ?source, "Search session connected");

    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
    let (evt_tx, mut evt_rx) = mpsc::unbounded_channel();
    let session = SearchSession::new(
        listing_source(&state, source),
        state.settings.search_page_size,
        state.settings.search_debounce(),
        SessionContext::signed_in(user_id.clone()),
    );
    let task = tokio::spawn(session.run(cmd_rx, evt_tx));

    loop {
        tokio::select! {
            event = evt_rx.recv() => {
                let Some(event) = event else { break };
                let ended = matches!(event, SearchEvent::SessionEnded);
                let text = match serde_json::to_string(&event) {
                    Ok(text) => text,
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to serialize search event");
                        continue;
                    }
                };
                if socket.send(Message::Text(text.into())).await.is_err() {
                    break;
                }
                if ended {
                    let _ = socket.send(Message::Close(None)).await;
                    break;
                }
            }
            incoming = socket.recv() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<SearchCommand>(text.as_str()) {
                            Ok(command) => {
                                if cmd_tx.send(command).is_err() {
                                    break;
                                }
                            }
                            Err(e) => {
                                tracing::warn!(user_id = %user_id, error = %e, "Ignoring malformed search command");
                            }
                        }
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    _ => {}
                }
            }
        }
    }

    drop(cmd_tx);
    task.abort();
    state.sessions.unregister(&user_id, session_id);
    tracing::info!(user_id = %user_id, session_id, "Search session disconnected");
}
