//! `GET /api/emojis/stream`: live gallery inserts as Server-Sent Events.
//!
//! Each frame carries
//!   event: emoji.inserted
//!   id:    <event uuid>
//!   data:  <EmojiRecord JSON>
//!
//! The subscription lives exactly as long as the HTTP response; a client
//! that disconnects drops the stream and with it the broadcast receiver.

use axum::extract::State;
use axum::response::sse::{Event as SseEvent, KeepAlive, Sse};
use futures::stream::Stream;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{info, warn};

use emoji_shared::types::{event_types, AuthUser};

use crate::events::EmojiEvent;
use crate::AppState;

const KEEP_ALIVE: Duration = Duration::from_secs(15);

pub async fn emoji_stream(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<SseEvent, Infallible>>> {
    let rx = state.feed.subscribe();
    info!(user_id = %user.id, subscribers = state.feed.subscriber_count(), "gallery stream opened");

    Sse::new(insert_frames(rx)).keep_alive(KeepAlive::new().interval(KEEP_ALIVE).text("heartbeat"))
}

fn insert_frames(
    mut rx: broadcast::Receiver<EmojiEvent>,
) -> impl Stream<Item = Result<SseEvent, Infallible>> {
    async_stream::stream! {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    let json = match serde_json::to_string(&event.data) {
                        Ok(j) => j,
                        Err(e) => {
                            warn!("gallery stream: failed to serialize emoji: {e}");
                            continue;
                        }
                    };
                    yield Ok(SseEvent::default()
                        .event(event.event_type.as_str())
                        .id(event.id.to_string())
                        .data(json));
                }
                Err(RecvError::Lagged(n)) => {
                    warn!("gallery stream lagged, skipped {n} inserts");
                    yield Ok(SseEvent::default()
                        .event(event_types::LAG_WARNING)
                        .data(format!("{{\"message\":\"lagged, skipped {n} events\"}}")));
                }
                Err(RecvError::Closed) => {
                    info!("insert feed closed, ending gallery stream");
                    break;
                }
            }
        }
    }
}
